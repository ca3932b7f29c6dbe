/// Generate an opaque unique id (UUID v4, hyphenated)
///
/// Used for both line items and payment entries; v4 collisions are not a
/// concern at till scale.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
