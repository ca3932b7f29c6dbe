//! UPI payment links and their QR codes

pub mod qr;
pub mod url;

pub use qr::{LocalQrRenderer, QrImage, QrMode, QrRenderer, RemoteQrRenderer, render_terminal};
pub use url::{UpiIntent, build_payment_url, build_payment_url_with_currency, parse_payment_url};
