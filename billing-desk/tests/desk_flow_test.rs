//! End-to-end till flows over the public BillingDesk API

use billing_desk::history::codec;
use billing_desk::upi::parse_payment_url;
use billing_desk::{BillingDesk, BillingError, DeskConfig, KvStore, MemoryKv, RedbKv};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

fn memory_desk() -> (Arc<MemoryKv>, BillingDesk) {
    let kv = Arc::new(MemoryKv::new());
    let desk = BillingDesk::with_store(kv.clone(), DeskConfig::with_work_dir("unused"));
    (kv, desk)
}

#[test]
fn test_quick_entry_then_paid() {
    let (kv, desk) = memory_desk();
    desk.add_item("Shirt", "2", "499.5").unwrap();
    desk.add_item("", "", "100").unwrap();
    assert_eq!(desk.grand_total(), 1099.0);

    let request = desk.payment_request().unwrap();
    let intent = parse_payment_url(&request.url).unwrap();
    assert_eq!(intent.amount, "1099.00");
    assert_eq!(intent.currency, "INR");

    let receipt = desk.mark_paid().unwrap();
    assert_eq!(receipt.entry.amount, 1099.0);
    assert!(desk.items().is_empty());

    // persisted under the history key as a versioned envelope
    let raw = kv.get(&desk.config().history_key).unwrap().unwrap();
    let decoded = codec::decode(&raw).unwrap();
    assert_eq!(decoded.version, codec::SCHEMA_VERSION);
    assert_eq!(decoded.entries, vec![receipt.entry]);
}

#[test]
fn test_second_mark_paid_is_rejected() {
    let (_kv, desk) = memory_desk();
    desk.add("Kurta", 1, 799.0).unwrap();

    desk.mark_paid().unwrap();
    assert_eq!(desk.mark_paid().unwrap_err(), BillingError::EmptyBillOperation);
    assert_eq!(desk.history().len(), 1);
}

#[test]
fn test_zero_total_bill_cannot_be_paid() {
    let (_kv, desk) = memory_desk();
    desk.add_item("Gift wrap", "1", "0").unwrap();

    assert_eq!(desk.payment_request().unwrap_err(), BillingError::EmptyBillOperation);
    assert_eq!(desk.mark_paid().unwrap_err(), BillingError::EmptyBillOperation);
    assert!(desk.history().is_empty());
}

#[test]
fn test_clear_history_leaves_bill() {
    let (_kv, desk) = memory_desk();
    desk.add("Socks", 3, 50.0).unwrap();
    desk.mark_paid().unwrap();

    desk.add("Cap", 1, 250.0).unwrap();
    desk.clear_history().unwrap();

    assert!(desk.history().is_empty());
    assert_eq!(desk.items().len(), 1);
    assert_eq!(desk.grand_total(), 250.0);
}

#[test]
fn test_paid_entry_is_isolated_from_later_bill_edits() {
    let (_kv, desk) = memory_desk();
    desk.add("Shirt", 2, 499.5).unwrap();
    let receipt = desk.mark_paid().unwrap();

    let item = desk.add("Shirt", 5, 10.0).unwrap();
    desk.remove_item(&item.id);
    desk.add("Jeans", 1, 1200.0).unwrap();

    let stored = &desk.history()[0];
    assert_eq!(stored, &receipt.entry);
    assert_eq!(stored.items.len(), 1);
    assert_eq!(stored.items[0].qty, 2);
    assert_eq!(stored.amount, 999.0);
}

#[test]
fn test_history_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let config = DeskConfig::with_work_dir(dir.path().to_string_lossy());

    let first_id = {
        let desk = BillingDesk::open(config.clone()).unwrap();
        desk.add("Saree", 1, 2499.0).unwrap();
        let receipt = desk.mark_paid().unwrap();
        desk.add("Left open", 1, 10.0).unwrap();
        receipt.entry.id
    };

    let desk = BillingDesk::open(config).unwrap();
    let history = desk.history();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].id, first_id);
    assert_eq!(desk.total_collected(), 2499.0);
    // the open bill is not persisted
    assert!(desk.items().is_empty());
}

#[test]
fn test_corrupted_history_starts_empty() {
    let kv = RedbKv::open_in_memory().unwrap();
    kv.set("kherwal_bazaar_payment_history_v1", "{not json").unwrap();

    let desk = BillingDesk::with_store(Arc::new(kv), DeskConfig::with_work_dir("unused"));
    assert!(desk.history().is_empty());

    desk.add("Belt", 1, 300.0).unwrap();
    desk.mark_paid().unwrap();
    assert_eq!(desk.history().len(), 1);
}

#[test]
fn test_random_sessions_keep_totals_consistent() {
    let mut rng = StdRng::seed_from_u64(42);
    let (_kv, desk) = memory_desk();
    let mut collected = 0.0_f64;

    for _ in 0..300 {
        match rng.gen_range(0..10) {
            0..=5 => {
                let qty = rng.gen_range(1..5);
                let price = rng.gen_range(0..100_000) as f64 / 100.0;
                desk.add("Item", qty, price).unwrap();
            }
            6 | 7 => {
                let items = desk.items();
                if !items.is_empty() {
                    let idx = rng.gen_range(0..items.len());
                    assert!(desk.remove_item(&items[idx].id));
                }
            }
            _ => {
                let total = desk.grand_total();
                match desk.mark_paid() {
                    Ok(receipt) => {
                        assert!(total > 0.0);
                        assert_eq!(receipt.entry.amount, total);
                        assert!(receipt.entry.is_consistent());
                        collected = shared::money::to_f64(
                            shared::money::to_decimal(collected) + shared::money::to_decimal(total),
                        );
                    }
                    Err(e) => {
                        assert_eq!(e, BillingError::EmptyBillOperation);
                        assert!(total <= 0.0);
                    }
                }
            }
        }

        let recomputed = shared::money::to_f64(
            shared::money::sum_lines(desk.items().iter().map(|it| (it.qty, it.price))).unwrap(),
        );
        assert_eq!(desk.grand_total(), recomputed);
    }

    assert_eq!(desk.total_collected(), collected);
}
