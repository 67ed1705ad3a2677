use std::fs;

use chrono::NaiveDate;
use tempfile::TempDir;

use subtrack_core::core::services::{SubscriptionService, SubscriptionUpdate};
use subtrack_core::currency::Currency;
use subtrack_core::domain::{BillingCycle, Category, Subscription, SubscriptionDraft};
use subtrack_core::storage::{JsonStorage, StorageBackend};

fn storage_with_temp_dir() -> (JsonStorage, TempDir) {
    let temp = TempDir::new().expect("temp dir");
    let storage = JsonStorage::new(temp.path().to_path_buf()).expect("json storage");
    (storage, temp)
}

fn draft(name: &str) -> SubscriptionDraft {
    SubscriptionDraft {
        name: name.into(),
        amount: 1200.0,
        currency: Currency::Jpy,
        billing_cycle: BillingCycle::Monthly,
        category: Category::Life,
        anchor_date: NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
    }
}

#[test]
fn service_mutations_survive_a_save_load_cycle() {
    let (storage, _guard) = storage_with_temp_dir();
    let mut subscriptions = storage.load().expect("load empty");
    assert!(subscriptions.is_empty());

    let id = SubscriptionService::add(&mut subscriptions, draft("iCloud")).expect("add");
    SubscriptionService::add(&mut subscriptions, draft("Dropbox")).expect("add");
    SubscriptionService::update(
        &mut subscriptions,
        id,
        SubscriptionUpdate {
            amount: Some(1500.0),
            ..Default::default()
        },
    )
    .expect("update");
    storage.save(&subscriptions).expect("save");

    let reloaded = storage.load().expect("reload");
    assert_eq!(reloaded.len(), 2);
    let updated = SubscriptionService::get(&reloaded, id).expect("still present");
    assert_eq!(updated.amount, 1500.0);
    assert_eq!(
        updated.anchor_date,
        NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
    );
}

#[test]
fn removing_an_unknown_id_reports_not_found() {
    let mut subscriptions =
        vec![Subscription::new(draft("Netflix")).expect("valid subscription")];
    let ghost = uuid::Uuid::new_v4();
    let err = SubscriptionService::remove(&mut subscriptions, ghost).unwrap_err();
    assert!(format!("{err}").contains("not found"));
    assert_eq!(subscriptions.len(), 1);
}

#[test]
fn legacy_records_with_next_payment_date_still_load() {
    let (storage, _guard) = storage_with_temp_dir();
    let legacy = r#"[
        {
            "id": "71b7f4a6-9f2e-4a49-91a0-b3ffdbe1f2aa",
            "name": "Spotify",
            "amount": 980,
            "currency": "JPY",
            "billingCycle": "monthly",
            "category": "entertainment",
            "nextPaymentDate": "2024-05-10T00:00:00.000Z"
        }
    ]"#;
    fs::write(storage.file_path(), legacy).expect("write legacy file");

    let loaded = storage.load().expect("load legacy records");
    assert_eq!(loaded.len(), 1);
    assert_eq!(
        loaded[0].anchor_date,
        NaiveDate::from_ymd_opt(2024, 5, 10).unwrap()
    );

    // Saving rewrites the canonical layout; reloading keeps the anchor.
    storage.save(&loaded).expect("save canonical layout");
    let data = fs::read_to_string(storage.file_path()).expect("read rewritten file");
    assert!(data.contains("initialPaymentDate"));
    assert!(!data.contains("nextPaymentDate"));
    assert_eq!(storage.load().expect("reload"), loaded);
}

#[test]
fn unknown_currency_codes_are_rejected_not_guessed() {
    let (storage, _guard) = storage_with_temp_dir();
    let bogus = r#"[
        {
            "name": "Mystery",
            "amount": 10,
            "currency": "EUR",
            "billingCycle": "monthly",
            "category": "other",
            "initialPaymentDate": "2024-01-01"
        }
    ]"#;
    fs::write(storage.file_path(), bogus).expect("write bogus file");
    let err = storage.load().unwrap_err();
    assert!(format!("{err}").contains("currency"));
}

#[test]
fn unparseable_anchor_dates_are_an_error() {
    let (storage, _guard) = storage_with_temp_dir();
    let bogus = r#"[
        {
            "name": "Mystery",
            "amount": 10,
            "currency": "USD",
            "billingCycle": "yearly",
            "category": "other",
            "initialPaymentDate": "next tuesday"
        }
    ]"#;
    fs::write(storage.file_path(), bogus).expect("write bogus file");
    assert!(storage.load().is_err());
}
