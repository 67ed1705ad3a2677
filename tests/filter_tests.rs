use chrono::NaiveDate;

use subtrack_core::core::services::{SubscriptionFilter, SubscriptionService};
use subtrack_core::currency::Currency;
use subtrack_core::domain::{BillingCycle, Category, Subscription, SubscriptionDraft};

fn subscription(name: &str, category: Category, cycle: BillingCycle) -> Subscription {
    Subscription::new(SubscriptionDraft {
        name: name.into(),
        amount: 980.0,
        currency: Currency::Jpy,
        billing_cycle: cycle,
        category,
        anchor_date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
    })
    .expect("valid subscription")
}

fn sample_set() -> Vec<Subscription> {
    vec![
        subscription("Netflix", Category::Entertainment, BillingCycle::Monthly),
        subscription("Spotify", Category::Entertainment, BillingCycle::Monthly),
        subscription("iCloud", Category::Life, BillingCycle::Monthly),
        subscription("JetBrains", Category::Work, BillingCycle::Yearly),
    ]
}

#[test]
fn all_wildcards_return_the_input_unchanged_in_order() {
    let subscriptions = sample_set();
    let matched = SubscriptionService::filter(&subscriptions, &SubscriptionFilter::default());
    let names: Vec<&str> = matched.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Netflix", "Spotify", "iCloud", "JetBrains"]);
}

#[test]
fn name_matching_is_a_case_insensitive_substring() {
    let subscriptions = sample_set();
    let filter = SubscriptionFilter {
        name: Some("net".into()),
        ..Default::default()
    };
    let matched = SubscriptionService::filter(&subscriptions, &filter);
    let names: Vec<&str> = matched.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Netflix"]);
}

#[test]
fn predicates_combine_with_and() {
    let subscriptions = sample_set();
    let filter = SubscriptionFilter {
        name: None,
        category: Some(Category::Entertainment),
        billing_cycle: Some(BillingCycle::Monthly),
    };
    let matched = SubscriptionService::filter(&subscriptions, &filter);
    assert_eq!(matched.len(), 2);

    let filter = SubscriptionFilter {
        name: Some("spot".into()),
        category: Some(Category::Work),
        billing_cycle: None,
    };
    assert!(SubscriptionService::filter(&subscriptions, &filter).is_empty());
}

#[test]
fn blank_name_query_passes_everything() {
    let subscriptions = sample_set();
    let filter = SubscriptionFilter {
        name: Some("   ".into()),
        ..Default::default()
    };
    assert_eq!(
        SubscriptionService::filter(&subscriptions, &filter).len(),
        subscriptions.len()
    );
}

#[test]
fn cycle_filter_selects_yearly_only() {
    let subscriptions = sample_set();
    let filter = SubscriptionFilter {
        billing_cycle: Some(BillingCycle::Yearly),
        ..Default::default()
    };
    let matched = SubscriptionService::filter(&subscriptions, &filter);
    let names: Vec<&str> = matched.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["JetBrains"]);
}
