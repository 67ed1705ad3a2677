//! Maintenance of the subscription collection. The storage backend owns the
//! persisted array; these helpers mutate an in-memory snapshot and leave
//! persistence to the caller.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::currency::Currency;
use crate::domain::{BillingCycle, Category, Subscription, SubscriptionDraft};
use crate::errors::SubtrackError;

use super::ServiceResult;

/// Partial change set applied over an existing record.
#[derive(Debug, Clone, Default)]
pub struct SubscriptionUpdate {
    pub name: Option<String>,
    pub amount: Option<f64>,
    pub currency: Option<Currency>,
    pub billing_cycle: Option<BillingCycle>,
    pub category: Option<Category>,
    pub anchor_date: Option<NaiveDate>,
}

/// AND-combined predicates; a `None` field passes everything.
#[derive(Debug, Clone, Default)]
pub struct SubscriptionFilter {
    pub name: Option<String>,
    pub category: Option<Category>,
    pub billing_cycle: Option<BillingCycle>,
}

pub struct SubscriptionService;

impl SubscriptionService {
    /// Validates the draft and appends it with a fresh id.
    pub fn add(
        subscriptions: &mut Vec<Subscription>,
        draft: SubscriptionDraft,
    ) -> ServiceResult<Uuid> {
        let subscription = Subscription::new(draft)?;
        let id = subscription.id;
        tracing::debug!(%id, name = %subscription.name, "subscription added");
        subscriptions.push(subscription);
        Ok(id)
    }

    pub fn update(
        subscriptions: &mut [Subscription],
        id: Uuid,
        update: SubscriptionUpdate,
    ) -> ServiceResult<()> {
        let existing = subscriptions
            .iter_mut()
            .find(|subscription| subscription.id == id)
            .ok_or(SubtrackError::NotFound(id))?;
        let mut draft = SubscriptionDraft {
            name: update.name.unwrap_or_else(|| existing.name.clone()),
            amount: update.amount.unwrap_or(existing.amount),
            currency: update.currency.unwrap_or(existing.currency),
            billing_cycle: update.billing_cycle.unwrap_or(existing.billing_cycle),
            category: update.category.unwrap_or(existing.category),
            anchor_date: update.anchor_date.unwrap_or(existing.anchor_date),
        };
        draft.name = draft.name.trim().to_string();
        let mut replacement = Subscription::new(draft)?;
        replacement.id = existing.id;
        *existing = replacement;
        tracing::debug!(%id, "subscription updated");
        Ok(())
    }

    pub fn remove(
        subscriptions: &mut Vec<Subscription>,
        id: Uuid,
    ) -> ServiceResult<Subscription> {
        let index = subscriptions
            .iter()
            .position(|subscription| subscription.id == id)
            .ok_or(SubtrackError::NotFound(id))?;
        tracing::debug!(%id, "subscription removed");
        Ok(subscriptions.remove(index))
    }

    pub fn get(subscriptions: &[Subscription], id: Uuid) -> Option<&Subscription> {
        subscriptions.iter().find(|subscription| subscription.id == id)
    }

    /// Case-insensitive name substring AND exact category AND exact cycle,
    /// preserving input order. Absent predicates always pass.
    pub fn filter<'a>(
        subscriptions: &'a [Subscription],
        filter: &SubscriptionFilter,
    ) -> Vec<&'a Subscription> {
        let needle = filter
            .name
            .as_deref()
            .map(str::trim)
            .filter(|query| !query.is_empty())
            .map(str::to_lowercase);
        subscriptions
            .iter()
            .filter(|subscription| {
                let name_hit = needle
                    .as_deref()
                    .map(|query| subscription.name.to_lowercase().contains(query))
                    .unwrap_or(true);
                let category_hit = filter
                    .category
                    .map(|category| subscription.category == category)
                    .unwrap_or(true);
                let cycle_hit = filter
                    .billing_cycle
                    .map(|cycle| subscription.billing_cycle == cycle)
                    .unwrap_or(true);
                name_hit && category_hit && cycle_hit
            })
            .collect()
    }
}
