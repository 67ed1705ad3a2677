//! Aggregation over a subscription snapshot: current-month totals, the
//! twelve-bucket yearly breakdown behind the chart, and the per-month
//! payment schedule.

use chrono::{Datelike, NaiveDate};
use uuid::Uuid;

use crate::currency::{Currency, ExchangeRate};
use crate::domain::{BillingCycle, Subscription};
use crate::schedule;

const MONTHS_PER_YEAR: usize = 12;

/// One subscription's share of a monthly bucket, already converted to the
/// display currency.
#[derive(Debug, Clone, PartialEq)]
pub struct Contribution {
    pub name: String,
    pub amount: f64,
    pub is_yearly: bool,
}

/// Derived total for one calendar month of the report year. Recomputed on
/// every call, never persisted.
#[derive(Debug, Clone)]
pub struct MonthlyBucket {
    pub month: &'static str,
    pub total: f64,
    pub contributions: Vec<Contribution>,
}

/// A due payment inside a specific month, for schedule listings.
#[derive(Debug, Clone)]
pub struct ScheduledPayment {
    pub subscription_id: Uuid,
    pub name: String,
    pub due_date: NaiveDate,
    pub amount: f64,
    pub billing_cycle: BillingCycle,
}

pub struct ReportService;

impl ReportService {
    /// Buckets a snapshot into the twelve months of `year`, converted to the
    /// display currency. Monthly subscriptions land in every bucket; yearly
    /// subscriptions land in the single bucket of their anchor month.
    pub fn monthly_totals(
        subscriptions: &[Subscription],
        year: i32,
        display: Currency,
        rate: ExchangeRate,
    ) -> Vec<MonthlyBucket> {
        let mut buckets: Vec<MonthlyBucket> = (1..=MONTHS_PER_YEAR as u32)
            .map(|month| MonthlyBucket {
                month: schedule::month_label(month),
                total: 0.0,
                contributions: Vec::new(),
            })
            .collect();

        for subscription in subscriptions {
            let amount = rate.convert(
                billable_amount(subscription.amount),
                subscription.currency,
                display,
            );
            match subscription.billing_cycle {
                BillingCycle::Monthly => {
                    for bucket in buckets.iter_mut() {
                        bucket.total += amount;
                        bucket.contributions.push(Contribution {
                            name: subscription.name.clone(),
                            amount,
                            is_yearly: false,
                        });
                    }
                }
                BillingCycle::Yearly => {
                    let due = schedule::next_payment_date(
                        subscription.anchor_date,
                        schedule::month_start(year, 1),
                        BillingCycle::Yearly,
                    );
                    let bucket = &mut buckets[due.month0() as usize];
                    bucket.total += amount;
                    bucket.contributions.push(Contribution {
                        name: subscription.name.clone(),
                        amount,
                        is_yearly: true,
                    });
                }
            }
        }

        buckets
    }

    /// Converted sum of everything due in `reference`'s month: all monthly
    /// subscriptions plus the yearly ones anchored to that month.
    pub fn current_month_total(
        subscriptions: &[Subscription],
        reference: NaiveDate,
        display: Currency,
        rate: ExchangeRate,
    ) -> f64 {
        subscriptions
            .iter()
            .filter(|subscription| match subscription.billing_cycle {
                BillingCycle::Monthly => true,
                BillingCycle::Yearly => {
                    schedule::due_in_month(subscription, first_of_month(reference))
                }
            })
            .map(|subscription| {
                rate.convert(
                    billable_amount(subscription.amount),
                    subscription.currency,
                    display,
                )
            })
            .sum()
    }

    /// Payments falling inside the month starting at `month_start`, sorted by
    /// due date then name.
    pub fn payment_schedule(
        subscriptions: &[Subscription],
        month_start: NaiveDate,
        display: Currency,
        rate: ExchangeRate,
    ) -> Vec<ScheduledPayment> {
        let month_start = first_of_month(month_start);
        let mut due: Vec<ScheduledPayment> = subscriptions
            .iter()
            .filter_map(|subscription| {
                let date = schedule::next_payment_date(
                    subscription.anchor_date,
                    month_start,
                    subscription.billing_cycle,
                );
                if !schedule::same_month(date, month_start) {
                    return None;
                }
                Some(ScheduledPayment {
                    subscription_id: subscription.id,
                    name: subscription.name.clone(),
                    due_date: date,
                    amount: rate.convert(
                        billable_amount(subscription.amount),
                        subscription.currency,
                        display,
                    ),
                    billing_cycle: subscription.billing_cycle,
                })
            })
            .collect();
        due.sort_by(|a, b| {
            a.due_date
                .cmp(&b.due_date)
                .then_with(|| a.name.cmp(&b.name))
        });
        due
    }
}

/// A single malformed record must not poison the whole aggregation, so
/// non-finite and negative amounts contribute zero.
fn billable_amount(amount: f64) -> f64 {
    if amount.is_finite() && amount > 0.0 {
        amount
    } else {
        0.0
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    schedule::month_start(date.year(), date.month())
}
