use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::currency::Currency;
use crate::domain::common::{Identifiable, NamedEntity};
use crate::errors::SubtrackError;

/// Upper bound on service names, mirroring the entry form's limit.
pub const NAME_MAX_LEN: usize = 50;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum BillingCycle {
    Monthly,
    Yearly,
}

impl BillingCycle {
    pub fn code(&self) -> &'static str {
        match self {
            BillingCycle::Monthly => "monthly",
            BillingCycle::Yearly => "yearly",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BillingCycle::Monthly => "Monthly",
            BillingCycle::Yearly => "Yearly",
        }
    }
}

impl fmt::Display for BillingCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for BillingCycle {
    type Err = SubtrackError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "monthly" => Ok(BillingCycle::Monthly),
            "yearly" => Ok(BillingCycle::Yearly),
            _ => Err(SubtrackError::UnsupportedEnum {
                field: "billing cycle",
                value: value.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Life,
    Entertainment,
    Work,
    Other,
}

impl Category {
    pub fn code(&self) -> &'static str {
        match self {
            Category::Life => "life",
            Category::Entertainment => "entertainment",
            Category::Work => "work",
            Category::Other => "other",
        }
    }

    pub fn all() -> &'static [Category] {
        &[
            Category::Life,
            Category::Entertainment,
            Category::Work,
            Category::Other,
        ]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Category {
    type Err = SubtrackError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "life" => Ok(Category::Life),
            "entertainment" => Ok(Category::Entertainment),
            "work" => Ok(Category::Work),
            "other" => Ok(Category::Other),
            _ => Err(SubtrackError::UnsupportedEnum {
                field: "category",
                value: value.to_string(),
            }),
        }
    }
}

/// A recorded recurring payment. The anchor date pins the recurrence: the
/// day-of-month (or month-and-day for yearly cycles) every future payment
/// derives from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "SubscriptionRecord", into = "SubscriptionRecord")]
pub struct Subscription {
    pub id: Uuid,
    pub name: String,
    pub amount: f64,
    pub currency: Currency,
    pub billing_cycle: BillingCycle,
    pub category: Category,
    pub anchor_date: NaiveDate,
}

impl Subscription {
    pub fn new(draft: SubscriptionDraft) -> Result<Self, SubtrackError> {
        validate_name(&draft.name)?;
        validate_amount(draft.amount)?;
        Ok(Self {
            id: Uuid::new_v4(),
            name: draft.name.trim().to_string(),
            amount: draft.amount,
            currency: draft.currency,
            billing_cycle: draft.billing_cycle,
            category: draft.category,
            anchor_date: draft.anchor_date,
        })
    }
}

impl Identifiable for Subscription {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl NamedEntity for Subscription {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Input for creating a subscription before an id is assigned.
#[derive(Debug, Clone)]
pub struct SubscriptionDraft {
    pub name: String,
    pub amount: f64,
    pub currency: Currency,
    pub billing_cycle: BillingCycle,
    pub category: Category,
    pub anchor_date: NaiveDate,
}

fn validate_name(name: &str) -> Result<(), SubtrackError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(SubtrackError::Validation("name must not be empty".into()));
    }
    if trimmed.chars().count() > NAME_MAX_LEN {
        return Err(SubtrackError::Validation(format!(
            "name exceeds {} characters",
            NAME_MAX_LEN
        )));
    }
    Ok(())
}

fn validate_amount(amount: f64) -> Result<(), SubtrackError> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(SubtrackError::Validation(format!(
            "amount must be a non-negative number, got {}",
            amount
        )));
    }
    Ok(())
}

/// Persisted layout. Older exports stored the anchor under `nextPaymentDate`
/// (a precomputed due date) or `anchorDate`; whichever date field is present
/// is treated as the anchor, with the explicit anchor winning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubscriptionRecord {
    #[serde(default = "Uuid::new_v4")]
    id: Uuid,
    name: String,
    amount: f64,
    currency: String,
    billing_cycle: String,
    category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    initial_payment_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    anchor_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    next_payment_date: Option<String>,
}

impl TryFrom<SubscriptionRecord> for Subscription {
    type Error = SubtrackError;

    fn try_from(record: SubscriptionRecord) -> Result<Self, Self::Error> {
        let anchor_raw = record
            .initial_payment_date
            .as_deref()
            .or(record.anchor_date.as_deref())
            .or(record.next_payment_date.as_deref())
            .ok_or_else(|| SubtrackError::InvalidDate("missing anchor date".into()))?;
        Ok(Self {
            id: record.id,
            name: record.name,
            amount: record.amount,
            currency: record.currency.parse()?,
            billing_cycle: record.billing_cycle.parse()?,
            category: record.category.parse()?,
            anchor_date: parse_anchor_date(anchor_raw)?,
        })
    }
}

impl From<Subscription> for SubscriptionRecord {
    fn from(subscription: Subscription) -> Self {
        Self {
            id: subscription.id,
            name: subscription.name,
            amount: subscription.amount,
            currency: subscription.currency.code().to_string(),
            billing_cycle: subscription.billing_cycle.code().to_string(),
            category: subscription.category.code().to_string(),
            initial_payment_date: Some(subscription.anchor_date.format("%Y-%m-%d").to_string()),
            anchor_date: None,
            next_payment_date: None,
        }
    }
}

/// Accepts plain calendar dates as well as the full ISO timestamps browser
/// exports carry (`2024-01-31T00:00:00.000Z`).
pub fn parse_anchor_date(raw: &str) -> Result<NaiveDate, SubtrackError> {
    let trimmed = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(stamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(stamp.date_naive());
    }
    Err(SubtrackError::InvalidDate(trimmed.to_string()))
}
