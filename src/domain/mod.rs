pub mod common;
pub mod subscription;

pub use common::{Identifiable, NamedEntity};
pub use subscription::{BillingCycle, Category, Subscription, SubscriptionDraft, NAME_MAX_LEN};
