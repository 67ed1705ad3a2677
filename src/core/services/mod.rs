pub mod report_service;
pub mod subscription_service;

pub use report_service::{Contribution, MonthlyBucket, ReportService, ScheduledPayment};
pub use subscription_service::{SubscriptionFilter, SubscriptionService, SubscriptionUpdate};

use crate::errors::SubtrackError;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Subtrack(#[from] SubtrackError),
    #[error("{0}")]
    Invalid(String),
}
