pub mod json_backend;

pub use json_backend::JsonStorage;

use crate::domain::Subscription;
use crate::errors::SubtrackError;

pub type Result<T> = std::result::Result<T, SubtrackError>;

/// Seam between the core and whatever persists the subscription array.
pub trait StorageBackend {
    fn load(&self) -> Result<Vec<Subscription>>;
    fn save(&self, subscriptions: &[Subscription]) -> Result<()>;
}
