//! Shared value types: money, IDs, addresses, and statuses.

pub mod address;
pub mod id;
pub mod money;
pub mod status;

pub use address::Address;
pub use id::{CustomerId, EntityId, JobId, OrderId, ProductId};
pub use money::{CurrencyAmount, CurrencyCode, MoneyError};
pub use status::{OrderStatus, TransactionStatus};
