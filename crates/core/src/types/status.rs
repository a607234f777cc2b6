//! Status enums for orders and transactions.
//!
//! The string forms follow the host platform's stored slugs so adapters and
//! data stores can map them without lookup tables.

use serde::{Deserialize, Serialize};

/// Lifecycle status of an order on the host platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Completed,
    Cancelled,
    Failed,
    OnHold,
    Refunded,
}

impl OrderStatus {
    /// The host platform's status slug.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Failed => "failed",
            Self::OnHold => "on-hold",
            Self::Refunded => "refunded",
        }
    }

    /// Parse a host status slug; unknown slugs fall back to `Pending`.
    #[must_use]
    pub fn from_slug(slug: &str) -> Self {
        match slug {
            "processing" => Self::Processing,
            "completed" => Self::Completed,
            "cancelled" => Self::Cancelled,
            "failed" => Self::Failed,
            "on-hold" => Self::OnHold,
            "refunded" => Self::Refunded,
            _ => Self::Pending,
        }
    }
}

/// Outcome of a payment transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionStatus {
    Approved,
    Declined,
    #[default]
    Pending,
    Error,
}

impl TransactionStatus {
    /// The stored metadata form of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Approved => "APPROVED",
            Self::Declined => "DECLINED",
            Self::Pending => "PENDING",
            Self::Error => "ERROR",
        }
    }

    /// Parse a stored status; unknown values fall back to `Pending`.
    #[must_use]
    pub fn from_slug(slug: &str) -> Self {
        match slug.to_ascii_uppercase().as_str() {
            "APPROVED" => Self::Approved,
            "DECLINED" => Self::Declined,
            "ERROR" => Self::Error,
            _ => Self::Pending,
        }
    }
}
