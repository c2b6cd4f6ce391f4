//! Promo code model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Promo code entity with a validity window
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct PromoCode {
    pub id: Uuid,
    /// Unique within the table
    pub code: String,
    /// Percentage in [0, 100]
    pub discount_percent: Decimal,
    pub active: bool,
    pub valid_from: DateTime<Utc>,
    pub valid_until: DateTime<Utc>,
}

/// Create promo code payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PromoCodeCreate {
    #[validate(length(min = 1, max = 50))]
    pub code: String,
    pub discount_percent: Decimal,
    #[serde(default = "default_active")]
    pub active: bool,
    pub valid_from: DateTime<Utc>,
    pub valid_until: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

/// Partial promo code update. Omitted fields are left untouched — an
/// absent `active` never deactivates an existing code.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromoCodeUpdate {
    pub code: Option<String>,
    pub discount_percent: Option<Decimal>,
    pub active: Option<bool>,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_until: Option<DateTime<Utc>>,
}
