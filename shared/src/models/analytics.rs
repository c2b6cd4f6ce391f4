//! Analytics models: KPI, order, visitor and location event rows plus
//! the aggregated shapes returned over the WebSocket API

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Daily KPI row, keyed by date. All metrics are non-negative.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct DailyKpis {
    pub date: NaiveDate,
    pub total_orders: i64,
    pub total_revenue: f64,
    pub total_customers: i64,
    pub total_earnings: f64,
}

/// Order event row, keyed by date
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderEvent {
    pub date: NaiveDate,
    pub total_orders: i64,
    pub total_revenue: f64,
    pub total_earnings: f64,
}

/// Visitor event row, keyed by (source, date)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct VisitorEvent {
    pub source: String,
    pub date: NaiveDate,
    pub visitors: i64,
}

/// Visitor upsert payload. `increment` adds to an existing row instead
/// of overwriting it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisitorEventUpsert {
    pub source: String,
    pub date: NaiveDate,
    pub visitors: i64,
    #[serde(default = "default_increment")]
    pub increment: bool,
}

fn default_increment() -> bool {
    true
}

/// User location stats row, keyed by (country, state, date)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct UserLocationStat {
    pub country: String,
    pub state: String,
    pub date: NaiveDate,
    pub users: i64,
}

// ==================== Aggregated shapes ====================

/// KPI totals for one time bucket (week/month/year), keyed by the
/// bucket's first day
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct KpiBucket {
    pub bucket_start: NaiveDate,
    pub total_orders: i64,
    pub total_revenue: f64,
    pub total_customers: i64,
    pub total_earnings: f64,
}

/// Order event totals for one time bucket
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderBucket {
    pub bucket_start: NaiveDate,
    pub total_orders: i64,
    pub total_revenue: f64,
    pub total_earnings: f64,
}

/// Per-source visitor total for a period
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct SourceTotal {
    pub source: String,
    pub visitors: i64,
}

/// Per-(country, state) user total for a period
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct LocationTotal {
    pub country: String,
    pub state: String,
    pub users: i64,
}

/// One country's share of users on a date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryShare {
    pub country: String,
    pub users: i64,
    /// Share of the day's total, rounded to 2 decimals; 0.0 when the
    /// total is zero
    pub percent: f64,
}

/// Period-over-period visitor growth
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisitorGrowth {
    pub total_visitors: i64,
    /// Rounded to 2 decimals; 100.0 when the previous period was empty
    /// and the current is not, 0.0 when both are empty
    pub growth_percent: f64,
    /// Current period totals broken down by source
    pub media: BTreeMap<String, i64>,
}

/// One month's totals in the yearly revenue report, zero-filled for
/// months without rows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthRevenue {
    /// Month name ("January" .. "December")
    pub month: String,
    pub month_number: u32,
    pub total_orders: i64,
    pub total_revenue: f64,
}

/// Monthly revenue-by-year report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyRevenueReport {
    /// First day of the most recent populated month, if any
    pub current_month_start: Option<NaiveDate>,
    pub revenue: f64,
    pub orders: i64,
    pub revenue_growth_percent: f64,
    pub order_growth_percent: f64,
    /// Always exactly 12 entries, January through December
    pub monthly_data: Vec<MonthRevenue>,
}

/// Location totals for one period, with the period's bounds echoed back
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationPeriodStats {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    pub locations: Vec<LocationTotal>,
}
