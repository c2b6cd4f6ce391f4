//! Pure aggregation math: growth percentages, calendar period bounds,
//! the zero-filled monthly revenue report and the country distribution.
//! Everything here is database-free and unit-tested directly.

use chrono::{Datelike, Duration, NaiveDate};
use shared::models::analytics::{CountryShare, LocationTotal, MonthRevenue, MonthlyRevenueReport};
use std::collections::BTreeMap;

/// Round to 2 decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Period-over-period growth in percent, rounded to 2 decimals.
/// An empty previous period yields 100.0 when the current one is not
/// empty, 0.0 otherwise.
pub fn growth_percent(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        return if current > 0.0 { 100.0 } else { 0.0 };
    }
    round2((current - previous) / previous * 100.0)
}

/// English month name, 1-based
pub fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "Unknown",
    }
}

// ==================== calendar periods ====================

/// Monday of the week containing `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// First and last day of a calendar month; `None` for an invalid month
pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((start, next - Duration::days(1)))
}

/// The month immediately before (year, month)
pub fn previous_month(year: i32, month: u32) -> (i32, u32) {
    if month == 1 { (year - 1, 12) } else { (year, month - 1) }
}

/// First and last day of a calendar year
pub fn year_bounds(year: i32) -> Option<(NaiveDate, NaiveDate)> {
    Some((
        NaiveDate::from_ymd_opt(year, 1, 1)?,
        NaiveDate::from_ymd_opt(year, 12, 31)?,
    ))
}

// ==================== reports ====================

/// Assemble the yearly revenue report from per-month sums. Months
/// without rows are zero-filled; growth compares the two most recent
/// populated months.
pub fn monthly_report(year: i32, rows: &[(u32, i64, f64)]) -> MonthlyRevenueReport {
    let mut by_month: BTreeMap<u32, (i64, f64)> = BTreeMap::new();
    for &(month, orders, revenue) in rows {
        if (1..=12).contains(&month) {
            let slot = by_month.entry(month).or_default();
            slot.0 += orders;
            slot.1 += revenue;
        }
    }

    let monthly_data = (1..=12)
        .map(|m| {
            let (orders, revenue) = by_month.get(&m).copied().unwrap_or_default();
            MonthRevenue {
                month: month_name(m).to_string(),
                month_number: m,
                total_orders: orders,
                total_revenue: round2(revenue),
            }
        })
        .collect();

    let mut populated: Vec<u32> = by_month.keys().copied().collect();
    populated.sort_unstable();
    let current = populated.last().copied();
    let previous = populated.len().checked_sub(2).and_then(|i| populated.get(i).copied());

    let (orders, revenue) = current
        .and_then(|m| by_month.get(&m).copied())
        .unwrap_or_default();
    let (prev_orders, prev_revenue) = previous
        .and_then(|m| by_month.get(&m).copied())
        .unwrap_or_default();

    MonthlyRevenueReport {
        current_month_start: current.and_then(|m| NaiveDate::from_ymd_opt(year, m, 1)),
        revenue: round2(revenue),
        orders,
        revenue_growth_percent: growth_percent(revenue, prev_revenue),
        order_growth_percent: growth_percent(orders as f64, prev_orders as f64),
        monthly_data,
    }
}

/// Per-country share of users, summed across states. All shares are 0.0
/// when the total is zero.
pub fn country_distribution(locations: &[LocationTotal]) -> Vec<CountryShare> {
    let mut by_country: BTreeMap<&str, i64> = BTreeMap::new();
    for loc in locations {
        *by_country.entry(loc.country.as_str()).or_default() += loc.users;
    }
    let total: i64 = by_country.values().sum();

    let mut shares: Vec<CountryShare> = by_country
        .into_iter()
        .map(|(country, users)| CountryShare {
            country: country.to_string(),
            users,
            percent: if total == 0 {
                0.0
            } else {
                round2(users as f64 / total as f64 * 100.0)
            },
        })
        .collect();
    shares.sort_by(|a, b| b.users.cmp(&a.users).then_with(|| a.country.cmp(&b.country)));
    shares
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(country: &str, state: &str, users: i64) -> LocationTotal {
        LocationTotal {
            country: country.to_string(),
            state: state.to_string(),
            users,
        }
    }

    #[test]
    fn growth_is_relative_change_in_percent() {
        // 100 visitors after 50 is exactly +100%
        assert_eq!(growth_percent(100.0, 50.0), 100.0);
        assert_eq!(growth_percent(150.0, 100.0), 50.0);
        assert_eq!(growth_percent(50.0, 100.0), -50.0);
        assert_eq!(growth_percent(100.0, 30.0), 233.33);
    }

    #[test]
    fn growth_with_empty_previous_period() {
        // a day with visitors after a day with none reads as +100%
        assert_eq!(growth_percent(100.0, 0.0), 100.0);
        assert_eq!(growth_percent(0.0, 0.0), 0.0);
    }

    #[test]
    fn weeks_start_on_monday() {
        // 2024-01-10 is a Wednesday
        let wed = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        assert_eq!(week_start(wed), NaiveDate::from_ymd_opt(2024, 1, 8).unwrap());
        let mon = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap();
        assert_eq!(week_start(mon), mon);
    }

    #[test]
    fn month_bounds_cover_the_whole_month() {
        let (start, end) = month_bounds(2024, 2).unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert!(month_bounds(2024, 13).is_none());
        assert_eq!(previous_month(2024, 1), (2023, 12));
    }

    #[test]
    fn report_zero_fills_all_twelve_months() {
        let report = monthly_report(2024, &[]);
        assert_eq!(report.monthly_data.len(), 12);
        assert!(report.monthly_data.iter().all(|m| m.total_orders == 0));
        assert_eq!(report.current_month_start, None);
        assert_eq!(report.revenue_growth_percent, 0.0);
    }

    #[test]
    fn report_compares_latest_two_populated_months() {
        let rows = [(1, 10, 100.0), (3, 20, 300.0)];
        let report = monthly_report(2024, &rows);

        assert_eq!(
            report.current_month_start,
            NaiveDate::from_ymd_opt(2024, 3, 1)
        );
        assert_eq!(report.revenue, 300.0);
        assert_eq!(report.orders, 20);
        assert_eq!(report.revenue_growth_percent, 200.0);
        assert_eq!(report.order_growth_percent, 100.0);

        assert_eq!(report.monthly_data[0].total_revenue, 100.0);
        assert_eq!(report.monthly_data[1].total_revenue, 0.0);
        assert_eq!(report.monthly_data[2].month, "March");
    }

    #[test]
    fn single_populated_month_grows_from_nothing() {
        let report = monthly_report(2024, &[(6, 5, 50.0)]);
        assert_eq!(report.revenue_growth_percent, 100.0);
        assert_eq!(report.order_growth_percent, 100.0);
    }

    #[test]
    fn distribution_splits_by_country() {
        // 80/20 split across two countries
        let shares = country_distribution(&[
            loc("US", "CA", 50),
            loc("US", "NY", 30),
            loc("Canada", "ON", 20),
        ]);
        assert_eq!(shares.len(), 2);
        assert_eq!(shares[0].country, "US");
        assert_eq!(shares[0].users, 80);
        assert_eq!(shares[0].percent, 80.0);
        assert_eq!(shares[1].percent, 20.0);
    }

    #[test]
    fn distribution_of_nothing_is_all_zero() {
        assert!(country_distribution(&[]).is_empty());
        let shares = country_distribution(&[loc("US", "CA", 0)]);
        assert_eq!(shares[0].percent, 0.0);
    }
}
