use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Headline totals for a slice of order history.
///
/// Revenue sums every line item in the slice; the order count is distinct, so
/// multi-line orders are counted once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverviewSummary {
    pub total_orders: u64,
    pub total_revenue: Decimal,
}

/// Distinct orders and revenue for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyOrdersSummary {
    pub date: NaiveDate,
    pub order_count: u64,
    pub revenue: Decimal,
}

/// Total quantity sold for one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRanking {
    pub product_name: String,
    pub total_quantity: u64,
}

/// The two product leaderboards, derived from the same quantity totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRankings {
    /// Highest total quantity first.
    pub best: Vec<ProductRanking>,
    /// Lowest total quantity first.
    pub worst: Vec<ProductRanking>,
}

/// Distinct customers for one value of a demographic dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemographicCount {
    pub category_value: String,
    pub customer_count: u64,
}

/// Recency/Frequency/Monetary metrics for one customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RfmRecord {
    pub customer_id: String,
    /// Count of distinct orders the customer placed.
    pub frequency: u64,
    /// Sum of the customer's line-item totals.
    pub monetary: Decimal,
    /// Whole days between the dataset's latest order date and this
    /// customer's latest order date. Never negative.
    pub recency: i64,
}
