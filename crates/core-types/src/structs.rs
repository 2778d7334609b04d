use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::enums::{AgeGroup, Gender};

/// A single order line item, already joined with the purchasing customer's
/// attributes.
///
/// This is the engine's entire input schema. Field presence is validated once
/// at the ingestion boundary; the two `Option` fields are the typed stand-ins
/// for values the source data could not provide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub order_id: String,
    pub customer_id: String,
    /// `None` when the source row carried a missing or unparseable timestamp.
    /// Such records are excluded from date-dependent aggregations but still
    /// count toward product rankings and demographic breakdowns.
    pub order_date: Option<DateTime<Utc>>,
    pub product_name: String,
    pub quantity: u32,
    pub total_price: Decimal,
    pub gender: Gender,
    /// `None` when the source value fell outside the known brackets.
    pub age_group: Option<AgeGroup>,
    pub state: String,
}

/// An inclusive calendar-date window used to slice order history.
///
/// A range whose `start` lies after its `end` is representable and simply
/// matches nothing; it is never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Returns true when no date can satisfy the range.
    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    /// Inclusive containment check; always false for an inverted range.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}
