use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use configuration::SampleConfig;
use core_types::{AgeGroup, Gender, OrderRecord};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::IngestError;
use crate::sample;

/// Columns the orders CSV must provide, in any column order.
const ORDER_COLUMNS: [&str; 6] = [
    "order_id",
    "customer_id",
    "order_date",
    "product_name",
    "quantity",
    "total_price",
];

/// Columns the customers CSV must provide, in any column order.
const CUSTOMER_COLUMNS: [&str; 4] = ["customer_id", "gender", "age_group", "state"];

/// State value used for orders whose customer is unknown or blank.
const UNKNOWN_STATE: &str = "Unknown";

/// Which concrete source the order history is loaded from.
///
/// The caller picks the source; the loader never decides on its own to fall
/// back from one to another.
#[derive(Debug, Clone)]
pub enum DataSource {
    /// Two CSV files on disk: the order line items and the customer attributes.
    Csv { orders: PathBuf, customers: PathBuf },
    /// The deterministic generated dataset.
    Sample(SampleConfig),
}

/// Loads the full order history from the given source.
///
/// CSV loading is lenient about rows and strict about shape: a missing file
/// or a missing required column is an error, while individual malformed rows
/// are skipped (with a warning total) so one bad export line cannot take the
/// whole report down. Rows whose `order_date` does not parse are kept with
/// no date; the date-based aggregations ignore them.
pub fn load(source: &DataSource) -> Result<Vec<OrderRecord>, IngestError> {
    match source {
        DataSource::Csv { orders, customers } => load_csv(orders, customers),
        DataSource::Sample(config) => Ok(sample::generate(config)),
    }
}

/// A row of `orders.csv` before any validation.
///
/// Every field deserializes as a string so that one unparseable value can be
/// handled per field instead of failing the whole row in serde.
#[derive(Debug, Deserialize)]
struct RawOrderRow {
    order_id: String,
    customer_id: String,
    order_date: String,
    product_name: String,
    quantity: String,
    total_price: String,
}

/// A row of `customers.csv` before any validation.
#[derive(Debug, Deserialize)]
struct RawCustomerRow {
    customer_id: String,
    gender: String,
    age_group: String,
    state: String,
}

/// Customer attributes keyed by customer id, ready to join onto orders.
#[derive(Debug, Clone)]
struct CustomerProfile {
    gender: Gender,
    age_group: Option<AgeGroup>,
    state: String,
}

fn load_csv(orders_path: &Path, customers_path: &Path) -> Result<Vec<OrderRecord>, IngestError> {
    let customers = read_customers(customers_path)?;
    let mut reader = open_reader(orders_path, &ORDER_COLUMNS)?;

    let mut records = Vec::new();
    let mut skipped = 0usize;
    let mut undated = 0usize;
    let mut unmatched = 0usize;

    for (index, result) in reader.deserialize::<RawOrderRow>().enumerate() {
        // Header occupies line 1, so the first data row is line 2.
        let line = index + 2;
        let row = match result {
            Ok(row) => row,
            Err(error) => {
                tracing::debug!("Skipping unreadable row at line {line}: {error}");
                skipped += 1;
                continue;
            }
        };

        if row.order_id.is_empty() || row.customer_id.is_empty() || row.product_name.is_empty() {
            tracing::debug!("Skipping row at line {line}: blank identifier field");
            skipped += 1;
            continue;
        }
        let Ok(quantity) = row.quantity.parse::<u32>() else {
            tracing::debug!("Skipping row at line {line}: invalid quantity '{}'", row.quantity);
            skipped += 1;
            continue;
        };
        let total_price = match row.total_price.parse::<Decimal>() {
            Ok(price) if price >= Decimal::ZERO => price,
            _ => {
                tracing::debug!(
                    "Skipping row at line {line}: invalid total_price '{}'",
                    row.total_price
                );
                skipped += 1;
                continue;
            }
        };
        let order_date = parse_order_date(&row.order_date);
        if order_date.is_none() {
            tracing::debug!(
                "Row at line {line} has unparseable order_date '{}'; keeping it undated",
                row.order_date
            );
            undated += 1;
        }

        let record = match customers.get(&row.customer_id) {
            Some(profile) => OrderRecord {
                order_id: row.order_id,
                customer_id: row.customer_id,
                order_date,
                product_name: row.product_name,
                quantity,
                total_price,
                gender: profile.gender,
                age_group: profile.age_group,
                state: profile.state.clone(),
            },
            None => {
                unmatched += 1;
                OrderRecord {
                    order_id: row.order_id,
                    customer_id: row.customer_id,
                    order_date,
                    product_name: row.product_name,
                    quantity,
                    total_price,
                    gender: Gender::Unspecified,
                    age_group: None,
                    state: UNKNOWN_STATE.to_string(),
                }
            }
        };
        records.push(record);
    }

    if skipped > 0 {
        tracing::warn!(
            "Skipped {} malformed rows in {}",
            skipped,
            orders_path.display()
        );
    }
    if undated > 0 {
        tracing::warn!(
            "{} rows in {} have unparseable order dates and are excluded from date-based views",
            undated,
            orders_path.display()
        );
    }
    if unmatched > 0 {
        tracing::warn!(
            "{} rows reference customers missing from {}; their demographics default to unknown",
            unmatched,
            customers_path.display()
        );
    }
    tracing::info!(
        "Loaded {} order line items from {}",
        records.len(),
        orders_path.display()
    );

    Ok(records)
}

fn read_customers(path: &Path) -> Result<HashMap<String, CustomerProfile>, IngestError> {
    let mut reader = open_reader(path, &CUSTOMER_COLUMNS)?;

    let mut profiles = HashMap::new();
    let mut skipped = 0usize;
    for (index, result) in reader.deserialize::<RawCustomerRow>().enumerate() {
        let row = match result {
            Ok(row) => row,
            Err(error) => {
                tracing::debug!("Skipping unreadable row at line {}: {error}", index + 2);
                skipped += 1;
                continue;
            }
        };
        if row.customer_id.is_empty() {
            skipped += 1;
            continue;
        }
        let state = if row.state.is_empty() {
            UNKNOWN_STATE.to_string()
        } else {
            row.state
        };
        // Duplicate ids keep the last row, matching a re-exported file where
        // the newest attributes win.
        profiles.insert(
            row.customer_id,
            CustomerProfile {
                gender: Gender::parse(&row.gender),
                age_group: AgeGroup::parse(&row.age_group),
                state,
            },
        );
    }

    if skipped > 0 {
        tracing::warn!("Skipped {} malformed rows in {}", skipped, path.display());
    }
    tracing::debug!(
        "Loaded {} customer profiles from {}",
        profiles.len(),
        path.display()
    );

    Ok(profiles)
}

/// Opens a CSV file and verifies its header carries every required column.
fn open_reader(path: &Path, required: &[&str]) -> Result<csv::Reader<File>, IngestError> {
    if !path.exists() {
        return Err(IngestError::MissingFile(path.to_path_buf()));
    }
    let file = File::open(path).map_err(|error| IngestError::Io(path.to_path_buf(), error))?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|error| IngestError::Csv(path.to_path_buf(), error))?
        .clone();
    for column in required {
        if !headers.iter().any(|header| header == *column) {
            return Err(IngestError::MissingColumn(
                column.to_string(),
                path.to_path_buf(),
            ));
        }
    }
    Ok(reader)
}

/// Parses an order timestamp in the accepted formats: RFC 3339, a plain
/// `YYYY-MM-DD HH:MM:SS`, or a bare `YYYY-MM-DD` (midnight).
///
/// Anything else is `None`; the row stays in the dataset without a date.
fn parse_order_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(timestamp) = raw.parse::<DateTime<Utc>>() {
        return Some(timestamp);
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }
    None
}
