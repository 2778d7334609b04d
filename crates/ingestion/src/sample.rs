use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::Days;
use configuration::SampleConfig;
use core_types::{AgeGroup, Gender, OrderRecord};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::error::IngestError;

const STATES: [&str; 8] = ["SP", "RJ", "MG", "RS", "PR", "BA", "SC", "PE"];

const GENDERS: [Gender; 2] = [Gender::Male, Gender::Female];

const PRODUCTS: [&str; 12] = [
    "Wireless Mouse",
    "Mechanical Keyboard",
    "USB-C Hub",
    "Desk Lamp",
    "Laptop Stand",
    "Noise-Cancelling Headphones",
    "Webcam",
    "Portable SSD",
    "Smartphone Case",
    "Bluetooth Speaker",
    "Fitness Tracker",
    "Coffee Grinder",
];

/// Generates a reproducible order history from the seeded RNG.
///
/// The same `SampleConfig` always yields byte-identical records: customer
/// attributes, order ids (UUIDs built from RNG bytes rather than OS
/// randomness), timestamps and prices all come from the one seeded stream.
/// Each order carries 1 to 3 line items sharing the order id, customer and
/// timestamp, so the distinct-order aggregations have something to merge.
pub fn generate(config: &SampleConfig) -> Vec<OrderRecord> {
    let mut rng = StdRng::seed_from_u64(config.seed);

    struct SampleCustomer {
        id: String,
        gender: Gender,
        age_group: AgeGroup,
        state: String,
    }

    let customers: Vec<SampleCustomer> = (0..config.customers)
        .map(|index| SampleCustomer {
            id: format!("CUST-{:04}", index + 1),
            gender: GENDERS[rng.random_range(0..GENDERS.len())],
            age_group: AgeGroup::ORDERED[rng.random_range(0..AgeGroup::ORDERED.len())],
            state: STATES[rng.random_range(0..STATES.len())].to_string(),
        })
        .collect();

    let min_cents = cents(config.min_price);
    let max_cents = cents(config.max_price).max(min_cents);

    let mut records = Vec::new();
    for _ in 0..config.orders {
        let order_id = uuid::Builder::from_random_bytes(rng.random()).into_uuid().to_string();
        let customer = &customers[rng.random_range(0..customers.len())];

        let day_offset = u64::from(rng.random_range(0..config.days));
        let hour = rng.random_range(8..22);
        let minute = rng.random_range(0..60);
        let order_date = (config.start_date + Days::new(day_offset))
            .and_hms_opt(hour, minute, 0)
            .map(|naive| naive.and_utc());

        let line_items = rng.random_range(1..=3);
        for _ in 0..line_items {
            records.push(OrderRecord {
                order_id: order_id.clone(),
                customer_id: customer.id.clone(),
                order_date,
                product_name: PRODUCTS[rng.random_range(0..PRODUCTS.len())].to_string(),
                quantity: rng.random_range(1..=5),
                total_price: Decimal::new(rng.random_range(min_cents..=max_cents), 2),
                gender: customer.gender,
                age_group: Some(customer.age_group),
                state: customer.state.clone(),
            });
        }
    }

    tracing::debug!(
        "Generated {} line items across {} orders (seed {})",
        records.len(),
        config.orders,
        config.seed
    );
    records
}

/// Writes the generated dataset as `orders.csv` and `customers.csv` under
/// `dir`, in exactly the shape [`crate::loader::load`] reads back.
pub fn write_csv_files(
    config: &SampleConfig,
    dir: &Path,
) -> Result<(PathBuf, PathBuf), IngestError> {
    let records = generate(config);
    std::fs::create_dir_all(dir).map_err(|error| IngestError::Io(dir.to_path_buf(), error))?;

    let orders_path = dir.join("orders.csv");
    let customers_path = dir.join("customers.csv");

    let mut writer = csv::Writer::from_path(&orders_path)
        .map_err(|error| IngestError::Csv(orders_path.clone(), error))?;
    writer
        .write_record([
            "order_id",
            "customer_id",
            "order_date",
            "product_name",
            "quantity",
            "total_price",
        ])
        .map_err(|error| IngestError::Csv(orders_path.clone(), error))?;
    for record in &records {
        let order_date = record
            .order_date
            .map(|timestamp| timestamp.to_rfc3339())
            .unwrap_or_default();
        let quantity = record.quantity.to_string();
        let total_price = record.total_price.to_string();
        writer
            .write_record([
                record.order_id.as_str(),
                record.customer_id.as_str(),
                order_date.as_str(),
                record.product_name.as_str(),
                quantity.as_str(),
                total_price.as_str(),
            ])
            .map_err(|error| IngestError::Csv(orders_path.clone(), error))?;
    }
    writer
        .flush()
        .map_err(|error| IngestError::Io(orders_path.clone(), error))?;

    let mut writer = csv::Writer::from_path(&customers_path)
        .map_err(|error| IngestError::Csv(customers_path.clone(), error))?;
    writer
        .write_record(["customer_id", "gender", "age_group", "state"])
        .map_err(|error| IngestError::Csv(customers_path.clone(), error))?;
    let mut seen: HashSet<&str> = HashSet::new();
    for record in &records {
        if !seen.insert(record.customer_id.as_str()) {
            continue;
        }
        let age_group = record.age_group.map(|group| group.as_str()).unwrap_or("");
        writer
            .write_record([
                record.customer_id.as_str(),
                record.gender.as_str(),
                age_group,
                record.state.as_str(),
            ])
            .map_err(|error| IngestError::Csv(customers_path.clone(), error))?;
    }
    writer
        .flush()
        .map_err(|error| IngestError::Io(customers_path.clone(), error))?;

    tracing::info!(
        "Wrote sample dataset to {} and {}",
        orders_path.display(),
        customers_path.display()
    );
    Ok((orders_path, customers_path))
}

/// Whole cents of a price, so generated values always land on two decimals.
fn cents(price: Decimal) -> i64 {
    (price * Decimal::ONE_HUNDRED).trunc().to_i64().unwrap_or(0)
}
