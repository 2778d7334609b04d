use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::path::PathBuf;

use crate::error::ConfigError;

/// The root configuration structure for the entire application.
///
/// Every section (and every field) carries a built-in default, so the
/// application runs with no `config.toml` at all, or with a file that sets
/// only the keys the user cares about.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub data: DataConfig,
    pub report: ReportConfig,
    pub sample: SampleConfig,
}

/// Where the order history comes from.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Path to the orders CSV file.
    pub orders_path: PathBuf,
    /// Path to the customers CSV file.
    pub customers_path: PathBuf,
    /// When true, a missing CSV file falls back to the generated sample
    /// dataset instead of failing.
    pub fallback_to_sample: bool,
}

/// Defaults for the report subcommand.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// How many products to list in each leaderboard.
    pub top_n: usize,
    /// How many customers to show in the ranked RFM views.
    pub rfm_top_n: usize,
    /// When true, the daily table shows a row for every day of the window,
    /// with zeros for days that had no orders.
    pub fill_missing_days: bool,
    /// Default start of the reporting window. When unset, the dataset's own
    /// earliest order date is used.
    pub start_date: Option<NaiveDate>,
    /// Default end of the reporting window. When unset, the dataset's own
    /// latest order date is used.
    pub end_date: Option<NaiveDate>,
}

/// Parameters for the deterministic sample dataset generator.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SampleConfig {
    /// Seed for the generator; the same seed always yields the same dataset.
    pub seed: u64,
    /// Number of distinct customers to invent.
    pub customers: u32,
    /// Number of orders to generate (each order has 1 to 3 line items).
    pub orders: u32,
    /// First order date of the generated window.
    pub start_date: NaiveDate,
    /// Length of the generated window in days.
    pub days: u32,
    /// Lower bound for a line item's total price.
    pub min_price: Decimal,
    /// Upper bound for a line item's total price.
    pub max_price: Decimal,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            orders_path: PathBuf::from("data/orders.csv"),
            customers_path: PathBuf::from("data/customers.csv"),
            fallback_to_sample: false,
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_n: 5,
            rfm_top_n: 5,
            fill_missing_days: false,
            start_date: None,
            end_date: None,
        }
    }
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            customers: 50,
            orders: 400,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid built-in date"),
            days: 90,
            min_price: dec!(5.00),
            max_price: dec!(350.00),
        }
    }
}

impl Config {
    /// Checks the cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.report.top_n == 0 {
            return Err(ConfigError::ValidationError(
                "report.top_n must be at least 1".to_string(),
            ));
        }
        if self.report.rfm_top_n == 0 {
            return Err(ConfigError::ValidationError(
                "report.rfm_top_n must be at least 1".to_string(),
            ));
        }
        self.sample.validate()
    }
}

impl SampleConfig {
    /// Checks the generator parameters.
    ///
    /// Callers that change fields after [`crate::load_config`] has already
    /// run (CLI overrides, for example) must call this again: the generator
    /// itself assumes a validated config.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.customers == 0 {
            return Err(ConfigError::ValidationError(
                "sample.customers must be at least 1".to_string(),
            ));
        }
        if self.orders == 0 {
            return Err(ConfigError::ValidationError(
                "sample.orders must be at least 1".to_string(),
            ));
        }
        if self.days == 0 {
            return Err(ConfigError::ValidationError(
                "sample.days must be at least 1".to_string(),
            ));
        }
        if self.min_price < Decimal::ZERO {
            return Err(ConfigError::ValidationError(
                "sample.min_price must not be negative".to_string(),
            ));
        }
        if self.min_price > self.max_price {
            return Err(ConfigError::ValidationError(
                "sample.min_price must not exceed sample.max_price".to_string(),
            ));
        }
        Ok(())
    }
}
