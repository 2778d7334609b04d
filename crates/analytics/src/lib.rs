//! # OrderScope Analytics Crate
//!
//! The aggregation layer of the application. It consumes flat order history
//! (one record per line item, already validated by ingestion) and produces
//! the summaries the reporting surfaces render: headline totals, daily order
//! series, product leaderboards, demographic breakdowns and per-customer RFM
//! metrics.
//!
//! The central component is the [`AggregationEngine`], a stateless struct
//! whose methods each perform one aggregation over a borrowed slice of
//! records and return an owned summary.

pub mod engine;
pub mod error;
pub mod summaries;

pub use engine::AggregationEngine;
pub use error::AnalyticsError;
pub use summaries::{
    DailyOrdersSummary, DemographicCount, OverviewSummary, ProductRanking, ProductRankings,
    RfmRecord,
};
