use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::NaiveDate;
use core_types::{AgeGroup, DateRange, Dimension, OrderRecord};
use rust_decimal::Decimal;

use crate::error::AnalyticsError;
use crate::summaries::{
    DailyOrdersSummary, DemographicCount, OverviewSummary, ProductRanking, ProductRankings,
    RfmRecord,
};

/// A stateless calculator for deriving tabular summaries from order history.
///
/// Every operation takes an immutable snapshot of records and returns a fresh
/// summary; the input is never mutated and no state survives between calls.
/// Records whose `order_date` is `None` are skipped by the date-dependent
/// operations and kept everywhere else.
#[derive(Debug, Default)]
pub struct AggregationEngine {}

impl AggregationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the records whose order date falls within `range`, inclusive
    /// of both bounds.
    ///
    /// Comparison is by calendar day (the timestamp truncated to its date).
    /// Records without an order date are excluded. The relative order of the
    /// surviving records is preserved, which makes the operation idempotent:
    /// filtering an already-filtered result by the same range is a no-op.
    /// An inverted range (start after end) matches nothing.
    pub fn filter_by_date_range(
        &self,
        records: &[OrderRecord],
        range: &DateRange,
    ) -> Vec<OrderRecord> {
        records
            .iter()
            .filter(|record| {
                matches!(record.order_date, Some(ts) if range.contains(ts.date_naive()))
            })
            .cloned()
            .collect()
    }

    /// Headline totals for the given slice: distinct order count and summed
    /// revenue across every line item.
    pub fn overview(&self, records: &[OrderRecord]) -> OverviewSummary {
        let mut orders: HashSet<&str> = HashSet::new();
        let mut revenue = Decimal::ZERO;
        for record in records {
            orders.insert(record.order_id.as_str());
            revenue += record.total_price;
        }
        OverviewSummary {
            total_orders: orders.len() as u64,
            total_revenue: revenue,
        }
    }

    /// Groups records by calendar day, counting distinct orders and summing
    /// revenue per day.
    ///
    /// The result is ordered by date ascending and contains only days present
    /// in the input; gaps are not zero-filled. Callers wanting a dense series
    /// apply [`AggregationEngine::fill_missing_days`]. Records without an
    /// order date are skipped. Empty input yields an empty vec.
    pub fn daily_orders(&self, records: &[OrderRecord]) -> Vec<DailyOrdersSummary> {
        let mut days: BTreeMap<NaiveDate, (HashSet<&str>, Decimal)> = BTreeMap::new();
        for record in records {
            let Some(ts) = record.order_date else { continue };
            let entry = days
                .entry(ts.date_naive())
                .or_insert_with(|| (HashSet::new(), Decimal::ZERO));
            entry.0.insert(record.order_id.as_str());
            entry.1 += record.total_price;
        }
        tracing::debug!(
            "Grouped {} records into {} daily summaries",
            records.len(),
            days.len()
        );
        days.into_iter()
            .map(|(date, (orders, revenue))| DailyOrdersSummary {
                date,
                order_count: orders.len() as u64,
                revenue,
            })
            .collect()
    }

    /// Expands a daily summary to cover every day of `range`, inserting rows
    /// with zero orders and zero revenue for days that had none.
    ///
    /// The opt-in companion to [`AggregationEngine::daily_orders`]: summaries
    /// outside `range` are dropped, so callers should pass the same range the
    /// records were filtered by. An inverted range yields an empty vec.
    pub fn fill_missing_days(
        &self,
        summaries: &[DailyOrdersSummary],
        range: &DateRange,
    ) -> Vec<DailyOrdersSummary> {
        if range.is_empty() {
            return Vec::new();
        }
        let by_date: HashMap<NaiveDate, &DailyOrdersSummary> =
            summaries.iter().map(|summary| (summary.date, summary)).collect();
        range
            .start
            .iter_days()
            .take_while(|date| *date <= range.end)
            .map(|date| match by_date.get(&date) {
                Some(summary) => (*summary).clone(),
                None => DailyOrdersSummary {
                    date,
                    order_count: 0,
                    revenue: Decimal::ZERO,
                },
            })
            .collect()
    }

    /// Groups records by product name and sums quantities, returning the top
    /// `top_n` products by total quantity descending (`best`) and ascending
    /// (`worst`).
    ///
    /// Both leaderboards come from the same totals via stable sorts, so tied
    /// products keep their first-encounter order. If fewer than `top_n`
    /// distinct products exist, all of them are returned. `top_n` must be at
    /// least 1.
    pub fn product_rankings(
        &self,
        records: &[OrderRecord],
        top_n: usize,
    ) -> Result<ProductRankings, AnalyticsError> {
        if top_n == 0 {
            return Err(AnalyticsError::InvalidParameter(
                "top_n".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        // Aggregate in first-encounter order so ties survive the stable sorts
        // below in input order.
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut totals: Vec<ProductRanking> = Vec::new();
        for record in records {
            let quantity = u64::from(record.quantity);
            match index.entry(record.product_name.as_str()) {
                Entry::Occupied(slot) => totals[*slot.get()].total_quantity += quantity,
                Entry::Vacant(slot) => {
                    slot.insert(totals.len());
                    totals.push(ProductRanking {
                        product_name: record.product_name.clone(),
                        total_quantity: quantity,
                    });
                }
            }
        }
        tracing::debug!("Ranked {} distinct products", totals.len());

        let mut best = totals.clone();
        best.sort_by(|a, b| b.total_quantity.cmp(&a.total_quantity));
        best.truncate(top_n);

        let mut worst = totals;
        worst.sort_by(|a, b| a.total_quantity.cmp(&b.total_quantity));
        worst.truncate(top_n);

        Ok(ProductRankings { best, worst })
    }

    /// Groups records by the selected customer attribute and counts distinct
    /// customers per group.
    ///
    /// For [`Dimension::AgeGroup`] the output follows the fixed bracket order
    /// Youth, Adults, Seniors (listing only brackets present in the data),
    /// and records whose bracket was unrecognized at ingestion are dropped
    /// from the breakdown. For the other dimensions the output is in
    /// first-encounter order.
    pub fn demographic_counts(
        &self,
        records: &[OrderRecord],
        dimension: Dimension,
    ) -> Vec<DemographicCount> {
        match dimension {
            Dimension::AgeGroup => self.counts_by_age_group(records),
            Dimension::Gender => {
                self.counts_in_encounter_order(records, |record| record.gender.as_str().to_string())
            }
            Dimension::State => {
                self.counts_in_encounter_order(records, |record| record.state.clone())
            }
        }
    }

    fn counts_in_encounter_order<F>(
        &self,
        records: &[OrderRecord],
        key_of: F,
    ) -> Vec<DemographicCount>
    where
        F: Fn(&OrderRecord) -> String,
    {
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut groups: Vec<(String, HashSet<&str>)> = Vec::new();
        for record in records {
            let key = key_of(record);
            let slot = match index.entry(key) {
                Entry::Occupied(slot) => *slot.get(),
                Entry::Vacant(slot) => {
                    let position = groups.len();
                    groups.push((slot.key().clone(), HashSet::new()));
                    slot.insert(position);
                    position
                }
            };
            groups[slot].1.insert(record.customer_id.as_str());
        }
        groups
            .into_iter()
            .map(|(category_value, customers)| DemographicCount {
                category_value,
                customer_count: customers.len() as u64,
            })
            .collect()
    }

    fn counts_by_age_group(&self, records: &[OrderRecord]) -> Vec<DemographicCount> {
        let mut per_group: HashMap<AgeGroup, HashSet<&str>> = HashMap::new();
        for record in records {
            // Brackets the ingestion layer could not recognize arrive as
            // `None` and stay out of this breakdown.
            let Some(group) = record.age_group else { continue };
            per_group
                .entry(group)
                .or_default()
                .insert(record.customer_id.as_str());
        }
        AgeGroup::ORDERED
            .iter()
            .filter_map(|group| {
                per_group.get(group).map(|customers| DemographicCount {
                    category_value: group.as_str().to_string(),
                    customer_count: customers.len() as u64,
                })
            })
            .collect()
    }

    /// Computes Recency/Frequency/Monetary metrics per distinct customer, in
    /// first-encounter order.
    ///
    /// Recency is the whole-day difference between the dataset's latest order
    /// date (computed once over the full input) and the customer's own latest
    /// order date, so it is never negative. Records without an order date are
    /// excluded entirely. Empty (or entirely undated) input yields an empty
    /// vec. No ranking is imposed; callers wanting top-N views sort the
    /// result themselves.
    pub fn rfm(&self, records: &[OrderRecord]) -> Vec<RfmRecord> {
        struct CustomerAccumulator<'a> {
            customer_id: &'a str,
            orders: HashSet<&'a str>,
            monetary: Decimal,
            last_order: NaiveDate,
        }

        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut customers: Vec<CustomerAccumulator<'_>> = Vec::new();
        let mut latest_overall: Option<NaiveDate> = None;

        for record in records {
            let Some(ts) = record.order_date else { continue };
            let date = ts.date_naive();
            latest_overall = Some(latest_overall.map_or(date, |latest| latest.max(date)));

            match index.entry(record.customer_id.as_str()) {
                Entry::Occupied(slot) => {
                    let acc = &mut customers[*slot.get()];
                    acc.orders.insert(record.order_id.as_str());
                    acc.monetary += record.total_price;
                    if date > acc.last_order {
                        acc.last_order = date;
                    }
                }
                Entry::Vacant(slot) => {
                    slot.insert(customers.len());
                    let mut orders = HashSet::new();
                    orders.insert(record.order_id.as_str());
                    customers.push(CustomerAccumulator {
                        customer_id: record.customer_id.as_str(),
                        orders,
                        monetary: record.total_price,
                        last_order: date,
                    });
                }
            }
        }

        let Some(latest) = latest_overall else {
            return Vec::new();
        };
        tracing::debug!(
            "Computed RFM metrics for {} customers (latest order {})",
            customers.len(),
            latest
        );

        customers
            .into_iter()
            .map(|acc| RfmRecord {
                customer_id: acc.customer_id.to_string(),
                frequency: acc.orders.len() as u64,
                monetary: acc.monetary,
                recency: (latest - acc.last_order).num_days(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::Gender;
    use rust_decimal_macros::dec;

    fn rec(
        order_id: &str,
        customer_id: &str,
        date: Option<&str>,
        product: &str,
        quantity: u32,
        total_price: Decimal,
    ) -> OrderRecord {
        OrderRecord {
            order_id: order_id.to_string(),
            customer_id: customer_id.to_string(),
            order_date: date.map(|d| {
                format!("{d}T00:00:00Z")
                    .parse()
                    .expect("test date must be valid")
            }),
            product_name: product.to_string(),
            quantity,
            total_price,
            gender: Gender::Unspecified,
            age_group: None,
            state: "SP".to_string(),
        }
    }

    fn range(start: &str, end: &str) -> DateRange {
        DateRange::new(start.parse().unwrap(), end.parse().unwrap())
    }

    fn sample_orders() -> Vec<OrderRecord> {
        vec![
            rec("O1", "C1", Some("2024-01-01"), "A", 2, dec!(20.0)),
            rec("O2", "C1", Some("2024-01-03"), "A", 1, dec!(10.0)),
            rec("O3", "C2", Some("2024-01-02"), "B", 5, dec!(50.0)),
        ]
    }

    #[test]
    fn filter_keeps_inclusive_bounds_and_order() {
        let engine = AggregationEngine::new();
        let records = sample_orders();

        let filtered = engine.filter_by_date_range(&records, &range("2024-01-01", "2024-01-02"));
        let ids: Vec<&str> = filtered.iter().map(|r| r.order_id.as_str()).collect();
        assert_eq!(ids, vec!["O1", "O3"]);
    }

    #[test]
    fn filter_with_inverted_range_is_empty() {
        let engine = AggregationEngine::new();
        let records = sample_orders();

        let filtered = engine.filter_by_date_range(&records, &range("2024-01-03", "2024-01-01"));
        assert!(filtered.is_empty());
    }

    #[test]
    fn filter_excludes_undated_records() {
        let engine = AggregationEngine::new();
        let mut records = sample_orders();
        records.push(rec("O4", "C3", None, "C", 1, dec!(5.0)));

        let filtered = engine.filter_by_date_range(&records, &range("2024-01-01", "2024-01-31"));
        assert_eq!(filtered.len(), 3);
        assert!(filtered.iter().all(|r| r.order_date.is_some()));
    }

    #[test]
    fn filter_is_idempotent() {
        let engine = AggregationEngine::new();
        let records = sample_orders();
        let window = range("2024-01-02", "2024-01-03");

        let once = engine.filter_by_date_range(&records, &window);
        let twice = engine.filter_by_date_range(&once, &window);
        assert_eq!(once, twice);
    }

    #[test]
    fn overview_counts_distinct_orders_and_sums_revenue() {
        let engine = AggregationEngine::new();
        let mut records = sample_orders();
        // A second line item on an existing order: adds revenue, not orders.
        records.push(rec("O1", "C1", Some("2024-01-01"), "B", 1, dec!(7.5)));

        let overview = engine.overview(&records);
        assert_eq!(overview.total_orders, 3);
        assert_eq!(overview.total_revenue, dec!(87.5));
    }

    #[test]
    fn daily_orders_aggregates_mixed_days() {
        let engine = AggregationEngine::new();
        let daily = engine.daily_orders(&sample_orders());

        assert_eq!(daily.len(), 3);
        assert_eq!(daily[0].date, "2024-01-01".parse().unwrap());
        assert_eq!(daily[0].order_count, 1);
        assert_eq!(daily[0].revenue, dec!(20.0));
        assert_eq!(daily[1].date, "2024-01-02".parse().unwrap());
        assert_eq!(daily[1].order_count, 1);
        assert_eq!(daily[1].revenue, dec!(50.0));
        assert_eq!(daily[2].date, "2024-01-03".parse().unwrap());
        assert_eq!(daily[2].order_count, 1);
        assert_eq!(daily[2].revenue, dec!(10.0));
    }

    #[test]
    fn daily_orders_counts_orders_once_but_sums_every_line() {
        let engine = AggregationEngine::new();
        let records = vec![
            rec("O1", "C1", Some("2024-02-01"), "A", 1, dec!(10.0)),
            rec("O1", "C1", Some("2024-02-01"), "B", 2, dec!(30.0)),
            rec("O2", "C2", Some("2024-02-01"), "A", 1, dec!(15.0)),
        ];

        let daily = engine.daily_orders(&records);
        assert_eq!(daily.len(), 1);
        assert_eq!(daily[0].order_count, 2);
        assert_eq!(daily[0].revenue, dec!(55.0));
    }

    #[test]
    fn daily_revenue_conserves_dated_input_revenue() {
        let engine = AggregationEngine::new();
        let mut records = sample_orders();
        records.push(rec("O9", "C9", None, "Z", 1, dec!(999.0)));

        let daily_total: Decimal = engine.daily_orders(&records).iter().map(|d| d.revenue).sum();
        let dated_total: Decimal = records
            .iter()
            .filter(|r| r.order_date.is_some())
            .map(|r| r.total_price)
            .sum();
        assert_eq!(daily_total, dated_total);
    }

    #[test]
    fn daily_orders_on_empty_input_is_empty() {
        let engine = AggregationEngine::new();
        assert!(engine.daily_orders(&[]).is_empty());
    }

    #[test]
    fn empty_input_is_an_ordinary_result_everywhere() {
        let engine = AggregationEngine::new();
        let window = range("2024-01-01", "2024-01-31");

        assert!(engine.filter_by_date_range(&[], &window).is_empty());
        assert_eq!(engine.overview(&[]).total_orders, 0);
        assert_eq!(engine.overview(&[]).total_revenue, Decimal::ZERO);
        let rankings = engine.product_rankings(&[], 3).unwrap();
        assert!(rankings.best.is_empty());
        assert!(rankings.worst.is_empty());
        assert!(engine.demographic_counts(&[], Dimension::Gender).is_empty());
        assert!(engine.demographic_counts(&[], Dimension::AgeGroup).is_empty());
        assert!(engine.demographic_counts(&[], Dimension::State).is_empty());
        assert!(engine.rfm(&[]).is_empty());
    }

    #[test]
    fn fill_missing_days_inserts_zero_rows() {
        let engine = AggregationEngine::new();
        let daily = engine.daily_orders(&sample_orders());
        let window = range("2023-12-31", "2024-01-04");

        let dense = engine.fill_missing_days(&daily, &window);
        assert_eq!(dense.len(), 5);
        assert_eq!(dense[0].order_count, 0);
        assert_eq!(dense[0].revenue, Decimal::ZERO);
        assert_eq!(dense[1].revenue, dec!(20.0));
        assert_eq!(dense[4].order_count, 0);
        // Dense output stays date-ordered.
        for pair in dense.windows(2) {
            assert!(pair[0].date < pair[1].date);
        }
    }

    #[test]
    fn fill_missing_days_with_inverted_range_is_empty() {
        let engine = AggregationEngine::new();
        let daily = engine.daily_orders(&sample_orders());
        assert!(engine
            .fill_missing_days(&daily, &range("2024-01-04", "2024-01-01"))
            .is_empty());
    }

    #[test]
    fn product_rankings_orders_both_leaderboards() {
        let engine = AggregationEngine::new();
        let records = vec![
            rec("O1", "C1", Some("2024-01-01"), "alpha", 3, dec!(30.0)),
            rec("O2", "C2", Some("2024-01-01"), "beta", 10, dec!(100.0)),
            rec("O3", "C3", Some("2024-01-02"), "gamma", 1, dec!(10.0)),
            rec("O4", "C1", Some("2024-01-02"), "alpha", 4, dec!(40.0)),
        ];

        let rankings = engine.product_rankings(&records, 2).unwrap();
        assert_eq!(rankings.best.len(), 2);
        assert_eq!(rankings.best[0].product_name, "beta");
        assert_eq!(rankings.best[0].total_quantity, 10);
        assert_eq!(rankings.best[1].product_name, "alpha");
        assert_eq!(rankings.best[1].total_quantity, 7);
        assert_eq!(rankings.worst[0].product_name, "gamma");
        assert_eq!(rankings.worst[1].product_name, "alpha");
    }

    #[test]
    fn product_rankings_breaks_ties_by_encounter_order() {
        let engine = AggregationEngine::new();
        let records = vec![
            rec("O1", "C1", Some("2024-01-01"), "first", 5, dec!(1.0)),
            rec("O2", "C2", Some("2024-01-01"), "second", 5, dec!(1.0)),
            rec("O3", "C3", Some("2024-01-01"), "third", 5, dec!(1.0)),
        ];

        let rankings = engine.product_rankings(&records, 3).unwrap();
        let best: Vec<&str> = rankings.best.iter().map(|r| r.product_name.as_str()).collect();
        let worst: Vec<&str> = rankings.worst.iter().map(|r| r.product_name.as_str()).collect();
        assert_eq!(best, vec!["first", "second", "third"]);
        assert_eq!(worst, vec!["first", "second", "third"]);
    }

    #[test]
    fn product_rankings_returns_everything_when_short() {
        let engine = AggregationEngine::new();
        let records = vec![rec("O1", "C1", Some("2024-01-01"), "only", 2, dec!(5.0))];

        let rankings = engine.product_rankings(&records, 5).unwrap();
        assert_eq!(rankings.best.len(), 1);
        assert_eq!(rankings.worst.len(), 1);
    }

    #[test]
    fn product_rankings_best_and_worst_are_disjoint_with_enough_products() {
        let engine = AggregationEngine::new();
        let records: Vec<OrderRecord> = (1..=6)
            .map(|i| {
                rec(
                    &format!("O{i}"),
                    "C1",
                    Some("2024-01-01"),
                    &format!("product-{i}"),
                    i,
                    dec!(1.0),
                )
            })
            .collect();

        let rankings = engine.product_rankings(&records, 3).unwrap();
        let best: HashSet<&str> = rankings.best.iter().map(|r| r.product_name.as_str()).collect();
        let worst: HashSet<&str> = rankings.worst.iter().map(|r| r.product_name.as_str()).collect();
        assert!(best.is_disjoint(&worst));
    }

    #[test]
    fn product_rankings_includes_undated_records() {
        let engine = AggregationEngine::new();
        let records = vec![rec("O1", "C1", None, "undated", 9, dec!(1.0))];

        let rankings = engine.product_rankings(&records, 1).unwrap();
        assert_eq!(rankings.best[0].product_name, "undated");
    }

    #[test]
    fn product_rankings_rejects_zero_top_n() {
        let engine = AggregationEngine::new();
        let result = engine.product_rankings(&sample_orders(), 0);
        assert!(matches!(
            result,
            Err(AnalyticsError::InvalidParameter(name, _)) if name == "top_n"
        ));
    }

    #[test]
    fn demographic_counts_are_distinct_per_customer() {
        let engine = AggregationEngine::new();
        let mut records = sample_orders();
        for record in &mut records {
            record.gender = Gender::Female;
        }

        let counts = engine.demographic_counts(&records, Dimension::Gender);
        assert_eq!(counts.len(), 1);
        assert_eq!(counts[0].category_value, "Female");
        // C1 ordered twice but counts once.
        assert_eq!(counts[0].customer_count, 2);
    }

    #[test]
    fn age_group_counts_follow_fixed_order() {
        let engine = AggregationEngine::new();
        let mut records = vec![
            rec("O1", "C1", Some("2024-01-01"), "A", 1, dec!(1.0)),
            rec("O2", "C2", Some("2024-01-01"), "A", 1, dec!(1.0)),
            rec("O3", "C3", Some("2024-01-01"), "A", 1, dec!(1.0)),
        ];
        // Deliberately scrambled input order.
        records[0].age_group = Some(AgeGroup::Seniors);
        records[1].age_group = Some(AgeGroup::Youth);
        records[2].age_group = Some(AgeGroup::Adults);

        let counts = engine.demographic_counts(&records, Dimension::AgeGroup);
        let order: Vec<&str> = counts.iter().map(|c| c.category_value.as_str()).collect();
        assert_eq!(order, vec!["Youth", "Adults", "Seniors"]);
    }

    #[test]
    fn age_group_counts_drop_unrecognized_brackets() {
        let engine = AggregationEngine::new();
        let mut records = sample_orders();
        records[0].age_group = Some(AgeGroup::Adults);
        // records[1] and records[2] keep age_group = None.

        let counts = engine.demographic_counts(&records, Dimension::AgeGroup);
        assert_eq!(counts.len(), 1);
        assert_eq!(counts[0].category_value, "Adults");
        assert_eq!(counts[0].customer_count, 1);
    }

    #[test]
    fn state_counts_keep_encounter_order() {
        let engine = AggregationEngine::new();
        let mut records = sample_orders();
        records[0].state = "RJ".to_string();
        records[1].state = "SP".to_string();
        records[2].state = "RJ".to_string();

        let counts = engine.demographic_counts(&records, Dimension::State);
        let order: Vec<&str> = counts.iter().map(|c| c.category_value.as_str()).collect();
        assert_eq!(order, vec!["RJ", "SP"]);
        assert_eq!(counts[0].customer_count, 2);
        assert_eq!(counts[1].customer_count, 1);
    }

    #[test]
    fn rfm_scores_known_customers() {
        let engine = AggregationEngine::new();
        let metrics = engine.rfm(&sample_orders());

        assert_eq!(metrics.len(), 2);
        let c1 = &metrics[0];
        assert_eq!(c1.customer_id, "C1");
        assert_eq!(c1.frequency, 2);
        assert_eq!(c1.monetary, dec!(30.0));
        assert_eq!(c1.recency, 0);
        let c2 = &metrics[1];
        assert_eq!(c2.customer_id, "C2");
        assert_eq!(c2.frequency, 1);
        assert_eq!(c2.monetary, dec!(50.0));
        assert_eq!(c2.recency, 1);
    }

    #[test]
    fn rfm_recency_is_never_negative() {
        let engine = AggregationEngine::new();
        let records = vec![
            rec("O1", "C1", Some("2024-03-05"), "A", 1, dec!(10.0)),
            rec("O2", "C2", Some("2024-01-20"), "A", 1, dec!(10.0)),
            rec("O3", "C3", Some("2024-02-11"), "A", 1, dec!(10.0)),
        ];

        for metric in engine.rfm(&records) {
            assert!(metric.recency >= 0, "recency for {}", metric.customer_id);
        }
    }

    #[test]
    fn rfm_counts_distinct_orders_per_customer() {
        let engine = AggregationEngine::new();
        let records = vec![
            rec("O1", "C1", Some("2024-01-01"), "A", 1, dec!(10.0)),
            rec("O1", "C1", Some("2024-01-01"), "B", 1, dec!(20.0)),
            rec("O2", "C1", Some("2024-01-05"), "A", 1, dec!(5.0)),
        ];

        let metrics = engine.rfm(&records);
        assert_eq!(metrics.len(), 1);
        assert_eq!(metrics[0].frequency, 2);
        assert_eq!(metrics[0].monetary, dec!(35.0));
    }

    #[test]
    fn rfm_skips_undated_records_and_handles_empty_input() {
        let engine = AggregationEngine::new();
        assert!(engine.rfm(&[]).is_empty());

        let undated = vec![rec("O1", "C1", None, "A", 1, dec!(10.0))];
        assert!(engine.rfm(&undated).is_empty());
    }
}
