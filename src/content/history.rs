//! Search history ledger and aggregate analytics.
//!
//! Appends are infallible and deliberately decoupled from the search path:
//! by the time a record is written the caller has already assembled its
//! results, so recording can never fail a search. Analytics derive
//! aggregates over a rolling window; records are never pruned.

use std::collections::{BTreeMap, HashMap};

use chrono::{Duration, Utc};
use serde::Serialize;

use super::types::{RecordedSearchParams, SearchHistoryRecord};

/// How many grouped queries an analytics report lists.
const TOP_QUERY_LIMIT: usize = 10;

/// Append-only ledger of executed searches.
#[derive(Debug, Default)]
pub struct SearchHistory {
    records: Vec<SearchHistoryRecord>,
}

/// Knobs for an analytics query.
#[derive(Debug, Clone)]
pub struct AnalyticsOptions {
    /// Records older than this many days are excluded.
    pub time_range_days: i64,
}

impl Default for AnalyticsOptions {
    fn default() -> Self {
        Self { time_range_days: 7 }
    }
}

/// Aggregate statistics over a trailing window of the ledger.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub total_searches: usize,
    /// Mean results per search; 0 when the window is empty.
    pub average_results: f64,
    pub top_queries: Vec<QueryCount>,
    pub search_trends: Vec<DailyCount>,
    pub time_range: String,
    pub generated_at: String,
}

/// Occurrence count for one exact query string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryCount {
    pub query: String,
    pub count: usize,
}

/// Search volume for one UTC calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyCount {
    pub date: String,
    pub count: usize,
}

impl SearchHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one record for an executed search. Never fails.
    pub fn append(
        &mut self,
        query: &str,
        user_id: &str,
        results_count: usize,
        params: RecordedSearchParams,
    ) {
        let record = SearchHistoryRecord {
            id: uuid::Uuid::now_v7().to_string(),
            query: query.to_string(),
            user_id: user_id.to_string(),
            timestamp: Utc::now(),
            results_count,
            params,
        };
        tracing::debug!(query = %record.query, results = results_count, "search recorded");
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Aggregate statistics over the trailing `time_range_days` window.
    pub fn report(&self, options: &AnalyticsOptions) -> AnalyticsReport {
        let now = Utc::now();
        let cutoff = now - Duration::days(options.time_range_days);
        let window: Vec<&SearchHistoryRecord> = self
            .records
            .iter()
            .filter(|record| record.timestamp >= cutoff)
            .collect();

        let total_searches = window.len();
        let average_results = if window.is_empty() {
            0.0
        } else {
            let sum: usize = window.iter().map(|record| record.results_count).sum();
            sum as f64 / total_searches as f64
        };

        // Group by exact query string in first-seen order; the stable sort
        // then keeps that order for equal counts.
        let mut top_queries: Vec<QueryCount> = Vec::new();
        let mut index_of: HashMap<&str, usize> = HashMap::new();
        for record in &window {
            match index_of.get(record.query.as_str()) {
                Some(&i) => top_queries[i].count += 1,
                None => {
                    index_of.insert(record.query.as_str(), top_queries.len());
                    top_queries.push(QueryCount {
                        query: record.query.clone(),
                        count: 1,
                    });
                }
            }
        }
        top_queries.sort_by(|a, b| b.count.cmp(&a.count));
        top_queries.truncate(TOP_QUERY_LIMIT);

        // Volume per UTC calendar day; BTreeMap keeps dates ascending.
        let mut per_day: BTreeMap<String, usize> = BTreeMap::new();
        for record in &window {
            *per_day
                .entry(record.timestamp.date_naive().to_string())
                .or_insert(0) += 1;
        }
        let search_trends = per_day
            .into_iter()
            .map(|(date, count)| DailyCount { date, count })
            .collect();

        AnalyticsReport {
            total_searches,
            average_results,
            top_queries,
            search_trends,
            time_range: format!("{}d", options.time_range_days),
            generated_at: now.to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn params() -> RecordedSearchParams {
        RecordedSearchParams {
            threshold: 0.7,
            content_type: None,
            model: "test-embedding".into(),
        }
    }

    fn record_at(query: &str, results_count: usize, timestamp: DateTime<Utc>) -> SearchHistoryRecord {
        SearchHistoryRecord {
            id: uuid::Uuid::now_v7().to_string(),
            query: query.to_string(),
            user_id: "anonymous".into(),
            timestamp,
            results_count,
            params: params(),
        }
    }

    #[test]
    fn empty_history_reports_zeros() {
        let history = SearchHistory::new();
        let report = history.report(&AnalyticsOptions { time_range_days: 0 });
        assert_eq!(report.total_searches, 0);
        assert_eq!(report.average_results, 0.0);
        assert!(report.top_queries.is_empty());
        assert!(report.search_trends.is_empty());
        assert_eq!(report.time_range, "0d");
    }

    #[test]
    fn append_records_defaults() {
        let mut history = SearchHistory::new();
        history.append("smart mattress", "anonymous", 3, params());
        assert_eq!(history.len(), 1);
        assert_eq!(history.records[0].query, "smart mattress");
        assert_eq!(history.records[0].results_count, 3);
    }

    #[test]
    fn window_excludes_old_records() {
        let mut history = SearchHistory::new();
        let now = Utc::now();
        history.records.push(record_at("old", 5, now - Duration::days(10)));
        history.records.push(record_at("recent", 1, now - Duration::days(1)));

        let report = history.report(&AnalyticsOptions { time_range_days: 7 });
        assert_eq!(report.total_searches, 1);
        assert_eq!(report.top_queries[0].query, "recent");
        assert_eq!(report.average_results, 1.0);
    }

    #[test]
    fn average_over_window() {
        let mut history = SearchHistory::new();
        let now = Utc::now();
        history.records.push(record_at("a", 2, now - Duration::hours(1)));
        history.records.push(record_at("b", 4, now - Duration::hours(2)));

        let report = history.report(&AnalyticsOptions::default());
        assert_eq!(report.average_results, 3.0);
    }

    #[test]
    fn top_queries_sorted_by_count_ties_first_seen() {
        let mut history = SearchHistory::new();
        let now = Utc::now();
        for query in ["beta", "alpha", "beta", "gamma", "alpha", "beta"] {
            history.records.push(record_at(query, 0, now - Duration::hours(1)));
        }

        let report = history.report(&AnalyticsOptions::default());
        let pairs: Vec<(&str, usize)> = report
            .top_queries
            .iter()
            .map(|q| (q.query.as_str(), q.count))
            .collect();
        // alpha and gamma would swap only if ties ignored first-seen order
        assert_eq!(pairs, [("beta", 3), ("alpha", 2), ("gamma", 1)]);
    }

    #[test]
    fn top_queries_truncated_to_ten() {
        let mut history = SearchHistory::new();
        let now = Utc::now();
        for i in 0..13 {
            history.records.push(record_at(&format!("query-{i}"), 0, now));
        }
        let report = history.report(&AnalyticsOptions::default());
        assert_eq!(report.top_queries.len(), 10);
    }

    #[test]
    fn trends_grouped_by_day_ascending() {
        let mut history = SearchHistory::new();
        let now = Utc::now();
        history.records.push(record_at("a", 0, now - Duration::days(2)));
        history.records.push(record_at("b", 0, now - Duration::days(1)));
        history.records.push(record_at("c", 0, now - Duration::days(1)));

        let report = history.report(&AnalyticsOptions::default());
        assert_eq!(report.search_trends.len(), 2);
        assert!(report.search_trends[0].date < report.search_trends[1].date);
        assert_eq!(report.search_trends[0].count, 1);
        assert_eq!(report.search_trends[1].count, 2);
    }
}
