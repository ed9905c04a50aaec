//! Project report assembly: period split, overview KPIs, sub-report fan-out.
//!
//! The entry point here is a pure function over the records the caller
//! supplies. Records are split into a current and a previous period of equal
//! length, the overview compares the two, and every other sub-report is
//! computed from the current period alone.

use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::hash::Hash;
use tracing::debug;

use crate::analytics::report::{Overview, ProjectAnalytics};
use crate::analytics::{clients, sessions, tools};
use crate::types::RequestRecord;

/// Tuning knobs for report generation.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// How many tools the top-performing list holds
    pub top_tools_count: usize,
    /// Error-rate fraction above which a tool requires attention
    pub attention_error_rate: f64,
    /// Average latency in milliseconds above which a tool requires attention
    pub attention_latency_ms: i64,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            top_tools_count: 5,
            attention_error_rate: 0.05,
            attention_latency_ms: 1000,
        }
    }
}

/// Compute the full analytics report for one project's request records.
///
/// `comparison_start` divides time into the current period (records starting
/// at or after it) and a previous period of the same length ending at it.
/// Without a comparison start every record is current and all change fields
/// report 0.0.
///
/// Records may arrive in any order; the report is the same for any
/// permutation of `records`.
pub fn compute_project_analytics(
    records: &[RequestRecord],
    comparison_start: Option<DateTime<Utc>>,
    options: &ReportOptions,
) -> ProjectAnalytics {
    compute_project_analytics_at(records, comparison_start, Utc::now(), options)
}

/// Same as [`compute_project_analytics`] with an explicit `now`.
///
/// The previous period spans `now - comparison_start` backwards from
/// `comparison_start`. Taking `now` as an argument keeps report generation
/// deterministic for callers that need it.
pub fn compute_project_analytics_at(
    records: &[RequestRecord],
    comparison_start: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    options: &ReportOptions,
) -> ProjectAnalytics {
    let (current, previous) = split_periods(records, comparison_start, now);

    debug!(
        total = records.len(),
        current = current.len(),
        previous = previous.len(),
        comparison_start = ?comparison_start,
        %now,
        "partitioned records for project analytics"
    );

    ProjectAnalytics {
        overview: compute_overview(&current, &previous),
        tools_performance: tools::compute_tools_performance(&current, options),
        tool_analytics: tools::compute_tool_analytics(&current),
        client_usage: clients::compute_client_usage(&current),
        recent_sessions: sessions::compute_recent_sessions(&current),
    }
}

/// Split records into the current period and the mirror-length previous one.
///
/// Records older than the previous period fall outside the comparison and
/// are dropped.
fn split_periods<'a>(
    records: &'a [RequestRecord],
    comparison_start: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> (Vec<&'a RequestRecord>, Vec<&'a RequestRecord>) {
    let Some(current_start) = comparison_start else {
        return (records.iter().collect(), Vec::new());
    };

    let previous_start = current_start - (now - current_start);

    let mut current = Vec::new();
    let mut previous = Vec::new();
    for record in records {
        if record.started_at >= current_start {
            current.push(record);
        } else if record.started_at >= previous_start {
            previous.push(record);
        }
    }
    (current, previous)
}

fn compute_overview(current: &[&RequestRecord], previous: &[&RequestRecord]) -> Overview {
    let current_sessions = count_unique_sessions(current);
    let previous_sessions = count_unique_sessions(previous);

    let current_calls = current.len() as i64;
    let previous_calls = previous.len() as i64;

    let current_users = count_unique_by(current, |r| r.user_account_id);
    let previous_users = count_unique_by(previous, |r| r.user_account_id);

    let (current_latency, current_error_rate) = latency_and_error_rate(current);
    let (previous_latency, previous_error_rate) = latency_and_error_rate(previous);

    Overview {
        total_session_count: current_sessions,
        total_session_change: percentage_change(previous_sessions as f64, current_sessions as f64),
        total_tool_calls_count: current_calls,
        total_tool_calls_change: percentage_change(previous_calls as f64, current_calls as f64),
        users_count: current_users,
        users_change: percentage_change(previous_users as f64, current_users as f64),
        avg_latency_value: current_latency,
        avg_latency_change: percentage_change(previous_latency as f64, current_latency as f64),
        error_rate_value: current_error_rate,
        error_rate_change: percentage_change(previous_error_rate, current_error_rate),
    }
}

/// Average latency (whole milliseconds, integer division) and error-rate
/// fraction over a period. Empty periods report zero for both.
fn latency_and_error_rate(records: &[&RequestRecord]) -> (i64, f64) {
    if records.is_empty() {
        return (0, 0.0);
    }

    let total_ms: i64 = records.iter().map(|r| r.duration_ms).sum();
    let avg_latency = total_ms / records.len() as i64;

    let errors = records.iter().filter(|r| r.is_error()).count();
    let error_rate = errors as f64 / records.len() as f64;

    (avg_latency, error_rate)
}

/// Fractional change from `previous` to `current`.
///
/// A zero baseline has no real percentage: the result is 0.0 when the
/// current value is also zero, and exactly 1.0 otherwise. Dashboards render
/// that sentinel as "+100%".
pub(crate) fn percentage_change(previous: f64, current: f64) -> f64 {
    if previous == 0.0 {
        if current == 0.0 {
            return 0.0;
        }
        return 1.0;
    }
    (current - previous) / previous
}

/// Count distinct values of `key` across `items`, skipping absent keys.
///
/// The item lifetime is named so `key` may return borrows of the items
/// themselves (session ids are counted without cloning).
pub(crate) fn count_unique_by<'a, T, K, F>(items: &'a [T], key: F) -> i64
where
    K: Eq + Hash,
    F: Fn(&'a T) -> Option<K>,
{
    let mut seen = HashSet::new();
    for item in items {
        if let Some(k) = key(item) {
            seen.insert(k);
        }
    }
    seen.len() as i64
}

/// Distinct non-empty session ids across a period.
pub(crate) fn count_unique_sessions(records: &[&RequestRecord]) -> i64 {
    count_unique_by(records, |r| r.session_id())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::McpRequest;
    use chrono::{Duration, TimeZone};
    use uuid::Uuid;

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap()
    }

    fn record_at(started_at: DateTime<Utc>) -> RequestRecord {
        RequestRecord {
            id: Uuid::new_v4(),
            started_at,
            duration_ms: 100,
            deployment_revision_id: Uuid::new_v4(),
            user_account_id: None,
            mcp_session_id: None,
            user_agent: None,
            http_status_code: Some(200),
            http_error: None,
            mcp_request: Some(McpRequest::other("tools/list")),
        }
    }

    #[test]
    fn split_periods_boundaries() {
        let start = base_time();
        let now = start + Duration::days(7);
        // previous period spans [start - 7d, start)
        let records = vec![
            record_at(start),                          // current (inclusive)
            record_at(start + Duration::days(3)),      // current
            record_at(start - Duration::seconds(1)),   // previous
            record_at(start - Duration::days(7)),      // previous (inclusive)
            record_at(start - Duration::days(7) - Duration::seconds(1)), // dropped
        ];

        let (current, previous) = split_periods(&records, Some(start), now);
        assert_eq!(current.len(), 2);
        assert_eq!(previous.len(), 2);
    }

    #[test]
    fn split_periods_without_comparison_start() {
        let records = vec![
            record_at(base_time()),
            record_at(base_time() - Duration::days(400)),
        ];
        let (current, previous) = split_periods(&records, None, base_time() + Duration::days(1));
        assert_eq!(current.len(), 2);
        assert!(previous.is_empty());
    }

    #[test]
    fn percentage_change_sentinels() {
        assert_eq!(percentage_change(0.0, 0.0), 0.0);
        assert_eq!(percentage_change(0.0, 3.0), 1.0);
        assert_eq!(percentage_change(0.0, 0.001), 1.0);
        assert!((percentage_change(4.0, 6.0) - 0.5).abs() < 1e-9);
        assert!((percentage_change(4.0, 2.0) + 0.5).abs() < 1e-9);
        assert!((percentage_change(4.0, 4.0)).abs() < 1e-9);
    }

    #[test]
    fn overview_of_empty_input_is_all_zero() {
        let overview = compute_overview(&[], &[]);
        assert_eq!(overview, Overview::default());
    }

    #[test]
    fn overview_counts_and_averages() {
        let user_a = Uuid::new_v4();
        let user_b = Uuid::new_v4();

        let mut r1 = record_at(base_time());
        r1.duration_ms = 100;
        r1.user_account_id = Some(user_a);
        r1.mcp_session_id = Some("s1".to_string());

        let mut r2 = record_at(base_time() + Duration::minutes(1));
        r2.duration_ms = 201;
        r2.user_account_id = Some(user_a);
        r2.mcp_session_id = Some("s1".to_string());
        r2.http_status_code = Some(500);

        let mut r3 = record_at(base_time() + Duration::minutes(2));
        r3.duration_ms = 100;
        r3.user_account_id = Some(user_b);
        r3.mcp_session_id = Some(String::new()); // unusable session id

        let current: Vec<&RequestRecord> = vec![&r1, &r2, &r3];
        let overview = compute_overview(&current, &[]);

        assert_eq!(overview.total_session_count, 1);
        assert_eq!(overview.total_tool_calls_count, 3);
        assert_eq!(overview.users_count, 2);
        // (100 + 201 + 100) / 3 truncates to 133
        assert_eq!(overview.avg_latency_value, 133);
        assert!((overview.error_rate_value - 1.0 / 3.0).abs() < 1e-9);

        // empty previous period: every non-zero metric reports the sentinel
        assert_eq!(overview.total_session_change, 1.0);
        assert_eq!(overview.total_tool_calls_change, 1.0);
        assert_eq!(overview.users_change, 1.0);
        assert_eq!(overview.avg_latency_change, 1.0);
        assert_eq!(overview.error_rate_change, 1.0);
    }

    #[test]
    fn overview_compares_periods() {
        let start = base_time();
        let mut prev = record_at(start - Duration::hours(1));
        prev.duration_ms = 100;
        let mut curr = record_at(start + Duration::hours(1));
        curr.duration_ms = 150;

        let previous: Vec<&RequestRecord> = vec![&prev];
        let current: Vec<&RequestRecord> = vec![&curr];
        let overview = compute_overview(&current, &previous);

        assert_eq!(overview.avg_latency_value, 150);
        assert!((overview.avg_latency_change - 0.5).abs() < 1e-9);
        assert!((overview.total_tool_calls_change).abs() < 1e-9);
        assert_eq!(overview.error_rate_change, 0.0);
    }

    #[test]
    fn count_unique_skips_absent_keys() {
        let mut r1 = record_at(base_time());
        r1.mcp_session_id = Some("a".to_string());
        let mut r2 = record_at(base_time());
        r2.mcp_session_id = Some("a".to_string());
        let r3 = record_at(base_time());
        let mut r4 = record_at(base_time());
        r4.mcp_session_id = Some("b".to_string());

        let records: Vec<&RequestRecord> = vec![&r1, &r2, &r3, &r4];
        assert_eq!(count_unique_sessions(&records), 2);
        assert_eq!(count_unique_by(&records, |r| r.user_account_id), 0);
    }

    #[test]
    fn count_unique_borrows_keys_from_owned_records() {
        // keys borrowed straight out of an owned slice, no reference layer
        let mut r1 = record_at(base_time());
        r1.mcp_session_id = Some("a".to_string());
        let mut r2 = record_at(base_time());
        r2.mcp_session_id = Some("b".to_string());
        let records: Vec<RequestRecord> = vec![r1, r2];

        assert_eq!(count_unique_by(&records, |r| r.session_id()), 2);
    }
}
