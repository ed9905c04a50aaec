//! Lightweight usage rollup for project listings.
//!
//! Dashboards show a sessions/requests pair next to each project without
//! paying for the full analytics report. Session counting matches the
//! overview metric: distinct, non-empty session ids.

use serde::{Deserialize, Serialize};

use crate::analytics::project::count_unique_by;
use crate::types::RequestRecord;

/// Session and request totals for a set of request records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Usage {
    /// Distinct sessions across the records
    pub session_count: i64,
    /// Total records
    pub request_count: i64,
}

impl Usage {
    /// Roll up totals from raw records.
    pub fn from_records(records: &[RequestRecord]) -> Self {
        Self {
            session_count: count_unique_by(records, |r| r.session_id()),
            request_count: records.len() as i64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn record(session: Option<&str>) -> RequestRecord {
        RequestRecord {
            id: Uuid::new_v4(),
            started_at: Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap(),
            duration_ms: 100,
            deployment_revision_id: Uuid::new_v4(),
            user_account_id: None,
            mcp_session_id: session.map(String::from),
            user_agent: None,
            http_status_code: Some(200),
            http_error: None,
            mcp_request: None,
        }
    }

    #[test]
    fn rolls_up_counts() {
        let records = vec![
            record(Some("s1")),
            record(Some("s1")),
            record(Some("s2")),
            record(Some("")),
            record(None),
        ];

        let usage = Usage::from_records(&records);
        assert_eq!(usage.session_count, 2);
        assert_eq!(usage.request_count, 5);
    }

    #[test]
    fn empty_records_yield_zero_usage() {
        assert_eq!(Usage::from_records(&[]), Usage::default());
    }
}
