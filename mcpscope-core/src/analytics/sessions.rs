//! Session reconstruction from request records.
//!
//! A session is whatever group of records shares a non-empty MCP session id;
//! records without one belong to no session and are skipped here. The fold
//! is order-independent: window bounds come from min/max, and the "latest"
//! user agent and tool call are chosen by comparing record timestamps
//! instead of trusting input order.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::analytics::report::{RecentSession, RecentSessions};
use crate::types::{ClientKind, RequestRecord};

/// Orders records within a session. Start time first, end time as the
/// tie-break, mirroring how the records are replayed chronologically.
type RecordKey = (DateTime<Utc>, DateTime<Utc>);

struct SessionAccumulator {
    started_at: DateTime<Utc>,
    ended_at: DateTime<Utc>,
    calls: i64,
    errors: i64,
    user_agent: Option<(RecordKey, String)>,
    last_tool: Option<(RecordKey, String)>,
}

/// Keep `slot` holding the value from the latest record that supplied one.
/// Replacement is strict, so an exact duplicate record changes nothing.
fn replace_latest(slot: &mut Option<(RecordKey, String)>, key: RecordKey, value: &str) {
    match slot {
        Some((current, _)) if *current >= key => {}
        _ => *slot = Some((key, value.to_string())),
    }
}

/// Reconstruct sessions from the current period's records, most recently
/// ended first.
pub(crate) fn compute_recent_sessions(records: &[&RequestRecord]) -> RecentSessions {
    let mut table: HashMap<&str, SessionAccumulator> = HashMap::new();

    for record in records {
        let Some(id) = record.session_id() else {
            continue;
        };
        let key = (record.started_at, record.ended_at());

        let session = table.entry(id).or_insert_with(|| SessionAccumulator {
            started_at: record.started_at,
            ended_at: record.ended_at(),
            calls: 0,
            errors: 0,
            user_agent: None,
            last_tool: None,
        });

        session.started_at = session.started_at.min(record.started_at);
        session.ended_at = session.ended_at.max(record.ended_at());
        session.calls += 1;
        if record.is_error() {
            session.errors += 1;
        }
        if let Some(ua) = record.user_agent.as_deref() {
            replace_latest(&mut session.user_agent, key, ua);
        }
        if let Some(tool) = record.tool_name() {
            replace_latest(&mut session.last_tool, key, tool);
        }
    }

    let mut sessions: Vec<RecentSession> = table
        .into_iter()
        .map(|(id, acc)| RecentSession {
            session_id: id.to_string(),
            client: ClientKind::from_user_agent(acc.user_agent.as_ref().map(|(_, ua)| ua.as_str())),
            calls: acc.calls,
            errors: acc.errors,
            last_tool_call: acc.last_tool.map(|(_, tool)| tool),
            started_at: acc.started_at,
            ended_at: acc.ended_at,
        })
        .collect();

    sessions.sort_by(|a, b| {
        b.ended_at
            .cmp(&a.ended_at)
            .then_with(|| a.session_id.cmp(&b.session_id))
    });

    RecentSessions { sessions }
}
