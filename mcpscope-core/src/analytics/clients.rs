//! Client usage: request volume per recognized MCP client.
//!
//! Every record lands in exactly one bucket; absent or unrecognized user
//! agents count under [`ClientKind::Other`] rather than vanishing, so the
//! per-client counts always sum to the period's request count.

use std::collections::HashMap;

use crate::analytics::project::count_unique_sessions;
use crate::analytics::report::{ClientRequests, ClientUsage};
use crate::types::{ClientKind, RequestRecord};

/// Tally requests per client for the current period.
pub(crate) fn compute_client_usage(records: &[&RequestRecord]) -> ClientUsage {
    let mut requests: HashMap<ClientKind, i64> = HashMap::new();
    for record in records {
        *requests.entry(record.client()).or_insert(0) += 1;
    }

    let mut clients: Vec<ClientRequests> = requests
        .into_iter()
        .map(|(client, requests)| ClientRequests { client, requests })
        .collect();
    clients.sort_by(|a, b| {
        b.requests
            .cmp(&a.requests)
            .then_with(|| a.client.as_str().cmp(b.client.as_str()))
    });

    ClientUsage {
        total_sessions: count_unique_sessions(records),
        clients,
    }
}
