//! Report types for project analytics
//!
//! These are the output shapes consumed by dashboards: camelCase JSON,
//! every list pre-sorted, nothing left to map iteration order. The report
//! is a plain value; recomputing it from the same records always yields
//! the same JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::ClientKind;

// ============================================
// ProjectAnalytics
// ============================================

/// Complete analytics report for one project.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectAnalytics {
    /// Headline KPIs with period-over-period changes
    pub overview: Overview,
    /// Per-tool performance ranking and attention list
    pub tools_performance: ToolsPerformance,
    /// Per-tool argument usage histograms
    pub tool_analytics: ToolAnalytics,
    /// Request volume per recognized client
    pub client_usage: ClientUsage,
    /// Reconstructed sessions, most recently ended first
    pub recent_sessions: RecentSessions,
}

// ============================================
// Overview
// ============================================

/// Headline metrics for the current period.
///
/// Each `*_change` field is the fractional change versus the previous
/// period: 0.5 means +50%, -0.25 means -25%. A zero previous value reports
/// 0.0 when the current value is also zero and exactly 1.0 otherwise.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    /// Distinct sessions in the current period
    pub total_session_count: i64,
    pub total_session_change: f64,
    /// Requests in the current period
    pub total_tool_calls_count: i64,
    pub total_tool_calls_change: f64,
    /// Distinct authenticated users in the current period
    pub users_count: i64,
    pub users_change: f64,
    /// Average request latency in whole milliseconds
    pub avg_latency_value: i64,
    pub avg_latency_change: f64,
    /// Fraction of requests that failed
    pub error_rate_value: f64,
    pub error_rate_change: f64,
}

// ============================================
// ToolsPerformance
// ============================================

/// Performance ranking across all tools of the current period.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolsPerformance {
    /// Most-called tools, busiest first
    pub top_performing_tools: Vec<PerformingTool>,
    /// Tools breaching the error-rate or latency threshold, worst first
    pub tools_requiring_attention: Vec<PerformingTool>,
}

/// Aggregated performance of a single tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformingTool {
    pub name: String,
    /// Calls attributed to this tool in the current period
    pub calls: i64,
    /// Fraction of calls that succeeded
    pub success_rate: f64,
    /// Average latency in whole milliseconds
    pub avg_latency: i64,
}

impl PerformingTool {
    /// Fraction of calls that failed.
    pub fn error_rate(&self) -> f64 {
        1.0 - self.success_rate
    }
}

// ============================================
// ToolAnalytics
// ============================================

/// Argument usage histograms for every tool seen in the current period.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolAnalytics {
    /// All tools, sorted by name
    pub tools: Vec<McpTool>,
}

/// One tool with its argument histograms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McpTool {
    pub name: String,
    /// Calls attributed to this tool in the current period
    pub calls: i64,
    /// Argument histograms, sorted by argument name
    pub arguments: Vec<ToolArgument>,
}

/// Value histogram for one argument of one tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolArgument {
    pub name: String,
    /// Calls that supplied this argument; equals the sum of value counts
    pub usage_count: i64,
    /// Distinct observed values, most frequent first
    pub values: Vec<ArgumentValue>,
}

/// One observed argument value and how often it appeared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArgumentValue {
    /// The value itself: strings verbatim, anything else as compact JSON
    pub name: String,
    pub count: i64,
}

// ============================================
// ClientUsage
// ============================================

/// Request volume per recognized client product.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientUsage {
    /// Distinct sessions in the current period
    pub total_sessions: i64,
    /// Per-client request counts, busiest first
    pub clients: Vec<ClientRequests>,
}

/// Requests attributed to one client product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientRequests {
    /// Serialized as `name`; the dashboard keys client entries that way
    #[serde(rename = "name")]
    pub client: ClientKind,
    pub requests: i64,
}

// ============================================
// RecentSessions
// ============================================

/// Sessions reconstructed from the current period's records.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentSessions {
    /// Most recently ended sessions first
    pub sessions: Vec<RecentSession>,
}

/// One reconstructed session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentSession {
    pub session_id: String,
    /// Client recognized from the session's most recent user agent,
    /// serialized as `user`
    #[serde(rename = "user")]
    pub client: ClientKind,
    /// Requests in the session
    pub calls: i64,
    /// Failed requests in the session
    pub errors: i64,
    /// Tool invoked by the session's most recent tool-bearing request
    pub last_tool_call: Option<String>,
    /// Start of the session's earliest request
    pub started_at: DateTime<Utc>,
    /// End of the session's latest-ending request
    pub ended_at: DateTime<Utc>,
}
