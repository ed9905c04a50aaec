//! Analytics module for mcpscope
//!
//! Aggregates MCP server request logs into dashboard-ready reports:
//! - Overview KPIs with period-over-period comparison
//! - Per-tool performance ranking and attention flags
//! - Per-tool argument usage histograms
//! - Request volume per recognized client
//! - Reconstructed recent sessions
//! - Lightweight sessions/requests rollups for project listings
//!
//! Everything here is a pure function over the records the caller supplies.
//! There is no storage and no clock dependency beyond the explicit `now`
//! arguments, so identical input always produces an identical report,
//! whatever order the records arrive in.

mod clients;
pub mod project;
pub mod report;
mod sessions;
mod tools;
pub mod usage;

pub use project::{compute_project_analytics, compute_project_analytics_at, ReportOptions};
pub use report::{
    ArgumentValue, ClientRequests, ClientUsage, McpTool, Overview, PerformingTool,
    ProjectAnalytics, RecentSession, RecentSessions, ToolAnalytics, ToolArgument,
    ToolsPerformance,
};
pub use usage::Usage;
