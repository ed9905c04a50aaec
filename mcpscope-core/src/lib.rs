//! # mcpscope-core
//!
//! Core library for mcpscope - analytics over MCP server request logs.
//!
//! This library provides:
//! - Domain types for request records and their MCP payloads
//! - The analytics aggregator: overview KPIs with period-over-period
//!   comparison, tool performance, argument histograms, client usage,
//!   and reconstructed recent sessions
//! - Configuration management
//! - Logging infrastructure
//!
//! ## Architecture
//!
//! The aggregator is a pure function: callers fetch whatever records they
//! want analyzed (a project's logs over some window) and hand them in as a
//! slice. No storage, no clock access beyond the explicit `now` arguments,
//! no shared state. The same records in any order produce the same report.
//!
//! ## Example
//!
//! ```rust
//! use mcpscope_core::analytics::{compute_project_analytics, ReportOptions};
//! use mcpscope_core::RequestRecord;
//!
//! let records: Vec<RequestRecord> = Vec::new();
//! let report = compute_project_analytics(&records, None, &ReportOptions::default());
//! assert_eq!(report.overview.total_tool_calls_count, 0);
//! ```

// Re-export commonly used items at the crate root
pub use analytics::{compute_project_analytics, compute_project_analytics_at, ProjectAnalytics};
pub use config::Config;
pub use error::{Error, Result};
pub use types::*;

// Public modules
pub mod analytics;
pub mod config;
pub mod error;
pub mod logging;
pub mod types;
