//! Per-tool reducers: performance ranking and argument histograms.
//!
//! Both reducers tally records under [`RequestRecord::tool_name`], so
//! records without a usable payload stay out of tool statistics. Output
//! lists carry explicit total orders; equal-keyed entries fall back to name
//! order so the report never depends on hash-map iteration.

use std::collections::HashMap;

use serde_json::Value;

use crate::analytics::project::ReportOptions;
use crate::analytics::report::{
    ArgumentValue, McpTool, PerformingTool, ToolAnalytics, ToolArgument, ToolsPerformance,
};
use crate::types::{McpRequest, RequestRecord};

#[derive(Default)]
struct ToolAccumulator {
    calls: i64,
    errors: i64,
    total_ms: i64,
}

/// Rank tools by call volume and flag the ones breaching the attention
/// thresholds.
pub(crate) fn compute_tools_performance(
    records: &[&RequestRecord],
    options: &ReportOptions,
) -> ToolsPerformance {
    let mut stats: HashMap<String, ToolAccumulator> = HashMap::new();

    for record in records {
        let Some(name) = record.tool_name() else {
            continue;
        };
        let acc = stats.entry(name.to_string()).or_default();
        acc.calls += 1;
        acc.total_ms += record.duration_ms;
        if record.is_error() {
            acc.errors += 1;
        }
    }

    // Thresholds are strict, so the attention check runs on the raw counts:
    // a rate rebuilt from success_rate lands a hair above 0.05 at exactly
    // one error in twenty.
    let mut ranked: Vec<(PerformingTool, bool)> = stats
        .into_iter()
        .map(|(name, acc)| {
            let avg_latency = acc.total_ms / acc.calls;
            let needs_attention = acc.errors as f64 / acc.calls as f64
                > options.attention_error_rate
                || avg_latency > options.attention_latency_ms;
            let tool = PerformingTool {
                name,
                calls: acc.calls,
                success_rate: (acc.calls - acc.errors) as f64 / acc.calls as f64,
                avg_latency,
            };
            (tool, needs_attention)
        })
        .collect();

    // Busiest first; among equally busy tools the faster one ranks higher.
    ranked.sort_by(|(a, _), (b, _)| {
        b.calls
            .cmp(&a.calls)
            .then_with(|| a.avg_latency.cmp(&b.avg_latency))
            .then_with(|| a.name.cmp(&b.name))
    });

    // Worst offender first, so the attention list reads top-down.
    let mut attention: Vec<PerformingTool> = ranked
        .iter()
        .filter(|(_, needs_attention)| *needs_attention)
        .map(|(tool, _)| tool.clone())
        .collect();
    attention.sort_by(|a, b| {
        b.error_rate()
            .total_cmp(&a.error_rate())
            .then_with(|| b.avg_latency.cmp(&a.avg_latency))
            .then_with(|| a.name.cmp(&b.name))
    });

    let top_performing_tools = ranked
        .into_iter()
        .take(options.top_tools_count)
        .map(|(tool, _)| tool)
        .collect();

    ToolsPerformance {
        top_performing_tools,
        tools_requiring_attention: attention,
    }
}

#[derive(Default)]
struct ToolUsage {
    calls: i64,
    // argument name -> stringified value -> occurrences
    arguments: HashMap<String, HashMap<String, i64>>,
}

/// Build per-tool argument histograms for the current period.
pub(crate) fn compute_tool_analytics(records: &[&RequestRecord]) -> ToolAnalytics {
    let mut usage: HashMap<String, ToolUsage> = HashMap::new();

    for record in records {
        let Some(name) = record.tool_name() else {
            continue;
        };
        let tool = usage.entry(name.to_string()).or_default();
        tool.calls += 1;

        let Some(arguments) = record.mcp_request.as_ref().and_then(McpRequest::arguments) else {
            continue;
        };
        for (arg_name, value) in arguments {
            let counts = tool.arguments.entry(arg_name.clone()).or_default();
            *counts.entry(stringify_argument(value)).or_insert(0) += 1;
        }
    }

    let mut tools: Vec<McpTool> = usage
        .into_iter()
        .map(|(name, data)| {
            let mut arguments: Vec<ToolArgument> = data
                .arguments
                .into_iter()
                .map(|(arg_name, value_counts)| {
                    let usage_count: i64 = value_counts.values().sum();
                    let mut values: Vec<ArgumentValue> = value_counts
                        .into_iter()
                        .map(|(value, count)| ArgumentValue { name: value, count })
                        .collect();
                    values.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
                    ToolArgument {
                        name: arg_name,
                        usage_count,
                        values,
                    }
                })
                .collect();
            arguments.sort_by(|a, b| a.name.cmp(&b.name));
            McpTool {
                name,
                calls: data.calls,
                arguments,
            }
        })
        .collect();
    tools.sort_by(|a, b| a.name.cmp(&b.name));

    ToolAnalytics { tools }
}

/// String values pass through verbatim; anything else renders as compact
/// JSON so distinct values stay distinct histogram buckets.
fn stringify_argument(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
