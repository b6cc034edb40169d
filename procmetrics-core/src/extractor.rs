use crate::catalog::METRICS;
use crate::process::ProcessRecord;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

// Positions in /proc/<pid>/stat
const STAT_MINFLT: usize = 9;
const STAT_MAJFLT: usize = 11;
const STAT_UTIME: usize = 13;
const STAT_STIME: usize = 14;
const STAT_VSIZE: usize = 22;
const STAT_RSS: usize = 23;
const STAT_STARTSTACK: usize = 27;
const STAT_KSTKESP: usize = 28;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum MetricValue {
    Uint(u64),
    Text(String),
}

impl MetricValue {
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            MetricValue::Uint(v) => Some(*v),
            MetricValue::Text(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetricValue::Uint(_) => None,
            MetricValue::Text(s) => Some(s),
        }
    }
}

impl Default for MetricValue {
    fn default() -> Self {
        MetricValue::Uint(0)
    }
}

impl From<u64> for MetricValue {
    fn from(v: u64) -> Self {
        MetricValue::Uint(v)
    }
}

impl From<String> for MetricValue {
    fn from(s: String) -> Self {
        MetricValue::Text(s)
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Uint(v) => write!(f, "{}", v),
            // cmdline separators would garble terminal output
            MetricValue::Text(s) => write!(f, "{}", s.replace('\0', " ")),
        }
    }
}

/// Metric name to value, always holding every name in the catalog.
pub type ProcessMetrics = BTreeMap<&'static str, MetricValue>;

pub struct ProcessMetricExtractor;

impl ProcessMetricExtractor {
    pub fn extract(record: &ProcessRecord) -> ProcessMetrics {
        let mut metrics: ProcessMetrics = METRICS
            .iter()
            .map(|m| (m.name, MetricValue::default()))
            .collect();

        let field = |index: usize| parse_field(record, index);

        metrics.insert("ps_vm", field(STAT_VSIZE).into());
        metrics.insert("ps_rss", field(STAT_RSS).into());

        metrics.insert("ps_data", record.vm_data.into());
        metrics.insert("ps_code", record.vm_code.into());

        // The stack grows down on most arches but not all of them
        let stack_start = field(STAT_STARTSTACK);
        let stack_pointer = field(STAT_KSTKESP);
        metrics.insert(
            "ps_stacksize",
            (stack_start.max(stack_pointer) - stack_start.min(stack_pointer)).into(),
        );

        metrics.insert("ps_cputime_user", field(STAT_UTIME).into());
        metrics.insert("ps_cputime_system", field(STAT_STIME).into());

        metrics.insert("ps_pagefaults_min", field(STAT_MINFLT).into());
        metrics.insert("ps_pagefaults_maj", field(STAT_MAJFLT).into());

        let counter = |key: &str| record.io.get(key).copied().unwrap_or(0);
        metrics.insert("ps_disk_octets_rchar", counter("rchar").into());
        metrics.insert("ps_disk_octets_wchar", counter("wchar").into());
        metrics.insert("ps_disk_ops_syscr", counter("syscr").into());
        metrics.insert("ps_disk_ops_syscw", counter("syscw").into());

        metrics.insert("ps_cmd_line", record.cmd_line.clone().into());
        metrics.insert("ps_cmd", record.cmd.clone().into());

        metrics
    }
}

/// Missing or malformed fields count as 0.
fn parse_field(record: &ProcessRecord, index: usize) -> u64 {
    record
        .stat_field(index)
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0)
}
