use crate::aggregator::{StateAggregator, StateCounts};
use crate::catalog::{find_metric, state_description, ProcessState};
use crate::config::CollectorConfig;
use crate::error::{CollectError, Result};
use crate::extractor::{MetricValue, ProcessMetricExtractor};
use crate::namespace::{
    NamespacePattern, METRIC_INDEX, MIN_NAMESPACE_LEN, NAME_INDEX, PID_INDEX, STATE_INDEX,
};
use crate::process::{ProcessDataSource, ProcessRecord};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use sysinfo::System;
use tracing::debug;

pub const HOST_TAG: &str = "plugin_running_on";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConcreteMetric {
    pub namespace: NamespacePattern,
    pub value: MetricValue,
    pub timestamp: DateTime<Utc>,
    pub unit: String,
    pub description: String,
    pub tags: BTreeMap<String, String>,
}

/// Which of the pid and name elements of a pattern are wildcards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    FullyDynamic,
    PidOnlyDynamic,
    NameOnlyDynamic,
    Static,
}

impl PatternKind {
    pub fn classify(pattern: &NamespacePattern) -> Self {
        match (
            pattern.is_dynamic_at(PID_INDEX),
            pattern.is_dynamic_at(NAME_INDEX),
        ) {
            (true, true) => PatternKind::FullyDynamic,
            (true, false) => PatternKind::PidOnlyDynamic,
            (false, true) => PatternKind::NameOnlyDynamic,
            (false, false) => PatternKind::Static,
        }
    }
}

pub struct MetricResolver<S> {
    source: S,
    config: CollectorConfig,
    host: String,
}

impl<S: ProcessDataSource> MetricResolver<S> {
    pub fn new(source: S, config: CollectorConfig) -> Self {
        let host = System::host_name().unwrap_or_else(|| "localhost".to_string());
        Self::with_host(source, config, host)
    }

    pub fn with_host(source: S, config: CollectorConfig, host: impl Into<String>) -> Self {
        Self {
            source,
            config,
            host: host.into(),
        }
    }

    pub fn config(&self) -> &CollectorConfig {
        &self.config
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Resolves against the configured process table root.
    pub fn collect(&self, requested: &[NamespacePattern]) -> Result<Vec<ConcreteMetric>> {
        self.config.validate()?;
        self.resolve(requested, &self.config.proc_path)
    }

    /// Runs one collection cycle: one snapshot, then every pattern in request order.
    pub fn resolve(
        &self,
        requested: &[NamespacePattern],
        root: &Path,
    ) -> Result<Vec<ConcreteMetric>> {
        for pattern in requested {
            validate_pattern(pattern)?;
        }

        if requested.is_empty() {
            return Ok(Vec::new());
        }

        let snapshot = self.source.get_stats(root)?;
        let state_counts = StateAggregator::aggregate(&snapshot, &ProcessState::ALL);

        debug!(
            patterns = requested.len(),
            processes = snapshot.len(),
            unrecognized_states = state_counts.unrecognized,
            "resolving metrics"
        );

        Ok(self.resolve_snapshot(requested, &snapshot, &state_counts, Utc::now()))
    }

    /// Expands already validated patterns over a snapshot that is already fetched.
    pub fn resolve_snapshot(
        &self,
        requested: &[NamespacePattern],
        snapshot: &[ProcessRecord],
        state_counts: &StateCounts,
        timestamp: DateTime<Utc>,
    ) -> Vec<ConcreteMetric> {
        let mut metrics = Vec::new();

        for pattern in requested {
            match PatternKind::classify(pattern) {
                PatternKind::FullyDynamic => {
                    self.expand_processes(pattern, snapshot, timestamp, &mut metrics)
                }
                PatternKind::PidOnlyDynamic | PatternKind::NameOnlyDynamic => {
                    // Partial wildcards are accepted but yield nothing
                    debug!(namespace = %pattern, "partially dynamic namespace, no metrics");
                }
                PatternKind::Static => {
                    metrics.extend(self.state_metric(pattern, state_counts, timestamp))
                }
            }
        }

        metrics
    }

    fn expand_processes(
        &self,
        pattern: &NamespacePattern,
        snapshot: &[ProcessRecord],
        timestamp: DateTime<Utc>,
        out: &mut Vec<ConcreteMetric>,
    ) {
        let Some(leaf) = pattern.get(METRIC_INDEX) else {
            debug!(namespace = %pattern, "dynamic namespace without metric element");
            return;
        };
        let Some(definition) = find_metric(&leaf.value) else {
            return;
        };

        for record in snapshot {
            let mut process_metrics = ProcessMetricExtractor::extract(record);
            let Some(value) = process_metrics.remove(definition.name) else {
                continue;
            };

            let namespace = pattern
                .with_value(PID_INDEX, record.pid.to_string())
                .with_value(NAME_INDEX, record.name());

            out.push(ConcreteMetric {
                namespace,
                value,
                timestamp,
                unit: definition.unit.to_string(),
                description: definition.description.to_string(),
                tags: self.tags(),
            });
        }
    }

    fn state_metric(
        &self,
        pattern: &NamespacePattern,
        state_counts: &StateCounts,
        timestamp: DateTime<Utc>,
    ) -> Option<ConcreteMetric> {
        let state = &pattern.get(STATE_INDEX)?.value;
        let count = state_counts.get(state)?;

        Some(ConcreteMetric {
            namespace: pattern.clone(),
            value: MetricValue::Uint(count),
            timestamp,
            unit: String::new(),
            description: state_description(state),
            tags: self.tags(),
        })
    }

    fn tags(&self) -> BTreeMap<String, String> {
        BTreeMap::from([(HOST_TAG.to_string(), self.host.clone())])
    }
}

fn validate_pattern(pattern: &NamespacePattern) -> Result<()> {
    if pattern.len() < MIN_NAMESPACE_LEN {
        return Err(CollectError::NamespaceTooShort {
            pattern: pattern.to_string(),
            expected: MIN_NAMESPACE_LEN,
            actual: pattern.len(),
        });
    }

    Ok(())
}
