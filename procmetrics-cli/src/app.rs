use anyhow::{bail, Result};
use procmetrics_core::{
    CollectorConfig, ConcreteMetric, MetricResolver, MetricType, NamespaceBuilder,
    NamespacePattern, ProcfsSource,
};
use std::io::Write;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Json,
    Text,
}

pub struct App {
    resolver: MetricResolver<ProcfsSource>,
    requested: Vec<NamespacePattern>,
    format: OutputFormat,
}

impl App {
    pub fn new(config: CollectorConfig, patterns: &[String], format: OutputFormat) -> Result<Self> {
        config.validate()?;
        let requested = select_patterns(&NamespaceBuilder::metric_types(), patterns)?;
        debug!(patterns = requested.len(), proc_path = %config.proc_path.display(), "collector ready");

        Ok(Self {
            resolver: MetricResolver::new(ProcfsSource::new(), config),
            requested,
            format,
        })
    }

    pub fn run_cycle(&self) -> Result<Vec<ConcreteMetric>> {
        Ok(self.resolver.collect(&self.requested)?)
    }

    pub fn write_metrics(&self, out: &mut impl Write, metrics: &[ConcreteMetric]) -> Result<()> {
        for metric in metrics {
            match self.format {
                OutputFormat::Json => writeln!(out, "{}", serde_json::to_string(metric)?)?,
                OutputFormat::Text => writeln!(
                    out,
                    "{:<60} {:>16} {}",
                    metric.namespace.to_string(),
                    metric.value.to_string(),
                    metric.unit
                )?,
            }
        }
        out.flush()?;
        Ok(())
    }
}

/// Picks the requested patterns out of the discovery list; empty means all of them.
pub fn select_patterns(types: &[MetricType], requested: &[String]) -> Result<Vec<NamespacePattern>> {
    if requested.is_empty() {
        return Ok(types.iter().map(|t| t.namespace.clone()).collect());
    }

    let mut selected = Vec::with_capacity(requested.len());
    for wanted in requested {
        match types.iter().find(|t| t.namespace.to_string() == *wanted) {
            Some(t) => selected.push(t.namespace.clone()),
            None => bail!("Unknown metric namespace: {}", wanted),
        }
    }

    Ok(selected)
}

pub fn write_catalog(out: &mut impl Write, format: OutputFormat) -> Result<()> {
    for metric_type in NamespaceBuilder::metric_types() {
        match format {
            OutputFormat::Json => writeln!(out, "{}", serde_json::to_string(&metric_type)?)?,
            OutputFormat::Text => writeln!(
                out,
                "{:<48} {:<5} {}",
                metric_type.namespace.to_string(),
                metric_type.unit,
                metric_type.description
            )?,
        }
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_all_by_default() {
        let types = NamespaceBuilder::metric_types();
        let selected = select_patterns(&types, &[]).unwrap();
        assert_eq!(selected.len(), types.len());
    }

    #[test]
    fn test_select_by_string_form() {
        let types = NamespaceBuilder::metric_types();
        let selected = select_patterns(
            &types,
            &[
                "/intel/procfs/processes/running".to_string(),
                "/intel/procfs/processes/pid/*/*/ps_rss".to_string(),
            ],
        )
        .unwrap();

        assert_eq!(selected.len(), 2);
        assert!(!selected[0].is_dynamic());
        assert!(selected[1].is_dynamic());
    }

    #[test]
    fn test_unknown_pattern_is_rejected() {
        let types = NamespaceBuilder::metric_types();
        let err = select_patterns(&types, &["/intel/procfs/nope".to_string()]).unwrap_err();
        assert!(err.to_string().contains("/intel/procfs/nope"));
    }

    #[test]
    fn test_catalog_json_lines() {
        let mut out = Vec::new();
        write_catalog(&mut out, OutputFormat::Json).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), NamespaceBuilder::produce().len());

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["unit"], "B");
        assert_eq!(first["namespace"][6]["value"], "ps_vm");
    }
}
