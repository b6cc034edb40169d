use crate::error::{CollectError, Result};
use crate::process::{ProcessDataSource, ProcessRecord};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, trace, warn};

/// Reads process records from a procfs-shaped directory tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcfsSource;

impl ProcfsSource {
    pub fn new() -> Self {
        Self
    }

    fn read_process(&self, root: &Path, pid: u32) -> Option<ProcessRecord> {
        let proc_dir = root.join(pid.to_string());

        // A process can exit between listing and reading; skip it quietly
        let stat_content = match fs::read_to_string(proc_dir.join("stat")) {
            Ok(content) => content,
            Err(e) => {
                trace!(pid, error = %e, "stat unreadable, skipping");
                return None;
            }
        };
        let Some(stat) = split_stat(&stat_content) else {
            trace!(pid, "stat malformed, skipping");
            return None;
        };
        let state = stat[2].chars().next().unwrap_or('?');

        let (vm_data, vm_code) = fs::read_to_string(proc_dir.join("status"))
            .map(|content| parse_status_segments(&content))
            .unwrap_or((0, 0));

        let cmd_line = fs::read(proc_dir.join("cmdline"))
            .map(|bytes| {
                String::from_utf8_lossy(&bytes)
                    .trim_end_matches('\0')
                    .to_string()
            })
            .unwrap_or_default();

        // io is root-only for foreign processes
        let io = fs::read_to_string(proc_dir.join("io"))
            .map(|content| parse_io(&content))
            .unwrap_or_default();

        let cmd = match cmd_line.split('\0').next() {
            Some(arg0) if !arg0.is_empty() => arg0.to_string(),
            _ => format!("[{}]", comm(&stat[1])),
        };

        Some(ProcessRecord {
            pid,
            state,
            stat,
            vm_data,
            vm_code,
            cmd,
            cmd_line,
            io,
        })
    }
}

impl ProcessDataSource for ProcfsSource {
    fn get_stats(&self, root: &Path) -> Result<Vec<ProcessRecord>> {
        let entries = fs::read_dir(root).map_err(|source| {
            warn!(path = %root.display(), error = %source, "cannot list process table");
            CollectError::DataSource {
                path: root.to_path_buf(),
                source,
            }
        })?;

        let mut records = Vec::new();
        let mut skipped_count = 0;

        for entry in entries.flatten() {
            let Ok(file_name) = entry.file_name().into_string() else {
                continue;
            };
            let Ok(pid) = file_name.parse::<u32>() else {
                continue;
            };

            match self.read_process(root, pid) {
                Some(record) => records.push(record),
                None => skipped_count += 1,
            }
        }

        debug!(
            path = %root.display(),
            processes = records.len(),
            skipped = skipped_count,
            "read process table"
        );

        Ok(records)
    }
}

/// Splits a stat line so that `(comm)` stays one field even with spaces in it.
pub fn split_stat(content: &str) -> Option<Vec<String>> {
    let content = content.trim();
    let open_paren = content.find('(')?;
    let close_paren = content.rfind(')')?;
    if close_paren < open_paren {
        return None;
    }

    let mut fields = vec![
        content[..open_paren].trim().to_string(),
        content[open_paren..=close_paren].to_string(),
    ];
    fields.extend(
        content[close_paren + 1..]
            .split_whitespace()
            .map(str::to_string),
    );

    // pid, comm and state at minimum
    if fields.len() < 3 || fields[0].is_empty() {
        return None;
    }

    Some(fields)
}

fn comm(field: &str) -> &str {
    field
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .unwrap_or(field)
}

/// Returns `(VmData, VmExe)` in bytes.
pub fn parse_status_segments(content: &str) -> (u64, u64) {
    let mut vm_data = 0;
    let mut vm_code = 0;

    for line in content.lines() {
        if let Some(value) = line.strip_prefix("VmData:") {
            vm_data = parse_kb(value);
        } else if let Some(value) = line.strip_prefix("VmExe:") {
            vm_code = parse_kb(value);
        }
    }

    (vm_data, vm_code)
}

fn parse_kb(value: &str) -> u64 {
    value
        .split_whitespace()
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .and_then(|kb| kb.checked_mul(1024))
        .unwrap_or(0)
}

pub fn parse_io(content: &str) -> HashMap<String, u64> {
    content
        .lines()
        .filter_map(|line| {
            let (key, value) = line.split_once(':')?;
            let value = value.trim().parse::<u64>().ok()?;
            Some((key.trim().to_string(), value))
        })
        .collect()
}
