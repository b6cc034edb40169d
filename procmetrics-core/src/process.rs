use crate::error::Result;
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;

/// Raw data for one process, as read during a single collection cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProcessRecord {
    pub pid: u32,
    pub state: char,
    /// Whitespace-separated fields of `/proc/<pid>/stat`, 0-based.
    pub stat: Vec<String>,
    pub vm_data: u64,
    pub vm_code: u64,
    pub cmd: String,
    /// NUL-separated argv, as found in `/proc/<pid>/cmdline`.
    pub cmd_line: String,
    pub io: HashMap<String, u64>,
}

impl ProcessRecord {
    pub fn new(pid: u32, state: char) -> Self {
        Self {
            pid,
            state,
            ..Default::default()
        }
    }

    /// Last path segment of the executable, used as the process name element.
    pub fn name(&self) -> &str {
        let executable = self.cmd_line.split('\0').next().unwrap_or_default();
        executable.rsplit('/').next().unwrap_or_default()
    }

    pub fn stat_field(&self, index: usize) -> Option<&str> {
        self.stat.get(index).map(String::as_str)
    }
}

/// Anything that can produce a snapshot of the process table.
pub trait ProcessDataSource {
    fn get_stats(&self, root: &Path) -> Result<Vec<ProcessRecord>>;
}

impl<S: ProcessDataSource + ?Sized> ProcessDataSource for &S {
    fn get_stats(&self, root: &Path) -> Result<Vec<ProcessRecord>> {
        (**self).get_stats(root)
    }
}
