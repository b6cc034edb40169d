use serde::Serialize;

pub const VENDOR: &str = "intel";
pub const FS: &str = "procfs";
pub const PLUGIN_NAME: &str = "processes";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub unit: &'static str,
}

const fn metric(
    name: &'static str,
    description: &'static str,
    unit: &'static str,
) -> MetricDefinition {
    MetricDefinition {
        name,
        description,
        unit,
    }
}

/// Every per-process metric the extractor derives.
pub static METRICS: &[MetricDefinition] = &[
    metric("ps_vm", "Virtual memory size in bytes", "B"),
    metric(
        "ps_rss",
        "Resident Set Size: number of pages the process has in real memory",
        "",
    ),
    metric("ps_data", "Size of data segments", "B"),
    metric("ps_code", "Size of text segment", "B"),
    metric("ps_stacksize", "Stack size", "B"),
    metric(
        "ps_cputime_user",
        "Amount of time that this process has been scheduled in user mode",
        "Jiff",
    ),
    metric(
        "ps_cputime_system",
        "Amount of time that this process has been scheduled in kernel mode",
        "Jiff",
    ),
    metric(
        "ps_pagefaults_min",
        "The number of minor faults the process has made",
        "",
    ),
    metric(
        "ps_pagefaults_maj",
        "The number of major faults the process has made",
        "",
    ),
    metric(
        "ps_disk_ops_syscr",
        "Attempt to count the number of read I/O operations",
        "",
    ),
    metric(
        "ps_disk_ops_syscw",
        "Attempt to count the number of write I/O operations",
        "",
    ),
    metric(
        "ps_disk_octets_rchar",
        "The number of bytes which this task has caused to be read from storage",
        "B",
    ),
    metric(
        "ps_disk_octets_wchar",
        "The number of bytes which this task has caused, or shall cause to be written to disk",
        "B",
    ),
    metric("ps_cmd_line", "Process command line with full path and args", ""),
    metric("ps_cmd", "Process command line with full path", ""),
];

pub fn find_metric(name: &str) -> Option<&'static MetricDefinition> {
    METRICS.iter().find(|m| m.name == name)
}

/// Scheduler states a process can be counted under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessState {
    Running,
    Sleeping,
    Waiting,
    Zombie,
    Stopped,
    Tracing,
    Dead,
    Wakekill,
    Waking,
    Parked,
    Idle,
}

impl ProcessState {
    pub const ALL: [ProcessState; 11] = [
        ProcessState::Running,
        ProcessState::Sleeping,
        ProcessState::Waiting,
        ProcessState::Zombie,
        ProcessState::Stopped,
        ProcessState::Tracing,
        ProcessState::Dead,
        ProcessState::Wakekill,
        ProcessState::Waking,
        ProcessState::Parked,
        ProcessState::Idle,
    ];

    /// Maps the state letter from `/proc/<pid>/stat`.
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'R' => Some(ProcessState::Running),
            'S' => Some(ProcessState::Sleeping),
            'D' => Some(ProcessState::Waiting),
            'Z' => Some(ProcessState::Zombie),
            'T' => Some(ProcessState::Stopped),
            't' => Some(ProcessState::Tracing),
            'X' | 'x' => Some(ProcessState::Dead),
            'K' => Some(ProcessState::Wakekill),
            'W' => Some(ProcessState::Waking),
            'P' => Some(ProcessState::Parked),
            'I' => Some(ProcessState::Idle),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ProcessState::Running => "running",
            ProcessState::Sleeping => "sleeping",
            ProcessState::Waiting => "waiting",
            ProcessState::Zombie => "zombie",
            ProcessState::Stopped => "stopped",
            ProcessState::Tracing => "tracing",
            ProcessState::Dead => "dead",
            ProcessState::Wakekill => "wakekill",
            ProcessState::Waking => "waking",
            ProcessState::Parked => "parked",
            ProcessState::Idle => "idle",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.name() == name)
    }

    pub fn description(self) -> String {
        state_description(self.name())
    }
}

pub fn state_description(state: &str) -> String {
    format!("Number of processes in {} state", state)
}
