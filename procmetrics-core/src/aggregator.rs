use crate::catalog::ProcessState;
use crate::process::ProcessRecord;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StateCounts {
    pub counts: BTreeMap<&'static str, u64>,
    /// Records whose state code is not one of the known states.
    pub unrecognized: u64,
}

impl StateCounts {
    pub fn get(&self, state: &str) -> Option<u64> {
        self.counts.get(state).copied()
    }

    pub fn total(&self) -> u64 {
        self.counts.values().sum::<u64>() + self.unrecognized
    }
}

pub struct StateAggregator;

impl StateAggregator {
    pub fn aggregate(snapshot: &[ProcessRecord], known_states: &[ProcessState]) -> StateCounts {
        let mut result = StateCounts {
            counts: known_states.iter().map(|s| (s.name(), 0)).collect(),
            unrecognized: 0,
        };

        for record in snapshot {
            let bucket = ProcessState::from_code(record.state)
                .and_then(|state| result.counts.get_mut(state.name()));

            match bucket {
                Some(count) => *count += 1,
                None => {
                    debug!(pid = record.pid, state = %record.state, "unrecognized process state");
                    result.unrecognized += 1;
                }
            }
        }

        result
    }
}
