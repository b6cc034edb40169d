use crate::catalog::{ProcessState, FS, METRICS, PLUGIN_NAME, VENDOR};
use serde::Serialize;
use std::fmt;

/// Value a dynamic element holds until it is resolved.
pub const WILDCARD: &str = "*";

pub const MIN_NAMESPACE_LEN: usize = 4;
pub const STATE_INDEX: usize = 3;
pub const PID_INDEX: usize = 4;
pub const NAME_INDEX: usize = 5;
pub const METRIC_INDEX: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamespaceElement {
    pub name: String,
    pub value: String,
    pub description: String,
    pub dynamic: bool,
}

impl NamespaceElement {
    pub fn fixed(value: impl Into<String>) -> Self {
        Self {
            name: String::new(),
            value: value.into(),
            description: String::new(),
            dynamic: false,
        }
    }

    pub fn wildcard(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: WILDCARD.to_string(),
            description: description.into(),
            dynamic: true,
        }
    }

    /// Copy of this element with its wildcard replaced by a concrete value.
    pub fn resolved(&self, value: impl Into<String>) -> Self {
        Self {
            name: self.name.clone(),
            value: value.into(),
            description: self.description.clone(),
            dynamic: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct NamespacePattern(Vec<NamespaceElement>);

impl NamespacePattern {
    pub fn new(values: &[&str]) -> Self {
        Self(values.iter().map(|v| NamespaceElement::fixed(*v)).collect())
    }

    pub fn from_elements(elements: Vec<NamespaceElement>) -> Self {
        Self(elements)
    }

    pub fn add_dynamic_element(mut self, name: &str, description: &str) -> Self {
        self.0.push(NamespaceElement::wildcard(name, description));
        self
    }

    pub fn add_static_elements(mut self, values: &[&str]) -> Self {
        self.0.extend(values.iter().map(|v| NamespaceElement::fixed(*v)));
        self
    }

    pub fn elements(&self) -> &[NamespaceElement] {
        &self.0
    }

    pub fn get(&self, index: usize) -> Option<&NamespaceElement> {
        self.0.get(index)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_dynamic(&self) -> bool {
        self.0.iter().any(|e| e.dynamic)
    }

    pub fn is_dynamic_at(&self, index: usize) -> bool {
        self.0.get(index).is_some_and(|e| e.dynamic)
    }

    /// Copy of the pattern with the element at `index` filled in.
    pub fn with_value(&self, index: usize, value: impl Into<String>) -> Self {
        let mut elements = self.0.clone();
        if let Some(element) = elements.get_mut(index) {
            *element = element.resolved(value);
        }
        Self(elements)
    }
}

impl fmt::Display for NamespacePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for element in &self.0 {
            write!(f, "/{}", element.value)?;
        }
        Ok(())
    }
}

/// A discoverable pattern together with what it measures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricType {
    pub namespace: NamespacePattern,
    pub description: String,
    pub unit: String,
}

pub struct NamespaceBuilder;

impl NamespaceBuilder {
    /// All patterns a host may request, metrics first and then states.
    pub fn produce() -> Vec<NamespacePattern> {
        Self::metric_types()
            .into_iter()
            .map(|t| t.namespace)
            .collect()
    }

    pub fn metric_types() -> Vec<MetricType> {
        let mut types = Vec::with_capacity(METRICS.len() + ProcessState::ALL.len());

        for metric in METRICS {
            types.push(MetricType {
                namespace: Self::process_pattern(metric.name),
                description: metric.description.to_string(),
                unit: metric.unit.to_string(),
            });
        }

        for state in ProcessState::ALL {
            types.push(MetricType {
                namespace: Self::state_pattern(state.name()),
                description: state.description(),
                unit: String::new(),
            });
        }

        types
    }

    pub fn process_pattern(metric: &str) -> NamespacePattern {
        NamespacePattern::new(&[VENDOR, FS, PLUGIN_NAME, "pid"])
            .add_dynamic_element("process_id", "pid of the running process")
            .add_dynamic_element("process_name", "name of the running process")
            .add_static_elements(&[metric])
    }

    pub fn state_pattern(state: &str) -> NamespacePattern {
        NamespacePattern::new(&[VENDOR, FS, PLUGIN_NAME, state])
    }
}
