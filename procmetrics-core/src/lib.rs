pub mod aggregator;
pub mod catalog;
pub mod config;
pub mod error;
pub mod extractor;
pub mod namespace;
pub mod process;
pub mod resolver;
pub mod source;


pub use aggregator::{StateAggregator, StateCounts};
pub use catalog::{MetricDefinition, ProcessState, METRICS};
pub use config::CollectorConfig;
pub use error::{CollectError, Result};
pub use extractor::{MetricValue, ProcessMetricExtractor, ProcessMetrics};
pub use namespace::{MetricType, NamespaceBuilder, NamespaceElement, NamespacePattern};
pub use process::{ProcessDataSource, ProcessRecord};
pub use resolver::{ConcreteMetric, MetricResolver, PatternKind};
pub use source::ProcfsSource;
