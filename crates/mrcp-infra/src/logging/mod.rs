pub mod context;
pub mod metrics;
pub mod setup;

pub use context::LogContext;
pub use metrics::{Metric, MetricType, MetricsCollector, TimerGuard};
pub use setup::{setup_logging, parse_log_level, log_welcome, LoggingConfig};
