//! Request observability
//!
//! In-process metrics fed by the observability handler.

mod histogram;
mod metrics;

pub use histogram::{BoundedHistogram, HISTOGRAM_MAX_SAMPLES};
pub use metrics::{BizStats, CallOutcome, DispatchMetrics, MetricsCollector};
