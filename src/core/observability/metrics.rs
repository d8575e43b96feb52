//! Metrics collection and export

use super::histogram::BoundedHistogram;
use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// How a call through the chain ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallOutcome {
    Success { tokens: i64, amount: i64 },
    /// Failed with the given error code
    Error(&'static str),
    /// The inner chain panicked
    Panic,
}

impl CallOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Success { .. } => "success",
            Self::Error(_) => "error",
            Self::Panic => "panic",
        }
    }
}

/// Raw per-business metrics
#[derive(Debug, Default)]
pub struct DispatchMetrics {
    pub request_total: HashMap<String, u64>,
    pub request_duration: HashMap<String, BoundedHistogram>,
    /// Keyed by `biz:error_code`
    pub error_total: HashMap<String, u64>,
    pub panic_total: HashMap<String, u64>,
    pub token_total: HashMap<String, i64>,
    pub amount_total: HashMap<String, i64>,
}

/// Aggregated view of one business key
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BizStats {
    pub requests: u64,
    pub errors: u64,
    pub panics: u64,
    pub tokens: i64,
    pub amount: i64,
    pub mean_ms: f64,
    pub p95_ms: f64,
}

/// Metrics collector shared by every observability handler
#[derive(Debug, Clone, Default)]
pub struct MetricsCollector {
    metrics: Arc<RwLock<DispatchMetrics>>,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn record_request(&self, biz: &str, duration: Duration, outcome: CallOutcome) {
        let mut metrics = self.metrics.write().await;

        *metrics.request_total.entry(biz.to_string()).or_insert(0) += 1;
        metrics
            .request_duration
            .entry(biz.to_string())
            .or_default()
            .record(duration);

        match outcome {
            CallOutcome::Success { tokens, amount } => {
                *metrics.token_total.entry(biz.to_string()).or_insert(0) += tokens;
                *metrics.amount_total.entry(biz.to_string()).or_insert(0) += amount;
            }
            CallOutcome::Error(code) => {
                *metrics
                    .error_total
                    .entry(format!("{}:{}", biz, code))
                    .or_insert(0) += 1;
            }
            CallOutcome::Panic => {
                *metrics.panic_total.entry(biz.to_string()).or_insert(0) += 1;
            }
        }
    }

    pub async fn stats(&self, biz: &str) -> BizStats {
        let metrics = self.metrics.read().await;
        let prefix = format!("{}:", biz);
        let (mean_ms, p95_ms) = metrics
            .request_duration
            .get(biz)
            .map(|h| (h.mean_ms(), h.percentile_ms(95.0)))
            .unwrap_or_default();

        BizStats {
            requests: metrics.request_total.get(biz).copied().unwrap_or(0),
            errors: metrics
                .error_total
                .iter()
                .filter(|(key, _)| key.starts_with(&prefix))
                .map(|(_, count)| *count)
                .sum(),
            panics: metrics.panic_total.get(biz).copied().unwrap_or(0),
            tokens: metrics.token_total.get(biz).copied().unwrap_or(0),
            amount: metrics.amount_total.get(biz).copied().unwrap_or(0),
            mean_ms,
            p95_ms,
        }
    }

    /// Export metrics in the Prometheus text format
    pub async fn export_prometheus(&self) -> String {
        let metrics = self.metrics.read().await;
        let mut output = String::new();

        output.push_str("# HELP llm_dispatch_requests_total Total number of dispatched requests\n");
        output.push_str("# TYPE llm_dispatch_requests_total counter\n");
        for (biz, value) in sorted(&metrics.request_total) {
            let _ = writeln!(output, "llm_dispatch_requests_total{{biz=\"{}\"}} {}", biz, value);
        }

        output.push_str("# HELP llm_dispatch_errors_total Total number of failed requests\n");
        output.push_str("# TYPE llm_dispatch_errors_total counter\n");
        for (key, value) in sorted(&metrics.error_total) {
            if let Some((biz, code)) = key.split_once(':') {
                let _ = writeln!(
                    output,
                    "llm_dispatch_errors_total{{biz=\"{}\",code=\"{}\"}} {}",
                    biz, code, value
                );
            }
        }

        output.push_str("# HELP llm_dispatch_tokens_total Tokens consumed by successful requests\n");
        output.push_str("# TYPE llm_dispatch_tokens_total counter\n");
        for (biz, value) in sorted(&metrics.token_total) {
            let _ = writeln!(output, "llm_dispatch_tokens_total{{biz=\"{}\"}} {}", biz, value);
        }

        output.push_str("# HELP llm_dispatch_amount_total Amount charged for successful requests\n");
        output.push_str("# TYPE llm_dispatch_amount_total counter\n");
        for (biz, value) in sorted(&metrics.amount_total) {
            let _ = writeln!(output, "llm_dispatch_amount_total{{biz=\"{}\"}} {}", biz, value);
        }

        output.push_str("# HELP llm_dispatch_duration_ms Request duration in milliseconds\n");
        output.push_str("# TYPE llm_dispatch_duration_ms summary\n");
        for (biz, hist) in sorted(&metrics.request_duration) {
            for quantile in [0.5, 0.95, 0.99] {
                let _ = writeln!(
                    output,
                    "llm_dispatch_duration_ms{{biz=\"{}\",quantile=\"{}\"}} {:.3}",
                    biz,
                    quantile,
                    hist.percentile_ms(quantile * 100.0)
                );
            }
            let _ = writeln!(output, "llm_dispatch_duration_ms_count{{biz=\"{}\"}} {}", biz, hist.count());
        }

        output
    }
}

fn sorted<V>(map: &HashMap<String, V>) -> Vec<(&String, &V)> {
    let mut entries: Vec<_> = map.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    entries
}
