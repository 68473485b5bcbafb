//! Metrics helper structs for convenient metric recording

use std::time::Duration;

use prometheus::{Encoder, TextEncoder};

use crate::template::FillReport;

use super::{
    FILL_DURATION, FILL_REQUESTS_TOTAL, QUALITY_TABLES_EXTENDED_TOTAL, TABLES_REBUILT_TOTAL,
    TOKENS_REPLACED_TOTAL,
};

/// Encode all metrics to Prometheus text format
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer).unwrap_or_default())
}

/// Helper struct for recording fill metrics
pub struct FillMetrics;

impl FillMetrics {
    /// Record a successful fill and what it changed
    pub fn record_success(report: &FillReport, elapsed: Duration) {
        FILL_REQUESTS_TOTAL.with_label_values(&["success"]).inc();
        FILL_DURATION.observe(elapsed.as_secs_f64());
        TOKENS_REPLACED_TOTAL.inc_by(report.tokens_replaced as u64);
        TABLES_REBUILT_TOTAL
            .with_label_values(&["generic"])
            .inc_by(report.generic_tables_rebuilt as u64);
        TABLES_REBUILT_TOTAL
            .with_label_values(&["financial"])
            .inc_by(report.financial_tables_rebuilt as u64);
        if report.quality_table.is_some() {
            QUALITY_TABLES_EXTENDED_TOTAL.inc();
        }
    }

    /// Record a request rejected for bad input
    pub fn record_client_error() {
        FILL_REQUESTS_TOTAL.with_label_values(&["client_error"]).inc();
    }

    /// Record a request that failed while filling
    pub fn record_server_error() {
        FILL_REQUESTS_TOTAL.with_label_values(&["server_error"]).inc();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_success() {
        let report = FillReport {
            tokens_replaced: 3,
            generic_tables_rebuilt: 1,
            ..Default::default()
        };
        let before = TOKENS_REPLACED_TOTAL.get();
        FillMetrics::record_success(&report, Duration::from_millis(20));
        assert!(TOKENS_REPLACED_TOTAL.get() >= before + 3);
    }

    #[test]
    fn test_record_errors() {
        let before = FILL_REQUESTS_TOTAL
            .with_label_values(&["client_error"])
            .get();
        FillMetrics::record_client_error();
        FillMetrics::record_server_error();
        assert!(
            FILL_REQUESTS_TOTAL
                .with_label_values(&["client_error"])
                .get()
                > before
        );
    }
}
