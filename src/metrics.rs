//! Prometheus metrics and tracing spans for statement execution.
//!
//! Both halves are feature-gated: `metrics` pulls in the OpenTelemetry/Prometheus stack,
//! `tracing` adds spans around connects and statements.

#[cfg(feature = "metrics")]
pub use self::prometheus_metrics::{LifebuoyMetrics, METRICS};

#[cfg(feature = "metrics")]
mod prometheus_metrics {
    use once_cell::sync::Lazy;
    use opentelemetry::metrics::{Counter, Histogram, MeterProvider};
    use opentelemetry_sdk::metrics::SdkMeterProvider;
    use prometheus::{Encoder, Registry, TextEncoder};
    use std::time::Duration;

    pub static METRICS: Lazy<LifebuoyMetrics> = Lazy::new(LifebuoyMetrics::init);

    pub struct LifebuoyMetrics {
        registry: Registry,
        // Dropping the provider stops collection
        _provider: SdkMeterProvider,
        pub queries_total: Counter<u64>,
        pub query_errors_total: Counter<u64>,
        pub query_duration: Histogram<f64>,
        pub rows_streamed_total: Counter<u64>,
    }

    impl LifebuoyMetrics {
        pub fn init() -> Self {
            let registry = Registry::new();
            let provider = match opentelemetry_prometheus::exporter()
                .with_registry(registry.clone())
                .build()
            {
                Ok(exporter) => SdkMeterProvider::builder().with_reader(exporter).build(),
                Err(e) => {
                    log::warn!("prometheus exporter unavailable, metrics disabled: {e}");
                    SdkMeterProvider::builder().build()
                }
            };
            let meter = provider.meter("lifebuoy");

            let queries_total = meter
                .u64_counter("lifebuoy_queries_total")
                .with_description("Total statements executed")
                .build();

            let query_errors_total = meter
                .u64_counter("lifebuoy_query_errors_total")
                .with_description("Statements that failed in the database")
                .build();

            let query_duration = meter
                .f64_histogram("lifebuoy_query_duration_seconds")
                .with_description("Duration of statement execution")
                .build();

            let rows_streamed_total = meter
                .u64_counter("lifebuoy_rows_streamed_total")
                .with_description("Rows pulled from result sequences")
                .build();

            Self {
                registry,
                _provider: provider,
                queries_total,
                query_errors_total,
                query_duration,
                rows_streamed_total,
            }
        }

        pub fn record_query_duration(&self, elapsed: Duration) {
            self.queries_total.add(1, &[]);
            self.query_duration.record(elapsed.as_secs_f64(), &[]);
        }

        pub fn record_query_error(&self) {
            self.query_errors_total.add(1, &[]);
        }

        pub fn record_rows_streamed(&self, rows: u64) {
            self.rows_streamed_total.add(rows, &[]);
        }

        /// Current metrics in the Prometheus text exposition format.
        pub fn render(&self) -> String {
            let mut buffer = Vec::new();
            if let Err(e) = TextEncoder::new().encode(&self.registry.gather(), &mut buffer) {
                log::warn!("failed to encode metrics: {e}");
            }
            String::from_utf8_lossy(&buffer).into_owned()
        }
    }

}

#[cfg(feature = "tracing")]
pub mod tracing_helpers {
    use tracing::{info_span, Span};

    /// Span around one statement execution.
    pub fn execute_query_span(sql: &str) -> Span {
        info_span!(
            "lifebuoy.execute_query",
            db.system = "postgresql",
            db.statement = %sql
        )
    }

    /// Span around opening a connection.
    pub fn acquire_connection_span() -> Span {
        info_span!("lifebuoy.connect", db.system = "postgresql")
    }
}
