//! Observability: operation counters and the sink boundary.
//!
//! Executors never touch counter state directly; all instrumentation flows
//! through [`MetricsEvent`] and a [`MetricsSink`].

mod metrics;


use crate::executor::{OperationKind, OutcomeStatus};

// re-exports
pub use metrics::{
    EventReport, OperationCounters, TableCounters, metrics_report, metrics_reset_all,
};

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug)]
pub enum MetricsEvent<'a> {
    OperationStart {
        kind: OperationKind,
        table: &'a str,
    },
    ValidationRejected {
        table: &'a str,
        column: &'a str,
    },
    Cancelled {
        kind: OperationKind,
        table: &'a str,
    },
    OperationFinish {
        kind: OperationKind,
        table: &'a str,
        status: OutcomeStatus,
        rows_affected: u64,
    },
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: MetricsEvent<'_>);
}

///
/// GlobalMetricsSink
///
/// Default process-local sink writing into the thread's counter state.
///

pub struct GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: MetricsEvent<'_>) {
        metrics::with_state_mut(|state| state.apply(event));
    }
}
