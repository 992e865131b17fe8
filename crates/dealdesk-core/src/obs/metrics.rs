use crate::{
    executor::{OperationKind, OutcomeStatus},
    obs::MetricsEvent,
};
use serde::Serialize;
use std::{cell::RefCell, collections::BTreeMap};

thread_local! {
    static STATE: RefCell<EventReport> = RefCell::new(EventReport::default());
}

pub(super) fn with_state_mut<R>(f: impl FnOnce(&mut EventReport) -> R) -> R {
    STATE.with(|state| f(&mut state.borrow_mut()))
}

/// Snapshot of the current thread's counters.
#[must_use]
pub fn metrics_report() -> EventReport {
    STATE.with(|state| state.borrow().clone())
}

pub fn metrics_reset_all() {
    with_state_mut(|state| *state = EventReport::default());
}

///
/// EventReport
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct EventReport {
    pub ops: OperationCounters,
    pub tables: BTreeMap<String, TableCounters>,
}

impl EventReport {
    pub(super) fn apply(&mut self, event: MetricsEvent<'_>) {
        match event {
            MetricsEvent::OperationStart { kind, table } => {
                let entry = self.tables.entry(table.to_string()).or_default();
                match kind {
                    OperationKind::Insert => {
                        self.ops.insert_calls = self.ops.insert_calls.saturating_add(1);
                        entry.insert_calls = entry.insert_calls.saturating_add(1);
                    }
                    OperationKind::Delete => {
                        self.ops.delete_calls = self.ops.delete_calls.saturating_add(1);
                        entry.delete_calls = entry.delete_calls.saturating_add(1);
                    }
                }
            }

            MetricsEvent::ValidationRejected { table, .. } => {
                self.ops.validation_rejects = self.ops.validation_rejects.saturating_add(1);
                let entry = self.tables.entry(table.to_string()).or_default();
                entry.validation_rejects = entry.validation_rejects.saturating_add(1);
            }

            MetricsEvent::Cancelled { .. } => {
                self.ops.cancelled = self.ops.cancelled.saturating_add(1);
            }

            MetricsEvent::OperationFinish {
                kind,
                table,
                status,
                rows_affected,
            } => {
                let entry = self.tables.entry(table.to_string()).or_default();
                match status {
                    OutcomeStatus::Failed => {
                        self.ops.failed = self.ops.failed.saturating_add(1);
                        entry.failed = entry.failed.saturating_add(1);
                    }
                    OutcomeStatus::NoMatchingRows => {
                        self.ops.no_match = self.ops.no_match.saturating_add(1);
                    }
                    OutcomeStatus::Applied => {}
                }
                match kind {
                    OperationKind::Insert => {
                        self.ops.rows_inserted = self.ops.rows_inserted.saturating_add(rows_affected);
                        entry.rows_inserted = entry.rows_inserted.saturating_add(rows_affected);
                    }
                    OperationKind::Delete => {
                        self.ops.rows_deleted = self.ops.rows_deleted.saturating_add(rows_affected);
                        entry.rows_deleted = entry.rows_deleted.saturating_add(rows_affected);
                    }
                }
            }
        }
    }
}

///
/// OperationCounters
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct OperationCounters {
    pub insert_calls: u64,
    pub delete_calls: u64,
    pub rows_inserted: u64,
    pub rows_deleted: u64,
    pub validation_rejects: u64,
    pub cancelled: u64,
    pub no_match: u64,
    pub failed: u64,
}

///
/// TableCounters
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct TableCounters {
    pub insert_calls: u64,
    pub delete_calls: u64,
    pub rows_inserted: u64,
    pub rows_deleted: u64,
    pub validation_rejects: u64,
    pub failed: u64,
}
