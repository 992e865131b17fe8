//! Schema-driven insert/delete core for the dealdesk M&A facts store:
//! catalog introspection, type-driven coercion, parameterized statement
//! construction, and confirmed execution.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod coerce;
pub mod error;
pub mod executor;
pub mod interact;
pub mod obs;
pub mod schema;
pub mod statement;
pub mod store;

#[cfg(test)]
mod test_support;

///
/// Prelude
///
/// Vocabulary needed to run an operation end to end.
///

pub mod prelude {
    pub use crate::{
        coerce::{BooleanPolicy, TypeCoercer, Value},
        error::{Error, ErrorKind},
        executor::{Confirmation, CrudExecutor, ExecutionOutcome, OutcomeStatus, Phase},
        interact::{DriveResult, Presenter},
        schema::{ColumnKind, ColumnSpec, TableName},
        store::Store,
    };
}
