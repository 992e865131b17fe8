//! Rendering of tables, columns, outcomes and metrics for the terminal.
//! Every renderer returns the full text; callers decide where it goes.


use crate::error::CliError;
use dealdesk_config::OutputFormat;
use dealdesk_core::{
    executor::ExecutionOutcome,
    obs::EventReport,
    schema::{ColumnSpec, TableName},
};
use serde::Serialize;

///
/// Output
///

#[derive(Clone, Copy, Debug)]
pub struct Output {
    format: OutputFormat,
}

impl Output {
    #[must_use]
    pub const fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    #[must_use]
    pub const fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn tables(&self, tables: &[TableName]) -> Result<String, CliError> {
        if self.format == OutputFormat::Json {
            return json(tables);
        }
        if tables.is_empty() {
            return Ok("No tables found in the database.".to_string());
        }

        let mut out = String::from("Tables:");
        for (i, table) in tables.iter().enumerate() {
            out.push_str(&format!("\n  {}. {table}", i + 1));
        }

        Ok(out)
    }

    pub fn columns(&self, table: &TableName, columns: &[ColumnSpec]) -> Result<String, CliError> {
        if self.format == OutputFormat::Json {
            return json(&TableView { table, columns });
        }

        let name_width = columns
            .iter()
            .map(|c| c.name().len())
            .max()
            .unwrap_or_default();
        let type_width = columns
            .iter()
            .map(|c| c.declared_type().len())
            .max()
            .unwrap_or_default();

        let mut out = format!("Columns of `{table}`:");
        for column in columns {
            let kind = column
                .kind()
                .map_or_else(|| "unsupported".to_string(), |kind| kind.to_string());

            let mut flags = vec![kind];
            if column.is_auto_generated() {
                flags.push("auto".to_string());
            }
            if column.is_nullable() {
                flags.push("nullable".to_string());
            }
            if column.is_identity_like() {
                flags.push("identity".to_string());
            }

            out.push_str(&format!(
                "\n  {:<name_width$}  {:<type_width$}  {}",
                column.name().as_str(),
                column.declared_type(),
                flags.join(", ")
            ));
        }

        Ok(out)
    }

    pub fn outcome(&self, outcome: &ExecutionOutcome) -> Result<String, CliError> {
        match self.format {
            OutputFormat::Json => json(outcome),
            OutputFormat::Text => Ok(outcome.summary()),
        }
    }

    pub fn report(&self, report: &EventReport) -> Result<String, CliError> {
        if self.format == OutputFormat::Json {
            return json(report);
        }

        let ops = &report.ops;
        let mut out = format!(
            "inserts: {} ({} rows)\ndeletes: {} ({} rows)\nno match: {}\ncancelled: {}\nrejected inputs: {}\nfailed: {}",
            ops.insert_calls,
            ops.rows_inserted,
            ops.delete_calls,
            ops.rows_deleted,
            ops.no_match,
            ops.cancelled,
            ops.validation_rejects,
            ops.failed,
        );
        for (table, counters) in &report.tables {
            out.push_str(&format!(
                "\n  {table}: +{} -{} rejected {} failed {}",
                counters.rows_inserted,
                counters.rows_deleted,
                counters.validation_rejects,
                counters.failed
            ));
        }

        Ok(out)
    }
}

#[derive(Serialize)]
struct TableView<'a> {
    table: &'a TableName,
    columns: &'a [ColumnSpec],
}

fn json<T: Serialize + ?Sized>(value: &T) -> Result<String, CliError> {
    Ok(serde_json::to_string_pretty(value)?)
}
