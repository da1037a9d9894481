use std::io::Write;

use pdrdb_core::OutputFormat;
use prettytable::{Cell, Row, Table};

use crate::{error::CliError, executor::QueryResult};

const NULL_DISPLAY: &str = "NULL";

pub struct ResultFormatter {
    format: OutputFormat,
}

impl ResultFormatter {
    pub fn with_format(format: OutputFormat) -> Self {
        ResultFormatter { format }
    }

    /// Whether `write_result` prints anything for this result.
    ///
    /// CSV and TSV stay silent for statements without a result set.
    pub fn writes_output(&self, result: &QueryResult) -> bool {
        match self.format {
            OutputFormat::Table => true,
            OutputFormat::Csv | OutputFormat::Tsv => result.has_columns(),
        }
    }

    pub fn write_result<W: Write + ?Sized>(
        &self,
        out: &mut W,
        result: &QueryResult,
    ) -> Result<(), CliError> {
        match self.format {
            OutputFormat::Table => self.write_table(out, result),
            OutputFormat::Csv => self.write_delimited(out, result, b','),
            OutputFormat::Tsv => self.write_delimited(out, result, b'\t'),
        }
    }

    fn write_table<W: Write + ?Sized>(
        &self,
        out: &mut W,
        result: &QueryResult,
    ) -> Result<(), CliError> {
        if !result.has_columns() {
            let affected = result.rows_affected;
            writeln!(out, "{} {} affected", affected, plural_rows(affected))?;
            return Ok(());
        }

        let mut table = Table::new();
        table.set_titles(Row::new(result.columns.iter().map(|col| Cell::new(col)).collect()));

        for row in &result.rows {
            let cells: Vec<Cell> =
                row.iter().map(|val| Cell::new(val.as_deref().unwrap_or(NULL_DISPLAY))).collect();
            table.add_row(Row::new(cells));
        }

        table.print(out)?;
        let count = result.row_count() as u64;
        writeln!(out, "({} {})", count, plural_rows(count))?;
        Ok(())
    }

    /// CSV or TSV with a header row; NULL becomes an empty field.
    fn write_delimited<W: Write + ?Sized>(
        &self,
        out: &mut W,
        result: &QueryResult,
        delimiter: u8,
    ) -> Result<(), CliError> {
        if !result.has_columns() {
            return Ok(());
        }

        let mut writer = csv::WriterBuilder::new().delimiter(delimiter).from_writer(out);
        writer.write_record(&result.columns)?;
        for row in &result.rows {
            writer.write_record(row.iter().map(|val| val.as_deref().unwrap_or_default()))?;
        }
        writer.flush()?;
        Ok(())
    }
}

fn plural_rows(count: u64) -> &'static str {
    if count == 1 {
        "row"
    } else {
        "rows"
    }
}
