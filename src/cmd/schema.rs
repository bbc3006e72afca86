//! Schema command - print expected input and output formats

use crate::cmd::batch::BatchRow;
use crate::cmd::calc::{DetailedMonthRow, MonthRow};
use crate::core::{CsvColumn, SalaryInput};
use clap::Args;
use schemars::schema_for;

#[derive(Args, Debug)]
pub struct SchemaCommand {
    /// Output format: json-schema, csv-header, csv-fields or output-fields
    #[arg(value_enum, default_value = "json-schema")]
    format: SchemaFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SchemaFormat {
    /// JSON Schema for a batch input record
    JsonSchema,
    /// CSV header row for batch input
    CsvHeader,
    /// Batch input column descriptions
    CsvFields,
    /// Column descriptions of the CSV outputs
    OutputFields,
}

impl SchemaCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        match self.format {
            SchemaFormat::JsonSchema => self.print_json_schema(),
            SchemaFormat::CsvHeader => self.print_csv_header(),
            SchemaFormat::CsvFields => self.print_csv_fields(),
            SchemaFormat::OutputFields => self.print_output_fields(),
        }
    }

    fn print_json_schema(&self) -> anyhow::Result<()> {
        let schema = schema_for!(Vec<SalaryInput>);
        println!("{}", serde_json::to_string_pretty(&schema)?);
        Ok(())
    }

    fn print_csv_header(&self) -> anyhow::Result<()> {
        println!("{}", csv_header(SalaryInput::csv_columns()));
        Ok(())
    }

    fn print_csv_fields(&self) -> anyhow::Result<()> {
        print_columns("CSV Input Format (batch)", SalaryInput::csv_columns());
        println!("Amounts are CNY per month; fund_rate is a percentage.");
        Ok(())
    }

    fn print_output_fields(&self) -> anyhow::Result<()> {
        print_columns("calc --csv", MonthRow::csv_columns());
        print_columns("calc --csv --detailed", DetailedMonthRow::csv_columns());
        print_columns("batch --csv", BatchRow::csv_columns());
        Ok(())
    }
}

fn csv_header(columns: &[CsvColumn]) -> String {
    columns
        .iter()
        .map(|c| c.name)
        .collect::<Vec<_>>()
        .join(",")
}

fn print_columns(title: &str, columns: &[CsvColumn]) {
    println!("{}", title);
    println!("{}", "=".repeat(title.chars().count()));
    println!();
    for column in columns {
        let req = if column.required { "required" } else { "optional" };
        println!("{:28} ({:8})  {}", column.name, req, column.description);
    }
    println!();
}
