//! Batch command - annual totals for many salary scenarios at once

use crate::cmd::{log_warnings, read_inputs, InputFormat};
use crate::core::{compute_with, validate_all, CalculationResult, Policy, MONTHS};
use crate::utils::{format_amount, write_csv};
use clap::Args;
use rust_decimal::Decimal;
use salc_derive::CsvColumns;
use serde::Serialize;
use std::io;
use std::path::PathBuf;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct BatchCommand {
    /// CSV or JSON file of salary scenarios ("-" for stdin)
    #[arg(short, long)]
    inputs: PathBuf,

    /// Input format (default: from the file extension, CSV otherwise)
    #[arg(long, value_enum)]
    format: Option<InputFormat>,

    /// Accept any housing fund rate, not just the standard ones
    #[arg(long)]
    any_fund_rate: bool,

    /// Output as CSV instead of formatted table
    #[arg(long)]
    csv: bool,
}

impl BatchCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let policy = Policy::shanghai_2025();
        let inputs = read_inputs(&self.inputs, self.format)?;
        validate_all(&inputs, &policy, self.any_fund_rate)?;

        let rows: Vec<BatchRow> = inputs
            .iter()
            .enumerate()
            .map(|(i, input)| {
                let result = compute_with(&policy, input);
                log_warnings(&result);
                BatchRow::new(i + 1, &result)
            })
            .collect();

        if self.csv {
            write_csv(&rows, io::stdout())
        } else {
            if rows.is_empty() {
                println!("No salary scenarios found");
                return Ok(());
            }
            let table = Table::new(&rows)
                .with(Style::rounded())
                .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
                .to_string();
            println!("{}", table);
            Ok(())
        }
    }
}

/// One output row per salary scenario
#[derive(Debug, Clone, Tabled, Serialize, CsvColumns)]
pub struct BatchRow {
    /// Scenario label, or its row number when unlabelled
    #[tabled(rename = "Scenario")]
    pub label: String,

    /// Monthly gross salary
    #[tabled(rename = "Gross")]
    pub gross_salary: String,

    /// Housing fund rate in percent
    #[tabled(rename = "Fund %")]
    pub fund_rate: String,

    /// Monthly special additional deduction
    #[tabled(rename = "Deduction")]
    pub special_deduction: String,

    /// Social insurance contribution base
    #[tabled(rename = "Base")]
    pub social_insurance_base: String,

    /// Monthly social insurance and housing fund
    #[tabled(rename = "Insurance + Fund")]
    pub fixed_deduction: String,

    /// Income tax withheld over the year
    #[tabled(rename = "Annual Tax")]
    pub annual_tax: String,

    /// Cash received over the year
    #[tabled(rename = "Annual Take-Home")]
    pub annual_take_home: String,

    /// Average monthly take-home
    #[tabled(rename = "Avg Monthly")]
    pub average_monthly_take_home: String,

    /// Number of warnings raised for the scenario
    #[tabled(rename = "Warnings")]
    pub warnings: usize,
}

impl BatchRow {
    pub fn new(row: usize, result: &CalculationResult) -> Self {
        let input = &result.input;
        let annual_take_home = result.annual_take_home();
        BatchRow {
            label: input
                .label
                .clone()
                .unwrap_or_else(|| format!("#{}", row)),
            gross_salary: format_amount(input.gross_salary),
            fund_rate: input.fund_rate.normalize().to_string(),
            special_deduction: format_amount(input.special_deduction),
            social_insurance_base: format_amount(result.social_insurance_base),
            fixed_deduction: format_amount(result.fixed_monthly_deduction()),
            annual_tax: format_amount(result.total_tax),
            annual_take_home: format_amount(annual_take_home),
            average_monthly_take_home: format_amount(annual_take_home / Decimal::from(MONTHS)),
            warnings: result.warnings.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{read_inputs_csv, SalaryInput};
    use rust_decimal_macros::dec;

    #[test]
    fn rows_summarise_each_scenario() {
        let policy = Policy::shanghai_2025();
        let data = "label,gross_salary,fund_rate,special_deduction\nsenior,65000,7,0\n,20000,6,2000\n";
        let inputs = read_inputs_csv(data.as_bytes()).unwrap();
        let rows: Vec<_> = inputs
            .iter()
            .enumerate()
            .map(|(i, input)| BatchRow::new(i + 1, &compute_with(&policy, input)))
            .collect();

        assert_eq!(rows[0].label, "senior");
        assert_eq!(rows[0].social_insurance_base, "37302.00");
        assert_eq!(rows[0].annual_tax, "139579.74");
        assert_eq!(rows[0].warnings, 1);
        assert_eq!(rows[1].label, "#2");
        assert_eq!(rows[1].fixed_deduction, "3300.00");
        assert_eq!(rows[1].annual_take_home, "191280.00");
        assert_eq!(rows[1].average_monthly_take_home, "15940.00");
        assert_eq!(rows[1].warnings, 0);
    }

    #[test]
    fn labelled_input_keeps_label() {
        let policy = Policy::shanghai_2025();
        let input = SalaryInput {
            label: Some("junior".to_string()),
            ..SalaryInput::new(dec!(12000), dec!(5), dec!(0))
        };
        let row = BatchRow::new(7, &compute_with(&policy, &input));
        assert_eq!(row.label, "junior");
        assert_eq!(row.fund_rate, "5");
    }
}
