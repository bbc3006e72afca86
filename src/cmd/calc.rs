//! Calc command - month-by-month take-home table

use crate::cmd::SalaryArgs;
use crate::core::{CalculationResult, MonthRecord, Policy};
use crate::utils::{format_amount, format_cny, format_cny_dp, format_rate, write_csv};
use clap::Args;
use salc_derive::CsvColumns;
use serde::Serialize;
use std::io;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct CalcCommand {
    #[command(flatten)]
    salary: SalaryArgs,

    /// Include cumulative taxable income, tax due and marginal rate
    #[arg(long)]
    detailed: bool,

    /// Output as CSV instead of formatted table
    #[arg(long)]
    csv: bool,
}

impl CalcCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let policy = Policy::shanghai_2025();
        let result = self.salary.calculate(&policy)?;

        match (self.csv, self.detailed) {
            (true, false) => write_csv(month_rows(&result), io::stdout()),
            (true, true) => write_csv(detailed_rows(&result), io::stdout()),
            (false, detailed) => {
                print_headline(&result, &policy);
                let mut table = if detailed {
                    Table::new(detailed_rows(&result))
                } else {
                    Table::new(month_rows(&result))
                };
                table
                    .with(Style::rounded())
                    .with(Modify::new(Rows::new(1..)).with(Alignment::right()));
                println!("{}", table);
                Ok(())
            }
        }
    }
}

/// Row of the monthly table
#[derive(Debug, Clone, Tabled, Serialize, CsvColumns)]
pub struct MonthRow {
    /// Month of the withholding year (1-12)
    #[tabled(rename = "Month")]
    pub month: u32,

    /// Gross salary for the month
    #[tabled(rename = "Gross")]
    pub gross_salary: String,

    /// Social insurance and housing fund (employee share)
    #[tabled(rename = "Insurance + Fund")]
    pub fixed_deduction: String,

    /// Income tax withheld this month
    #[tabled(rename = "Tax")]
    pub tax: String,

    /// Cash received after contributions and tax
    #[tabled(rename = "Take-Home")]
    pub take_home: String,
}

/// Row of the detailed monthly table
#[derive(Debug, Clone, Tabled, Serialize, CsvColumns)]
pub struct DetailedMonthRow {
    /// Month of the withholding year (1-12)
    #[tabled(rename = "Month")]
    pub month: u32,

    /// Gross salary for the month
    #[tabled(rename = "Gross")]
    pub gross_salary: String,

    /// Social insurance and housing fund (employee share)
    #[tabled(rename = "Insurance + Fund")]
    pub fixed_deduction: String,

    /// Year-to-date taxable income
    #[tabled(rename = "Cum. Taxable")]
    pub cumulative_taxable: String,

    /// Rate of the bracket the year-to-date income falls in
    #[tabled(rename = "Rate")]
    pub marginal_rate: String,

    /// Year-to-date tax due before subtracting earlier withholding
    #[tabled(rename = "Cum. Tax Due")]
    pub cumulative_tax_due: String,

    /// Income tax withheld this month
    #[tabled(rename = "Tax")]
    pub tax: String,

    /// Cash received after contributions and tax
    #[tabled(rename = "Take-Home")]
    pub take_home: String,
}

impl From<&MonthRecord> for MonthRow {
    fn from(record: &MonthRecord) -> Self {
        let m = record.rounded();
        MonthRow {
            month: m.month,
            gross_salary: format_amount(m.gross_salary),
            fixed_deduction: format_amount(m.fixed_deduction),
            tax: format_amount(m.tax),
            take_home: format_amount(m.take_home),
        }
    }
}

impl From<&MonthRecord> for DetailedMonthRow {
    fn from(record: &MonthRecord) -> Self {
        let m = record.rounded();
        DetailedMonthRow {
            month: m.month,
            gross_salary: format_amount(m.gross_salary),
            fixed_deduction: format_amount(m.fixed_deduction),
            cumulative_taxable: format_amount(m.cumulative_taxable),
            marginal_rate: format_rate(m.marginal_rate),
            cumulative_tax_due: format_amount(m.cumulative_tax_due),
            tax: format_amount(m.tax),
            take_home: format_amount(m.take_home),
        }
    }
}

pub fn month_rows(result: &CalculationResult) -> Vec<MonthRow> {
    result.months.iter().map(MonthRow::from).collect()
}

pub fn detailed_rows(result: &CalculationResult) -> Vec<DetailedMonthRow> {
    result.months.iter().map(DetailedMonthRow::from).collect()
}

fn print_headline(result: &CalculationResult, policy: &Policy) {
    println!();
    println!("{} TAKE-HOME SALARY ({})", policy.region.to_uppercase(), policy.period());
    println!();
    println!("  Annual take-home:    {:>16}", format_cny(result.annual_take_home()));
    println!("  Annual income tax:   {:>16}", format_cny(result.total_tax));
    println!(
        "  Contribution base:   {:>16}",
        format_cny_dp(result.social_insurance_base, 0)
    );
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::compute;
    use rust_decimal_macros::dec;

    #[test]
    fn rows_are_rounded_for_display() {
        let result = compute(dec!(65000), dec!(7), dec!(0));
        let rows = month_rows(&result);

        assert_eq!(rows.len(), 12);
        assert_eq!(rows[0].month, 1);
        assert_eq!(rows[0].gross_salary, "65000.00");
        assert_eq!(rows[0].fixed_deduction, "6527.85");
        assert_eq!(rows[0].tax, "2827.22");
        assert_eq!(rows[0].take_home, "55644.94");
        assert_eq!(rows[11].tax, "16041.64");
    }

    #[test]
    fn detailed_rows_show_bracket_progress() {
        let result = compute(dec!(65000), dec!(7), dec!(0));
        let rows = detailed_rows(&result);

        assert_eq!(rows[0].cumulative_taxable, "53472.15");
        assert_eq!(rows[0].marginal_rate, "10%");
        assert_eq!(rows[11].marginal_rate, "30%");
        assert_eq!(rows[11].cumulative_tax_due, "139579.74");
    }

    #[test]
    fn csv_output_has_header_and_twelve_rows() {
        let result = compute(dec!(10000), dec!(5), dec!(1000));
        let mut out = Vec::new();
        write_csv(month_rows(&result), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines.len(), 13);
        assert_eq!(lines[0], "month,gross_salary,fixed_deduction,tax,take_home");
        assert_eq!(lines[1], "1,10000.00,1550.00,73.50,8376.50");
    }

    #[test]
    fn month_row_columns() {
        let names: Vec<_> = MonthRow::csv_columns().iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["month", "gross_salary", "fixed_deduction", "tax", "take_home"]);
    }
}
