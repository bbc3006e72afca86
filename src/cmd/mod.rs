pub mod batch;
pub mod calc;
pub mod html_report;
pub mod policy;
pub mod schema;
pub mod summary;

use crate::core::{compute_with, read_inputs_csv, read_inputs_json, CalculationResult, Policy, SalaryInput};
use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// Salary inputs shared by the single-scenario commands
#[derive(Args, Debug, Clone)]
pub struct SalaryArgs {
    /// Monthly gross salary before tax (CNY)
    #[arg(short, long, default_value = "65000", allow_negative_numbers = true)]
    gross: Decimal,

    /// Housing fund contribution rate in percent (5, 6 or 7)
    #[arg(short, long, default_value = "7")]
    fund_rate: Decimal,

    /// Monthly special additional deduction (CNY)
    #[arg(short, long, default_value = "0", allow_negative_numbers = true)]
    deduction: Decimal,

    /// Accept any housing fund rate, not just the standard ones
    #[arg(long)]
    any_fund_rate: bool,
}

impl SalaryArgs {
    pub fn input(&self) -> SalaryInput {
        SalaryInput::new(self.gross, self.fund_rate, self.deduction)
    }

    /// Validate the arguments and run the calculation
    pub fn calculate(&self, policy: &Policy) -> anyhow::Result<CalculationResult> {
        let input = self.input();
        if self.any_fund_rate {
            input.validate_amounts()?;
        } else {
            input.validate(policy)?;
        }
        let result = compute_with(policy, &input);
        log_warnings(&result);
        Ok(result)
    }
}

pub fn log_warnings(result: &CalculationResult) {
    let label = result.input.label.as_deref().unwrap_or("input");
    for warning in &result.warnings {
        log::warn!("{}: {}", label, warning);
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum InputFormat {
    Csv,
    Json,
}

impl InputFormat {
    /// Guess from the file extension, defaulting to CSV
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => InputFormat::Json,
            _ => InputFormat::Csv,
        }
    }
}

/// Read salary scenarios from a file (or stdin with "-")
pub fn read_inputs(path: &Path, format: Option<InputFormat>) -> anyhow::Result<Vec<SalaryInput>> {
    let format = format.unwrap_or_else(|| InputFormat::from_path(path));
    if path.as_os_str() == "-" {
        read_from_stdin(format)
    } else {
        read_from_file(path, format)
    }
}

fn read_from_file(path: &Path, format: InputFormat) -> anyhow::Result<Vec<SalaryInput>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    parse_inputs(reader, format)
}

fn read_from_stdin(format: InputFormat) -> anyhow::Result<Vec<SalaryInput>> {
    let stdin = io::stdin();
    let mut reader = BufReader::new(stdin.lock());

    let mut buffer = Vec::new();
    reader.read_to_end(&mut buffer)?;

    if buffer.is_empty() {
        anyhow::bail!("No input received. Provide a file or pipe data to stdin.");
    }

    parse_inputs(io::Cursor::new(buffer), format)
}

fn parse_inputs<R: Read>(reader: R, format: InputFormat) -> anyhow::Result<Vec<SalaryInput>> {
    let inputs = match format {
        InputFormat::Csv => read_inputs_csv(reader)?,
        InputFormat::Json => read_inputs_json(reader)?,
    };
    Ok(inputs)
}
