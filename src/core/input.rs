use crate::core::policy::Policy;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use salc_derive::CsvColumns;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::io::Read;

/// Column description generated by `#[derive(CsvColumns)]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvColumn {
    pub name: &'static str,
    pub required: bool,
    pub description: &'static str,
}

#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("special deduction must not be negative: {0}")]
    NegativeDeduction(Decimal),
    #[error("{field} {value} is out of range ({min} to {max})")]
    AmountOutOfRange {
        field: &'static str,
        value: Decimal,
        min: Decimal,
        max: Decimal,
    },
    #[error("unsupported housing fund rate {rate}% (expected one of {allowed})")]
    UnsupportedFundRate { rate: Decimal, allowed: String },
    #[error("row {row}: {source}")]
    InvalidRow {
        row: usize,
        #[source]
        source: Box<InputError>,
    },
    #[error("invalid CSV input: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid JSON input: {0}")]
    Json(#[from] serde_json::Error),
}

/// One salary scenario.
#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, CsvColumns,
)]
pub struct SalaryInput {
    /// Free-form name for the scenario (batch output only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Monthly salary before tax and contributions (CNY)
    #[schemars(with = "f64")]
    pub gross_salary: Decimal,
    /// Housing fund contribution rate in percent (5, 6 or 7)
    #[serde(default = "default_fund_rate")]
    #[schemars(with = "f64")]
    pub fund_rate: Decimal,
    /// Monthly special additional deduction (CNY), same every month
    #[serde(default)]
    #[schemars(with = "f64")]
    pub special_deduction: Decimal,
}

/// Largest monthly amount accepted; a year of it stays well inside `Decimal`.
pub const MAX_AMOUNT: Decimal = dec!(1000000000000000);

fn default_fund_rate() -> Decimal {
    dec!(7)
}

impl Default for SalaryInput {
    fn default() -> Self {
        SalaryInput {
            label: None,
            gross_salary: dec!(65000),
            fund_rate: default_fund_rate(),
            special_deduction: Decimal::ZERO,
        }
    }
}

impl SalaryInput {
    pub fn new(gross_salary: Decimal, fund_rate: Decimal, special_deduction: Decimal) -> Self {
        SalaryInput {
            label: None,
            gross_salary,
            fund_rate,
            special_deduction,
        }
    }

    /// Checks a caller would make before calculating.
    ///
    /// Gross salary is only range checked; non-positive salaries are
    /// computed and flagged with a warning.
    pub fn validate(&self, policy: &Policy) -> Result<(), InputError> {
        self.validate_amounts()?;
        if !policy.is_standard_fund_rate(self.fund_rate) {
            let allowed = policy
                .fund_rates
                .iter()
                .map(|r| r.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            return Err(InputError::UnsupportedFundRate {
                rate: self.fund_rate,
                allowed,
            });
        }
        Ok(())
    }

    /// Everything [`SalaryInput::validate`] checks except the standard fund rates.
    pub fn validate_amounts(&self) -> Result<(), InputError> {
        if self.special_deduction < Decimal::ZERO {
            return Err(InputError::NegativeDeduction(self.special_deduction));
        }
        check_range("gross salary", self.gross_salary, -MAX_AMOUNT, MAX_AMOUNT)?;
        check_range("special deduction", self.special_deduction, Decimal::ZERO, MAX_AMOUNT)?;
        check_range("housing fund rate", self.fund_rate, Decimal::ZERO, dec!(100))
    }
}

fn check_range(
    field: &'static str,
    value: Decimal,
    min: Decimal,
    max: Decimal,
) -> Result<(), InputError> {
    if value < min || value > max {
        return Err(InputError::AmountOutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

/// Read salary scenarios from CSV with a header row
pub fn read_inputs_csv<R: Read>(reader: R) -> Result<Vec<SalaryInput>, InputError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut inputs = Vec::new();
    for result in rdr.deserialize() {
        let input: SalaryInput = result?;
        inputs.push(input);
    }
    log::info!("Read {} csv records", inputs.len());
    Ok(inputs)
}

/// Read salary scenarios from a JSON array
pub fn read_inputs_json<R: Read>(reader: R) -> Result<Vec<SalaryInput>, InputError> {
    let inputs: Vec<SalaryInput> = serde_json::from_reader(reader)?;
    log::info!("Read {} json records", inputs.len());
    Ok(inputs)
}

/// Validate every scenario, reporting the first failure with its 1-based row.
///
/// With `any_fund_rate` only the amounts are checked.
pub fn validate_all(
    inputs: &[SalaryInput],
    policy: &Policy,
    any_fund_rate: bool,
) -> Result<(), InputError> {
    for (i, input) in inputs.iter().enumerate() {
        let checked = if any_fund_rate {
            input.validate_amounts()
        } else {
            input.validate(policy)
        };
        checked.map_err(|e| InputError::InvalidRow {
            row: i + 1,
            source: Box::new(e),
        })?;
    }
    Ok(())
}
