//! Cumulative withholding calculation of monthly take-home pay.
//!
//! Each month the year-to-date taxable income is taxed as a whole using the
//! bracket it falls in, and the month withholds the difference between that
//! and what has already been withheld. Running totals are kept unrounded;
//! rounding happens only when records are presented.

use crate::core::input::SalaryInput;
use crate::core::policy::{Contributions, Policy};
use crate::core::warnings::Warning;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

pub const MONTHS: u32 = 12;

/// One month of the withholding year
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthRecord {
    /// 1..=12
    pub month: u32,
    pub gross_salary: Decimal,
    /// Social insurance plus housing fund, identical every month
    pub fixed_deduction: Decimal,
    /// Taxable income added this month (may be negative)
    pub taxable_delta: Decimal,
    pub cumulative_taxable: Decimal,
    pub cumulative_tax_due: Decimal,
    /// Rate of the bracket the cumulative income fell in
    pub marginal_rate: Decimal,
    /// Tax withheld this month
    pub tax: Decimal,
    pub take_home: Decimal,
}

impl MonthRecord {
    /// Copy with every amount rounded to 2dp for display
    pub fn rounded(&self) -> MonthRecord {
        MonthRecord {
            month: self.month,
            gross_salary: self.gross_salary.round_dp(2),
            fixed_deduction: self.fixed_deduction.round_dp(2),
            taxable_delta: self.taxable_delta.round_dp(2),
            cumulative_taxable: self.cumulative_taxable.round_dp(2),
            cumulative_tax_due: self.cumulative_tax_due.round_dp(2),
            marginal_rate: self.marginal_rate,
            tax: self.tax.round_dp(2),
            take_home: self.take_home.round_dp(2),
        }
    }
}

/// How the year's gross pay splits between take-home, tax and fixed deductions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Breakdown {
    pub take_home: Decimal,
    pub tax: Decimal,
    pub fixed_deductions: Decimal,
}

impl Breakdown {
    pub fn total(&self) -> Decimal {
        self.take_home + self.tax + self.fixed_deductions
    }

    /// Percentage shares (take-home, tax, fixed deductions), rounded to 1dp.
    /// All zero when the total is not positive.
    pub fn shares(&self) -> (Decimal, Decimal, Decimal) {
        let total = self.total();
        if total <= Decimal::ZERO {
            return (Decimal::ZERO, Decimal::ZERO, Decimal::ZERO);
        }
        let pct = |v: Decimal| (v / total * dec!(100)).round_dp(1);
        (pct(self.take_home), pct(self.tax), pct(self.fixed_deductions))
    }
}

/// Full result of a calculation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalculationResult {
    pub input: SalaryInput,
    pub social_insurance_base: Decimal,
    pub contributions: Contributions,
    pub months: Vec<MonthRecord>,
    /// Tax withheld over the year (final cumulative tax paid)
    pub total_tax: Decimal,
    /// Fixed monthly deduction times twelve
    pub total_fixed_deduction: Decimal,
    pub warnings: Vec<Warning>,
}

impl CalculationResult {
    /// Sum of the displayed (2dp) monthly take-home amounts, so it agrees
    /// with the monthly table.
    pub fn annual_take_home(&self) -> Decimal {
        self.months.iter().map(|m| m.take_home.round_dp(2)).sum()
    }

    pub fn annual_gross(&self) -> Decimal {
        self.input.gross_salary * Decimal::from(MONTHS)
    }

    pub fn fixed_monthly_deduction(&self) -> Decimal {
        self.contributions.total()
    }

    pub fn breakdown(&self) -> Breakdown {
        Breakdown {
            take_home: self.annual_take_home(),
            tax: self.total_tax,
            fixed_deductions: self.total_fixed_deduction,
        }
    }
}

/// Compute the year's breakdown under the current Shanghai policy.
#[allow(dead_code)]
pub fn compute(
    gross_salary: Decimal,
    fund_rate: Decimal,
    special_deduction: Decimal,
) -> CalculationResult {
    let input = SalaryInput::new(gross_salary, fund_rate, special_deduction);
    compute_with(&Policy::shanghai_2025(), &input)
}

/// Compute the year's breakdown under an explicit policy.
///
/// Amounts are expected within the range `SalaryInput::validate_amounts`
/// accepts; larger ones overflow `Decimal`.
pub fn compute_with(policy: &Policy, input: &SalaryInput) -> CalculationResult {
    let gross = input.gross_salary;
    let base = policy.social_insurance_base(gross);
    let contributions = policy.contributions(base, input.fund_rate);
    let fixed = contributions.total();

    log::debug!(
        "Base {} (gross {}), fixed deduction {} at fund rate {}%",
        base,
        gross,
        fixed,
        input.fund_rate
    );

    let mut cumulative_taxable = Decimal::ZERO;
    let mut tax_paid = Decimal::ZERO;
    let mut months = Vec::with_capacity(MONTHS as usize);

    for month in 1..=MONTHS {
        let taxable_delta = gross - policy.basic_threshold - fixed - input.special_deduction;
        cumulative_taxable += taxable_delta;

        let bracket = policy.bracket_for(cumulative_taxable);
        let cumulative_tax_due = bracket.tax_due(cumulative_taxable);
        let tax = (cumulative_tax_due - tax_paid).max(Decimal::ZERO);
        tax_paid += tax;

        log::debug!(
            "Month {}: cumulative taxable {}, due {} @ {}, withheld {}",
            month,
            cumulative_taxable,
            cumulative_tax_due,
            bracket.rate,
            tax
        );

        months.push(MonthRecord {
            month,
            gross_salary: gross,
            fixed_deduction: fixed,
            taxable_delta,
            cumulative_taxable,
            cumulative_tax_due,
            marginal_rate: bracket.rate,
            tax,
            take_home: gross - fixed - tax,
        });
    }

    CalculationResult {
        input: input.clone(),
        social_insurance_base: base,
        contributions,
        months,
        total_tax: tax_paid,
        total_fixed_deduction: fixed * Decimal::from(MONTHS),
        warnings: collect_warnings(policy, input),
    }
}

fn collect_warnings(policy: &Policy, input: &SalaryInput) -> Vec<Warning> {
    let mut warnings = Vec::new();
    if input.gross_salary <= Decimal::ZERO {
        warnings.push(Warning::NonPositiveGrossSalary {
            gross_salary: input.gross_salary,
        });
    }
    if input.gross_salary < policy.base_floor {
        warnings.push(Warning::BaseClampedToFloor {
            floor: policy.base_floor,
        });
    } else if input.gross_salary > policy.base_ceiling {
        warnings.push(Warning::BaseClampedToCeiling {
            ceiling: policy.base_ceiling,
        });
    }
    if !policy.is_standard_fund_rate(input.fund_rate) {
        warnings.push(Warning::NonStandardFundRate {
            rate: input.fund_rate,
        });
    }
    warnings
}
