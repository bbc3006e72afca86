//! Summary command - annual totals, contribution split and where the money goes

use crate::cmd::SalaryArgs;
use crate::core::{CalculationResult, Policy, Warning};
use crate::utils::{format_amount, format_cny, format_cny_dp, format_rate};
use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Args, Debug)]
pub struct SummaryCommand {
    #[command(flatten)]
    salary: SalaryArgs,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

/// Summary data for JSON output
#[derive(Debug, Serialize)]
pub struct SummaryData {
    region: String,
    period: String,
    gross_salary: String,
    fund_rate_pct: String,
    special_deduction: String,
    social_insurance_base: String,
    monthly_contributions: ContributionSummary,
    annual: AnnualSummary,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    warnings: Vec<Warning>,
}

#[derive(Debug, Serialize)]
struct ContributionSummary {
    pension: String,
    medical: String,
    unemployment: String,
    housing_fund: String,
    total: String,
}

#[derive(Debug, Serialize)]
struct AnnualSummary {
    gross: String,
    take_home: String,
    tax: String,
    fixed_deductions: String,
    take_home_pct: String,
    tax_pct: String,
    fixed_deductions_pct: String,
}

impl SummaryData {
    pub fn new(result: &CalculationResult, policy: &Policy) -> Self {
        let c = &result.contributions;
        let breakdown = result.breakdown();
        let (take_home_pct, tax_pct, fixed_pct) = breakdown.shares();

        SummaryData {
            region: policy.region.to_string(),
            period: policy.period(),
            gross_salary: format_amount(result.input.gross_salary),
            fund_rate_pct: result.input.fund_rate.normalize().to_string(),
            special_deduction: format_amount(result.input.special_deduction),
            social_insurance_base: format_amount(result.social_insurance_base),
            monthly_contributions: ContributionSummary {
                pension: format_amount(c.pension),
                medical: format_amount(c.medical),
                unemployment: format_amount(c.unemployment),
                housing_fund: format_amount(c.housing_fund),
                total: format_amount(c.total()),
            },
            annual: AnnualSummary {
                gross: format_amount(result.annual_gross()),
                take_home: format_amount(breakdown.take_home),
                tax: format_amount(breakdown.tax),
                fixed_deductions: format_amount(breakdown.fixed_deductions),
                take_home_pct: format!("{:.1}", take_home_pct),
                tax_pct: format!("{:.1}", tax_pct),
                fixed_deductions_pct: format!("{:.1}", fixed_pct),
            },
            warnings: result.warnings.clone(),
        }
    }
}

impl SummaryCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let policy = Policy::shanghai_2025();
        let result = self.salary.calculate(&policy)?;

        if self.json {
            let data = SummaryData::new(&result, &policy);
            println!("{}", serde_json::to_string_pretty(&data)?);
        } else {
            print_summary(&result, &policy);
        }
        Ok(())
    }
}

fn print_summary(result: &CalculationResult, policy: &Policy) {
    let c = &result.contributions;
    let breakdown = result.breakdown();
    let (take_home_pct, tax_pct, fixed_pct) = breakdown.shares();

    println!();
    println!("SALARY SUMMARY ({}, {})", policy.region, policy.period());
    println!(
        "  Gross: {}/month | Housing fund: {}% | Special deduction: {}/month",
        format_cny(result.input.gross_salary),
        result.input.fund_rate.normalize(),
        format_cny(result.input.special_deduction)
    );
    println!();

    println!("MONTHLY CONTRIBUTIONS (base {})", format_cny_dp(result.social_insurance_base, 0));
    println!(
        "  Pension @ {}: {} | Medical @ {}: {} | Unemployment @ {}: {}",
        format_rate(policy.pension_rate),
        format_cny(c.pension),
        format_rate(policy.medical_rate),
        format_cny(c.medical),
        format_rate(policy.unemployment_rate),
        format_cny(c.unemployment)
    );
    println!(
        "  Housing fund @ {}%: {} | Total: {}",
        result.input.fund_rate.normalize(),
        format_cny(c.housing_fund),
        format_cny(c.total())
    );
    println!();

    println!("ANNUAL");
    println!("  Gross:            {:>16}", format_cny(result.annual_gross()));
    println!(
        "  Take-home:        {:>16}  ({:.1}%)",
        format_cny(breakdown.take_home),
        take_home_pct
    );
    println!("  Income tax:       {:>16}  ({:.1}%)", format_cny(breakdown.tax), tax_pct);
    println!(
        "  Insurance + fund: {:>16}  ({:.1}%)",
        format_cny(breakdown.fixed_deductions),
        fixed_pct
    );
    println!();

    let months = Decimal::from(crate::core::MONTHS);
    println!(
        "  Average monthly take-home: {}",
        format_cny(breakdown.take_home / months)
    );
    if let (Some(first), Some(last)) = (result.months.first(), result.months.last()) {
        println!(
            "  January {} -> December {}",
            format_cny(first.take_home),
            format_cny(last.take_home)
        );
    }

    for warning in &result.warnings {
        println!("  Note: {}", warning);
    }
    println!();
}
