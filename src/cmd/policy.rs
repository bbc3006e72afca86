//! Policy command - the constants the calculation is based on

use crate::core::{Policy, TaxBracket};
use crate::utils::{format_cny_dp, format_rate};
use clap::Args;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct PolicyCommand {
    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

#[derive(Tabled)]
struct BracketRow {
    #[tabled(rename = "Cumulative Taxable Income")]
    range: String,
    #[tabled(rename = "Rate")]
    rate: String,
    #[tabled(rename = "Quick Deduction")]
    quick_deduction: String,
}

impl PolicyCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let policy = Policy::shanghai_2025();
        if self.json {
            println!("{}", serde_json::to_string_pretty(&policy)?);
            return Ok(());
        }

        println!();
        println!("POLICY: {} ({})", policy.region, policy.period());
        println!();
        println!(
            "  Contribution base:   {} - {}",
            format_cny_dp(policy.base_floor, 0),
            format_cny_dp(policy.base_ceiling, 0)
        );
        println!(
            "  Employee rates:      pension {} | medical {} | unemployment {}",
            format_rate(policy.pension_rate),
            format_rate(policy.medical_rate),
            format_rate(policy.unemployment_rate)
        );
        let fund_rates: Vec<_> = policy.fund_rates.iter().map(|r| format!("{}%", r)).collect();
        println!("  Housing fund rates:  {}", fund_rates.join(" / "));
        println!(
            "  Basic deduction:     {} per month",
            format_cny_dp(policy.basic_threshold, 0)
        );
        println!();

        let table = Table::new(bracket_rows(policy.brackets))
            .with(Style::rounded())
            .with(Modify::new(Columns::new(1..)).with(Alignment::right()))
            .to_string();
        println!("{}", table);
        Ok(())
    }
}

fn bracket_rows(brackets: &[TaxBracket]) -> Vec<BracketRow> {
    let mut lower = None;
    brackets
        .iter()
        .map(|b| {
            let range = match (lower, b.upper_limit) {
                (None, Some(upper)) => format!("up to {}", format_cny_dp(upper, 0)),
                (Some(low), Some(upper)) => {
                    format!("{} - {}", format_cny_dp(low, 0), format_cny_dp(upper, 0))
                }
                (Some(low), None) => format!("over {}", format_cny_dp(low, 0)),
                (None, None) => "any".to_string(),
            };
            lower = b.upper_limit;
            BracketRow {
                range,
                rate: format_rate(b.rate),
                quick_deduction: format_cny_dp(b.quick_deduction, 0),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bracket_ranges_read_in_order() {
        let policy = Policy::shanghai_2025();
        let rows = bracket_rows(policy.brackets);

        assert_eq!(rows.len(), 7);
        assert_eq!(rows[0].range, "up to ¥36,000");
        assert_eq!(rows[1].range, "¥36,000 - ¥144,000");
        assert_eq!(rows[1].rate, "10%");
        assert_eq!(rows[1].quick_deduction, "¥2,520");
        assert_eq!(rows[6].range, "over ¥960,000");
        assert_eq!(rows[6].rate, "45%");
    }

    #[test]
    fn policy_serializes_to_json() {
        let json = serde_json::to_value(Policy::shanghai_2025()).unwrap();
        assert_eq!(json["base_ceiling"], "37302");
        assert_eq!(json["effective_from"], "2025-07-01");
        assert_eq!(json["brackets"].as_array().map(|b| b.len()), Some(7));
        assert!(json["brackets"][6]["upper_limit"].is_null());
    }
}
