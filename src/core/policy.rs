use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

/// One band of the cumulative withholding table.
///
/// `upper_limit` is the inclusive ceiling on year-to-date taxable income;
/// `None` marks the open-ended top band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaxBracket {
    pub upper_limit: Option<Decimal>,
    pub rate: Decimal,
    pub quick_deduction: Decimal,
}

impl TaxBracket {
    const fn new(upper_limit: Option<Decimal>, rate: Decimal, quick_deduction: Decimal) -> Self {
        TaxBracket {
            upper_limit,
            rate,
            quick_deduction,
        }
    }

    /// Whether cumulative taxable income falls within this band's ceiling
    pub fn covers(&self, cumulative_taxable: Decimal) -> bool {
        self.upper_limit.map_or(true, |limit| cumulative_taxable <= limit)
    }

    /// Cumulative tax due on the year-to-date taxable income.
    /// May be negative when taxable income is negative.
    pub fn tax_due(&self, cumulative_taxable: Decimal) -> Decimal {
        cumulative_taxable * self.rate - self.quick_deduction
    }
}

/// Personal (employee) contributions for one month, split by scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Contributions {
    pub pension: Decimal,
    pub medical: Decimal,
    pub unemployment: Decimal,
    pub housing_fund: Decimal,
}

impl Contributions {
    /// Pension + medical + unemployment
    pub fn social_insurance(&self) -> Decimal {
        self.pension + self.medical + self.unemployment
    }

    /// All four schemes ("five insurances and one fund", employee share)
    pub fn total(&self) -> Decimal {
        self.social_insurance() + self.housing_fund
    }
}

/// Policy constants for one withholding period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Policy {
    pub region: &'static str,
    pub effective_from: NaiveDate,
    pub effective_to: NaiveDate,
    /// Social insurance contribution base floor
    pub base_floor: Decimal,
    /// Social insurance contribution base ceiling
    pub base_ceiling: Decimal,
    pub pension_rate: Decimal,
    pub medical_rate: Decimal,
    pub unemployment_rate: Decimal,
    /// Monthly basic deduction (起征点)
    pub basic_threshold: Decimal,
    /// Housing fund percentages offered to employees
    pub fund_rates: &'static [u8],
    pub brackets: &'static [TaxBracket],
}

static CUMULATIVE_WITHHOLDING: [TaxBracket; 7] = [
    TaxBracket::new(Some(dec!(36000)), dec!(0.03), dec!(0)),
    TaxBracket::new(Some(dec!(144000)), dec!(0.10), dec!(2520)),
    TaxBracket::new(Some(dec!(300000)), dec!(0.20), dec!(16920)),
    TaxBracket::new(Some(dec!(420000)), dec!(0.25), dec!(31920)),
    TaxBracket::new(Some(dec!(660000)), dec!(0.30), dec!(52920)),
    TaxBracket::new(Some(dec!(960000)), dec!(0.35), dec!(85920)),
    TaxBracket::new(None, dec!(0.45), dec!(181920)),
];

impl Policy {
    /// Shanghai, July 2025 to June 2026
    pub fn shanghai_2025() -> Self {
        Policy {
            region: "Shanghai",
            effective_from: NaiveDate::from_ymd_opt(2025, 7, 1).unwrap_or_default(),
            effective_to: NaiveDate::from_ymd_opt(2026, 6, 30).unwrap_or_default(),
            base_floor: dec!(7460),
            base_ceiling: dec!(37302),
            pension_rate: dec!(0.08),
            medical_rate: dec!(0.02),
            unemployment_rate: dec!(0.005),
            basic_threshold: dec!(5000),
            fund_rates: &[5, 6, 7],
            brackets: &CUMULATIVE_WITHHOLDING,
        }
    }

    /// Display the period as "2025-07 ~ 2026-06"
    pub fn period(&self) -> String {
        format!(
            "{} ~ {}",
            self.effective_from.format("%Y-%m"),
            self.effective_to.format("%Y-%m")
        )
    }

    /// Gross salary clamped to `[base_floor, base_ceiling]`
    pub fn social_insurance_base(&self, gross_salary: Decimal) -> Decimal {
        gross_salary.max(self.base_floor).min(self.base_ceiling)
    }

    /// Monthly employee contributions on `base` with `fund_rate` given in percent
    pub fn contributions(&self, base: Decimal, fund_rate: Decimal) -> Contributions {
        Contributions {
            pension: base * self.pension_rate,
            medical: base * self.medical_rate,
            unemployment: base * self.unemployment_rate,
            housing_fund: base * (fund_rate / dec!(100)),
        }
    }

    /// Whether `fund_rate` (percent) is one of the offered housing fund rates
    pub fn is_standard_fund_rate(&self, fund_rate: Decimal) -> bool {
        self.fund_rates
            .iter()
            .any(|rate| Decimal::from(*rate) == fund_rate)
    }

    /// First bracket, in ascending order, whose ceiling covers the income.
    pub fn bracket_for(&self, cumulative_taxable: Decimal) -> &TaxBracket {
        self.brackets
            .iter()
            .find(|b| b.covers(cumulative_taxable))
            // the last bracket is open-ended so this is only hit for an empty table
            .unwrap_or(&CUMULATIVE_WITHHOLDING[CUMULATIVE_WITHHOLDING.len() - 1])
    }
}

impl Default for Policy {
    fn default() -> Self {
        Policy::shanghai_2025()
    }
}
