use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Non-fatal conditions noticed while computing a salary breakdown.
///
/// Warnings never change the computed figures; they are reported alongside them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type")]
pub enum Warning {
    /// Gross salary is zero or negative. The figures are still computed
    /// (with the base clamped to the floor) but carry no real meaning.
    NonPositiveGrossSalary {
        #[schemars(with = "f64")]
        gross_salary: Decimal,
    },
    /// Gross salary is below the social insurance floor, so contributions
    /// are charged on the floor instead.
    BaseClampedToFloor {
        #[schemars(with = "f64")]
        floor: Decimal,
    },
    /// Gross salary is above the social insurance ceiling; the excess
    /// attracts no contributions.
    BaseClampedToCeiling {
        #[schemars(with = "f64")]
        ceiling: Decimal,
    },
    /// Housing fund rate is not one of the rates the policy offers.
    NonStandardFundRate {
        #[schemars(with = "f64")]
        rate: Decimal,
    },
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Warning::NonPositiveGrossSalary { gross_salary } => {
                write!(f, "gross salary {:.2} is not positive", gross_salary)
            }
            Warning::BaseClampedToFloor { floor } => {
                write!(f, "contribution base raised to the floor of {:.0}", floor)
            }
            Warning::BaseClampedToCeiling { ceiling } => {
                write!(f, "contribution base capped at the ceiling of {:.0}", ceiling)
            }
            Warning::NonStandardFundRate { rate } => {
                write!(f, "housing fund rate {}% is not a standard rate", rate.normalize())
            }
        }
    }
}
