pub mod input;
pub mod policy;
pub mod salary;
pub mod warnings;

// Flat public surface for domain types and functions.
pub use input::{read_inputs_csv, read_inputs_json, validate_all, CsvColumn, SalaryInput};
pub use policy::{Policy, TaxBracket};
pub use salary::{compute, compute_with, Breakdown, CalculationResult, MonthRecord, MONTHS};
pub use warnings::Warning;
