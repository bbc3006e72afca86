//! E2E tests for the salc commands

use std::process::{Command, Output};

fn salc(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_salc"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute command")
}

/// Default inputs: 65,000 gross, 7% housing fund, no special deduction
#[test]
fn calc_defaults() {
    let output = salc(&["calc"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);

    // Summary figures
    assert!(stdout.contains("¥562,086.05"));
    assert!(stdout.contains("¥139,579.74"));
    assert!(stdout.contains("¥37,302"));

    // Monthly table
    assert!(stdout.contains("Take-Home"));
    assert!(stdout.contains("6527.85"));
    assert!(stdout.contains("55644.94"));
    assert!(stdout.contains("42430.50"));
}

/// CSV output has a header and one line per month
#[test]
fn calc_csv() {
    let output = salc(&["calc", "-g", "10000", "-f", "5", "-d", "1000", "--csv"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);

    let lines: Vec<_> = stdout.lines().collect();
    assert_eq!(lines.len(), 13);
    assert_eq!(lines[0], "month,gross_salary,fixed_deduction,tax,take_home");
    assert_eq!(lines[1], "1,10000.00,1550.00,73.50,8376.50");
    assert_eq!(lines[12], "12,10000.00,1550.00,73.50,8376.50");
}

/// Detailed CSV exposes the cumulative columns
#[test]
fn calc_detailed_csv() {
    let output = salc(&["calc", "--detailed", "--csv"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.starts_with("month,gross_salary,fixed_deduction,cumulative_taxable,marginal_rate"));
    assert!(stdout.contains("53472.15,10%"));
}

/// Salary below the threshold pays no tax
#[test]
fn calc_low_salary_no_tax() {
    let output = salc(&["calc", "-g", "5000", "--csv"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    for line in stdout.lines().skip(1) {
        assert!(line.ends_with(",1305.50,0.00,3694.50"), "unexpected row {}", line);
    }
}

/// Rates outside 5/6/7 are rejected unless explicitly allowed
#[test]
fn calc_rejects_non_standard_fund_rate() {
    let output = salc(&["calc", "-f", "12"]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(stderr.contains("unsupported housing fund rate 12%"));

    let output = salc(&["calc", "-f", "12", "--any-fund-rate", "--csv"]);
    assert!(output.status.success(), "Command failed: {:?}", output);
}

/// Amounts that would overflow the yearly totals are rejected, not computed
#[test]
fn calc_rejects_out_of_range_amounts() {
    let output = salc(&["calc", "-g", "10000000000000000000000000000"]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(stderr.contains("gross salary"));
    assert!(stderr.contains("is out of range"));
    assert!(!stderr.contains("panicked"));

    let output = salc(&["calc", "-f", "1000", "--any-fund-rate"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("housing fund rate 1000 is out of range"));
}

/// A negative deduction fails the same way with or without --any-fund-rate
#[test]
fn calc_rejects_negative_deduction() {
    for extra in [&[][..], &["--any-fund-rate"][..]] {
        let mut args = vec!["calc", "-d", "-100"];
        args.extend_from_slice(extra);
        let output = salc(&args);
        let stderr = String::from_utf8_lossy(&output.stderr);

        assert!(!output.status.success());
        assert!(stderr.contains("special deduction must not be negative"));
    }
}

/// Negative gross salary is still computed
#[test]
fn calc_negative_gross_is_permitted() {
    let output = salc(&["calc", "-g", "-1000", "--csv"]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stderr.contains("is not positive"));
}

#[test]
fn summary_text() {
    let output = salc(&["summary", "-g", "20000", "-f", "6", "-d", "2000"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("SALARY SUMMARY"));
    assert!(stdout.contains("MONTHLY CONTRIBUTIONS"));
    assert!(stdout.contains("¥191,280.00"));
    assert!(stdout.contains("(3.8%)"));
}

#[test]
fn summary_json_output() {
    let output = salc(&["summary", "--json"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);

    // Verify JSON structure
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    assert_eq!(json["social_insurance_base"], "37302.00");
    assert_eq!(json["annual"]["tax"], "139579.74");
    assert_eq!(json["monthly_contributions"]["total"], "6527.85");
    assert_eq!(json["warnings"][0]["type"], "BaseClampedToCeiling");
}

#[test]
fn batch_csv_input() {
    let output = salc(&["batch", "-i", "tests/data/scenarios.csv", "--csv"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);

    let lines: Vec<_> = stdout.lines().collect();
    assert_eq!(lines.len(), 5);
    assert!(lines[0].starts_with("label,gross_salary"));
    assert!(lines[1].starts_with("senior,65000.00,7,0.00,37302.00,6527.85,139579.74,562086.05"));
    assert!(lines[3].starts_with("entry,5000.00,7,0.00,7460.00,1305.50,0.00,44334.00"));
}

#[test]
fn batch_json_input() {
    let output = salc(&["batch", "-i", "tests/data/scenarios.json"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("senior"));
    assert!(stdout.contains("mid"));
    // unlabelled rows are numbered
    assert!(stdout.contains("#3"));
    assert!(stdout.contains("191280.00"));
}

#[test]
fn batch_rejects_bad_rate() {
    let output = salc(&["batch", "-i", "tests/data/bad_rate.csv"]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(stderr.contains("row 1"));
}

#[test]
fn batch_any_fund_rate_still_checks_amounts() {
    let output = salc(&["batch", "-i", "tests/data/bad_rate.csv", "--any-fund-rate", "--csv"]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let output = salc(&["batch", "-i", "tests/data/out_of_range.csv", "--any-fund-rate"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("row 2"));
    assert!(stderr.contains("is out of range"));
}

#[test]
fn html_report_to_file() {
    let path = std::env::temp_dir().join(format!("salc-test-{}.html", std::process::id()));
    let output = salc(&["html", "-o", path.to_str().unwrap()]);

    assert!(output.status.success(), "Command failed: {:?}", output);

    let html = std::fs::read_to_string(&path).expect("report written");
    let _ = std::fs::remove_file(&path);
    assert!(html.contains("<svg class=\"chart\""));
    assert!(html.contains("<svg class=\"donut\""));
    assert!(html.contains("¥562,086.05"));
}

#[test]
fn policy_shows_brackets() {
    let output = salc(&["policy"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("¥7,460 - ¥37,302"));
    assert!(stdout.contains("over ¥960,000"));
    assert!(stdout.contains("45%"));
}

#[test]
fn schema_csv_header() {
    let output = salc(&["schema", "csv-header"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert_eq!(stdout.trim(), "label,gross_salary,fund_rate,special_deduction");
}

#[test]
fn schema_csv_fields_marks_defaulted_columns_optional() {
    let output = salc(&["schema", "csv-fields"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    let line = |name: &str| {
        stdout
            .lines()
            .find(|l| l.starts_with(name))
            .unwrap_or_default()
            .to_string()
    };
    assert!(line("gross_salary").contains("(required"));
    assert!(line("fund_rate").contains("(optional"));
    assert!(line("special_deduction").contains("(optional"));
}

#[test]
fn schema_json() {
    let output = salc(&["schema"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("\"SalaryInput\""));
    assert!(stdout.contains("\"gross_salary\""));
}
