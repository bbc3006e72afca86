//! HTML report generation
//!
//! Generates a self-contained HTML file: summary cards, a take-home trend
//! chart with monthly tax bars, an annual breakdown donut and the monthly
//! table. Charts are inline SVG so the file needs no network access.

use crate::cmd::SalaryArgs;
use crate::core::{Breakdown, CalculationResult, MonthRecord, Policy};
use crate::utils::{format_cny, format_cny_dp};
use chrono::{Local, Month};
use clap::Args;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt::Write;
use std::path::PathBuf;

const TAKE_HOME_COLOR: &str = "#2563eb";
const TAX_COLOR: &str = "#ef4444";
const FIXED_COLOR: &str = "#f59e0b";

#[derive(Args, Debug)]
pub struct HtmlCommand {
    #[command(flatten)]
    salary: SalaryArgs,

    /// Output file path (default: opens in browser)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl HtmlCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let policy = Policy::shanghai_2025();
        let result = self.salary.calculate(&policy)?;

        let html = generate(&result, &policy);

        if let Some(ref output_path) = self.output {
            std::fs::write(output_path, &html)?;
            println!("HTML report written to: {}", output_path.display());
        } else {
            // Write to temp file and open in browser
            let temp_path = std::env::temp_dir().join("salc-report.html");
            std::fs::write(&temp_path, &html)?;
            opener::open(&temp_path)?;
            println!("Opened HTML report in browser: {}", temp_path.display());
        }

        Ok(())
    }
}

/// Monthly figures embedded in the page as JSON
#[derive(Serialize)]
struct ReportData {
    months: Vec<MonthData>,
    total_tax: String,
    annual_take_home: String,
    social_insurance_base: String,
}

#[derive(Serialize)]
struct MonthData {
    month: u32,
    fixed_deduction: String,
    tax: String,
    take_home: String,
}

impl From<&CalculationResult> for ReportData {
    fn from(result: &CalculationResult) -> Self {
        ReportData {
            months: result
                .months
                .iter()
                .map(|m| {
                    let m = m.rounded();
                    MonthData {
                        month: m.month,
                        fixed_deduction: m.fixed_deduction.to_string(),
                        tax: m.tax.to_string(),
                        take_home: m.take_home.to_string(),
                    }
                })
                .collect(),
            total_tax: result.total_tax.round_dp(2).to_string(),
            annual_take_home: result.annual_take_home().to_string(),
            social_insurance_base: result.social_insurance_base.to_string(),
        }
    }
}

/// Generate HTML report content
pub fn generate(result: &CalculationResult, policy: &Policy) -> String {
    let data = ReportData::from(result);
    let json_data = serde_json::to_string(&data).unwrap_or_else(|_| "{}".to_string());
    let breakdown = result.breakdown();

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{region} Take-Home Salary</title>
    <style>
{css}
    </style>
</head>
<body>
    <header>
        <h1>{region} Take-Home Salary ({period})</h1>
        <p class="inputs">Gross {gross}/month &middot; Housing fund {fund_rate}% &middot; Special deduction {deduction}/month</p>
    </header>
    <main>
        <section class="cards">
            <div class="card"><div class="label">Annual take-home (cash)</div><div class="value">{take_home}</div></div>
            <div class="card"><div class="label">Annual income tax</div><div class="value tax">{tax}</div></div>
            <div class="card"><div class="label">Contribution base</div><div class="value">{base}</div></div>
        </section>
        {warnings}
        <section class="charts">
            <div class="panel wide">
                <h2>Monthly take-home trend</h2>
                {trend}
            </div>
            <div class="panel">
                <h2>Where the year's pay goes</h2>
                {donut}
            </div>
        </section>
        <section class="panel">
            <h2>Months 1&ndash;12</h2>
            {table}
        </section>
        <section class="notes">
            <p><strong>Cumulative withholding:</strong> tax is computed on year-to-date income each month, so higher earners move up brackets (3% &rarr; 10% &rarr; 20% &hellip;) and take home less late in the year than early on.</p>
            <p><strong>Contribution base:</strong> salary above {ceiling} per month does not attract social insurance or housing fund contributions; salary below {floor} is charged on {floor}.</p>
        </section>
    </main>
    <footer>Generated {generated}</footer>
    <script type="application/json" id="report-data">{json_data}</script>
</body>
</html>
"##,
        region = html_escape(policy.region),
        period = policy.period(),
        css = CSS,
        gross = format_cny(result.input.gross_salary),
        fund_rate = result.input.fund_rate.normalize(),
        deduction = format_cny(result.input.special_deduction),
        take_home = format_cny(result.annual_take_home()),
        tax = format_cny(result.total_tax),
        base = format_cny_dp(result.social_insurance_base, 0),
        warnings = warnings_html(result),
        trend = trend_chart(&result.months),
        donut = breakdown_chart(&breakdown),
        table = month_table(&result.months),
        ceiling = format_cny_dp(policy.base_ceiling, 0),
        floor = format_cny_dp(policy.base_floor, 0),
        generated = Local::now().format("%Y-%m-%d %H:%M"),
        json_data = json_data.replace("</", "<\\/"),
    )
}

fn warnings_html(result: &CalculationResult) -> String {
    if result.warnings.is_empty() {
        return String::new();
    }
    let items: String = result
        .warnings
        .iter()
        .map(|w| format!("<li>{}</li>", html_escape(&w.to_string())))
        .collect();
    format!(r#"<section class="warnings"><ul>{}</ul></section>"#, items)
}

fn month_name(month: u32) -> String {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map(|m| m.name()[..3].to_string())
        .unwrap_or_else(|| month.to_string())
}

fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

/// Round an axis maximum up to 1, 2 or 5 times a power of ten
fn nice_ceiling(value: f64) -> f64 {
    if value <= 0.0 {
        return 1.0;
    }
    let magnitude = 10f64.powi(value.log10().floor() as i32);
    let scaled = value / magnitude;
    let step = if scaled <= 1.0 {
        1.0
    } else if scaled <= 2.0 {
        2.0
    } else if scaled <= 5.0 {
        5.0
    } else {
        10.0
    };
    step * magnitude
}

const CHART_WIDTH: f64 = 720.0;
const CHART_HEIGHT: f64 = 360.0;
const MARGIN_LEFT: f64 = 72.0;
const MARGIN_RIGHT: f64 = 16.0;
const MARGIN_TOP: f64 = 16.0;
const MARGIN_BOTTOM: f64 = 48.0;
const Y_TICKS: usize = 5;

/// Take-home line over monthly tax bars
fn trend_chart(months: &[MonthRecord]) -> String {
    let plot_w = CHART_WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_h = CHART_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
    let max_value = months
        .iter()
        .flat_map(|m| [to_f64(m.take_home), to_f64(m.tax)])
        .fold(0.0, f64::max);
    let y_max = nice_ceiling(max_value * 1.05);
    let slot = plot_w / months.len().max(1) as f64;

    let x = |i: usize| MARGIN_LEFT + slot * (i as f64 + 0.5);
    let y = |v: f64| MARGIN_TOP + plot_h - (v.max(0.0) / y_max) * plot_h;

    let mut svg = String::new();
    let _ = write!(
        svg,
        r#"<svg class="chart" viewBox="0 0 {w} {h}" role="img" aria-label="Monthly take-home and tax">"#,
        w = CHART_WIDTH,
        h = CHART_HEIGHT
    );

    for tick in 0..=Y_TICKS {
        let value = y_max * tick as f64 / Y_TICKS as f64;
        let ty = y(value);
        let _ = write!(
            svg,
            r#"<line class="grid" x1="{x1}" y1="{ty:.1}" x2="{x2}" y2="{ty:.1}"/><text class="axis" x="{lx}" y="{ly:.1}" text-anchor="end">{label}</text>"#,
            x1 = MARGIN_LEFT,
            x2 = CHART_WIDTH - MARGIN_RIGHT,
            lx = MARGIN_LEFT - 8.0,
            ly = ty + 4.0,
            label = format_cny_dp(Decimal::from_f64_retain(value).unwrap_or_default(), 0),
        );
    }

    let bar_w = slot * 0.5;
    for (i, m) in months.iter().enumerate() {
        let tax = to_f64(m.tax);
        let top = y(tax);
        let _ = write!(
            svg,
            r#"<rect class="bar" x="{bx:.1}" y="{top:.1}" width="{bar_w:.1}" height="{bh:.1}" fill="{color}" fill-opacity="0.6"><title>{name}: tax {amount}</title></rect>"#,
            bx = x(i) - bar_w / 2.0,
            bh = MARGIN_TOP + plot_h - top,
            color = TAX_COLOR,
            name = month_name(m.month),
            amount = format_cny(m.tax),
        );
        let _ = write!(
            svg,
            r#"<text class="axis" x="{lx:.1}" y="{ly}" text-anchor="middle">{name}</text>"#,
            lx = x(i),
            ly = CHART_HEIGHT - MARGIN_BOTTOM + 18.0,
            name = month_name(m.month),
        );
    }

    let points: Vec<String> = months
        .iter()
        .enumerate()
        .map(|(i, m)| format!("{:.1},{:.1}", x(i), y(to_f64(m.take_home))))
        .collect();
    let _ = write!(
        svg,
        r#"<polyline class="line" points="{}" fill="none" stroke="{}" stroke-width="4"/>"#,
        points.join(" "),
        TAKE_HOME_COLOR
    );
    for (i, m) in months.iter().enumerate() {
        let _ = write!(
            svg,
            r#"<circle class="point" cx="{cx:.1}" cy="{cy:.1}" r="4" fill="{color}"><title>{name}: take-home {amount}</title></circle>"#,
            cx = x(i),
            cy = y(to_f64(m.take_home)),
            color = TAKE_HOME_COLOR,
            name = month_name(m.month),
            amount = format_cny(m.take_home),
        );
    }

    let _ = write!(
        svg,
        r#"<g class="legend"><rect x="{lx}" y="{ly}" width="12" height="12" fill="{c1}"/><text x="{tx}" y="{ty}">Take-home</text><rect x="{lx2}" y="{ly}" width="12" height="12" fill="{c2}" fill-opacity="0.6"/><text x="{tx2}" y="{ty}">Income tax</text></g>"#,
        lx = MARGIN_LEFT,
        ly = CHART_HEIGHT - 18.0,
        tx = MARGIN_LEFT + 16.0,
        ty = CHART_HEIGHT - 8.0,
        lx2 = MARGIN_LEFT + 110.0,
        tx2 = MARGIN_LEFT + 126.0,
        c1 = TAKE_HOME_COLOR,
        c2 = TAX_COLOR,
    );
    svg.push_str("</svg>");
    svg
}

/// Donut of take-home, tax and fixed deductions over the year
fn breakdown_chart(breakdown: &Breakdown) -> String {
    const SIZE: f64 = 280.0;
    const RADIUS: f64 = 100.0;
    const STROKE: f64 = 48.0;

    let center = SIZE / 2.0;
    let circumference = 2.0 * std::f64::consts::PI * RADIUS;
    let total = to_f64(breakdown.total());
    let (take_home_pct, tax_pct, fixed_pct) = breakdown.shares();
    let slices = [
        ("Take-home", breakdown.take_home, take_home_pct, TAKE_HOME_COLOR),
        ("Income tax", breakdown.tax, tax_pct, TAX_COLOR),
        ("Insurance + fund", breakdown.fixed_deductions, fixed_pct, FIXED_COLOR),
    ];

    let mut svg = String::new();
    let _ = write!(
        svg,
        r#"<svg class="donut" viewBox="0 0 {s} {s}" role="img" aria-label="Annual breakdown">"#,
        s = SIZE
    );

    let mut offset = 0.0;
    for (name, amount, pct, color) in slices {
        let value = to_f64(amount).max(0.0);
        if total <= 0.0 || value <= 0.0 {
            continue;
        }
        let length = circumference * value / total;
        let _ = write!(
            svg,
            r#"<circle class="slice" cx="{c}" cy="{c}" r="{r}" fill="none" stroke="{color}" stroke-width="{sw}" stroke-dasharray="{len:.2} {gap:.2}" stroke-dashoffset="{off:.2}" transform="rotate(-90 {c} {c})"><title>{name}: {amt} ({pct:.1}%)</title></circle>"#,
            c = center,
            r = RADIUS,
            sw = STROKE,
            len = length,
            gap = circumference - length,
            off = -offset,
            amt = format_cny(amount),
        );
        offset += length;
    }
    svg.push_str("</svg>");

    let legend: String = slices
        .iter()
        .map(|(name, amount, pct, color)| {
            format!(
                r#"<li><span class="swatch" style="background:{}"></span>{} <strong>{}</strong> ({:.1}%)</li>"#,
                color,
                name,
                format_cny(*amount),
                pct
            )
        })
        .collect();
    format!(r#"{}<ul class="legend">{}</ul>"#, svg, legend)
}

fn month_table(months: &[MonthRecord]) -> String {
    let mut html = String::from(
        "<table><thead><tr><th>Month</th><th>Gross</th><th>Insurance + Fund</th><th>Tax</th><th>Take-Home</th></tr></thead><tbody>",
    );
    for m in months {
        let _ = write!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            month_name(m.month),
            format_cny(m.gross_salary),
            format_cny(m.fixed_deduction),
            format_cny(m.tax),
            format_cny(m.take_home),
        );
    }
    html.push_str("</tbody></table>");
    html
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

const CSS: &str = r#"
* { box-sizing: border-box; }
body { margin: 0; font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif; background: #f8fafc; color: #0f172a; }
header { padding: 24px 32px 8px; }
header h1 { margin: 0 0 4px; font-size: 1.6rem; }
header .inputs { margin: 0; color: #475569; }
main { padding: 16px 32px 32px; display: flex; flex-direction: column; gap: 20px; }
.cards { display: grid; grid-template-columns: repeat(3, 1fr); gap: 20px; }
.card, .panel { background: white; padding: 20px; border-radius: 15px; box-shadow: 0 4px 6px -1px rgba(0, 0, 0, 0.1); }
.card .label { color: #64748b; font-size: 0.9rem; }
.card .value { font-size: 1.8rem; font-weight: 600; margin-top: 6px; }
.card .value.tax { color: #b91c1c; }
.charts { display: grid; grid-template-columns: 2fr 1fr; gap: 20px; }
.panel h2 { margin: 0 0 12px; font-size: 1.1rem; }
svg.chart { width: 100%; height: auto; }
svg.donut { width: 100%; max-width: 280px; display: block; margin: 0 auto; }
.grid { stroke: #e2e8f0; stroke-width: 1; }
.axis, .legend text { font-size: 12px; fill: #64748b; }
ul.legend { list-style: none; padding: 0; margin: 12px 0 0; }
ul.legend li { margin: 4px 0; }
.swatch { display: inline-block; width: 12px; height: 12px; border-radius: 3px; margin-right: 8px; vertical-align: middle; }
table { width: 100%; border-collapse: collapse; }
th, td { padding: 8px 12px; border-bottom: 1px solid #e2e8f0; text-align: right; }
th:first-child, td:first-child { text-align: left; }
th { color: #475569; font-weight: 600; }
.warnings { background: #fef9c3; border-radius: 10px; padding: 8px 20px; }
.notes { color: #475569; font-size: 0.9rem; }
footer { padding: 0 32px 24px; color: #94a3b8; font-size: 0.8rem; }
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::compute;
    use rust_decimal_macros::dec;

    #[test]
    fn report_contains_summary_figures() {
        let result = compute(dec!(65000), dec!(7), dec!(0));
        let html = generate(&result, &Policy::shanghai_2025());

        assert!(html.contains("¥562,086.05"));
        assert!(html.contains("¥139,579.74"));
        assert!(html.contains("¥37,302"));
        assert!(html.contains("2025-07 ~ 2026-06"));
        assert!(html.contains(r#"id="report-data""#));
    }

    #[test]
    fn trend_chart_has_bar_and_point_per_month() {
        let result = compute(dec!(65000), dec!(7), dec!(0));
        let svg = trend_chart(&result.months);

        assert_eq!(svg.matches(r#"class="bar""#).count(), 12);
        assert_eq!(svg.matches(r#"class="point""#).count(), 12);
        assert!(svg.contains("<polyline"));
        assert!(svg.contains(">Jan<"));
        assert!(svg.contains(">Dec<"));
    }

    #[test]
    fn donut_skips_empty_slices() {
        let result = compute(dec!(5000), dec!(7), dec!(0));
        let chart = breakdown_chart(&result.breakdown());

        // no tax, so only take-home and contributions are drawn
        assert_eq!(chart.matches(r#"class="slice""#).count(), 2);
        assert!(chart.contains("Income tax <strong>¥0.00</strong>"));
    }

    #[test]
    fn table_lists_twelve_months() {
        let result = compute(dec!(10000), dec!(5), dec!(1000));
        let table = month_table(&result.months);

        assert_eq!(table.matches("<tr>").count(), 13);
        assert!(table.contains("<td>¥8,376.50</td>"));
    }

    #[test]
    fn warnings_are_listed() {
        let result = compute(dec!(65000), dec!(7), dec!(0));
        let html = warnings_html(&result);
        assert!(html.contains("contribution base capped at the ceiling of 37302"));
    }

    #[test]
    fn nice_ceiling_steps() {
        assert_eq!(nice_ceiling(58000.0), 100000.0);
        assert_eq!(nice_ceiling(41000.0), 50000.0);
        assert_eq!(nice_ceiling(1500.0), 2000.0);
        assert_eq!(nice_ceiling(0.0), 1.0);
    }

    #[test]
    fn month_names() {
        assert_eq!(month_name(1), "Jan");
        assert_eq!(month_name(12), "Dec");
    }
}
