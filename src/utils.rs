use rust_decimal::Decimal;
use rust_decimal_macros::dec;

pub fn write_csv<I, R, W>(records: I, writer: W) -> anyhow::Result<()>
where
    I: IntoIterator<Item = R>,
    R: serde::Serialize,
    W: std::io::Write,
{
    let mut wtr = csv::Writer::from_writer(writer);
    for record in records.into_iter() {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// "¥12,345.67" (negative amounts as "-¥12,345.67")
pub fn format_cny(amount: Decimal) -> String {
    format_cny_dp(amount, 2)
}

/// Like [`format_cny`] with a chosen number of decimal places
pub fn format_cny_dp(amount: Decimal, dp: u32) -> String {
    let sign = if amount < Decimal::ZERO { "-" } else { "" };
    let text = format!("{:.*}", dp as usize, amount.abs().round_dp(dp));
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };
    let grouped = group_thousands(int_part);
    match frac_part {
        Some(frac) => format!("{}¥{}.{}", sign, grouped, frac),
        None => format!("{}¥{}", sign, grouped),
    }
}

/// Plain 2dp amount for CSV/JSON output
pub fn format_amount(amount: Decimal) -> String {
    format!("{:.2}", amount.round_dp(2))
}

/// 0.03 -> "3%", 0.005 -> "0.5%"
pub fn format_rate(rate: Decimal) -> String {
    format!("{}%", (rate * dec!(100)).normalize())
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cny_groups_thousands() {
        assert_eq!(format_cny(dec!(562086.05)), "¥562,086.05");
        assert_eq!(format_cny(dec!(1234567.891)), "¥1,234,567.89");
        assert_eq!(format_cny(dec!(999)), "¥999.00");
        assert_eq!(format_cny(dec!(0)), "¥0.00");
    }

    #[test]
    fn cny_negative_amounts() {
        assert_eq!(format_cny(dec!(-1305.5)), "-¥1,305.50");
    }

    #[test]
    fn cny_whole_units() {
        assert_eq!(format_cny_dp(dec!(37302), 0), "¥37,302");
        assert_eq!(format_cny_dp(dec!(7460.4), 0), "¥7,460");
    }

    #[test]
    fn rates_as_percent() {
        assert_eq!(format_rate(dec!(0.03)), "3%");
        assert_eq!(format_rate(dec!(0.005)), "0.5%");
        assert_eq!(format_rate(dec!(0.45)), "45%");
    }

    #[test]
    fn amounts_for_csv() {
        assert_eq!(format_amount(dec!(2827.215)), "2827.22");
        assert_eq!(format_amount(dec!(3694.5)), "3694.50");
    }
}
