//! Formateo de fechas y moneda para pt-BR

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// `R$ 1.234,56`
pub fn format_brl(value: Decimal) -> String {
    let mut rounded = value.round_dp(2);
    rounded.rescale(2);
    let text = rounded.abs().to_string();
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(*digit);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    format!("{}R$ {},{}", sign, grouped, frac_part)
}

/// `DD/MM/YYYY`
pub fn format_date(value: &DateTime<Utc>) -> String {
    value.format("%d/%m/%Y").to_string()
}

/// `HH:MM`
pub fn format_time(value: &DateTime<Utc>) -> String {
    value.format("%H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::str::FromStr;

    #[test]
    fn test_format_brl() {
        assert_eq!(format_brl(Decimal::ZERO), "R$ 0,00");
        assert_eq!(format_brl(Decimal::from(150)), "R$ 150,00");
        assert_eq!(format_brl(Decimal::from_str("1234.5").unwrap()), "R$ 1.234,50");
        assert_eq!(format_brl(Decimal::from_str("1234567.891").unwrap()), "R$ 1.234.567,89");
        assert_eq!(format_brl(Decimal::from_str("-80").unwrap()), "-R$ 80,00");
    }

    #[test]
    fn test_format_date() {
        let date = Utc.with_ymd_and_hms(2024, 3, 5, 14, 7, 0).unwrap();
        assert_eq!(format_date(&date), "05/03/2024");
        assert_eq!(format_time(&date), "14:07");
    }
}
