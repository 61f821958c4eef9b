//! # Display Formatting
//!
//! Indonesian number conventions, independent of the host locale:
//! `.` groups thousands, `,` separates decimals, amounts in Rupiah round to
//! whole rupiah (half away from zero).
//!
//! ## Example
//!
//! ```rust
//! use coating_core::formatting::{format_compact, format_percentage, format_rupiah};
//!
//! assert_eq!(format_rupiah(1_000_000.0), "Rp 1.000.000");
//! assert_eq!(format_percentage(12.5, 1), "12,5%");
//! assert_eq!(format_compact(1_500_000.0), "1,5 Jt");
//! ```

/// Currency symbol prefixed to Rupiah amounts
pub const RUPIAH_SYMBOL: &str = "Rp";

const THOUSANDS_SEPARATOR: char = '.';
const DECIMAL_SEPARATOR: char = ',';

/// Placeholder for NaN and infinite values
const NOT_A_NUMBER: &str = "-";

/// Format a number with grouped thousands and a fixed number of decimals.
///
/// ```rust
/// use coating_core::formatting::format_number;
///
/// assert_eq!(format_number(1_234_567.891, 2), "1.234.567,89");
/// assert_eq!(format_number(-0.4, 0), "0");
/// ```
pub fn format_number(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return NOT_A_NUMBER.to_string();
    }

    let factor = 10f64.powi(decimals as i32);
    let scaled = value.abs() * factor;
    // Past f64 integer precision the value has no fraction left to round
    let rounded = if scaled.is_finite() {
        scaled.round() / factor
    } else {
        value.abs()
    };
    let text = format!("{:.*}", decimals, rounded);

    let (int_part, frac_part) = match text.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (text.as_str(), None),
    };

    let mut out = String::with_capacity(text.len() + text.len() / 3 + 1);
    if value < 0.0 && rounded != 0.0 {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if let Some(frac) = frac_part {
        out.push(DECIMAL_SEPARATOR);
        out.push_str(frac);
    }
    out
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(THOUSANDS_SEPARATOR);
        }
        out.push(ch);
    }
    out
}

/// Format an amount as Rupiah, rounded to whole rupiah.
///
/// Negative amounts put the sign before the symbol: `-Rp 1.000`.
pub fn format_rupiah(amount: f64) -> String {
    if !amount.is_finite() {
        return format!("{} {}", RUPIAH_SYMBOL, NOT_A_NUMBER);
    }
    let digits = format_number(amount.abs(), 0);
    if amount < 0.0 && amount.round() != 0.0 {
        format!("-{} {}", RUPIAH_SYMBOL, digits)
    } else {
        format!("{} {}", RUPIAH_SYMBOL, digits)
    }
}

/// Format a 0-100 percentage value: `format_percentage(11.0, 0) == "11%"`
pub fn format_percentage(value: f64, decimals: usize) -> String {
    format!("{}%", format_number(value, decimals))
}

/// Dividers and suffixes for [`format_compact`], smallest first
const COMPACT_TIERS: [(f64, &str); 3] = [(1e3, "Rb"), (1e6, "Jt"), (1e9, "M")];

/// Short magnitude form used on dashboard cards.
///
/// Thousands are `Rb` (ribu), millions `Jt` (juta), billions `M` (miliar).
/// One decimal, dropped when it is zero. The suffix is chosen after
/// rounding, so `999_999_999` reads `1 M`.
pub fn format_compact(value: f64) -> String {
    if !value.is_finite() {
        return NOT_A_NUMBER.to_string();
    }

    let abs = value.abs();
    if abs.round() < 1e3 {
        return format_number(value, 0);
    }

    let mut tier = COMPACT_TIERS.iter().rposition(|&(divisor, _)| abs >= divisor).unwrap_or(0);
    while tier + 1 < COMPACT_TIERS.len() && round_tenth(abs / COMPACT_TIERS[tier].0) >= 1e3 {
        tier += 1;
    }
    let (divisor, suffix) = COMPACT_TIERS[tier];

    let mut text = format_number(value / divisor, 1);
    if let Some(stripped) = text.strip_suffix(",0") {
        text = stripped.to_string();
    }
    format!("{} {}", text, suffix)
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Compact Rupiah amount: `Rp 20,2 Jt`
pub fn format_compact_rupiah(amount: f64) -> String {
    if amount < 0.0 {
        format!("-{} {}", RUPIAH_SYMBOL, format_compact(-amount))
    } else {
        format!("{} {}", RUPIAH_SYMBOL, format_compact(amount))
    }
}

/// Area in square metres with two decimals: `1.234,50 m²`
pub fn format_area(square_meters: f64) -> String {
    format!("{} m²", format_number(square_meters, 2))
}

/// Film thickness in microns: `240 µm`
pub fn format_thickness(microns: f64) -> String {
    format!("{} µm", format_number(microns, 0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rupiah_grouping() {
        let text = format_rupiah(1_000_000.0);
        assert!(text.contains("1.000.000"));
        assert!(text.contains("Rp"));
        assert_eq!(text, "Rp 1.000.000");
    }

    #[test]
    fn test_rupiah_rounding_and_sign() {
        assert_eq!(format_rupiah(20_240_000.4), "Rp 20.240.000");
        assert_eq!(format_rupiah(2.5), "Rp 3");
        assert_eq!(format_rupiah(-1_500.0), "-Rp 1.500");
        assert_eq!(format_rupiah(-0.2), "Rp 0");
        assert_eq!(format_rupiah(0.0), "Rp 0");
        assert_eq!(format_rupiah(f64::INFINITY), "Rp -");
    }

    #[test]
    fn test_number_formatting() {
        assert_eq!(format_number(999.0, 0), "999");
        assert_eq!(format_number(1_000.0, 0), "1.000");
        assert_eq!(format_number(12_345.678, 1), "12.345,7");
        assert_eq!(format_number(-9_876_543.0, 0), "-9.876.543");
        assert_eq!(format_number(f64::NAN, 2), "-");
    }

    #[test]
    fn test_percentage() {
        assert_eq!(format_percentage(11.0, 0), "11%");
        assert_eq!(format_percentage(12.5, 1), "12,5%");
        assert_eq!(format_percentage(15.0, 2), "15,00%");
    }

    #[test]
    fn test_compact_suffixes() {
        assert_eq!(format_compact(950.0), "950");
        assert_eq!(format_compact(2_500.0), "2,5 Rb");
        assert_eq!(format_compact(2_000_000.0), "2 Jt");
        assert_eq!(format_compact(20_240_000.0), "20,2 Jt");
        assert_eq!(format_compact(1_250_000_000.0), "1,3 M");
        assert_eq!(format_compact(-3_000_000.0), "-3 Jt");
        assert_eq!(format_compact_rupiah(20_240_000.0), "Rp 20,2 Jt");
    }

    #[test]
    fn test_compact_suffix_follows_rounding() {
        assert_eq!(format_compact(999.6), "1 Rb");
        assert_eq!(format_compact(999_950.0), "1 Jt");
        assert_eq!(format_compact(999_999_999.0), "1 M");
        assert_eq!(format_compact(-999_999_999.0), "-1 M");
        assert_eq!(format_compact(999_400.0), "999,4 Rb");
    }

    #[test]
    fn test_huge_numbers_do_not_overflow() {
        let text = format_number(1e307, 2);
        assert!(!text.contains("inf"));
        assert!(text.ends_with(",00"));
        assert_eq!(format_rupiah(1e300).matches('.').count(), 100);
    }

    #[test]
    fn test_area_and_thickness() {
        assert_eq!(format_area(1_234.5), "1.234,50 m²");
        assert_eq!(format_thickness(240.0), "240 µm");
    }
}
