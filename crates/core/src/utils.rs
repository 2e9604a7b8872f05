use chrono::{Datelike, NaiveDate};

/// Parse a human-readable magnitude such as `"89M"`, `"$2.9T"`, `"1,250"` or
/// `"450.5K"` into a plain number.
///
/// Suffixes are case-insensitive: `K` = 10³, `M` = 10⁶, `B` = 10⁹, `T` = 10¹².
/// A leading currency sign and thousands separators are ignored.
/// Returns `None` for anything that is not a finite number after stripping.
pub fn parse_magnitude(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();

    let last = cleaned.chars().last()?;
    let (digits, multiplier) = match last.to_ascii_uppercase() {
        'K' => (&cleaned[..cleaned.len() - 1], 1e3),
        'M' => (&cleaned[..cleaned.len() - 1], 1e6),
        'B' => (&cleaned[..cleaned.len() - 1], 1e9),
        'T' => (&cleaned[..cleaned.len() - 1], 1e12),
        _ => (cleaned.as_str(), 1.0),
    };

    let value: f64 = digits.parse().ok()?;
    let scaled = value * multiplier;
    scaled.is_finite().then_some(scaled)
}

/// Whole calendar months elapsed between `from` and `to`.
///
/// A month only counts once its day-of-month has been reached, so
/// 2024-01-31 → 2024-02-29 is 0 months. Returns 0 when `to` precedes `from`.
pub fn months_between(from: NaiveDate, to: NaiveDate) -> u32 {
    if to <= from {
        return 0;
    }
    let mut months = (to.year() - from.year()) * 12 + to.month() as i32 - from.month() as i32;
    if to.day() < from.day() {
        months -= 1;
    }
    months.max(0) as u32
}

/// Divide, returning `0.0` instead of NaN/∞ when the denominator is zero.
pub(crate) fn ratio_or_zero(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Arithmetic mean, `0.0` for an empty input.
pub(crate) fn mean_or_zero(values: impl IntoIterator<Item = f64>) -> f64 {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    ratio_or_zero(sum, count as f64)
}
