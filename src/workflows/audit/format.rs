//! Number formatting shared by highlights and report text.

/// Groups the integer part with commas and keeps up to three fractional digits,
/// dropping trailing zeros (`12500.5` -> `12,500.5`).
pub fn grouped(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }

    let rounded = format!("{:.3}", value.abs());
    let (integer, fraction) = match rounded.split_once('.') {
        Some((integer, fraction)) => (integer, fraction.trim_end_matches('0')),
        None => (rounded.as_str(), ""),
    };

    let mut out = String::with_capacity(rounded.len() + integer.len() / 3 + 1);
    if value < 0.0 && (integer != "0" || !fraction.is_empty()) {
        out.push('-');
    }

    let digits = integer.len();
    for (idx, ch) in integer.chars().enumerate() {
        if idx > 0 && (digits - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    if !fraction.is_empty() {
        out.push('.');
        out.push_str(fraction);
    }

    out
}

pub fn tons(value: f64) -> String {
    format!("{value:.2}")
}

/// kWh rendered as MWh with one decimal.
pub fn megawatt_hours(kwh: f64) -> String {
    format!("{:.1}", kwh / 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands_and_trims_fraction() {
        assert_eq!(grouped(0.0), "0");
        assert_eq!(grouped(999.0), "999");
        assert_eq!(grouped(1000.0), "1,000");
        assert_eq!(grouped(1234567.891), "1,234,567.891");
        assert_eq!(grouped(12500.50), "12,500.5");
        assert_eq!(grouped(-2048.0), "-2,048");
    }

    #[test]
    fn report_units_use_fixed_precision() {
        assert_eq!(tons(0.624), "0.62");
        assert_eq!(tons(4.04712), "4.05");
        assert_eq!(megawatt_hours(8760.0), "8.8");
        assert_eq!(megawatt_hours(0.0), "0.0");
    }
}
