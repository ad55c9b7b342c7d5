//! Excel "General" number format

/// Significant digits shown by the General format.
const GENERAL_DIGITS: usize = 11;

/// Render a number the way the General format displays it.
///
/// Values are rounded to 11 significant digits and trailing zeros are
/// dropped, which hides binary floating-point noise such as
/// `0.30000000000000004`. Very large and very small magnitudes switch to
/// scientific notation (`1.23457E+11`).
#[must_use]
pub fn format_general(value: f64) -> String {
    if value.is_nan() {
        return "#NUM!".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "#NUM!" } else { "-#NUM!" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let abs = value.abs();
    if !(1e-9..1e11).contains(&abs) {
        return format_scientific(value);
    }

    let sci = format!("{:.*e}", GENERAL_DIGITS - 1, abs);
    let Some((mantissa, exponent)) = sci.split_once('e') else {
        return abs.to_string();
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();

    let mut out = shift_decimal_point(&digits, exponent);
    if value < 0.0 {
        out.insert(0, '-');
    }
    out
}

/// Place the decimal point into a run of significant digits and trim zeros.
fn shift_decimal_point(digits: &str, exponent: i32) -> String {
    let (int_part, frac_part) = if exponent >= 0 {
        let point = exponent as usize + 1;
        if point >= digits.len() {
            let mut int_part = digits.to_string();
            int_part.push_str(&"0".repeat(point - digits.len()));
            (int_part, String::new())
        } else {
            (digits[..point].to_string(), digits[point..].to_string())
        }
    } else {
        let leading = (-exponent - 1) as usize;
        ("0".to_string(), format!("{}{digits}", "0".repeat(leading)))
    };

    let frac_part = frac_part.trim_end_matches('0');
    if frac_part.is_empty() {
        int_part
    } else {
        format!("{int_part}.{frac_part}")
    }
}

fn format_scientific(value: f64) -> String {
    let sci = format!("{value:.5e}");
    let Some((mantissa, exponent)) = sci.split_once('e') else {
        return sci;
    };
    let mantissa = if mantissa.contains('.') {
        mantissa.trim_end_matches('0').trim_end_matches('.')
    } else {
        mantissa
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let sign = if exponent < 0 { '-' } else { '+' };
    format!("{mantissa}E{sign}{:02}", exponent.abs())
}
