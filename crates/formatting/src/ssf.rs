//! Number-format patterns (the SpreadSheet Format mini-language).
//!
//! Covers what data cells use in practice: up to four `;` sections,
//! fixed and optional decimals, thousands separators, percent, literal
//! prefixes/suffixes, and date/time patterns. Colors, locale tags and
//! conditions in `[...]` are dropped.

use crate::dates::{serial_to_datetime, DateSystem};
use crate::general::format_general;

/// Format a numeric value with a number-format pattern.
///
/// An empty pattern or `General` falls back to [`format_general`].
#[must_use]
pub fn format_number(pattern: &str, value: f64, system: DateSystem) -> String {
    if pattern.trim().is_empty() || pattern.eq_ignore_ascii_case("general") {
        return format_general(value);
    }

    let sections: Vec<&str> = pattern.split(';').collect();
    let section = choose_numeric_section(value, &sections);
    let section = strip_bracket_tokens(section);

    if is_date_pattern(&section) {
        return format_date_pattern(&section, value, system);
    }
    if section.eq_ignore_ascii_case("general") {
        return format_general(value);
    }

    // A dedicated negative section renders the magnitude; its own text supplies any sign
    let number = if value < 0.0 && sections.len() > 1 {
        value.abs()
    } else {
        value
    };
    format_number_pattern(&unescape_literals(&section), number)
}

/// Check whether a pattern renders dates or times.
#[must_use]
pub fn is_date_pattern(pattern: &str) -> bool {
    let first = pattern.split(';').next().unwrap_or(pattern);
    let cleaned = strip_quoted_text(&strip_bracket_tokens(first));
    let lower = cleaned.to_ascii_lowercase();

    if lower.contains('y') || lower.contains('d') || lower.contains('h') || lower.contains('s') {
        return true;
    }

    if lower.contains('m') {
        return !lower.contains('0') && !lower.contains('#');
    }

    false
}

fn choose_numeric_section<'a>(value: f64, sections: &[&'a str]) -> &'a str {
    let first = sections.first().copied().unwrap_or("");
    if value.is_nan() {
        return first;
    }
    if value < 0.0 {
        sections.get(1).copied().unwrap_or(first)
    } else if value == 0.0 {
        sections.get(2).copied().unwrap_or(first)
    } else {
        first
    }
}

fn strip_bracket_tokens(section: &str) -> String {
    let mut out = String::with_capacity(section.len());
    let mut depth = 0usize;
    for ch in section.chars() {
        match ch {
            '[' => depth += 1,
            ']' if depth > 0 => depth -= 1,
            _ if depth == 0 => out.push(ch),
            _ => {}
        }
    }
    out
}

fn strip_quoted_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_quotes = false;
    let mut chars = input.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '"' => in_quotes = !in_quotes,
            '\\' if !in_quotes => {
                chars.next();
            }
            _ if !in_quotes => out.push(ch),
            _ => {}
        }
    }
    out
}

/// Resolve quoting, escapes, padding and fill markers into plain literal text.
fn unescape_literals(section: &str) -> String {
    let mut out = String::with_capacity(section.len());
    let mut chars = section.chars();
    let mut in_quotes = false;
    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == '"' {
                in_quotes = false;
            } else {
                out.push(ch);
            }
            continue;
        }
        match ch {
            '"' => in_quotes = true,
            '\\' => out.extend(chars.next()),
            '_' => {
                chars.next();
                out.push(' ');
            }
            '*' => {
                chars.next();
            }
            _ => out.push(ch),
        }
    }
    out
}

fn format_number_pattern(pattern: &str, value: f64) -> String {
    let mut working = pattern.to_string();
    let mut prefix = String::new();
    let mut suffix = String::new();

    let mut first_placeholder = None;
    let mut last_placeholder = None;
    for (idx, ch) in working.char_indices() {
        if matches!(ch, '0' | '#' | '?') {
            if first_placeholder.is_none() {
                first_placeholder = Some(idx);
            }
            last_placeholder = Some(idx + ch.len_utf8());
        }
    }

    match (first_placeholder, last_placeholder) {
        (Some(first), Some(last)) => {
            prefix = working[..first].to_string();
            suffix = working[last..].to_string();
            working = working[first..last].to_string();
        }
        // Pure literal section, e.g. "-" for zero
        _ => return pattern.to_string(),
    }

    let use_percent = suffix.contains('%') || prefix.contains('%');
    let mut number = value;
    if use_percent {
        number *= 100.0;
    }

    let has_minus_in_pattern =
        prefix.contains('-') && !prefix.chars().any(|ch| ch.is_ascii_alphabetic());
    if value < 0.0 && has_minus_in_pattern {
        number = number.abs();
    }

    let (int_pattern, frac_pattern) = match working.split_once('.') {
        Some((left, right)) => (left, right),
        None => (working.as_str(), ""),
    };

    let decimals = frac_pattern
        .chars()
        .filter(|c| matches!(c, '0' | '#' | '?'))
        .count();
    let required_decimals = frac_pattern.chars().filter(|c| *c == '0').count();
    let use_separator = int_pattern.contains(',');

    let formatted = format!("{:.*}", decimals, round_half_away(number.abs(), decimals));
    let (int_part, frac_part) = formatted.split_once('.').unwrap_or((&formatted, ""));

    let mut int_formatted = if use_separator {
        format_with_thousands(int_part)
    } else {
        int_part.to_string()
    };
    if int_formatted == "0" && !int_pattern.contains('0') && decimals > 0 {
        int_formatted.clear();
    }

    let rounds_to_zero = formatted.chars().all(|c| c == '0' || c == '.');
    if number < 0.0 && !rounds_to_zero {
        int_formatted.insert(0, '-');
    }

    let mut frac = frac_part.to_string();
    while frac.len() > required_decimals && frac.ends_with('0') {
        frac.pop();
    }

    let mut out = String::new();
    out.push_str(&prefix);
    out.push_str(&int_formatted);
    if !frac.is_empty() {
        out.push('.');
        out.push_str(&frac);
    }
    out.push_str(&suffix);

    out
}

/// Round the way spreadsheets do (ties away from zero), not ties-to-even.
fn round_half_away(value: f64, decimals: usize) -> f64 {
    let Ok(exp) = i32::try_from(decimals) else {
        return value;
    };
    let factor = 10f64.powi(exp);
    let scaled = value * factor;
    if scaled.is_finite() {
        scaled.round() / factor
    } else {
        value
    }
}

fn format_with_thousands(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + input.len() / 3);
    for (idx, ch) in input.chars().enumerate() {
        if idx > 0 && (input.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn format_date_pattern(pattern: &str, value: f64, system: DateSystem) -> String {
    let Some(dt) = serial_to_datetime(value, system) else {
        return format_general(value);
    };
    dt.format(&excel_pattern_to_chrono(pattern)).to_string()
}

#[derive(Debug)]
enum DateToken {
    Field(char, usize),
    AmPm,
    Literal(String),
}

fn tokenize_date_pattern(pattern: &str) -> Vec<DateToken> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut tokens = Vec::new();
    let mut idx = 0;
    while idx < chars.len() {
        let ch = chars[idx];
        let lower = ch.to_ascii_lowercase();
        if matches!(lower, 'y' | 'm' | 'd' | 'h' | 's') {
            let mut count = 1;
            while idx + count < chars.len() && chars[idx + count].to_ascii_lowercase() == lower {
                count += 1;
            }
            tokens.push(DateToken::Field(lower, count));
            idx += count;
            continue;
        }

        let rest: String = chars[idx..].iter().take(5).collect();
        if rest.eq_ignore_ascii_case("am/pm") {
            tokens.push(DateToken::AmPm);
            idx += 5;
            continue;
        }

        match ch {
            '"' => {
                let mut literal = String::new();
                idx += 1;
                while idx < chars.len() && chars[idx] != '"' {
                    literal.push(chars[idx]);
                    idx += 1;
                }
                tokens.push(DateToken::Literal(literal));
            }
            '\\' => {
                if let Some(next) = chars.get(idx + 1) {
                    tokens.push(DateToken::Literal(next.to_string()));
                }
                idx += 1;
            }
            _ => tokens.push(DateToken::Literal(ch.to_string())),
        }
        idx += 1;
    }
    tokens
}

fn excel_pattern_to_chrono(pattern: &str) -> String {
    let tokens = tokenize_date_pattern(pattern);
    let twelve_hour = tokens.iter().any(|t| matches!(t, DateToken::AmPm));

    let fields: Vec<(usize, char)> = tokens
        .iter()
        .enumerate()
        .filter_map(|(idx, t)| match t {
            DateToken::Field(c, _) => Some((idx, *c)),
            _ => None,
        })
        .collect();

    // "m" means minutes right after an hour field or right before a seconds field
    let is_minute = |token_idx: usize| {
        let pos = fields.iter().position(|(idx, _)| *idx == token_idx);
        pos.is_some_and(|pos| {
            let after_hour = pos > 0 && fields[pos - 1].1 == 'h';
            let before_second = fields.get(pos + 1).is_some_and(|(_, c)| *c == 's');
            after_hour || before_second
        })
    };

    let mut out = String::new();
    for (idx, token) in tokens.iter().enumerate() {
        match token {
            DateToken::Field('y', count) => out.push_str(if *count <= 2 { "%y" } else { "%Y" }),
            DateToken::Field('m', count) if is_minute(idx) => {
                out.push_str(if *count == 1 { "%-M" } else { "%M" });
            }
            DateToken::Field('m', count) => out.push_str(match count {
                1 => "%-m",
                2 => "%m",
                3 => "%b",
                _ => "%B",
            }),
            DateToken::Field('d', count) => out.push_str(match count {
                1 => "%-d",
                2 => "%d",
                3 => "%a",
                _ => "%A",
            }),
            DateToken::Field('h', count) => out.push_str(match (twelve_hour, *count) {
                (true, 1) => "%-I",
                (true, _) => "%I",
                (false, 1) => "%-H",
                (false, _) => "%H",
            }),
            DateToken::Field('s', count) => out.push_str(if *count == 1 { "%-S" } else { "%S" }),
            DateToken::Field(_, _) => {}
            DateToken::AmPm => out.push_str("%p"),
            DateToken::Literal(text) => out.push_str(&text.replace('%', "%%")),
        }
    }
    out
}
