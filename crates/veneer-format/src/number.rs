//! Number, currency and percentage formatting.
//!
//! Fixed-point rendering rounds half away from zero on the exact binary
//! value, so `format_decimal(2.5, 0)` is `"3"` and `format_decimal(1.005, 2)`
//! is `"1.00"` (1.005 is stored as 1.00499...).

use crate::locale::{Grouping, LocaleData, SymbolPosition, currency_symbol, locale_data};

pub const DEFAULT_CURRENCY: &str = "INR";
pub const DEFAULT_CURRENCY_LOCALE: &str = "en-IN";
pub const DEFAULT_NUMBER_LOCALE: &str = "en-US";

const NBSP: char = '\u{a0}';

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurrencyOptions {
    pub locale: String,
    pub minimum_fraction_digits: usize,
    pub maximum_fraction_digits: usize,
}

impl Default for CurrencyOptions {
    fn default() -> Self {
        Self {
            locale: DEFAULT_CURRENCY_LOCALE.to_owned(),
            minimum_fraction_digits: 2,
            maximum_fraction_digits: 2,
        }
    }
}

impl CurrencyOptions {
    pub fn locale(locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
            ..Self::default()
        }
    }

    pub fn fraction_digits(mut self, min: usize, max: usize) -> Self {
        self.minimum_fraction_digits = min;
        self.maximum_fraction_digits = max;
        self
    }
}

/// Sign plus unsigned integer and fraction digits of a rounded value.
struct Fixed {
    negative: bool,
    int_digits: String,
    frac_digits: String,
}

/// Adds one unit in the last place of a string of ASCII digits.
fn increment_digits(digits: &str) -> String {
    let mut out: Vec<u8> = digits.bytes().collect();
    let mut carry = true;
    for b in out.iter_mut().rev() {
        if *b == b'9' {
            *b = b'0';
        } else {
            *b += 1;
            carry = false;
            break;
        }
    }
    let mut s: String = out.into_iter().map(char::from).collect();
    if carry {
        s.insert(0, '1');
    }
    s
}

fn to_fixed(value: f64, decimals: usize) -> Fixed {
    let magnitude = value.abs();

    // An f64 has at most 1074 fraction digits, so this expansion is exact.
    let exact_precision = decimals + 1075;
    let exact = format!("{magnitude:.exact_precision$}");
    let (whole, fraction) = exact.split_once('.').unwrap_or((exact.as_str(), ""));
    let (kept, rest) = fraction.split_at(decimals.min(fraction.len()));
    let tie = rest
        .strip_prefix('5')
        .is_some_and(|tail| tail.bytes().all(|b| b == b'0'));

    let digits = if tie {
        // `{:.N}` rounds exact ties to even; ties go away from zero here.
        let bumped = increment_digits(&format!("{whole}{kept}"));
        let split = bumped.len() - decimals;
        if decimals == 0 {
            bumped
        } else {
            format!("{}.{}", &bumped[..split], &bumped[split..])
        }
    } else {
        format!("{magnitude:.decimals$}")
    };

    let (int_digits, frac_digits) = match digits.split_once('.') {
        Some((i, f)) => (i.to_owned(), f.to_owned()),
        None => (digits, String::new()),
    };
    let is_zero = int_digits.bytes().chain(frac_digits.bytes()).all(|b| b == b'0');

    Fixed {
        negative: value.is_sign_negative() && !is_zero,
        int_digits,
        frac_digits,
    }
}

fn non_finite_text(value: f64) -> &'static str {
    if value.is_nan() {
        "NaN"
    } else if value > 0.0 {
        "∞"
    } else {
        "-∞"
    }
}

fn group_digits(digits: &str, data: &LocaleData) -> String {
    let sep = data.group_separator;
    if digits.len() <= 3 {
        return digits.to_owned();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let chunk = match data.grouping {
        Grouping::Thousands => 3,
        Grouping::Indian => 2,
    };
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(chunk);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    groups.push(tail);
    groups.join(sep)
}

/// Locale-grouped number with between `min` and `max` fraction digits.
fn format_grouped(value: f64, min: usize, max: usize, data: &LocaleData) -> (bool, String) {
    let max = max.max(min);
    let fixed = to_fixed(value, max);
    let mut frac = fixed.frac_digits.as_str();
    while frac.len() > min && frac.ends_with('0') {
        frac = &frac[..frac.len() - 1];
    }

    let mut out = group_digits(&fixed.int_digits, data);
    if !frac.is_empty() {
        out.push_str(data.decimal_separator);
        out.push_str(frac);
    }
    (fixed.negative, out)
}

/// Formats `amount` as money in `currency` (ISO 4217 code).
///
/// ```
/// use veneer_format::{CurrencyOptions, format_currency};
///
/// assert_eq!(format_currency(1234567.5, "INR", &CurrencyOptions::default()), "₹12,34,567.50");
/// assert_eq!(format_currency(-12.5, "USD", &CurrencyOptions::locale("en-US")), "-$12.50");
/// ```
pub fn format_currency(amount: f64, currency: &str, options: &CurrencyOptions) -> String {
    let data = locale_data(&options.locale);
    let code = currency.trim().to_ascii_uppercase();
    let symbol = match currency_symbol(&code) {
        Some(s) => s.to_owned(),
        None => format!("{code}{NBSP}"),
    };

    let (negative, body) = if amount.is_finite() {
        format_grouped(
            amount,
            options.minimum_fraction_digits,
            options.maximum_fraction_digits,
            data,
        )
    } else {
        (amount.is_sign_negative() && !amount.is_nan(), non_finite_text(amount.abs()).to_owned())
    };
    let sign = if negative { "-" } else { "" };

    match data.symbol_position {
        SymbolPosition::Prefix => format!("{sign}{symbol}{body}"),
        SymbolPosition::SuffixSpaced => {
            format!("{sign}{body}{NBSP}{}", symbol.trim_end_matches(NBSP))
        }
    }
}

/// [`format_currency`] with the default currency and options.
pub fn format_inr(amount: f64) -> String {
    format_currency(amount, DEFAULT_CURRENCY, &CurrencyOptions::default())
}

/// Fixed number of fraction digits, or `""` when `value` is not a number.
pub fn format_decimal(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return String::new();
    }
    let fixed = to_fixed(value, decimals);
    let sign = if fixed.negative { "-" } else { "" };
    if fixed.frac_digits.is_empty() {
        format!("{sign}{}", fixed.int_digits)
    } else {
        format!("{sign}{}.{}", fixed.int_digits, fixed.frac_digits)
    }
}

/// Like [`format_decimal`] for text input; blank or unparseable text gives `""`.
pub fn format_decimal_str(input: &str, decimals: usize) -> String {
    match input.trim().parse::<f64>() {
        Ok(v) => format_decimal(v, decimals),
        Err(_) => String::new(),
    }
}

fn fixed_or_js_text(value: f64, decimals: usize) -> String {
    if value.is_nan() {
        "NaN".to_owned()
    } else if value.is_infinite() {
        let text = if value > 0.0 { "Infinity" } else { "-Infinity" };
        text.to_owned()
    } else {
        format_decimal(value, decimals)
    }
}

/// `0.1234` → `"12.3%"` with one decimal.
pub fn format_percentage(fraction: f64, decimals: usize) -> String {
    format!("{}%", fixed_or_js_text(fraction * 100.0, decimals))
}

pub fn format_percentage_default(fraction: f64) -> String {
    format_percentage(fraction, 1)
}

/// For values that are already percentages: `12.3456` → `"12.35%"`.
pub fn style_percentage(value: f64, decimals: usize) -> String {
    format!("{}%", fixed_or_js_text(value, decimals))
}

pub fn style_percentage_default(value: f64) -> String {
    style_percentage(value, 2)
}

/// Locale-grouped number with up to three fraction digits.
pub fn format_number(value: f64, locale: &str) -> String {
    if !value.is_finite() {
        return non_finite_text(value).to_owned();
    }
    let data = locale_data(locale);
    let (negative, body) = format_grouped(value, 0, 3, data);
    if negative { format!("-{body}") } else { body }
}

pub fn format_number_default(value: f64) -> String {
    format_number(value, DEFAULT_NUMBER_LOCALE)
}
