//! Locale tables used by the number and date formatters.
//!
//! Only a handful of locales are carried; anything else resolves to the
//! closest language match and finally to `en-US`.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Grouping {
    /// 1,234,567
    Thousands,
    /// 12,34,567 (last three digits, then pairs)
    Indian,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SymbolPosition {
    /// ₹1,234.00
    Prefix,
    /// 1.234,00 €
    SuffixSpaced,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DateOrder {
    /// 16 August 2025
    DayMonthYear,
    /// August 16, 2025
    MonthDayYear,
    /// 16. August 2025
    DayDotMonthYear,
}

#[derive(Debug)]
pub struct LocaleData {
    pub tag: &'static str,
    pub group_separator: &'static str,
    pub decimal_separator: &'static str,
    pub grouping: Grouping,
    pub symbol_position: SymbolPosition,
    pub date_order: DateOrder,
    pub months: [&'static str; 12],
    /// `Some((am, pm))` for 12-hour clocks.
    pub day_periods: Option<(&'static str, &'static str)>,
    pub date_time_joiner: &'static str,
}

const ENGLISH_MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const GERMAN_MONTHS: [&str; 12] = [
    "Januar",
    "Februar",
    "März",
    "April",
    "Mai",
    "Juni",
    "Juli",
    "August",
    "September",
    "Oktober",
    "November",
    "Dezember",
];

pub static EN_IN: LocaleData = LocaleData {
    tag: "en-IN",
    group_separator: ",",
    decimal_separator: ".",
    grouping: Grouping::Indian,
    symbol_position: SymbolPosition::Prefix,
    date_order: DateOrder::DayMonthYear,
    months: ENGLISH_MONTHS,
    day_periods: Some(("am", "pm")),
    date_time_joiner: " at ",
};

pub static EN_US: LocaleData = LocaleData {
    tag: "en-US",
    group_separator: ",",
    decimal_separator: ".",
    grouping: Grouping::Thousands,
    symbol_position: SymbolPosition::Prefix,
    date_order: DateOrder::MonthDayYear,
    months: ENGLISH_MONTHS,
    day_periods: Some(("AM", "PM")),
    date_time_joiner: " at ",
};

pub static EN_GB: LocaleData = LocaleData {
    tag: "en-GB",
    group_separator: ",",
    decimal_separator: ".",
    grouping: Grouping::Thousands,
    symbol_position: SymbolPosition::Prefix,
    date_order: DateOrder::DayMonthYear,
    months: ENGLISH_MONTHS,
    day_periods: None,
    date_time_joiner: " at ",
};

pub static DE_DE: LocaleData = LocaleData {
    tag: "de-DE",
    group_separator: ".",
    decimal_separator: ",",
    grouping: Grouping::Thousands,
    symbol_position: SymbolPosition::SuffixSpaced,
    date_order: DateOrder::DayDotMonthYear,
    months: GERMAN_MONTHS,
    day_periods: None,
    date_time_joiner: " um ",
};

static ALL: [&LocaleData; 4] = [&EN_IN, &EN_US, &EN_GB, &DE_DE];

/// Resolves a BCP 47 tag (`en-IN`, `en_in`, `de`) to locale data.
pub fn locale_data(tag: &str) -> &'static LocaleData {
    let normalized = tag.trim().replace('_', "-");
    if let Some(found) = ALL
        .iter()
        .copied()
        .find(|d| d.tag.eq_ignore_ascii_case(&normalized))
    {
        return found;
    }

    let language = normalized.split('-').next().unwrap_or_default();
    let by_language = match language.to_ascii_lowercase().as_str() {
        "en" => Some(&EN_US),
        "de" => Some(&DE_DE),
        _ => None,
    };
    match by_language {
        Some(data) => {
            log::debug!("locale '{tag}' not carried; using {}", data.tag);
            data
        }
        None => {
            log::debug!("unknown locale '{tag}'; falling back to en-US");
            &EN_US
        }
    }
}

/// Display symbol for an ISO 4217 code. Unknown codes have none.
pub fn currency_symbol(code: &str) -> Option<&'static str> {
    let symbol = match code.to_ascii_uppercase().as_str() {
        "INR" => "₹",
        "USD" => "$",
        "EUR" => "€",
        "GBP" => "£",
        "JPY" => "¥",
        "AUD" => "A$",
        "CAD" => "CA$",
        "CNY" => "CN¥",
        _ => return None,
    };
    Some(symbol)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_exact_and_loose_tags() {
        assert_eq!(locale_data("en-IN").tag, "en-IN");
        assert_eq!(locale_data("en_in").tag, "en-IN");
        assert_eq!(locale_data("de").tag, "de-DE");
        assert_eq!(locale_data("en-AU").tag, "en-US");
        assert_eq!(locale_data("xx-YY").tag, "en-US");
    }

    #[test]
    fn currency_symbols_are_case_insensitive() {
        assert_eq!(currency_symbol("inr"), Some("₹"));
        assert_eq!(currency_symbol("XYZ"), None);
    }
}
