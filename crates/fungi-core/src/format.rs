use chrono::{DateTime, Utc};

/// Formats currency amounts for presentation.
pub trait CurrencyFormatter: Send + Sync {
    fn format_amount(&self, amount: f64, currency: &str) -> String;
}

/// Formats timestamps for presentation.
pub trait DateFormatter: Send + Sync {
    fn format_datetime(&self, date: DateTime<Utc>) -> String;
}

/// Separator and placement conventions for a language tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleFormat {
    pub language_tag: String,
    pub decimal_separator: char,
    pub grouping_separator: char,
    pub symbol_first: bool,
    pub date_pattern: &'static str,
}

impl Default for LocaleFormat {
    fn default() -> Self {
        Self::for_tag("fr-FR")
    }
}

impl LocaleFormat {
    /// English tags use `1,234.56` with a leading symbol; everything else
    /// follows the French layout `1 234,56 €`.
    pub fn for_tag(tag: &str) -> Self {
        let lower = tag.to_ascii_lowercase();
        if lower.starts_with("en") {
            Self {
                language_tag: tag.to_string(),
                decimal_separator: '.',
                grouping_separator: ',',
                symbol_first: true,
                date_pattern: if lower == "en-us" {
                    "%m/%d/%Y %H:%M"
                } else {
                    "%d/%m/%Y %H:%M"
                },
            }
        } else {
            Self {
                language_tag: tag.to_string(),
                decimal_separator: ',',
                grouping_separator: ' ',
                symbol_first: false,
                date_pattern: "%d/%m/%Y %H:%M",
            }
        }
    }

    /// Groups the integer part and applies the decimal separator.
    pub fn format_number(&self, value: f64, precision: usize) -> String {
        let rendered = format!("{:.*}", precision, value.abs());
        let (int_part, frac_part) = match rendered.split_once('.') {
            Some((int_part, frac_part)) => (int_part, Some(frac_part)),
            None => (rendered.as_str(), None),
        };
        let digits: Vec<char> = int_part.chars().collect();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (index, digit) in digits.iter().enumerate() {
            if index > 0 && (digits.len() - index) % 3 == 0 {
                grouped.push(self.grouping_separator);
            }
            grouped.push(*digit);
        }
        if let Some(frac) = frac_part {
            grouped.push(self.decimal_separator);
            grouped.push_str(frac);
        }
        let is_zero = rendered.chars().all(|c| c == '0' || c == '.');
        if value.is_sign_negative() && !is_zero {
            format!("-{grouped}")
        } else {
            grouped
        }
    }

    /// Quantity with up to two decimals, trailing zeros dropped.
    pub fn format_quantity(&self, value: f64) -> String {
        let text = self.format_number(value, 2);
        let separator = self.decimal_separator;
        if text.contains(separator) {
            text.trim_end_matches('0')
                .trim_end_matches(separator)
                .to_string()
        } else {
            text
        }
    }
}

impl CurrencyFormatter for LocaleFormat {
    fn format_amount(&self, amount: f64, currency: &str) -> String {
        let number = self.format_number(amount, 2);
        let symbol = currency_symbol(currency);
        if self.symbol_first {
            match number.strip_prefix('-') {
                Some(rest) => format!("-{symbol}{rest}"),
                None => format!("{symbol}{number}"),
            }
        } else {
            format!("{number} {symbol}")
        }
    }
}

impl DateFormatter for LocaleFormat {
    fn format_datetime(&self, date: DateTime<Utc>) -> String {
        date.format(self.date_pattern).to_string()
    }
}

pub fn currency_symbol(code: &str) -> String {
    match code.to_ascii_uppercase().as_str() {
        "EUR" => "€".into(),
        "USD" => "$".into(),
        "GBP" => "£".into(),
        "JPY" => "¥".into(),
        other => other.to_string(),
    }
}
