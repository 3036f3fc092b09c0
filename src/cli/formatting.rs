//! Plain-text tables and locale-aware value formatting for the shell.

use chrono::{DateTime, Utc};
use fungi_config::Config;
use fungi_core::{CurrencyFormatter, DateFormatter, LocaleFormat};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Right,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Column {
    pub header: &'static str,
    pub alignment: Alignment,
    pub max_width: Option<usize>,
}

impl Column {
    pub const fn left(header: &'static str) -> Self {
        Self {
            header,
            alignment: Alignment::Left,
            max_width: None,
        }
    }

    pub const fn right(header: &'static str) -> Self {
        Self {
            header,
            alignment: Alignment::Right,
            max_width: None,
        }
    }

    pub fn truncated(mut self, max_width: usize) -> Self {
        self.max_width = Some(max_width);
        self
    }
}

/// A header row, a rule, then one line per row. Cells wider than the
/// column's `max_width` are cut with an ellipsis.
pub struct Table {
    columns: Vec<Column>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn widths(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                let widest = self
                    .rows
                    .iter()
                    .filter_map(|row| row.get(idx))
                    .map(|cell| cell.chars().count())
                    .fold(column.header.chars().count(), usize::max);
                column.max_width.map_or(widest, |max| widest.min(max))
            })
            .collect()
    }

    fn render_line(&self, cells: &[String], widths: &[usize]) -> String {
        let rendered: Vec<String> = self
            .columns
            .iter()
            .zip(widths)
            .enumerate()
            .map(|(idx, (column, &width))| {
                let text = fit(cells.get(idx).map(String::as_str).unwrap_or(""), width);
                match column.alignment {
                    Alignment::Left => format!("{text:<width$}"),
                    Alignment::Right => format!("{text:>width$}"),
                }
            })
            .collect();
        rendered.join("  ").trim_end().to_string()
    }

    pub fn render(&self) -> String {
        let widths = self.widths();
        let header: Vec<String> = self
            .columns
            .iter()
            .map(|column| column.header.to_string())
            .collect();
        let rule: Vec<String> = widths.iter().map(|width| "-".repeat(*width)).collect();

        let mut lines = vec![self.render_line(&header, &widths), rule.join("  ")];
        lines.extend(self.rows.iter().map(|row| self.render_line(row, &widths)));
        lines.join("\n")
    }
}

fn fit(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

/// Formats amounts, quantities and dates using the configured locale and currency.
#[derive(Debug, Clone)]
pub struct ValueFormatter {
    locale: LocaleFormat,
    currency: String,
}

impl ValueFormatter {
    pub fn from_config(config: &Config) -> Self {
        Self {
            locale: LocaleFormat::for_tag(&config.locale),
            currency: config.currency.clone(),
        }
    }

    pub fn amount(&self, value: f64) -> String {
        self.locale.format_amount(value, &self.currency)
    }

    pub fn optional_amount(&self, value: Option<f64>) -> String {
        value.map(|value| self.amount(value)).unwrap_or_else(|| "-".into())
    }

    pub fn quantity(&self, value: f64, unit: &str) -> String {
        format!("{} {}", self.locale.format_quantity(value), unit)
    }

    pub fn date(&self, date: DateTime<Utc>) -> String {
        self.locale.format_datetime(date)
    }
}
