//! Argument helpers shared by the command handlers.
//!
//! Commands take positional words followed by `key=value` options, e.g.
//! `item add "Sacs 3kg" category=Sacs unit=pcs threshold=100`.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use fungi_domain::{parse_timestamp, EntityId, EntityKind, Identifiable};
use strsim::levenshtein;

use crate::cli::core::CommandError;

const MIN_PREFIX_LEN: usize = 4;
/// Values that clear an optional field.
const CLEAR_WORDS: [&str; 3] = ["none", "-", ""];

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ParsedArgs {
    pub positional: Vec<String>,
    named: BTreeMap<String, String>,
}

impl ParsedArgs {
    pub fn parse(args: &[&str]) -> Self {
        let mut parsed = Self::default();
        for arg in args {
            match split_option(arg) {
                Some((key, value)) => {
                    parsed.named.insert(key, value.to_string());
                }
                None => parsed.positional.push(arg.to_string()),
            }
        }
        parsed
    }

    pub fn positional(&self, index: usize) -> Option<&str> {
        self.positional.get(index).map(String::as_str)
    }

    pub fn require_positional(&self, index: usize, usage: &str) -> Result<&str, CommandError> {
        self.positional(index)
            .ok_or_else(|| CommandError::InvalidArguments(format!("usage: {usage}")))
    }

    /// Positional words from `index` on, joined with spaces.
    pub fn rest_joined(&self, index: usize) -> Option<String> {
        let rest = self.positional.get(index..)?;
        if rest.is_empty() {
            None
        } else {
            Some(rest.join(" "))
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.named.get(key).map(String::as_str)
    }

    pub fn require(&self, key: &str) -> Result<&str, CommandError> {
        self.get(key)
            .ok_or_else(|| CommandError::InvalidArguments(format!("missing `{key}=<value>`")))
    }

    pub fn has_options(&self) -> bool {
        !self.named.is_empty()
    }

    /// Rejects options the command does not understand.
    pub fn ensure_known(&self, allowed: &[&str]) -> Result<(), CommandError> {
        match self.named.keys().find(|key| !allowed.contains(&key.as_str())) {
            Some(unknown) => Err(CommandError::InvalidArguments(format!(
                "unknown option `{unknown}` (expected one of: {})",
                allowed.join(", ")
            ))),
            None => Ok(()),
        }
    }

    pub fn number(&self, key: &str) -> Result<Option<f64>, CommandError> {
        self.get(key).map(|raw| parse_number(key, raw)).transpose()
    }

    /// `None` when absent, `Some(None)` when cleared, `Some(Some(_))` when set.
    pub fn clearable_number(&self, key: &str) -> Result<Option<Option<f64>>, CommandError> {
        match self.get(key) {
            None => Ok(None),
            Some(raw) if is_clear_word(raw) => Ok(Some(None)),
            Some(raw) => parse_number(key, raw).map(|value| Some(Some(value))),
        }
    }

    pub fn clearable_text(&self, key: &str) -> Option<Option<String>> {
        self.get(key).map(|raw| {
            if is_clear_word(raw) {
                None
            } else {
                Some(raw.to_string())
            }
        })
    }

    pub fn text(&self, key: &str) -> Option<String> {
        self.get(key).map(str::to_string)
    }

    pub fn count(&self, key: &str) -> Result<Option<usize>, CommandError> {
        self.get(key)
            .map(|raw| {
                raw.parse::<usize>().map_err(|_| {
                    CommandError::InvalidArguments(format!(
                        "`{key}` must be a whole number, got `{raw}`"
                    ))
                })
            })
            .transpose()
    }
}

fn split_option(arg: &str) -> Option<(String, &str)> {
    let (key, value) = arg.split_once('=')?;
    let valid_key = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    valid_key.then(|| (key.to_ascii_lowercase(), value))
}

pub fn is_clear_word(raw: &str) -> bool {
    CLEAR_WORDS.contains(&raw.trim().to_ascii_lowercase().as_str())
}

/// Accepts `12.5` and the comma decimal form `12,5`.
pub fn parse_number(key: &str, raw: &str) -> Result<f64, CommandError> {
    let normalized = raw.trim().replace(',', ".");
    normalized
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| {
            CommandError::InvalidArguments(format!("`{key}` must be a number, got `{raw}`"))
        })
}

/// Accepts `YYYY-MM-DD`, `YYYY-MM-DD HH:MM`, RFC 3339, or the offset-free
/// `YYYY-MM-DDTHH:MM[:SS]` form also read from snapshots. Times are UTC.
pub fn parse_datetime(raw: &str) -> Result<DateTime<Utc>, CommandError> {
    let trimmed = raw.trim();
    if let Some(parsed) = parse_timestamp(trimmed) {
        return Ok(parsed);
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M") {
        return Ok(naive.and_utc());
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| {
            CommandError::InvalidArguments(format!(
                "invalid date `{raw}` (use YYYY-MM-DD or YYYY-MM-DDTHH:MM)"
            ))
        })
}

pub fn short_id(id: &EntityId) -> &str {
    id.short()
}

/// Finds a record by full id, case-insensitive name, or unique id prefix
/// of at least four characters.
///
/// `name_of` returns `None` for records without a name.
pub fn resolve<'a, T, F>(
    records: &'a [T],
    reference: &str,
    kind: EntityKind,
    name_of: F,
) -> Result<&'a T, CommandError>
where
    T: Identifiable,
    F: Fn(&T) -> Option<&str>,
{
    let needle = reference.trim();
    if let Some(found) = records.iter().find(|record| record.id().as_str() == needle) {
        return Ok(found);
    }

    let lowered = needle.to_lowercase();
    if let Some(found) = records
        .iter()
        .find(|record| name_of(record).is_some_and(|name| name.to_lowercase() == lowered))
    {
        return Ok(found);
    }

    if needle.chars().count() >= MIN_PREFIX_LEN {
        let matches: Vec<&T> = records
            .iter()
            .filter(|record| record.id().as_str().to_lowercase().starts_with(&lowered))
            .collect();
        match matches.as_slice() {
            [single] => return Ok(single),
            [] => {}
            _ => {
                return Err(CommandError::InvalidArguments(format!(
                    "{kind} id prefix `{needle}` is ambiguous; use more characters"
                )))
            }
        }
    }

    let suggestion = records
        .iter()
        .filter_map(|record| name_of(record))
        .map(|name| (levenshtein(&name.to_lowercase(), &lowered), name))
        .filter(|(distance, _)| *distance <= 3)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, name)| format!(" Did you mean `{name}`?"))
        .unwrap_or_default();
    Err(CommandError::Message(format!(
        "No {kind} matches `{needle}`.{suggestion}"
    )))
}
