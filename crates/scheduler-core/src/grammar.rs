//! Compact repeat-rule grammar.
//!
//! A rule is a whitespace separated list of tokens whose first token names
//! the rule kind:
//!
//! | rule            | meaning                                              |
//! |-----------------|------------------------------------------------------|
//! | *(empty)*       | one-shot task, no recurrence                         |
//! | `y`             | every year on the same month and day                 |
//! | `d <n>`         | every `n` days, `n` in `1..=400`                     |
//! | `w <list>`      | on the listed weekdays, `1` = Monday .. `7` = Sunday |
//! | `m <days> [<months>]` | on the listed days of the listed months        |
//!
//! Monthly days are in `1..=31` or `-1`/`-2` (last and second-to-last day of
//! the month). An omitted month list means every month.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};

use crate::error::ParseRuleError;

pub const MAX_DAILY_INTERVAL: u32 = 400;

/// A parsed repeat rule. Sets are ordered so that equal rules compare equal
/// no matter how their source lists were ordered or duplicated.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecurrenceRule {
    None,
    Daily { interval: u32 },
    Yearly,
    Weekly { weekdays: BTreeSet<u8> },
    Monthly { days: BTreeSet<i8>, months: BTreeSet<u8> },
}

impl RecurrenceRule {
    pub fn is_recurring(&self) -> bool {
        !matches!(self, RecurrenceRule::None)
    }

    /// Returns true when `date` falls on one of the rule's weekdays.
    /// Only meaningful for `Weekly`.
    pub fn matches_weekday(&self, date: NaiveDate) -> bool {
        match self {
            RecurrenceRule::Weekly { weekdays } => {
                weekdays.contains(&(date.weekday().number_from_monday() as u8))
            }
            _ => false,
        }
    }
}

/// Parses a repeat string. Pure: never looks at the clock or any state.
pub fn parse(input: &str) -> Result<RecurrenceRule, ParseRuleError> {
    let mut tokens = input.split_whitespace();
    let Some(kind) = tokens.next() else {
        return Ok(RecurrenceRule::None);
    };

    let rule = match kind {
        "y" => RecurrenceRule::Yearly,
        "d" => {
            let value = tokens
                .next()
                .ok_or_else(|| ParseRuleError::Malformed("'d' requires an interval".to_string()))?;
            let interval = parse_int(value)?;
            if !(1..=MAX_DAILY_INTERVAL as i64).contains(&interval) {
                return Err(ParseRuleError::OutOfRange(format!(
                    "daily interval {} is outside 1..={}",
                    interval, MAX_DAILY_INTERVAL
                )));
            }
            RecurrenceRule::Daily { interval: interval as u32 }
        }
        "w" => {
            let list = tokens
                .next()
                .ok_or_else(|| ParseRuleError::Malformed("'w' requires a weekday list".to_string()))?;
            let weekdays = parse_list(list)?
                .into_iter()
                .map(|day| {
                    if (1..=7).contains(&day) {
                        Ok(day as u8)
                    } else {
                        Err(ParseRuleError::OutOfRange(format!(
                            "weekday {} is outside 1..=7",
                            day
                        )))
                    }
                })
                .collect::<Result<BTreeSet<_>, _>>()?;
            RecurrenceRule::Weekly { weekdays }
        }
        "m" => {
            let day_list = tokens
                .next()
                .ok_or_else(|| ParseRuleError::Malformed("'m' requires a day list".to_string()))?;
            let days = parse_list(day_list)?
                .into_iter()
                .map(|day| {
                    if (1..=31).contains(&day) || day == -1 || day == -2 {
                        Ok(day as i8)
                    } else {
                        Err(ParseRuleError::OutOfRange(format!(
                            "day of month {} is outside 1..=31, -1, -2",
                            day
                        )))
                    }
                })
                .collect::<Result<BTreeSet<_>, _>>()?;
            let months = match tokens.next() {
                Some(month_list) => parse_list(month_list)?
                    .into_iter()
                    .map(|month| {
                        if (1..=12).contains(&month) {
                            Ok(month as u8)
                        } else {
                            Err(ParseRuleError::OutOfRange(format!(
                                "month {} is outside 1..=12",
                                month
                            )))
                        }
                    })
                    .collect::<Result<BTreeSet<_>, _>>()?,
                None => BTreeSet::new(),
            };
            RecurrenceRule::Monthly { days, months }
        }
        other => return Err(ParseRuleError::UnknownRuleKind(other.to_string())),
    };

    if let Some(extra) = tokens.next() {
        return Err(ParseRuleError::Malformed(format!(
            "unexpected trailing token '{}' in '{}'",
            extra,
            input.trim()
        )));
    }

    Ok(rule)
}

/// Digits with an optional leading `-`. Values too large for `i64` are out of
/// range for every rule kind.
fn parse_int(value: &str) -> Result<i64, ParseRuleError> {
    let digits = value.strip_prefix('-').unwrap_or(value);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseRuleError::Malformed(format!(
            "'{}' is not an integer",
            value
        )));
    }
    value
        .parse::<i64>()
        .map_err(|_| ParseRuleError::OutOfRange(format!("'{}' is too large", value)))
}

fn parse_list(list: &str) -> Result<Vec<i64>, ParseRuleError> {
    list.split(',')
        .map(|item| {
            if item.is_empty() {
                Err(ParseRuleError::Malformed(format!(
                    "empty element in list '{}'",
                    list
                )))
            } else {
                parse_int(item)
            }
        })
        .collect()
}

fn join<T: ToString>(values: impl IntoIterator<Item = T>) -> String {
    values
        .into_iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

impl fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecurrenceRule::None => Ok(()),
            RecurrenceRule::Daily { interval } => write!(f, "d {}", interval),
            RecurrenceRule::Yearly => write!(f, "y"),
            RecurrenceRule::Weekly { weekdays } => write!(f, "w {}", join(weekdays)),
            RecurrenceRule::Monthly { days, months } if months.is_empty() => {
                write!(f, "m {}", join(days))
            }
            RecurrenceRule::Monthly { days, months } => {
                write!(f, "m {} {}", join(days), join(months))
            }
        }
    }
}

impl FromStr for RecurrenceRule {
    type Err = ParseRuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}
