use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

use crate::dates::{days_in_month, format_date, is_leap_year, parse_date};
use crate::error::CoreError;
use crate::grammar::{self, RecurrenceRule};

/// What a yearly rule anchored on February 29th does in common years.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeapDayPolicy {
    /// Only land on leap years.
    #[default]
    Skip,
    /// Use February 28th.
    Clamp,
    /// Use March 1st.
    #[serde(alias = "roll_over")]
    RollOver,
}

/// Configuration for next-occurrence calculation
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub leap_day: LeapDayPolicy,
    /// How far past the scan start a weekday or month-day search may look.
    /// Eight years covers the longest gap between two leap days.
    pub horizon_years: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            leap_day: LeapDayPolicy::Skip,
            horizon_years: 8,
        }
    }
}

/// RecurrenceEngine: computes the next date a repeat rule fires.
///
/// The engine holds configuration only. Every call works on the values it is
/// given, so a single instance can be shared freely between tasks.
#[derive(Debug, Clone, Default)]
pub struct RecurrenceEngine {
    config: EngineConfig,
}

impl RecurrenceEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Finds the earliest date matching `rule` that is strictly after `base`
    /// and not earlier than `not_before`.
    ///
    /// # Behavior
    /// - `Daily` and `Yearly` step from `base` and always advance at least once,
    ///   even when `base` already satisfies `not_before`
    /// - `Weekly` and `Monthly` scan forward one day at a time and return the
    ///   first matching day
    /// - `None` is rejected with `InvalidRule`
    /// - no match inside the configured horizon yields `Unsatisfiable`
    pub fn next_occurrence(
        &self,
        base: NaiveDate,
        rule: &RecurrenceRule,
        not_before: NaiveDate,
    ) -> Result<NaiveDate, CoreError> {
        let next = match rule {
            RecurrenceRule::None => {
                return Err(CoreError::InvalidRule(
                    "a task without a repeat rule has no next occurrence".to_string(),
                ))
            }
            RecurrenceRule::Daily { interval } => self.next_daily(base, *interval, not_before, rule)?,
            RecurrenceRule::Yearly => self.next_yearly(base, not_before, rule)?,
            RecurrenceRule::Weekly { weekdays } => {
                if weekdays.is_empty() {
                    return Err(unsatisfiable(rule, base));
                }
                self.scan(base, not_before, rule, |date| rule.matches_weekday(date))?
            }
            RecurrenceRule::Monthly { days, months } => {
                if days.is_empty() {
                    return Err(unsatisfiable(rule, base));
                }
                self.scan(base, not_before, rule, |date| matches_month_day(date, days, months))?
            }
        };

        debug!(
            base = %base,
            not_before = %not_before,
            rule = %rule,
            next = %next,
            "computed next occurrence"
        );
        Ok(next)
    }

    /// Parses the `YYYYMMDD` date and repeat string and returns the next date
    /// after it that is not earlier than `now`, formatted as `YYYYMMDD`.
    pub fn next_date(&self, now: NaiveDate, date: &str, repeat: &str) -> Result<String, CoreError> {
        let base = parse_date(date)?;
        let rule = grammar::parse(repeat)?;
        if !rule.is_recurring() {
            return Err(CoreError::InvalidRule("repeat rule is empty".to_string()));
        }
        let next = self.next_occurrence(base, &rule, now)?;
        Ok(format_date(next))
    }

    fn next_daily(
        &self,
        base: NaiveDate,
        interval: u32,
        not_before: NaiveDate,
        rule: &RecurrenceRule,
    ) -> Result<NaiveDate, CoreError> {
        if interval == 0 {
            return Err(CoreError::InvalidRule("daily interval must be positive".to_string()));
        }
        let interval = i64::from(interval);
        let gap = (not_before - base).num_days();
        // ceil(gap / interval), but never fewer than one step
        let steps = if gap <= 0 { 1 } else { (gap + interval - 1) / interval };
        base.checked_add_days(Days::new((steps * interval) as u64))
            .ok_or_else(|| unsatisfiable(rule, base))
    }

    fn next_yearly(
        &self,
        base: NaiveDate,
        not_before: NaiveDate,
        rule: &RecurrenceRule,
    ) -> Result<NaiveDate, CoreError> {
        let (month, day) = (base.month(), base.day());
        let span = (not_before.year() - base.year()).max(0);
        // leap years can be up to eight years apart (e.g. 2096 -> 2104)
        let max_steps = span + self.config.horizon_years as i32 + 8;

        for step in 1..=max_steps {
            let Some(year) = base.year().checked_add(step) else {
                break;
            };
            if let Some(candidate) = self.anniversary(year, month, day) {
                if candidate >= not_before {
                    return Ok(candidate);
                }
            }
        }
        Err(unsatisfiable(rule, base))
    }

    fn anniversary(&self, year: i32, month: u32, day: u32) -> Option<NaiveDate> {
        if month == 2 && day == 29 && !is_leap_year(year) {
            return match self.config.leap_day {
                LeapDayPolicy::Skip => None,
                LeapDayPolicy::Clamp => NaiveDate::from_ymd_opt(year, 2, 28),
                LeapDayPolicy::RollOver => NaiveDate::from_ymd_opt(year, 3, 1),
            };
        }
        NaiveDate::from_ymd_opt(year, month, day)
    }

    /// Linear forward scan. Days before `not_before` can never be returned, so
    /// the scan starts at whichever of `base + 1` and `not_before` is later.
    fn scan(
        &self,
        base: NaiveDate,
        not_before: NaiveDate,
        rule: &RecurrenceRule,
        matches: impl Fn(NaiveDate) -> bool,
    ) -> Result<NaiveDate, CoreError> {
        let first = base.succ_opt().ok_or_else(|| unsatisfiable(rule, base))?;
        let start = first.max(not_before);
        let horizon = u64::from(self.config.horizon_years) * 366;

        let mut candidate = start;
        for _ in 0..=horizon {
            if matches(candidate) {
                return Ok(candidate);
            }
            candidate = match candidate.succ_opt() {
                Some(next) => next,
                None => break,
            };
        }
        Err(unsatisfiable(rule, base))
    }
}

/// Converts a rule day (`1..=31`, or `-1`/`-2` counted from the month's end)
/// to a day number in the given month. Returns `None` when the month has no
/// such day.
pub fn resolve_day(day: i8, year: i32, month: u32) -> Option<u32> {
    let last = days_in_month(year, month)?;
    match day {
        d if d > 0 => {
            let d = d as u32;
            (d <= last).then_some(d)
        }
        d if d < 0 => {
            let back = u32::from(d.unsigned_abs());
            (back <= last).then(|| last + 1 - back)
        }
        _ => None,
    }
}

fn matches_month_day(date: NaiveDate, days: &BTreeSet<i8>, months: &BTreeSet<u8>) -> bool {
    if !months.is_empty() && !months.contains(&(date.month() as u8)) {
        return false;
    }
    days.iter()
        .any(|&day| resolve_day(day, date.year(), date.month()) == Some(date.day()))
}

fn unsatisfiable(rule: &RecurrenceRule, base: NaiveDate) -> CoreError {
    CoreError::Unsatisfiable(format!("'{}' has no occurrence after {}", rule, format_date(base)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    fn next(rule: &str, base: &str, not_before: &str) -> Result<NaiveDate, CoreError> {
        RecurrenceEngine::default().next_occurrence(
            date(base),
            &grammar::parse(rule).unwrap(),
            date(not_before),
        )
    }

    mod documented_examples {
        use super::*;

        #[rstest]
        #[case("d 3", "20240101", "20240101", "20240104")]
        #[case("w 1,3", "20240301", "20240301", "20240304")]
        #[case("m -1", "20240115", "20240201", "20240229")]
        fn test_examples(
            #[case] rule: &str,
            #[case] base: &str,
            #[case] not_before: &str,
            #[case] expected: &str,
        ) {
            assert_eq!(next(rule, base, not_before).unwrap(), date(expected));
        }
    }

    mod daily {
        use super::*;

        #[rstest]
        #[case("d 1", "20240110", "20240101", "20240111")]
        #[case("d 7", "20240110", "20240110", "20240117")]
        #[case("d 7", "20240101", "20240115", "20240115")]
        #[case("d 7", "20240101", "20240116", "20240122")]
        #[case("d 400", "20240101", "20240101", "20250204")]
        #[case("d 1", "20240228", "20240228", "20240229")]
        fn test_daily(
            #[case] rule: &str,
            #[case] base: &str,
            #[case] not_before: &str,
            #[case] expected: &str,
        ) {
            assert_eq!(next(rule, base, not_before).unwrap(), date(expected));
        }
    }

    mod yearly {
        use super::*;

        #[test]
        fn test_advances_once_when_already_satisfied() {
            assert_eq!(next("y", "20240615", "20200101").unwrap(), date("20250615"));
        }

        #[test]
        fn test_catches_up_to_not_before() {
            assert_eq!(next("y", "20200101", "20240615").unwrap(), date("20250101"));
            assert_eq!(next("y", "20200101", "20240101").unwrap(), date("20240101"));
        }

        #[rstest]
        #[case(LeapDayPolicy::Skip, "20280229")]
        #[case(LeapDayPolicy::Clamp, "20250228")]
        #[case(LeapDayPolicy::RollOver, "20250301")]
        fn test_leap_day_policy(#[case] policy: LeapDayPolicy, #[case] expected: &str) {
            let engine = RecurrenceEngine::new(EngineConfig {
                leap_day: policy,
                ..Default::default()
            });
            let result = engine
                .next_occurrence(date("20240229"), &RecurrenceRule::Yearly, date("20240301"))
                .unwrap();
            assert_eq!(result, date(expected));
        }

        #[test]
        fn test_skip_across_century() {
            // 2100 is not a leap year
            assert_eq!(next("y", "20960229", "20960301").unwrap(), date("21040229"));
        }
    }

    mod weekly {
        use super::*;

        #[rstest]
        #[case("w 7", "20240303", "20240303", "20240310")]
        #[case("w 5", "20240101", "20240301", "20240301")]
        #[case("w 1,2,3,4,5,6,7", "20241231", "20241231", "20250101")]
        fn test_weekly(
            #[case] rule: &str,
            #[case] base: &str,
            #[case] not_before: &str,
            #[case] expected: &str,
        ) {
            assert_eq!(next(rule, base, not_before).unwrap(), date(expected));
        }

        #[test]
        fn test_empty_weekday_set_is_unsatisfiable() {
            let rule = RecurrenceRule::Weekly { weekdays: BTreeSet::new() };
            let result = RecurrenceEngine::default().next_occurrence(
                date("20240101"),
                &rule,
                date("20240101"),
            );
            assert!(matches!(result, Err(CoreError::Unsatisfiable(_))));
        }
    }

    mod monthly {
        use super::*;

        #[rstest]
        #[case("m 31", "20240130", "20240101", "20240131")]
        #[case("m 31", "20240131", "20240101", "20240331")]
        #[case("m -1", "20230201", "20230201", "20230228")]
        #[case("m -2", "20230201", "20230201", "20230227")]
        #[case("m -2", "20240201", "20240201", "20240228")]
        #[case("m -1", "20240401", "20240401", "20240430")]
        #[case("m 1,15 3", "20240101", "20240101", "20240301")]
        #[case("m 1,-1 2,8", "20240229", "20240229", "20240801")]
        #[case("m 29 2", "20240301", "20240301", "20280229")]
        #[case("m 29 2", "20970101", "20970101", "21040229")]
        #[case("m 5", "20240105", "20240105", "20240205")]
        fn test_monthly(
            #[case] rule: &str,
            #[case] base: &str,
            #[case] not_before: &str,
            #[case] expected: &str,
        ) {
            assert_eq!(next(rule, base, not_before).unwrap(), date(expected));
        }

        #[rstest]
        #[case("m 31 2")]
        #[case("m 30 2")]
        #[case("m 31 4,6,9,11")]
        fn test_impossible_dates_are_unsatisfiable(#[case] rule: &str) {
            assert!(matches!(
                next(rule, "20240101", "20240101"),
                Err(CoreError::Unsatisfiable(_))
            ));
        }

        #[rstest]
        #[case(-1, 2023, 2, Some(28))]
        #[case(-1, 2024, 2, Some(29))]
        #[case(-1, 2024, 4, Some(30))]
        #[case(-1, 2024, 1, Some(31))]
        #[case(-2, 2024, 4, Some(29))]
        #[case(31, 2024, 4, None)]
        #[case(0, 2024, 4, None)]
        #[case(1, 2024, 13, None)]
        fn test_resolve_day(
            #[case] day: i8,
            #[case] year: i32,
            #[case] month: u32,
            #[case] expected: Option<u32>,
        ) {
            assert_eq!(resolve_day(day, year, month), expected);
        }
    }

    #[test]
    fn test_none_is_invalid() {
        let result = RecurrenceEngine::default().next_occurrence(
            date("20240101"),
            &RecurrenceRule::None,
            date("20240101"),
        );
        assert!(matches!(result, Err(CoreError::InvalidRule(_))));
    }

    mod next_date {
        use super::*;

        #[test]
        fn test_formats_result() {
            let engine = RecurrenceEngine::default();
            assert_eq!(
                engine.next_date(date("20240126"), "20240113", "d 7").unwrap(),
                "20240127"
            );
        }

        #[test]
        fn test_rejects_empty_repeat() {
            let engine = RecurrenceEngine::default();
            assert!(matches!(
                engine.next_date(date("20240126"), "20240113", ""),
                Err(CoreError::InvalidRule(_))
            ));
        }

        #[test]
        fn test_rejects_bad_inputs() {
            let engine = RecurrenceEngine::default();
            assert!(matches!(
                engine.next_date(date("20240126"), "2024-01-13", "d 1"),
                Err(CoreError::ValidationFailed(_))
            ));
            assert!(matches!(
                engine.next_date(date("20240126"), "20240113", "m"),
                Err(CoreError::Parse(crate::error::ParseRuleError::Malformed(_)))
            ));
        }
    }

    fn any_date() -> impl Strategy<Value = NaiveDate> {
        (0i64..20_000).prop_map(|offset| {
            NaiveDate::from_ymd_opt(1990, 1, 1).unwrap() + chrono::Duration::days(offset)
        })
    }

    fn any_rule() -> impl Strategy<Value = RecurrenceRule> {
        prop_oneof![
            (1u32..=400).prop_map(|interval| RecurrenceRule::Daily { interval }),
            Just(RecurrenceRule::Yearly),
            prop::collection::btree_set(1u8..=7, 1..4)
                .prop_map(|weekdays| RecurrenceRule::Weekly { weekdays }),
            (
                prop::collection::btree_set(prop_oneof![1i8..=28, Just(-1i8), Just(-2i8)], 1..4),
                prop::collection::btree_set(1u8..=12, 0..3)
            )
                .prop_map(|(days, months)| RecurrenceRule::Monthly { days, months }),
        ]
    }

    proptest! {
        #[test]
        fn prop_daily_alignment(
            interval in 1u32..=400,
            base in any_date(),
            gap in 1i64..3000,
        ) {
            let not_before = base + chrono::Duration::days(gap);
            let rule = RecurrenceRule::Daily { interval };
            let result = RecurrenceEngine::default().next_occurrence(base, &rule, not_before).unwrap();
            prop_assert!(result >= not_before);
            prop_assert!(result > base);
            prop_assert_eq!((result - base).num_days() % i64::from(interval), 0);
            // smallest such date
            prop_assert!(result - chrono::Duration::days(i64::from(interval)) < not_before);
        }

        #[test]
        fn prop_result_respects_both_bounds(
            rule in any_rule(),
            base in any_date(),
            not_before in any_date(),
        ) {
            let result = RecurrenceEngine::default().next_occurrence(base, &rule, not_before).unwrap();
            prop_assert!(result > base);
            prop_assert!(result >= not_before);
        }

        #[test]
        fn prop_repeated_application_advances(
            rule in any_rule(),
            base in any_date(),
        ) {
            let engine = RecurrenceEngine::default();
            let first = engine.next_occurrence(base, &rule, base).unwrap();
            let second = engine.next_occurrence(first, &rule, first.succ_opt().unwrap()).unwrap();
            prop_assert!(second > first);
        }
    }
}
