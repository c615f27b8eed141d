//! Resolves human-entered date expressions (`2024-03-01`, `2024-03`, `2024`, `2024-Q1`, `Q1`)
//! into concrete calendar dates.
use crate::dates::{last_day_of_month, quarter_end, quarter_start};
use crate::error::{DateExpressionError, RangeError};
use chrono::{Datelike, Duration, Local, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

/// Longest expression any rule can match (`YYYY-MM-DD`).
const MAX_EXPRESSION_LEN: usize = 10;

static FULL_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]{4})-([0-9]{1,2})-([0-9]{1,2})$").expect("valid regex"));
static YEAR_MONTH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]{4})-([0-9]{1,2})$").expect("valid regex"));
static YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([0-9]{4})$").expect("valid regex"));
static YEAR_QUARTER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]{4})-[qQ]([0-9])$").expect("valid regex"));
static QUARTER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[qQ]([0-9])$").expect("valid regex"));

/// Date expression parser anchored to a reference "today" (used by bare `Qn`).
#[derive(Debug, Clone, Copy)]
pub struct DateExpressionParser {
    pub reference_date: NaiveDate,
}

impl Default for DateExpressionParser {
    fn default() -> Self {
        Self::new(Local::now().date_naive())
    }
}

impl DateExpressionParser {
    pub fn new(reference_date: NaiveDate) -> Self {
        Self { reference_date }
    }

    /// Resolves `expr` to the first (`from_beginning`) or last day of the period it names.
    ///
    /// Rules are tried in this order and the first whose shape matches decides the result:
    ///
    /// 1. `YYYY-MM-DD` (1–2 digit month/day): that exact date.
    /// 2. `YYYY-MM`: first or last day of the month.
    /// 3. `YYYY`: Jan 1 or Dec 31.
    /// 4. `YYYY-Qn` / `YYYY-qn`: first day of the quarter or last day of its third month.
    /// 5. `Qn` / `qn`: same, in the reference year.
    ///
    /// Empty input, input longer than 10 characters and impossible calendar values
    /// (`2021-13`, `Q5`) yield `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use chrono::NaiveDate;
    /// # use worklog_core::DateExpressionParser;
    /// let parser = DateExpressionParser::new(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
    /// assert_eq!(parser.parse("2021-Q1", false), NaiveDate::from_ymd_opt(2021, 3, 31));
    /// assert_eq!(parser.parse("q3", true), NaiveDate::from_ymd_opt(2024, 7, 1));
    /// assert_eq!(parser.parse("yesterday", true), None);
    /// ```
    pub fn parse(&self, expr: &str, from_beginning: bool) -> Option<NaiveDate> {
        if expr.is_empty() || expr.chars().count() > MAX_EXPRESSION_LEN {
            return None;
        }

        if let Some(caps) = FULL_DATE.captures(expr) {
            return NaiveDate::from_ymd_opt(
                caps[1].parse().ok()?,
                caps[2].parse().ok()?,
                caps[3].parse().ok()?,
            );
        }

        if let Some(caps) = YEAR_MONTH.captures(expr) {
            let year: i32 = caps[1].parse().ok()?;
            let month: u32 = caps[2].parse().ok()?;
            return if from_beginning {
                NaiveDate::from_ymd_opt(year, month, 1)
            } else {
                last_day_of_month(year, month)
            };
        }

        if let Some(caps) = YEAR.captures(expr) {
            let year: i32 = caps[1].parse().ok()?;
            return if from_beginning {
                NaiveDate::from_ymd_opt(year, 1, 1)
            } else {
                NaiveDate::from_ymd_opt(year, 12, 31)
            };
        }

        if let Some(caps) = YEAR_QUARTER.captures(expr) {
            return quarter_boundary(caps[1].parse().ok()?, caps[2].parse().ok()?, from_beginning);
        }

        if let Some(caps) = QUARTER.captures(expr) {
            return quarter_boundary(
                self.reference_date.year(),
                caps[1].parse().ok()?,
                from_beginning,
            );
        }

        None
    }

    /// Same as [`parse`](Self::parse) but reports an unmatched expression as an error.
    pub fn parse_strict(
        &self,
        expr: &str,
        from_beginning: bool,
    ) -> Result<NaiveDate, DateExpressionError> {
        self.parse(expr, from_beginning)
            .ok_or_else(|| DateExpressionError {
                input: expr.to_string(),
            })
    }
}

fn quarter_boundary(year: i32, quarter: u32, from_beginning: bool) -> Option<NaiveDate> {
    if from_beginning {
        quarter_start(year, quarter)
    } else {
        quarter_end(year, quarter)
    }
}

/// The ways a caller can ask for a span of days.
///
/// `days` wins over `from`, which wins over `date`.
#[derive(Clone, Debug, Default)]
pub struct RangeQuery<'a> {
    /// The last `n` days up to and including today.
    pub days: Option<i64>,
    pub from: Option<&'a str>,
    pub to: Option<&'a str>,
    /// A single expression covering a whole period (`2024-03`, `2024-Q1`, ...).
    pub date: Option<&'a str>,
    pub epics_only: bool,
    pub tags: Option<&'a [String]>,
}

/// A resolved, inclusive date span. An unset `end` means "up to today".
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn resolve(
        parser: &DateExpressionParser,
        query: &RangeQuery<'_>,
    ) -> Result<DateRange, RangeError> {
        let today = parser.reference_date;
        if let Some(days) = query.days {
            if days < 0 {
                return Err(RangeError::NegativeDays { days });
            }
            let start = Duration::try_days(days)
                .and_then(|span| today.checked_sub_signed(span))
                .ok_or(RangeError::OutOfRange { days })?;
            return Ok(DateRange {
                start,
                end: Some(today),
            });
        }

        if let Some(from) = query.from {
            let start = parser.parse_strict(from, true)?;
            let end = match query.to {
                Some(to) => Some(parser.parse_strict(to, false)?),
                None => None,
            };
            return Ok(DateRange { start, end });
        }

        if let Some(date) = query.date {
            return Ok(DateRange {
                start: parser.parse_strict(date, true)?,
                end: Some(parser.parse_strict(date, false)?),
            });
        }

        Err(RangeError::Unspecified)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn parser() -> DateExpressionParser {
        DateExpressionParser::new(d(2024, 8, 15))
    }

    #[rstest]
    #[case::full_date("2021-03-04", true, Some(d(2021, 3, 4)))]
    #[case::full_date_ignores_boundary("2021-03-04", false, Some(d(2021, 3, 4)))]
    #[case::single_digit_parts("2021-3-4", true, Some(d(2021, 3, 4)))]
    #[case::month_start("2021-02", true, Some(d(2021, 2, 1)))]
    #[case::month_end_non_leap("2021-02", false, Some(d(2021, 2, 28)))]
    #[case::month_end_leap("2024-02", false, Some(d(2024, 2, 29)))]
    #[case::year_start("2021", true, Some(d(2021, 1, 1)))]
    #[case::year_end("2021", false, Some(d(2021, 12, 31)))]
    #[case::quarter_start("2021-Q1", true, Some(d(2021, 1, 1)))]
    #[case::quarter_end("2021-Q1", false, Some(d(2021, 3, 31)))]
    #[case::lowercase_quarter("2021-q4", false, Some(d(2021, 12, 31)))]
    #[case::bare_quarter_start("Q2", true, Some(d(2024, 4, 1)))]
    #[case::bare_quarter_end("q3", false, Some(d(2024, 9, 30)))]
    fn resolves_supported_shapes(
        #[case] input: &str,
        #[case] from_beginning: bool,
        #[case] expected: Option<NaiveDate>,
    ) {
        assert_eq!(parser().parse(input, from_beginning), expected);
    }

    #[rstest]
    #[case::empty("")]
    #[case::invalid_month_in_date("2021-13-01")]
    #[case::invalid_day("2021-02-30")]
    #[case::invalid_month("2021-13")]
    #[case::month_zero("2021-00")]
    #[case::quarter_five("2021-Q5")]
    #[case::bare_quarter_zero("Q0")]
    #[case::too_long("2021-03-04T10")]
    #[case::keyword("yesterday")]
    #[case::trailing_garbage("2021-Q1x")]
    #[case::leading_garbage("x2021")]
    fn rejects_everything_else(#[case] input: &str) {
        assert_eq!(parser().parse(input, true), None);
        assert_eq!(parser().parse(input, false), None);
    }

    #[test]
    fn year_is_not_swallowed_by_month_rule() {
        assert_eq!(parser().parse("2021", false), Some(d(2021, 12, 31)));
    }

    #[test]
    fn strict_variant_raises() {
        let err = parser().parse_strict("nope", true).unwrap_err();
        assert_eq!(err.input, "nope");
        assert_eq!(parser().parse_strict("2021-Q2", true), Ok(d(2021, 4, 1)));
    }

    #[test]
    fn range_from_days() {
        let query = RangeQuery {
            days: Some(7),
            ..Default::default()
        };
        let range = DateRange::resolve(&parser(), &query).unwrap();
        assert_eq!(range.start, d(2024, 8, 8));
        assert_eq!(range.end, Some(d(2024, 8, 15)));
    }

    #[rstest]
    #[case::negative(-1, RangeError::NegativeDays { days: -1 })]
    #[case::before_the_calendar(1_000_000_000, RangeError::OutOfRange { days: 1_000_000_000 })]
    #[case::beyond_a_time_delta(i64::MAX, RangeError::OutOfRange { days: i64::MAX })]
    fn range_rejects_unusable_day_counts(#[case] days: i64, #[case] expected: RangeError) {
        let query = RangeQuery {
            days: Some(days),
            ..Default::default()
        };
        assert_eq!(DateRange::resolve(&parser(), &query), Err(expected));
    }

    #[test]
    fn range_from_to_uses_period_boundaries() {
        let query = RangeQuery {
            from: Some("2024-Q1"),
            to: Some("2024-05"),
            ..Default::default()
        };
        let range = DateRange::resolve(&parser(), &query).unwrap();
        assert_eq!(range.start, d(2024, 1, 1));
        assert_eq!(range.end, Some(d(2024, 5, 31)));
    }

    #[test]
    fn range_without_to_is_open_ended() {
        let query = RangeQuery {
            from: Some("2024"),
            ..Default::default()
        };
        let range = DateRange::resolve(&parser(), &query).unwrap();
        assert_eq!(range.start, d(2024, 1, 1));
        assert_eq!(range.end, None);
    }

    #[test]
    fn range_for_single_period() {
        let query = RangeQuery {
            date: Some("2023-02"),
            ..Default::default()
        };
        let range = DateRange::resolve(&parser(), &query).unwrap();
        assert_eq!(range.start, d(2023, 2, 1));
        assert_eq!(range.end, Some(d(2023, 2, 28)));
    }

    #[test]
    fn range_with_bad_expression_or_nothing() {
        let bad = RangeQuery {
            from: Some("whenever"),
            ..Default::default()
        };
        assert!(matches!(
            DateRange::resolve(&parser(), &bad),
            Err(RangeError::Expression(_))
        ));
        assert!(matches!(
            DateRange::resolve(&parser(), &RangeQuery::default()),
            Err(RangeError::Unspecified)
        ));
    }
}
