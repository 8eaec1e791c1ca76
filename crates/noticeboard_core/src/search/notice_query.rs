//! Notice query construction.
//!
//! # Responsibility
//! - Emulate "title starts with" through a lexicographic range.
//! - Turn a calendar day into an instant window in a given time zone.
//!
//! # Invariants
//! - Title bounds are `[term, term + U+F8FF)`.
//! - The day window is `[00:00:00.000, 23:59:59.999]` local time, inclusive.
//! - An empty term without a date produces an unfiltered query.
//! - Any date filter also applies the title range, even for an empty term.

use crate::model::notice::{NOTICES_COLLECTION, PUBLICATION_DATE_FIELD, TITLE_FIELD};
use crate::repo::document::Timestamp;
use crate::repo::query::{CollectionQuery, FilterOp};
use chrono::{DateTime, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Private-use code point sorting after any realistic title text.
pub const TITLE_PREFIX_SENTINEL: char = '\u{f8ff}';

/// Result type for query construction.
pub type SearchResult<T> = Result<T, SearchError>;

/// Query construction error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// The boundary of `date` does not exist in the active time zone.
    NonexistentLocalTime { date: NaiveDate, boundary: &'static str },
}

impl Display for SearchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonexistentLocalTime { date, boundary } => {
                write!(f, "{boundary} of {date} does not exist in the local time zone")
            }
        }
    }
}

impl Error for SearchError {}

/// User-facing search inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoticeSearch {
    /// Title prefix; empty means no prefix constraint unless `date` is set.
    pub term: String,
    /// Calendar day in the caller's time zone.
    pub date: Option<NaiveDate>,
}

impl NoticeSearch {
    pub fn new(term: impl Into<String>, date: Option<NaiveDate>) -> Self {
        Self {
            term: term.into(),
            date,
        }
    }

    /// Whether any filter applies.
    pub fn is_filtered(&self) -> bool {
        !self.term.is_empty() || self.date.is_some()
    }
}

/// Returns the `[lower, upper)` bounds matching titles that start with `term`.
pub fn title_prefix_range(term: &str) -> (String, String) {
    let mut upper = String::with_capacity(term.len() + TITLE_PREFIX_SENTINEL.len_utf8());
    upper.push_str(term);
    upper.push(TITLE_PREFIX_SENTINEL);
    (term.to_string(), upper)
}

/// Returns the first and last millisecond of `date` in `tz`, as UTC instants.
///
/// Ambiguous local times take the earliest start and the latest end.
pub fn day_window<Tz: TimeZone>(
    date: NaiveDate,
    tz: &Tz,
) -> SearchResult<(DateTime<Utc>, DateTime<Utc>)> {
    let start_of_day = date.and_time(NaiveTime::MIN);
    let end_of_day = date.and_time(last_millisecond_of_day());

    let start = match tz.from_local_datetime(&start_of_day) {
        LocalResult::Single(value) => value,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => {
            return Err(SearchError::NonexistentLocalTime {
                date,
                boundary: "start",
            })
        }
    };
    let end = match tz.from_local_datetime(&end_of_day) {
        LocalResult::Single(value) => value,
        LocalResult::Ambiguous(_, latest) => latest,
        LocalResult::None => {
            return Err(SearchError::NonexistentLocalTime {
                date,
                boundary: "end",
            })
        }
    };

    Ok((start.with_timezone(&Utc), end.with_timezone(&Utc)))
}

/// Builds the `notices` collection query for `search` in time zone `tz`.
pub fn build_notice_query<Tz: TimeZone>(
    search: &NoticeSearch,
    tz: &Tz,
) -> SearchResult<CollectionQuery> {
    let mut query = CollectionQuery::new(NOTICES_COLLECTION);
    if !search.is_filtered() {
        return Ok(query);
    }

    let (lower, upper) = title_prefix_range(&search.term);
    query = query
        .filter(TITLE_FIELD, FilterOp::GreaterThanOrEqual, lower)
        .filter(TITLE_FIELD, FilterOp::LessThan, upper);

    if let Some(date) = search.date {
        let (start, end) = day_window(date, tz)?;
        query = query
            .filter(
                PUBLICATION_DATE_FIELD,
                FilterOp::GreaterThanOrEqual,
                Timestamp::from_datetime(&start),
            )
            .filter(
                PUBLICATION_DATE_FIELD,
                FilterOp::LessThanOrEqual,
                Timestamp::from_datetime(&end),
            );
    }

    Ok(query)
}

fn last_millisecond_of_day() -> NaiveTime {
    NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN)
}

#[cfg(test)]
mod tests {
    use super::{build_notice_query, day_window, title_prefix_range, NoticeSearch};
    use crate::repo::document::{FieldValue, Timestamp};
    use crate::repo::query::FilterOp;
    use chrono::{FixedOffset, NaiveDate, TimeZone, Utc};

    fn march_first() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    #[test]
    fn prefix_range_appends_sentinel() {
        let (lower, upper) = title_prefix_range("Board");
        assert_eq!(lower, "Board");
        assert_eq!(upper, "Board\u{f8ff}");
        assert!("Board Meeting" >= lower.as_str());
        assert!("Board Meeting" < upper.as_str());
        assert!("Boa" < lower.as_str());
    }

    #[test]
    fn day_window_covers_local_calendar_day() {
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        let (start, end) = day_window(march_first(), &tz).unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 2, 29, 22, 0, 0).unwrap());
        assert_eq!(
            end,
            Utc.with_ymd_and_hms(2024, 3, 1, 21, 59, 59).unwrap()
                + chrono::Duration::milliseconds(999)
        );
    }

    #[test]
    fn empty_search_is_unfiltered() {
        let query = build_notice_query(&NoticeSearch::default(), &Utc).unwrap();
        assert_eq!(query.collection, "notices");
        assert!(query.is_unfiltered());
    }

    #[test]
    fn term_search_adds_title_range_only() {
        let query = build_notice_query(&NoticeSearch::new("Board", None), &Utc).unwrap();
        assert_eq!(query.filters.len(), 2);
        assert_eq!(query.filters[0].op, FilterOp::GreaterThanOrEqual);
        assert_eq!(query.filters[1].op, FilterOp::LessThan);
        assert_eq!(query.filters[1].value, FieldValue::from("Board\u{f8ff}"));
    }

    #[test]
    fn date_only_search_keeps_empty_title_range() {
        let query =
            build_notice_query(&NoticeSearch::new("", Some(march_first())), &Utc).unwrap();
        assert_eq!(query.filters.len(), 4);
        assert_eq!(query.filters[0].value, FieldValue::from(""));
        assert_eq!(query.filters[1].value, FieldValue::from("\u{f8ff}"));
        assert_eq!(
            query.filters[2].value,
            FieldValue::Timestamp(Timestamp {
                seconds: 1_709_251_200,
                nanos: 0
            })
        );
        assert_eq!(
            query.filters[3].value,
            FieldValue::Timestamp(Timestamp {
                seconds: 1_709_337_599,
                nanos: 999_000_000
            })
        );
    }
}
