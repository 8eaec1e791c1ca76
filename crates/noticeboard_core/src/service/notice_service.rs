//! Notice query and mutation service.
//!
//! # Responsibility
//! - Run filtered reads against the `notices` collection and return them
//!   normalized and sorted.
//! - Insert new notices and hand back the store-assigned id.
//!
//! # Invariants
//! - Fetch results are sorted by publication date, newest first; the sort is
//!   stable and notices without a date come last.
//! - A fetch either returns every matching notice or fails as a whole.
//! - Failed inserts are logged and returned to the caller, never swallowed.

use crate::model::notice::{
    NewNotice, Notice, NoticeDecodeError, NoticeId, NoticeValidationError, NOTICES_COLLECTION,
};
use crate::repo::document_repo::{DocumentRepository, RepoError};
use crate::search::notice_query::{build_notice_query, NoticeSearch, SearchError};
use chrono::{Local, NaiveDate, TimeZone};
use log::{debug, error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Service error for notice use-cases.
///
/// `Display` yields the single human-readable message shown to users.
#[derive(Debug)]
pub enum NoticeServiceError {
    /// Insert payload failed validation.
    Validation(NoticeValidationError),
    /// Search inputs cannot be turned into a query.
    Search(SearchError),
    /// A stored document does not have the notice shape.
    Decode(NoticeDecodeError),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for NoticeServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Search(err) => write!(f, "{err}"),
            Self::Decode(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for NoticeServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Search(err) => Some(err),
            Self::Decode(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<NoticeValidationError> for NoticeServiceError {
    fn from(value: NoticeValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<SearchError> for NoticeServiceError {
    fn from(value: SearchError) -> Self {
        Self::Search(value)
    }
}

impl From<NoticeDecodeError> for NoticeServiceError {
    fn from(value: NoticeDecodeError) -> Self {
        Self::Decode(value)
    }
}

impl From<RepoError> for NoticeServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Notice service facade over a document repository.
///
/// Day filters are interpreted in `Tz`, the local zone by default.
pub struct NoticeService<R: DocumentRepository, Tz: TimeZone = Local> {
    repo: R,
    tz: Tz,
}

impl<R: DocumentRepository> NoticeService<R> {
    /// Creates a service filtering days in the process-local time zone.
    pub fn new(repo: R) -> Self {
        Self { repo, tz: Local }
    }
}

impl<R: DocumentRepository, Tz: TimeZone> NoticeService<R, Tz> {
    /// Creates a service filtering days in `tz`.
    pub fn with_time_zone(repo: R, tz: Tz) -> Self {
        Self { repo, tz }
    }

    /// Time zone used for day windows and display.
    pub fn time_zone(&self) -> &Tz {
        &self.tz
    }

    /// Fetches notices whose title starts with `term`, optionally restricted
    /// to the calendar day `date`.
    pub fn fetch_notices(
        &self,
        term: &str,
        date: Option<NaiveDate>,
    ) -> Result<Vec<Notice>, NoticeServiceError> {
        self.search(&NoticeSearch::new(term, date))
    }

    /// Fetches notices matching `search`, newest first.
    pub fn search(&self, search: &NoticeSearch) -> Result<Vec<Notice>, NoticeServiceError> {
        let started_at = Instant::now();
        debug!(
            "event=notice_fetch module=service status=start filtered={} has_date={}",
            search.is_filtered(),
            search.date.is_some()
        );

        match self.run_search(search) {
            Ok(notices) => {
                info!(
                    "event=notice_fetch module=service status=ok count={} duration_ms={}",
                    notices.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(notices)
            }
            Err(err) => {
                error!(
                    "event=notice_fetch module=service status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    /// Inserts one notice and returns its store-assigned id.
    pub fn create_notice(&self, notice: &NewNotice) -> Result<NoticeId, NoticeServiceError> {
        let result = notice
            .validate()
            .map_err(NoticeServiceError::from)
            .and_then(|()| {
                self.repo
                    .insert_document(NOTICES_COLLECTION, &notice.to_fields())
                    .map_err(NoticeServiceError::from)
            });

        match result {
            Ok(id) => {
                info!("event=notice_create module=service status=ok notice_id={id}");
                Ok(id)
            }
            Err(err) => {
                error!("event=notice_create module=service status=error error={err}");
                Err(err)
            }
        }
    }

    /// Gets one notice by id.
    pub fn get_notice(&self, id: NoticeId) -> Result<Option<Notice>, NoticeServiceError> {
        let document = self.repo.get_document(NOTICES_COLLECTION, id)?;
        let notice = document
            .as_ref()
            .map(Notice::from_document)
            .transpose()?;
        Ok(notice)
    }

    fn run_search(&self, search: &NoticeSearch) -> Result<Vec<Notice>, NoticeServiceError> {
        let query = build_notice_query(search, &self.tz)?;
        let documents = self.repo.query_documents(&query)?;
        let mut notices = documents
            .iter()
            .map(Notice::from_document)
            .collect::<Result<Vec<_>, _>>()?;
        sort_newest_first(&mut notices);
        Ok(notices)
    }
}

/// Sorts by publication date descending; undated notices go last.
pub fn sort_newest_first(notices: &mut [Notice]) {
    notices.sort_by(|a, b| b.publication_date.cmp(&a.publication_date));
}

#[cfg(test)]
mod tests {
    use super::sort_newest_first;
    use crate::model::notice::Notice;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn notice(title: &str, day: Option<u32>) -> Notice {
        Notice {
            id: Uuid::new_v4(),
            title: title.to_string(),
            publication_date: day.map(|d| Utc.with_ymd_and_hms(2024, 3, d, 0, 0, 0).unwrap()),
            content: String::new(),
        }
    }

    #[test]
    fn sort_puts_newest_first_and_undated_last() {
        let mut notices = vec![
            notice("undated", None),
            notice("old", Some(1)),
            notice("new", Some(9)),
        ];
        sort_newest_first(&mut notices);
        let titles = notices.iter().map(|n| n.title.as_str()).collect::<Vec<_>>();
        assert_eq!(titles, vec!["new", "old", "undated"]);
    }

    #[test]
    fn sort_keeps_ties_in_store_order() {
        let mut notices = vec![notice("first", Some(5)), notice("second", Some(5))];
        sort_newest_first(&mut notices);
        assert_eq!(notices[0].title, "first");
        assert_eq!(notices[1].title, "second");
    }
}
