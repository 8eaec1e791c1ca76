//! Notice board view state.
//!
//! # Responsibility
//! - Hold everything a table view renders: filters, load status, notices,
//!   pagination, add dialog with its draft, and the detail panel.
//! - Order overlapping fetches so the newest request always wins.
//!
//! # Invariants
//! - Every filter change starts a new fetch generation.
//! - `complete_fetch` ignores tickets older than the latest generation.
//! - A failed create keeps the add dialog open and exposes the error.

use crate::board::pagination::{Pagination, UnsupportedRowsPerPage};
use crate::model::notice::{NewNotice, Notice, NoticeId, NoticeValidationError};
use crate::search::notice_query::NoticeSearch;
use chrono::{NaiveDate, NaiveTime, TimeZone};
use log::debug;

/// Lifecycle of the latest fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Idle,
    Loading,
    Loaded,
    /// Message shown in place of the table.
    Failed(String),
}

/// Handle for one in-flight fetch.
///
/// Carries a snapshot of the filters the fetch must run with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    search: NoticeSearch,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn search(&self) -> &NoticeSearch {
        &self.search
    }
}

/// Form contents of the add dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoticeDraft {
    pub title: String,
    pub publication_date: Option<NaiveDate>,
    pub content: String,
}

impl NoticeDraft {
    /// Converts the draft into an insert payload.
    ///
    /// The chosen day is stored as its local midnight in `tz`.
    pub fn to_new_notice<Tz: TimeZone>(
        &self,
        tz: &Tz,
    ) -> Result<NewNotice, NoticeValidationError> {
        let date = self
            .publication_date
            .ok_or(NoticeValidationError::MissingPublicationDate)?;
        let midnight = tz
            .from_local_datetime(&date.and_time(NaiveTime::MIN))
            .earliest()
            .ok_or(NoticeValidationError::NonexistentLocalDate(date))?;
        let notice = NewNotice::new(self.title.clone(), midnight, self.content.clone());
        notice.validate()?;
        Ok(notice)
    }
}

/// Explicit view state owned by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeBoardState {
    search: NoticeSearch,
    status: LoadStatus,
    notices: Vec<Notice>,
    latest_generation: u64,
    pagination: Pagination,
    add_dialog_open: bool,
    draft: NoticeDraft,
    create_error: Option<String>,
    selected: Option<Notice>,
}

impl Default for NoticeBoardState {
    fn default() -> Self {
        Self::new()
    }
}

impl NoticeBoardState {
    pub fn new() -> Self {
        Self {
            search: NoticeSearch::default(),
            status: LoadStatus::Idle,
            notices: Vec::new(),
            latest_generation: 0,
            pagination: Pagination::default(),
            add_dialog_open: false,
            draft: NoticeDraft::default(),
            create_error: None,
            selected: None,
        }
    }

    pub fn search(&self) -> &NoticeSearch {
        &self.search
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status == LoadStatus::Loading
    }

    /// All notices of the latest successful fetch, newest first.
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub fn pagination_mut(&mut self) -> &mut Pagination {
        &mut self.pagination
    }

    pub fn set_rows_per_page(&mut self, rows: usize) -> Result<(), UnsupportedRowsPerPage> {
        self.pagination.set_rows_per_page(rows)
    }

    /// Notices on the current page.
    pub fn page_items(&self) -> &[Notice] {
        let range = self.pagination.range();
        self.notices.get(range).unwrap_or(&[])
    }

    /// Updates the title filter and starts a fetch for it.
    pub fn set_search_term(&mut self, term: impl Into<String>) -> FetchTicket {
        self.search.term = term.into();
        self.begin_fetch()
    }

    /// Updates the day filter and starts a fetch for it.
    pub fn set_search_date(&mut self, date: Option<NaiveDate>) -> FetchTicket {
        self.search.date = date;
        self.begin_fetch()
    }

    /// Starts a fetch with the current filters.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.latest_generation += 1;
        self.status = LoadStatus::Loading;
        FetchTicket {
            generation: self.latest_generation,
            search: self.search.clone(),
        }
    }

    /// Applies a fetch result if `ticket` is still the latest fetch.
    ///
    /// Returns `false` when the result was stale and dropped.
    pub fn complete_fetch(
        &mut self,
        ticket: &FetchTicket,
        result: Result<Vec<Notice>, String>,
    ) -> bool {
        if ticket.generation != self.latest_generation {
            debug!(
                "event=notice_fetch_result module=board status=stale generation={} latest={}",
                ticket.generation, self.latest_generation
            );
            return false;
        }

        match result {
            Ok(notices) => {
                self.pagination.reset(notices.len());
                self.notices = notices;
                self.status = LoadStatus::Loaded;
            }
            Err(message) => {
                self.status = LoadStatus::Failed(message);
            }
        }
        true
    }

    pub fn is_add_dialog_open(&self) -> bool {
        self.add_dialog_open
    }

    pub fn open_add_dialog(&mut self) {
        self.add_dialog_open = true;
        self.create_error = None;
    }

    /// Hides the add dialog; the draft is kept for the next opening.
    pub fn close_add_dialog(&mut self) {
        self.add_dialog_open = false;
    }

    pub fn draft(&self) -> &NoticeDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut NoticeDraft {
        &mut self.draft
    }

    /// Last create failure, shown inside the add dialog.
    pub fn create_error(&self) -> Option<&str> {
        self.create_error.as_deref()
    }

    /// Validates the draft into an insert payload.
    ///
    /// Validation failures are recorded in `create_error`.
    pub fn submit_draft<Tz: TimeZone>(
        &mut self,
        tz: &Tz,
    ) -> Result<NewNotice, NoticeValidationError> {
        match self.draft.to_new_notice(tz) {
            Ok(notice) => {
                self.create_error = None;
                Ok(notice)
            }
            Err(err) => {
                self.create_error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Records the outcome of an insert.
    ///
    /// On success the draft is cleared, the dialog closes and a re-fetch of
    /// the current view is started. On failure the dialog stays open.
    pub fn complete_create(&mut self, result: Result<NoticeId, String>) -> Option<FetchTicket> {
        match result {
            Ok(_) => {
                self.draft = NoticeDraft::default();
                self.add_dialog_open = false;
                self.create_error = None;
                Some(self.begin_fetch())
            }
            Err(message) => {
                self.create_error = Some(message);
                None
            }
        }
    }

    /// Notice shown in the detail panel.
    pub fn selected(&self) -> Option<&Notice> {
        self.selected.as_ref()
    }

    pub fn view_notice(&mut self, notice: Notice) {
        self.selected = Some(notice);
    }

    pub fn close_detail(&mut self) {
        self.selected = None;
    }
}

#[cfg(test)]
mod tests {
    use super::{LoadStatus, NoticeBoardState, NoticeDraft};
    use crate::model::notice::{Notice, NoticeValidationError};
    use chrono::{NaiveDate, TimeZone, Utc};
    use uuid::Uuid;

    fn sample(title: &str) -> Notice {
        Notice {
            id: Uuid::new_v4(),
            title: title.to_string(),
            publication_date: None,
            content: String::new(),
        }
    }

    #[test]
    fn stale_fetch_is_discarded() {
        let mut state = NoticeBoardState::new();
        let first = state.set_search_term("B");
        let second = state.set_search_term("Bo");

        assert!(state.complete_fetch(&second, Ok(vec![sample("Board")])));
        assert!(!state.complete_fetch(&first, Ok(vec![sample("Bus"), sample("Bed")])));

        assert_eq!(state.status(), &LoadStatus::Loaded);
        assert_eq!(state.notices().len(), 1);
        assert_eq!(state.notices()[0].title, "Board");
    }

    #[test]
    fn fetch_failure_is_shown_in_status() {
        let mut state = NoticeBoardState::new();
        let ticket = state.begin_fetch();
        assert!(state.is_loading());
        state.complete_fetch(&ticket, Err("store unreachable".to_string()));
        assert_eq!(
            state.status(),
            &LoadStatus::Failed("store unreachable".to_string())
        );
    }

    #[test]
    fn ticket_snapshots_filters() {
        let mut state = NoticeBoardState::new();
        state.set_search_term("Board");
        let date = NaiveDate::from_ymd_opt(2024, 3, 1);
        let ticket = state.set_search_date(date);
        assert_eq!(ticket.search().term, "Board");
        assert_eq!(ticket.search().date, date);
    }

    #[test]
    fn draft_requires_date_and_title() {
        let mut draft = NoticeDraft::default();
        assert_eq!(
            draft.to_new_notice(&Utc),
            Err(NoticeValidationError::MissingPublicationDate)
        );

        draft.publication_date = NaiveDate::from_ymd_opt(2024, 3, 1);
        assert_eq!(
            draft.to_new_notice(&Utc),
            Err(NoticeValidationError::BlankTitle)
        );

        draft.title = "Board Meeting".to_string();
        let notice = draft.to_new_notice(&Utc).unwrap();
        assert_eq!(
            notice.publication_date,
            Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn failed_create_keeps_dialog_open_with_error() {
        let mut state = NoticeBoardState::new();
        state.open_add_dialog();
        state.draft_mut().title = "Board Meeting".to_string();

        assert!(state.complete_create(Err("permission denied".to_string())).is_none());
        assert!(state.is_add_dialog_open());
        assert_eq!(state.create_error(), Some("permission denied"));
        assert_eq!(state.draft().title, "Board Meeting");
    }

    #[test]
    fn successful_create_resets_draft_and_refetches() {
        let mut state = NoticeBoardState::new();
        state.set_search_term("Board");
        state.open_add_dialog();
        state.draft_mut().title = "Board Meeting".to_string();

        let ticket = state
            .complete_create(Ok(Uuid::new_v4()))
            .expect("create should trigger a re-fetch");
        assert!(!state.is_add_dialog_open());
        assert_eq!(state.draft(), &NoticeDraft::default());
        assert_eq!(ticket.search().term, "Board");
        assert!(state.is_loading());
    }

    #[test]
    fn page_items_follow_pagination() {
        let mut state = NoticeBoardState::new();
        let ticket = state.begin_fetch();
        let notices = (0..12).map(|idx| sample(&format!("n{idx}"))).collect();
        state.complete_fetch(&ticket, Ok(notices));
        state.set_rows_per_page(5).unwrap();
        state.pagination_mut().next_page();

        let titles = state
            .page_items()
            .iter()
            .map(|n| n.title.as_str())
            .collect::<Vec<_>>();
        assert_eq!(titles, vec!["n5", "n6", "n7", "n8", "n9"]);
    }
}
