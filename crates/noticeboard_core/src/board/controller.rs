//! Synchronous wiring of board state and notice service.
//!
//! Hosts without an async runtime drive the board through this type; every
//! fetch still goes through the ticket protocol of `NoticeBoardState`.

use crate::board::state::{FetchTicket, NoticeBoardState};
use crate::model::notice::NoticeId;
use crate::repo::document_repo::DocumentRepository;
use crate::service::notice_service::{NoticeService, NoticeServiceError};
use chrono::{NaiveDate, TimeZone};

pub struct NoticeBoard<R: DocumentRepository, Tz: TimeZone> {
    service: NoticeService<R, Tz>,
    state: NoticeBoardState,
}

impl<R: DocumentRepository, Tz: TimeZone> NoticeBoard<R, Tz> {
    pub fn new(service: NoticeService<R, Tz>) -> Self {
        Self {
            service,
            state: NoticeBoardState::new(),
        }
    }

    pub fn state(&self) -> &NoticeBoardState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut NoticeBoardState {
        &mut self.state
    }

    pub fn service(&self) -> &NoticeService<R, Tz> {
        &self.service
    }

    /// Re-runs the current view.
    pub fn refresh(&mut self) {
        let ticket = self.state.begin_fetch();
        self.run_fetch(&ticket);
    }

    pub fn search(&mut self, term: impl Into<String>) {
        let ticket = self.state.set_search_term(term);
        self.run_fetch(&ticket);
    }

    pub fn filter_date(&mut self, date: Option<NaiveDate>) {
        let ticket = self.state.set_search_date(date);
        self.run_fetch(&ticket);
    }

    /// Inserts the add-dialog draft and refreshes the view on success.
    ///
    /// Failures are also recorded in the state's `create_error`.
    pub fn submit_draft(&mut self) -> Result<NoticeId, NoticeServiceError> {
        let notice = self.state.submit_draft(self.service.time_zone())?;
        let result = self.service.create_notice(&notice);
        let outcome = match &result {
            Ok(id) => Ok(*id),
            Err(err) => Err(err.to_string()),
        };
        if let Some(ticket) = self.state.complete_create(outcome) {
            self.run_fetch(&ticket);
        }
        result
    }

    fn run_fetch(&mut self, ticket: &FetchTicket) {
        let result = self
            .service
            .search(ticket.search())
            .map_err(|err| err.to_string());
        self.state.complete_fetch(ticket, result);
    }
}
