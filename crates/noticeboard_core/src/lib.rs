//! Core logic for the notice board.
//!
//! Notices live in a document collection; this crate owns the query
//! construction, normalization, insert path and the view state a table UI
//! renders from.

pub mod board;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;

pub use board::controller::NoticeBoard;
pub use board::pagination::{Pagination, ROWS_PER_PAGE_OPTIONS};
pub use board::state::{FetchTicket, LoadStatus, NoticeBoardState, NoticeDraft};
pub use board::table::{table_rows, NoticeRow};
pub use config::NoticeboardConfig;
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::notice::{NewNotice, Notice, NoticeId, NoticeValidationError};
pub use repo::document::{Document, DocumentFields, DocumentId, FieldValue, Timestamp};
pub use repo::document_repo::{
    DocumentRepository, RepoError, RepoResult, SqliteDocumentRepository,
};
pub use repo::query::{CollectionQuery, FieldFilter, FilterOp};
pub use search::notice_query::{NoticeSearch, SearchError, TITLE_PREFIX_SENTINEL};
pub use service::notice_service::{NoticeService, NoticeServiceError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
