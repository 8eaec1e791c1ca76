//! Row projection for the notice table and detail panel.

use crate::model::notice::{Notice, NoticeId};
use chrono::TimeZone;

/// Display strings for one notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeRow {
    pub id: NoticeId,
    pub title: String,
    /// `YYYY-MM-DD` in the display time zone; empty when undated.
    pub publication_day: String,
    pub content: String,
}

impl NoticeRow {
    pub fn from_notice<Tz: TimeZone>(notice: &Notice, tz: &Tz) -> Self {
        Self {
            id: notice.id,
            title: notice.title.clone(),
            publication_day: notice
                .publication_day(tz)
                .map(|day| day.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            content: notice.content.clone(),
        }
    }
}

/// Projects `notices` into display rows.
pub fn table_rows<Tz: TimeZone>(notices: &[Notice], tz: &Tz) -> Vec<NoticeRow> {
    notices
        .iter()
        .map(|notice| NoticeRow::from_notice(notice, tz))
        .collect()
}
