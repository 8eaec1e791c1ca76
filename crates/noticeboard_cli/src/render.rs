//! Plain-text rendering of the board state.

use chrono::TimeZone;
use noticeboard_core::{table_rows, LoadStatus, Notice, NoticeBoardState, NoticeRow};
use std::fmt::Write;

const MAX_CELL_CHARS: usize = 40;

/// Renders the current page, or the status line while not loaded.
pub fn table<Tz: TimeZone>(state: &NoticeBoardState, tz: &Tz) -> String {
    match state.status() {
        LoadStatus::Idle | LoadStatus::Loading => return "Loading...\n".to_string(),
        LoadStatus::Failed(message) => return format!("Error: {message}\n"),
        LoadStatus::Loaded => {}
    }

    let rows = table_rows(state.page_items(), tz);
    let title_width = column_width("Title", rows.iter().map(|row| row.title.as_str()));
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<36}  {:<title_width$}  {:<16}  Content",
        "Id", "Title", "Publication Date"
    );
    for row in &rows {
        let _ = writeln!(
            out,
            "{:<36}  {:<title_width$}  {:<16}  {}",
            row.id,
            cell(&row.title),
            row.publication_day,
            cell(&row.content)
        );
    }

    let pagination = state.pagination();
    let _ = writeln!(
        out,
        "page {}/{} ({} notices, {} per page)",
        pagination.page() + 1,
        pagination.page_count(),
        pagination.total_rows(),
        pagination.rows_per_page()
    );
    out
}

/// Renders the detail panel of one notice.
pub fn detail<Tz: TimeZone>(notice: &Notice, tz: &Tz) -> String {
    let NoticeRow {
        title,
        publication_day,
        content,
        ..
    } = NoticeRow::from_notice(notice, tz);
    format!("{title}\n\nPublication Date: {publication_day}\nContent: {content}\n")
}

fn column_width<'a>(header: &str, values: impl Iterator<Item = &'a str>) -> usize {
    values
        .map(|value| value.chars().count().min(MAX_CELL_CHARS))
        .chain(std::iter::once(header.len()))
        .max()
        .unwrap_or(header.len())
}

fn cell(value: &str) -> String {
    let flat = value.replace(['\n', '\r'], " ");
    if flat.chars().count() <= MAX_CELL_CHARS {
        return flat;
    }
    let mut truncated = flat.chars().take(MAX_CELL_CHARS - 3).collect::<String>();
    truncated.push_str("...");
    truncated
}

#[cfg(test)]
mod tests {
    use super::{cell, table};
    use chrono::Utc;
    use noticeboard_core::NoticeBoardState;

    #[test]
    fn cell_flattens_and_truncates() {
        let long = "x".repeat(60);
        assert_eq!(cell("a\nb"), "a b");
        assert_eq!(cell(&long).chars().count(), 40);
        assert!(cell(&long).ends_with("..."));
    }

    #[test]
    fn table_shows_error_in_place_of_rows() {
        let mut state = NoticeBoardState::new();
        let ticket = state.begin_fetch();
        state.complete_fetch(&ticket, Err("store unreachable".to_string()));
        assert_eq!(table(&state, &Utc), "Error: store unreachable\n");
    }
}
