//! CLI schema.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use noticeboard_core::{NoticeId, ROWS_PER_PAGE_OPTIONS};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "noticeboard", version, about = "List, search and add notices")]
pub struct Cli {
    /// Database file; overrides NOTICEBOARD_DB_PATH.
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shows one page of notices, newest first.
    List {
        /// Title prefix.
        #[arg(long, short)]
        search: Option<String>,
        /// Publication day (YYYY-MM-DD, local time).
        #[arg(long, short, value_parser = parse_day)]
        date: Option<NaiveDate>,
        /// Rows per page.
        #[arg(long, default_value_t = 10, value_parser = parse_rows)]
        rows: usize,
        /// One-based page number.
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Adds a notice and prints its id.
    Add {
        #[arg(long)]
        title: String,
        /// Publication day (YYYY-MM-DD, local time).
        #[arg(long, value_parser = parse_day)]
        date: NaiveDate,
        #[arg(long)]
        content: Option<String>,
    },
    /// Shows the full detail of one notice.
    Show { id: NoticeId },
}

fn parse_day(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("expected YYYY-MM-DD: {err}"))
}

fn parse_rows(raw: &str) -> Result<usize, String> {
    let rows = raw
        .trim()
        .parse::<usize>()
        .map_err(|err| err.to_string())?;
    if ROWS_PER_PAGE_OPTIONS.contains(&rows) {
        Ok(rows)
    } else {
        Err(format!("expected one of {ROWS_PER_PAGE_OPTIONS:?}"))
    }
}
