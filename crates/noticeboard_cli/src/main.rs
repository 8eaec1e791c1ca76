//! Command-line front end for the notice board.
//!
//! # Responsibility
//! - Render the paginated notice table, the detail panel and the add form
//!   as plain-text commands over a local document store.

mod cli;
mod render;

use anyhow::{bail, Context};
use clap::Parser;
use cli::{Cli, Command};
use noticeboard_core::db::open_db;
use noticeboard_core::{
    init_logging, NoticeBoard, NoticeService, NoticeboardConfig, SqliteDocumentRepository,
};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = NoticeboardConfig::from_env();
    if let Some(db_path) = cli.db {
        config.db_path = db_path;
    }
    if let Some(log_dir) = config.log_dir.as_deref() {
        init_logging(&config.log_level, log_dir).context("failed to initialize logging")?;
    }

    let conn = open_db(&config.db_path)
        .with_context(|| format!("failed to open `{}`", config.db_path.display()))?;
    let repo = SqliteDocumentRepository::try_new(&conn)?;
    let mut board = NoticeBoard::new(NoticeService::new(repo));

    match cli.command {
        Command::List {
            search,
            date,
            rows,
            page,
        } => {
            let state = board.state_mut();
            state.set_rows_per_page(rows)?;
            // Filters are applied together; only the last fetch is rendered.
            let _ = state.set_search_term(search.unwrap_or_default());
            board.filter_date(date);
            board
                .state_mut()
                .pagination_mut()
                .go_to_page(page.saturating_sub(1));
            print!("{}", render::table(board.state(), board.service().time_zone()));
        }
        Command::Add {
            title,
            date,
            content,
        } => {
            let state = board.state_mut();
            state.open_add_dialog();
            let draft = state.draft_mut();
            draft.title = title;
            draft.publication_date = Some(date);
            draft.content = content.unwrap_or_default();
            let id = board.submit_draft()?;
            println!("{id}");
        }
        Command::Show { id } => {
            let Some(notice) = board.service().get_notice(id)? else {
                bail!("notice not found: {id}");
            };
            board.state_mut().view_notice(notice);
            if let Some(selected) = board.state().selected() {
                print!("{}", render::detail(selected, board.service().time_zone()));
            }
        }
    }

    Ok(())
}
