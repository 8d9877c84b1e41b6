//! Colloquy command-line host
//!
//! Drives the conversation list from stdin and prints it whenever it
//! changes.

use anyhow::{Context, Result};
use chrono::Utc;
use colloquy_core::{ConversationList, ListConfig, SqliteConversationStore, Storage};
use colloquy_host::{Command, ConversationListView, Input};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DATA_DIR_ENV: &str = "COLLOQUY_DATA_DIR";

fn data_dir() -> PathBuf {
    std::env::var_os(DATA_DIR_ENV)
        .map(PathBuf::from)
        .or_else(|| dirs::data_dir().map(|d| d.join("colloquy")))
        .unwrap_or_else(|| PathBuf::from(".colloquy"))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so the rendered list owns stdout.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Colloquy v{}", env!("CARGO_PKG_VERSION"));

    let storage = Arc::new(
        Storage::open(data_dir()).context("failed to open conversation database")?,
    );
    let config = ListConfig::load(&storage)?;
    info!(
        "Page size {}, search debounce {}ms",
        config.page_size, config.search_debounce_ms
    );

    let store = Arc::new(SqliteConversationStore::new(storage));
    let list = ConversationList::new(store, config);
    let mut events = list.subscribe();
    let mut rendered = list.watch();
    let mut view = ConversationListView::new(list.clone());

    list.mount().await;
    print_list(&view);
    println!("{}", colloquy_host::commands::HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    while !view.is_closed() {
        tokio::select! {
            line = lines.next_line(), if stdin_open => {
                let line = match Input::from_read(line) {
                    Input::Line(line) => line,
                    Input::Skip => continue,
                    Input::End => {
                        stdin_open = false;
                        list.close();
                        continue;
                    }
                };
                match Command::parse(&line) {
                    Ok(command) => {
                        if let Some(reply) = view.execute(command).await {
                            println!("{reply}");
                        }
                    }
                    Err(e) => println!("{e}"),
                }
            }
            event = events.recv() => match event {
                Ok(event) => view.handle_event(event),
                Err(RecvError::Lagged(skipped)) => warn!("Missed {} list events", skipped),
                Err(RecvError::Closed) => break,
            },
            changed = rendered.changed() => {
                if changed.is_err() {
                    break;
                }
                let _ = rendered.borrow_and_update();
                print_list(&view);
            }
        }
    }

    list.teardown();
    info!("Conversation list closed");
    Ok(())
}

fn print_list(view: &ConversationListView) {
    let snapshot = view.list().snapshot();
    println!();
    for line in view.render(&snapshot, Utc::now()) {
        println!("{line}");
    }
}
