//! Line commands understood by the interactive host

use anyhow::{anyhow, bail, Context, Result};
use colloquy_core::{ConversationId, ScrollPosition};
use std::io;
use tracing::warn;

pub const HELP: &str = "\
commands:
  down                          scroll to the bottom of the list
  scroll <top> <client> <height> report a raw scroll position
  search [text]                 filter by title/summary (empty clears)
  new <category> [title]        create a conversation
  rename <id> <title>           rename a conversation
  delete <id>                   delete a conversation
  select <id>                   open a conversation
  reload                        reload from the first page
  list                          print the list again
  quit                          close the list";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Down,
    Scroll(ScrollPosition),
    Search(String),
    New { category: String, title: String },
    Rename { id: ConversationId, title: String },
    Delete(ConversationId),
    Select(ConversationId),
    Reload,
    List,
    Quit,
    Help,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word {
            "down" => Command::Down,
            "scroll" => {
                let nums = rest
                    .split_whitespace()
                    .map(|n| n.parse::<f64>().with_context(|| format!("not a number: {n}")))
                    .collect::<Result<Vec<_>>>()?;
                match nums.as_slice() {
                    [top, client, height] => {
                        Command::Scroll(ScrollPosition::new(*top, *client, *height))
                    }
                    _ => bail!("usage: scroll <top> <client> <height>"),
                }
            }
            "search" | "/" => Command::Search(rest.to_string()),
            "new" => {
                let (category, title) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                if category.is_empty() {
                    bail!("usage: new <category> [title]");
                }
                Command::New {
                    category: category.to_string(),
                    title: title.trim().to_string(),
                }
            }
            "rename" => {
                let (id, title) = rest
                    .split_once(char::is_whitespace)
                    .ok_or_else(|| anyhow!("usage: rename <id> <title>"))?;
                Command::Rename {
                    id: ConversationId::new(id),
                    title: title.trim().to_string(),
                }
            }
            "delete" => Command::Delete(required_id(rest, "delete")?),
            "select" => Command::Select(required_id(rest, "select")?),
            "reload" => Command::Reload,
            "list" | "ls" => Command::List,
            "quit" | "exit" | "q" => Command::Quit,
            "help" | "?" | "" => Command::Help,
            other => bail!("unknown command: {other} (try `help`)"),
        };
        Ok(command)
    }
}

/// What the command loop should do with one read from stdin
#[derive(Debug, PartialEq)]
pub enum Input {
    Line(String),
    /// The line could not be decoded; keep reading
    Skip,
    /// Input is exhausted or broken
    End,
}

impl Input {
    pub fn from_read(read: io::Result<Option<String>>) -> Self {
        match read {
            Ok(Some(line)) => Input::Line(line),
            Ok(None) => Input::End,
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                warn!("Ignoring unreadable input line: {}", e);
                Input::Skip
            }
            Err(e) => {
                warn!("Stopped reading input: {}", e);
                Input::End
            }
        }
    }
}

fn required_id(rest: &str, command: &str) -> Result<ConversationId> {
    match rest.split_whitespace().next() {
        Some(id) => Ok(ConversationId::new(id)),
        None => bail!("usage: {command} <id>"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        assert_eq!(Command::parse("down").unwrap(), Command::Down);
        assert_eq!(Command::parse(" reload ").unwrap(), Command::Reload);
        assert_eq!(Command::parse("q").unwrap(), Command::Quit);
        assert_eq!(Command::parse("").unwrap(), Command::Help);
    }

    #[test]
    fn test_parse_search_keeps_spaces() {
        assert_eq!(
            Command::parse("search port  scan").unwrap(),
            Command::Search("port  scan".to_string())
        );
        assert_eq!(Command::parse("search").unwrap(), Command::Search(String::new()));
    }

    #[test]
    fn test_parse_new_and_rename() {
        assert_eq!(
            Command::parse("new chat Weekly sync").unwrap(),
            Command::New {
                category: "chat".to_string(),
                title: "Weekly sync".to_string()
            }
        );
        assert_eq!(
            Command::parse("rename abc New title").unwrap(),
            Command::Rename {
                id: ConversationId::new("abc"),
                title: "New title".to_string()
            }
        );
        assert!(Command::parse("rename abc").is_err());
        assert!(Command::parse("new").is_err());
    }

    #[test]
    fn test_parse_scroll() {
        assert_eq!(
            Command::parse("scroll 800 100 1000").unwrap(),
            Command::Scroll(ScrollPosition::new(800.0, 100.0, 1000.0))
        );
        assert!(Command::parse("scroll 1 2").is_err());
        assert!(Command::parse("scroll a b c").is_err());
    }

    #[test]
    fn test_bad_input_bytes_do_not_end_the_loop() {
        let invalid = io::Error::new(io::ErrorKind::InvalidData, "invalid UTF-8");
        assert_eq!(Input::from_read(Err(invalid)), Input::Skip);

        let broken = io::Error::new(io::ErrorKind::BrokenPipe, "closed");
        assert_eq!(Input::from_read(Err(broken)), Input::End);

        assert_eq!(Input::from_read(Ok(None)), Input::End);
        assert_eq!(
            Input::from_read(Ok(Some("down".to_string()))),
            Input::Line("down".to_string())
        );
    }

    #[test]
    fn test_parse_unknown() {
        assert!(Command::parse("frobnicate").is_err());
        assert!(Command::parse("delete").is_err());
    }
}
