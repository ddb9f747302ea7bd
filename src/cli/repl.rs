//! Interactive prompt.
//!
//! Reads one command per line and drives a [`Browser`]. Ctrl-C during a fetch
//! cancels that fetch; the prompt keeps running.

use std::io::{self, Write};
use std::str::FromStr;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio_util::sync::CancellationToken;

use super::output::{write_error, write_outcome, write_tree};
use crate::browser::{Browser, BrowserEvent};
use crate::error::Error;
use crate::fetch::FetchMode;
use crate::mib;
use crate::session::AgentSession;
use crate::sink::ResultSink;

const HELP: &str = "\
commands:
  next, n              fetch the next record (GETNEXT)
  bulk, b              fetch the next page of records (GETBULK)
  select <oid|name>    restart the walk at an OID or tree node
  clear                clear the results table, keep the walk position
  show                 show target, starting node and cursor
  cursor               show the walk cursor
  tree                 list the well-known nodes
  help                 show this text
  quit, exit           leave";

/// One line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Fetch(FetchMode),
    Select(String),
    Clear,
    Show,
    Cursor,
    Tree,
    Help,
    Quit,
    Empty,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(word) = words.next() else {
            return Ok(Command::Empty);
        };
        let arg = words.next();
        if words.next().is_some() {
            return Err(format!("too many arguments to {}", word));
        }

        match (word.to_ascii_lowercase().as_str(), arg) {
            ("next" | "n", None) => Ok(Command::Fetch(FetchMode::Next)),
            ("bulk" | "b", None) => Ok(Command::Fetch(FetchMode::Bulk)),
            ("select" | "s", Some(oid)) => Ok(Command::Select(oid.to_string())),
            ("select" | "s", None) => Err("select needs an OID or node name".into()),
            ("clear", None) => Ok(Command::Clear),
            ("show", None) => Ok(Command::Show),
            ("cursor", None) => Ok(Command::Cursor),
            ("tree", None) => Ok(Command::Tree),
            ("help" | "?", None) => Ok(Command::Help),
            ("quit" | "exit" | "q", None) => Ok(Command::Quit),
            (_, Some(_)) => Err(format!("{} takes no arguments", word)),
            (_, None) => Err(format!("unknown command {:?}, try help", word)),
        }
    }
}

/// Run the prompt until `quit` or end of input.
pub async fn run<S, K, R, W>(browser: &mut Browser<S, K>, input: R, mut out: W) -> io::Result<()>
where
    S: AgentSession,
    K: ResultSink,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    writeln!(out, "mibwalk: walking {}; type help for commands", browser.target().endpoint)?;

    loop {
        write!(out, "> ")?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            writeln!(out)?;
            return Ok(());
        };

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(message) => {
                writeln!(out, "{}", message)?;
                continue;
            }
        };

        match command {
            Command::Empty => {}
            Command::Fetch(mode) => {
                let cancel = CancellationToken::new();
                let watcher = spawn_ctrl_c_watcher(cancel.clone());
                let outcome = browser.fetch(mode, &cancel).await;
                watcher.abort();
                write_outcome(&mut out, &outcome)?;
            }
            Command::Select(input) => match mib::resolve(&input) {
                Ok(oid) if oid.is_empty() => write_error(&mut out, &Error::MissingStartOid)?,
                Ok(oid) => {
                    writeln!(out, "selected {}", oid)?;
                    browser.handle(BrowserEvent::Selected(oid));
                }
                Err(e) => write_error(&mut out, &e)?,
            },
            Command::Clear => browser.handle(BrowserEvent::Cleared),
            Command::Show => {
                writeln!(out, "target: {}", browser.target().endpoint)?;
                match browser.start() {
                    Some(start) => writeln!(out, "start:  {}", start)?,
                    None => writeln!(out, "start:  (none)")?,
                }
                write_cursor(&mut out, browser)?;
                writeln!(out, "page:   {}", browser.fetcher().config().page_limit)?;
            }
            Command::Cursor => write_cursor(&mut out, browser)?,
            Command::Tree => write_tree(&mut out)?,
            Command::Help => writeln!(out, "{}", HELP)?,
            Command::Quit => return Ok(()),
        }
    }
}

fn write_cursor<S, K>(out: &mut impl Write, browser: &Browser<S, K>) -> io::Result<()>
where
    S: AgentSession,
    K: ResultSink,
{
    match browser.cursor().current() {
        Some(oid) => writeln!(out, "cursor: {}", oid),
        None => writeln!(out, "cursor: (none)"),
    }
}

/// Cancel `token` on Ctrl-C. Abort the returned handle once the fetch is done.
pub fn spawn_ctrl_c_watcher(token: CancellationToken) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::debug!(target: "mibwalk::cli", "interrupted, cancelling fetch");
            token.cancel();
        }
    })
}
