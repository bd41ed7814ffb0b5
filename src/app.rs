//! Interactive command loop
//!
//! Reads one command per line, applies it to the [`Session`] and renders the
//! outcome. Bad input and failed requests are shown inline; only I/O errors on
//! the terminal itself end the loop early.

use crate::api::WeatherApi;
use crate::notice::Notice;
use crate::render::Renderer;
use crate::session::Session;
use crate::{Result, WeatherDeckError};
use std::io::{BufRead, Write};
use tracing::debug;

/// One parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Location(String),
    Select(usize),
    Days(u8),
    Weather,
    Forecast,
    Details,
    Status,
    Help,
    Quit,
}

impl Command {
    /// Parse a line; `Ok(None)` for blank lines
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_ascii_lowercase().as_str() {
            "loc" | "l" | "location" => Self::Location(rest.to_string()),
            "select" | "s" => Self::Select(parse_number(word, rest)?),
            "days" => Self::Days(parse_number(word, rest)?),
            "weather" | "w" => Self::Weather,
            "forecast" | "f" => Self::Forecast,
            "details" | "d" => Self::Details,
            "status" => Self::Status,
            "help" | "h" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            other => {
                return Err(WeatherDeckError::validation(format!(
                    "unknown command '{other}', type 'help' for the list"
                )));
            }
        };
        Ok(Some(command))
    }
}

fn parse_number<T: std::str::FromStr>(command: &str, argument: &str) -> Result<T> {
    argument.parse().map_err(|_| {
        WeatherDeckError::validation(format!("'{command}' expects a number, got '{argument}'"))
    })
}

/// Whether the loop should keep reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Apply one command and render its outcome
pub fn dispatch<A: WeatherApi, W: Write>(
    session: &mut Session<A>,
    renderer: &mut Renderer<W>,
    command: Command,
) -> Result<Flow> {
    debug!(?command, "Dispatching command");
    match command {
        Command::Location(query) => {
            let notices = session.submit_query(&query);
            renderer.notices(&notices)?;
            if let Some(options) = session.resolver().options() {
                renderer.options(&options, session.resolver().selected_index())?;
            }
        }
        Command::Select(index) => {
            let notices = session.select(index);
            renderer.notices(&notices)?;
        }
        Command::Days(days) => {
            let notices = session.set_forecast_days(days);
            renderer.notices(&notices)?;
        }
        Command::Weather => {
            let notices = session.fetch_current();
            renderer.notices(&notices)?;
            match session.current() {
                Some(snapshot) => renderer.current(snapshot)?,
                None => renderer.idle_hint()?,
            }
        }
        Command::Forecast => {
            let notices = session.fetch_forecast();
            renderer.notices(&notices)?;
            match session.forecast() {
                Some(bundle) => renderer.forecast(bundle)?,
                None => renderer.idle_hint()?,
            }
        }
        Command::Details => match session.current() {
            Some(snapshot) => renderer.details(snapshot)?,
            None => renderer.notice(&Notice::warning(
                "No current weather loaded, run 'weather' first.",
            ))?,
        },
        Command::Status => {
            renderer.status(session.resolver(), session.forecast_days())?;
        }
        Command::Help => renderer.help()?,
        Command::Quit => return Ok(Flow::Exit),
    }
    Ok(Flow::Continue)
}

/// Run until `quit` or end of input, optionally searching `initial_query` first
pub fn run<A: WeatherApi, R: BufRead, W: Write>(
    session: &mut Session<A>,
    mut input: R,
    renderer: &mut Renderer<W>,
    initial_query: Option<String>,
) -> Result<()> {
    renderer.banner()?;
    renderer.notices(&session.startup_notices())?;
    if let Some(query) = initial_query {
        dispatch(session, renderer, Command::Location(query))?;
    }
    if session.is_idle() {
        renderer.idle_hint()?;
    }
    renderer.prompt()?;

    let mut buffer = Vec::new();
    loop {
        buffer.clear();
        if input.read_until(b'\n', &mut buffer)? == 0 {
            break;
        }
        let Ok(line) = std::str::from_utf8(&buffer) else {
            debug!(bytes = buffer.len(), "Skipping line that is not UTF-8");
            renderer.notice(&Notice::warning("Input was not valid UTF-8, ignored."))?;
            renderer.prompt()?;
            continue;
        };
        match Command::parse(line) {
            Ok(Some(command)) => {
                if dispatch(session, renderer, command)? == Flow::Exit {
                    break;
                }
            }
            Ok(None) => {}
            Err(e) => renderer.notice(&Notice::warning(e.user_message()))?,
        }
        renderer.prompt()?;
    }

    renderer.flush()?;
    Ok(())
}
