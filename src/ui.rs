// UI layer: renders outcomes on stdout, errors on stderr, and shows a
// spinner on stderr while a request is in flight. Colors are only used
// when the stream is a terminal.

use crate::app::Outcome;
use crate::cli::{Cli, BIN_NAME};
use crate::error::MemoError;
use crate::model::Note;
use crossterm::style::{style, Color, Stylize};
use crossterm::tty::IsTty;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::time::Duration;

/// Width of a search preview line.
const PREVIEW_CHARS: usize = 60;

/// Follow-up commands to print after creating a note.
#[derive(Debug, Clone, Copy, Default)]
pub struct Hints {
    pub delete: bool,
    pub update: bool,
}

impl From<&Cli> for Hints {
    fn from(cli: &Cli) -> Self {
        Self {
            delete: cli.show_delete,
            update: cli.show_update,
        }
    }
}

/// Spinner on stderr; hidden automatically when stderr is not a terminal.
pub fn spinner(message: &'static str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    let template = ProgressStyle::with_template("{spinner} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    spinner.set_style(template);
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Print `outcome` to stdout.
pub fn print_outcome(outcome: &Outcome, hints: Hints) -> io::Result<()> {
    let stdout = io::stdout();
    let color = stdout.is_tty();
    render(&mut stdout.lock(), outcome, hints, color)
}

/// Print one error line (plus a usage hint where useful) to stderr.
pub fn print_error(err: &MemoError) {
    let color = io::stderr().is_tty();
    eprintln!("{} {}", paint("Error:", Color::Red, color), err);
    if err.wants_usage_hint() {
        eprintln!("Run '{BIN_NAME} --help' for usage.");
    }
}

pub fn render(
    out: &mut impl Write,
    outcome: &Outcome,
    hints: Hints,
    color: bool,
) -> io::Result<()> {
    let ok = paint("Success:", Color::Green, color);
    match outcome {
        Outcome::Created(note) => {
            writeln!(out, "{ok} {}", note.resource_url)?;
            if hints.delete {
                writeln!(out, "To delete this memo run: {BIN_NAME} -D {}", note.id)?;
            }
            if hints.update {
                writeln!(
                    out,
                    "To update this memo run: [command] | {BIN_NAME} -U {}",
                    note.id
                )?;
            }
        }
        Outcome::Updated(note) => {
            writeln!(out, "{ok} Memo {} updated.", note.id)?;
            writeln!(out, "URL: {}", note.resource_url)?;
        }
        Outcome::Deleted { id } => {
            writeln!(out, "{ok} Memo {id} deleted.")?;
        }
        Outcome::Latest(note) => render_latest(out, note, color)?,
        Outcome::Found { keyword, hits } => {
            let count = 1 + hits.others.len();
            let header = format!("--- Search Results for '{keyword}' ({count}) ---");
            writeln!(out, "{}", paint(&header, Color::Cyan, color))?;
            for note in std::iter::once(&hits.first).chain(&hits.others) {
                writeln!(out, "[{}] {}...", note.id, note.preview(PREVIEW_CHARS))?;
            }
            writeln!(out, "{}", "-".repeat(header.chars().count()))?;
            writeln!(out, "URL: {}", hits.first.resource_url)?;
        }
    }
    Ok(())
}

fn render_latest(out: &mut impl Write, note: &Note, color: bool) -> io::Result<()> {
    let header = match note.created_at {
        Some(at) => format!(
            "--- Latest Memo [ID: {}] {} ---",
            note.id,
            at.format("%Y-%m-%d %H:%M UTC")
        ),
        None => format!("--- Latest Memo [ID: {}] ---", note.id),
    };
    writeln!(out, "{}", paint(&header, Color::Cyan, color))?;
    writeln!(out, "{}", note.content)?;
    writeln!(out, "{}", "-".repeat(header.chars().count()))?;
    writeln!(out, "URL: {}", note.resource_url)
}

fn paint(text: &str, color: Color, enabled: bool) -> String {
    if enabled {
        style(text).with(color).bold().to_string()
    } else {
        text.to_string()
    }
}
