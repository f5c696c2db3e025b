// Command routing: turns parsed flags into exactly one `Command`.
//
// Conflicts and feature gating are decided here, before anything touches
// the clipboard, standard input or the network. Precedence once conflicts
// are ruled out: delete, update, clipboard-post, list-last, search, then the
// default create-from-stdin.

use crate::cli::Cli;
use crate::config::Config;
use crate::error::UsageError;

/// Where the text of a new note comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentSource {
    Stdin,
    Clipboard,
}

/// The selected operation, before its content has been read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Create { source: ContentSource },
    ListLast,
    Search { keyword: String },
    Update { id: String },
    Delete { id: String },
}

/// Pick the single command the flags describe.
///
/// `stdin_interactive` is true when standard input is a terminal, i.e.
/// nothing was piped in. Stdin is never read here.
pub fn route(cli: &Cli, config: &Config, stdin_interactive: bool) -> Result<Command, UsageError> {
    let named = action_flags(cli);
    if named.len() > 1 {
        return Err(UsageError::ConflictingFlags(named));
    }

    if let Some(id) = &cli.delete {
        return Ok(Command::Delete {
            id: validate_id(id)?,
        });
    }

    if let Some(id) = &cli.update {
        let id = validate_id(id)?;
        if stdin_interactive {
            return Err(UsageError::NoContent);
        }
        return Ok(Command::Update { id });
    }

    if cli.clipboard {
        require_advanced(config, "-c")?;
        return Ok(Command::Create {
            source: ContentSource::Clipboard,
        });
    }

    if cli.last {
        require_advanced(config, "-L")?;
        return Ok(Command::ListLast);
    }

    if let Some(keyword) = &cli.search {
        require_advanced(config, "-s")?;
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(UsageError::EmptyKeyword);
        }
        return Ok(Command::Search {
            keyword: keyword.to_string(),
        });
    }

    if stdin_interactive {
        return Err(UsageError::NoInput);
    }
    Ok(Command::Create {
        source: ContentSource::Stdin,
    })
}

/// Action-selecting flags present on the command line.
fn action_flags(cli: &Cli) -> Vec<&'static str> {
    [
        (cli.delete.is_some(), "-D"),
        (cli.update.is_some(), "-U"),
        (cli.clipboard, "-c"),
        (cli.last, "-L"),
        (cli.search.is_some(), "-s"),
    ]
    .into_iter()
    .filter_map(|(present, flag)| present.then_some(flag))
    .collect()
}

fn require_advanced(config: &Config, flag: &'static str) -> Result<(), UsageError> {
    if config.advanced_enabled {
        Ok(())
    } else {
        Err(UsageError::FeatureDisabled(flag))
    }
}

fn validate_id(raw: &str) -> Result<String, UsageError> {
    let id = raw.trim();
    let allowed = |c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_';
    if id.is_empty() || !id.chars().all(allowed) {
        return Err(UsageError::InvalidId(raw.to_string()));
    }
    Ok(id.to_string())
}
