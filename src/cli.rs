// Command-line surface. Single-letter POSIX flags, no subcommands: the
// router decides which one action the combination of flags means.

use clap::{CommandFactory, FromArgMatches, Parser};

pub const BIN_NAME: &str = "memo";

const EXAMPLES: &str = "\
Examples:
  Post a memo:           echo \"Hello World\" | memo
  Update memo #123:      echo \"Update\" | memo -U 123
  Delete memo #123:      memo -D 123";

const ADVANCED_EXAMPLES: &str = "
  Post from clipboard:   memo -c
  List last memo:        memo -L
  Search memos:          memo -s keyword";

/// Memos CLI: post, update, or delete memos from the terminal.
#[derive(Parser, Debug, Default, Clone)]
#[command(name = BIN_NAME, version)]
pub struct Cli {
    /// Delete a specific memo by ID
    #[arg(short = 'D', long = "delete", value_name = "ID")]
    pub delete: Option<String>,

    /// Update a specific memo by ID with piped input
    #[arg(short = 'U', long = "update", value_name = "ID")]
    pub update: Option<String>,

    /// Post content directly from the clipboard
    #[arg(short = 'c', long = "clipboard")]
    pub clipboard: bool,

    /// Show and copy the URL of the most recent memo
    #[arg(short = 'L', long = "last")]
    pub last: bool,

    /// Search memos by keyword
    #[arg(short = 's', long = "search", value_name = "KEYWORD")]
    pub search: Option<String>,

    /// After posting, show the command that deletes the new memo
    #[arg(short = 'd')]
    pub show_delete: bool,

    /// After posting, show the command that updates the new memo
    #[arg(short = 'u')]
    pub show_update: bool,

    /// Log requests and decisions to standard error
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

impl Cli {
    /// Parse process arguments, listing advanced flags in `--help` only
    /// when they are enabled.
    pub fn try_parse_with(advanced: bool) -> Result<Self, clap::Error> {
        Self::try_parse_from_with(std::env::args_os(), advanced)
    }

    pub fn try_parse_from_with<I, T>(args: I, advanced: bool) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let examples = if advanced {
            format!("{EXAMPLES}{ADVANCED_EXAMPLES}")
        } else {
            EXAMPLES.to_string()
        };
        let mut matches = Self::command()
            .mut_arg("clipboard", |a| a.hide(!advanced))
            .mut_arg("last", |a| a.hide(!advanced))
            .mut_arg("search", |a| a.hide(!advanced))
            .after_help(examples)
            .try_get_matches_from(args)?;
        Self::from_arg_matches_mut(&mut matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_short_flags() {
        let cli = Cli::try_parse_from_with(["memo", "-U", "42", "-v"], false).unwrap();
        assert_eq!(cli.update.as_deref(), Some("42"));
        assert!(cli.verbose);
        assert!(cli.delete.is_none());
    }

    #[test]
    fn hidden_flags_still_parse() {
        let cli = Cli::try_parse_from_with(["memo", "-s", "rust"], false).unwrap();
        assert_eq!(cli.search.as_deref(), Some("rust"));
    }

    #[test]
    fn help_mentions_advanced_flags_only_when_enabled() {
        let hidden = Cli::try_parse_from_with(["memo", "--help"], false).unwrap_err();
        assert!(!hidden.to_string().contains("--clipboard"));

        let shown = Cli::try_parse_from_with(["memo", "--help"], true).unwrap_err();
        let text = shown.to_string();
        assert!(text.contains("--clipboard"));
        assert!(text.contains("List last memo"));
    }

    #[test]
    fn search_requires_a_value() {
        assert!(Cli::try_parse_from_with(["memo", "-s"], true).is_err());
    }
}
