// Error taxonomy for a single `memo` invocation.
//
// Every component owns its own error enum; `MemoError` gathers them at the
// top level so `main` can print one line and pick the exit code. Nothing is
// retried and nothing falls back to a different action.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used by the dispatch layer.
pub type MemoResult<T> = Result<T, MemoError>;

/// Problems with `~/.memos.conf` or the matching environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("credentials missing: {key} is not set (looked in {location})")]
    MissingCredential { key: &'static str, location: String },

    #[error("could not read {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },

    #[error("MEMOS_URL is not a valid http(s) URL: {0}")]
    InvalidEndpoint(String),

    #[error("MEMOS_TOKEN contains characters that cannot be sent in a header")]
    InvalidToken,
}

/// The flags do not describe exactly one runnable action.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UsageError {
    #[error("conflicting flags: {} cannot be combined", .0.join(", "))]
    ConflictingFlags(Vec<&'static str>),

    #[error("{0} is an advanced feature; set MEMOS_ADVANCED_FEATURES=true to enable it")]
    FeatureDisabled(&'static str),

    #[error("no piped input detected; pipe text in or use -c to post from the clipboard")]
    NoInput,

    #[error("no piped input detected for update; pipe the new content in")]
    NoContent,

    #[error("invalid note id {0:?}")]
    InvalidId(String),

    #[error("search needs a non-empty keyword")]
    EmptyKeyword,
}

/// The content for the selected action could not be obtained.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("input is empty, nothing to post")]
    Empty,

    #[error("clipboard is unavailable: {0}")]
    ClipboardUnavailable(#[source] ClipboardError),

    #[error("could not read standard input: {0}")]
    Read(#[from] std::io::Error),
}

/// Failures talking to the system clipboard utilities.
#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("no clipboard utility found (install wl-clipboard, xclip or xsel)")]
    NoBackend,

    #[error("{tool} failed: {source:#}")]
    Command {
        tool: &'static str,
        #[source]
        source: anyhow::Error,
    },

    #[error("clipboard is empty")]
    Empty,
}

/// Failures of the single request made against the notes service.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("service unreachable: {0}")]
    Unreachable(#[source] reqwest::Error),

    #[error("request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("could not set up HTTP client: {0}")]
    Setup(String),
}

/// Everything that can end an invocation early.
#[derive(Debug, Error)]
pub enum MemoError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Usage(#[from] UsageError),

    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl MemoError {
    /// Process exit code: 1 for local problems, 2 for the remote service.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) | Self::Usage(_) | Self::Input(_) => 1,
            Self::Api(_) => 2,
        }
    }

    /// Usage errors get a short hint pointing at `--help`.
    pub fn wants_usage_hint(&self) -> bool {
        matches!(self, Self::Usage(_))
    }
}
