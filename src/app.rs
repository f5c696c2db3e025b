// Dispatch: flags -> Command -> Action -> one API call -> Outcome.
//
// Routing and gating finish before stdin or the clipboard are read, and
// input resolution finishes before the network is touched. Copying the
// resulting URL to the clipboard is best-effort.

use crate::api::NotesApi;
use crate::cli::Cli;
use crate::clipboard::Clipboard;
use crate::config::Config;
use crate::error::{ApiError, MemoResult};
use crate::input::{self, InputSource};
use crate::model::{Action, Note, SearchHits};
use crate::router;
use crate::ui;
use tracing::{debug, warn};

/// What a successful invocation produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Created(Note),
    Updated(Note),
    Deleted { id: String },
    Latest(Note),
    Found { keyword: String, hits: SearchHits },
}

impl Outcome {
    /// URL worth putting on the clipboard, if any.
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Created(note) | Self::Updated(note) | Self::Latest(note) => {
                Some(&note.resource_url)
            }
            Self::Found { hits, .. } => Some(&hits.first.resource_url),
            Self::Deleted { .. } => None,
        }
    }
}

/// Run one invocation end to end.
pub fn run(
    cli: &Cli,
    config: &Config,
    stdin: &mut dyn InputSource,
    api: &dyn NotesApi,
    clipboard: &dyn Clipboard,
) -> MemoResult<Outcome> {
    let command = router::route(cli, config, stdin.is_interactive())?;
    debug!(?command, "routed");

    let action = input::resolve(command, config, stdin, clipboard)?;
    let outcome = perform(api, action)?;

    if let Some(url) = outcome.url() {
        if let Err(e) = clipboard.write(url) {
            warn!("could not copy URL to clipboard: {e}");
        }
    }
    Ok(outcome)
}

/// Issue the single request `action` stands for.
pub fn perform(api: &dyn NotesApi, action: Action) -> Result<Outcome, ApiError> {
    let spinner = ui::spinner(match &action {
        Action::Create { .. } => "Posting memo...",
        Action::ListLast => "Fetching latest memo...",
        Action::Search { .. } => "Searching...",
        Action::Update { .. } => "Updating memo...",
        Action::Delete { .. } => "Deleting memo...",
    });

    let result = match action {
        Action::Create {
            content,
            visibility,
        } => api.create(&content, visibility).map(Outcome::Created),
        Action::ListLast => api.list_last().map(Outcome::Latest),
        Action::Search { keyword } => api
            .search(&keyword)
            .map(|hits| Outcome::Found { keyword, hits }),
        Action::Update { id, content } => api.update(&id, &content).map(Outcome::Updated),
        Action::Delete { id } => api.delete(&id).map(|()| Outcome::Deleted { id }),
    };

    spinner.finish_and_clear();
    result
}
