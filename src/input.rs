// Input resolution: supplies the text a routed `Command` needs and returns
// the finished `Action`. Standard input is read to end-of-stream; the
// clipboard is read through the `Clipboard` bridge.

use crate::clipboard::Clipboard;
use crate::config::Config;
use crate::error::InputError;
use crate::model::Action;
use crate::router::{Command, ContentSource};
use crossterm::tty::IsTty;
use std::io::{self, Read};

/// Standard input as seen by the resolver.
pub trait InputSource {
    /// True when attached to a terminal (nothing piped in).
    fn is_interactive(&self) -> bool;
    fn read_all(&mut self) -> io::Result<String>;
}

/// The process's real standard input.
#[derive(Debug, Default)]
pub struct ProcessStdin;

impl InputSource for ProcessStdin {
    fn is_interactive(&self) -> bool {
        io::stdin().is_tty()
    }

    fn read_all(&mut self) -> io::Result<String> {
        let mut buf = String::new();
        io::stdin().lock().read_to_string(&mut buf)?;
        Ok(buf)
    }
}

/// Build the `Action` for `command`, reading its content if it needs any.
pub fn resolve(
    command: Command,
    config: &Config,
    stdin: &mut dyn InputSource,
    clipboard: &dyn Clipboard,
) -> Result<Action, InputError> {
    let action = match command {
        Command::Create { source } => {
            let raw = match source {
                ContentSource::Stdin => stdin.read_all()?,
                ContentSource::Clipboard => {
                    clipboard.read().map_err(InputError::ClipboardUnavailable)?
                }
            };
            Action::Create {
                content: prepare(&raw, config.code_fence)?,
                visibility: config.default_visibility,
            }
        }
        Command::Update { id } => Action::Update {
            id,
            content: prepare(&stdin.read_all()?, config.code_fence)?,
        },
        Command::ListLast => Action::ListLast,
        Command::Search { keyword } => Action::Search { keyword },
        Command::Delete { id } => Action::Delete { id },
    };
    Ok(action)
}

/// Trim trailing line breaks, reject blank text, optionally fence it.
fn prepare(raw: &str, code_fence: bool) -> Result<String, InputError> {
    let text = raw.trim_end_matches(['\n', '\r']);
    if text.trim().is_empty() {
        return Err(InputError::Empty);
    }
    if code_fence {
        Ok(format!("```text\n{text}\n```"))
    } else {
        Ok(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClipboardError;
    use crate::model::Visibility;
    use std::cell::Cell;

    struct Piped(&'static str);

    impl InputSource for Piped {
        fn is_interactive(&self) -> bool {
            false
        }
        fn read_all(&mut self) -> io::Result<String> {
            Ok(self.0.to_string())
        }
    }

    struct Clip {
        text: Option<&'static str>,
        reads: Cell<usize>,
    }

    impl Clipboard for Clip {
        fn read(&self) -> Result<String, ClipboardError> {
            self.reads.set(self.reads.get() + 1);
            self.text.map(str::to_string).ok_or(ClipboardError::NoBackend)
        }
        fn write(&self, _: &str) -> Result<(), ClipboardError> {
            Ok(())
        }
    }

    fn clip(text: Option<&'static str>) -> Clip {
        Clip {
            text,
            reads: Cell::new(0),
        }
    }

    fn config(code_fence: bool) -> Config {
        Config {
            endpoint: "https://memos.example".into(),
            token: "t".into(),
            default_visibility: Visibility::Protected,
            advanced_enabled: true,
            code_fence,
        }
    }

    #[test]
    fn stdin_create_trims_trailing_newlines_only() {
        let action = resolve(
            Command::Create {
                source: ContentSource::Stdin,
            },
            &config(false),
            &mut Piped("  indented\nline\n\r\n"),
            &clip(None),
        )
        .unwrap();
        assert_eq!(
            action,
            Action::Create {
                content: "  indented\nline".into(),
                visibility: Visibility::Protected,
            }
        );
    }

    #[test]
    fn blank_stdin_is_empty() {
        let err = resolve(
            Command::Create {
                source: ContentSource::Stdin,
            },
            &config(false),
            &mut Piped(" \n\t\n"),
            &clip(None),
        )
        .unwrap_err();
        assert!(matches!(err, InputError::Empty));
    }

    #[test]
    fn clipboard_create_reads_clipboard_not_stdin() {
        let clipboard = clip(Some("from clipboard\n"));
        let action = resolve(
            Command::Create {
                source: ContentSource::Clipboard,
            },
            &config(false),
            &mut Piped("from stdin"),
            &clipboard,
        )
        .unwrap();
        assert_eq!(clipboard.reads.get(), 1);
        assert!(matches!(action, Action::Create { content, .. } if content == "from clipboard"));
    }

    #[test]
    fn clipboard_failure_is_unavailable() {
        let err = resolve(
            Command::Create {
                source: ContentSource::Clipboard,
            },
            &config(false),
            &mut Piped(""),
            &clip(None),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            InputError::ClipboardUnavailable(ClipboardError::NoBackend)
        ));
    }

    #[test]
    fn update_content_can_be_fenced() {
        let action = resolve(
            Command::Update { id: "9".into() },
            &config(true),
            &mut Piped("ls -la\n"),
            &clip(None),
        )
        .unwrap();
        assert_eq!(
            action,
            Action::Update {
                id: "9".into(),
                content: "```text\nls -la\n```".into(),
            }
        );
    }

    #[test]
    fn commands_without_content_touch_nothing() {
        let clipboard = clip(Some("unused"));
        let action = resolve(
            Command::Search {
                keyword: "rust".into(),
            },
            &config(false),
            &mut Piped(""),
            &clipboard,
        )
        .unwrap();
        assert_eq!(
            action,
            Action::Search {
                keyword: "rust".into()
            }
        );
        assert_eq!(clipboard.reads.get(), 0);
    }
}
