// Clipboard bridge: read and write text through whichever system utility
// is installed. The utility is chosen when the call is made, based on the
// platform and the active display server. A utility that cannot be spawned
// is skipped; when none can, the result is `ClipboardError::NoBackend`.

use crate::error::ClipboardError;
use anyhow::{bail, Context};
use std::io::{ErrorKind, Write};
use std::process::{Command, Output, Stdio};
use tracing::debug;

/// Read/write access to a clipboard.
pub trait Clipboard {
    fn read(&self) -> Result<String, ClipboardError>;
    fn write(&self, text: &str) -> Result<(), ClipboardError>;
}

/// One external clipboard utility invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tool {
    pub program: &'static str,
    pub args: &'static [&'static str],
}

const WL_COPY: Tool = Tool { program: "wl-copy", args: &[] };
const WL_PASTE: Tool = Tool { program: "wl-paste", args: &["--no-newline"] };
const XCLIP_COPY: Tool = Tool { program: "xclip", args: &["-selection", "clipboard"] };
const XCLIP_PASTE: Tool = Tool { program: "xclip", args: &["-selection", "clipboard", "-o"] };
const XSEL_COPY: Tool = Tool { program: "xsel", args: &["--clipboard", "--input"] };
const XSEL_PASTE: Tool = Tool { program: "xsel", args: &["--clipboard", "--output"] };
const PBCOPY: Tool = Tool { program: "pbcopy", args: &[] };
const PBPASTE: Tool = Tool { program: "pbpaste", args: &[] };
const CLIP: Tool = Tool { program: "clip", args: &[] };
const GET_CLIPBOARD: Tool = Tool { program: "powershell", args: &["-NoProfile", "-Command", "Get-Clipboard"] };

/// Where the process is running, as far as clipboard access goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Wayland,
    X11,
    MacOs,
    Windows,
    /// Unix without a known display server; every utility is tried.
    Unknown,
}

impl Platform {
    /// Detect from the target OS and the given environment lookup.
    pub fn detect(has_var: impl Fn(&str) -> bool) -> Self {
        if cfg!(target_os = "macos") {
            Self::MacOs
        } else if cfg!(target_os = "windows") {
            Self::Windows
        } else if has_var("WAYLAND_DISPLAY") {
            Self::Wayland
        } else if has_var("DISPLAY") {
            Self::X11
        } else {
            Self::Unknown
        }
    }

    pub fn current() -> Self {
        Self::detect(|key| std::env::var_os(key).is_some())
    }
}

/// Candidate utilities in the order they are tried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolSet {
    pub copy: Vec<Tool>,
    pub paste: Vec<Tool>,
}

impl ToolSet {
    pub fn for_platform(platform: Platform) -> Self {
        match platform {
            Platform::Wayland => Self {
                copy: vec![WL_COPY, XCLIP_COPY, XSEL_COPY],
                paste: vec![WL_PASTE, XCLIP_PASTE, XSEL_PASTE],
            },
            Platform::X11 | Platform::Unknown => Self {
                copy: vec![XCLIP_COPY, XSEL_COPY, WL_COPY],
                paste: vec![XCLIP_PASTE, XSEL_PASTE, WL_PASTE],
            },
            Platform::MacOs => Self {
                copy: vec![PBCOPY],
                paste: vec![PBPASTE],
            },
            Platform::Windows => Self {
                copy: vec![CLIP],
                paste: vec![GET_CLIPBOARD],
            },
        }
    }
}

/// The real clipboard, backed by external utilities.
#[derive(Debug, Clone, Default)]
pub struct SystemClipboard {
    tools: Option<ToolSet>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a fixed set of utilities instead of detecting them per call.
    pub fn with_tools(tools: ToolSet) -> Self {
        Self { tools: Some(tools) }
    }

    fn tools(&self) -> ToolSet {
        self.tools
            .clone()
            .unwrap_or_else(|| ToolSet::for_platform(Platform::current()))
    }
}

impl Clipboard for SystemClipboard {
    fn read(&self) -> Result<String, ClipboardError> {
        for tool in self.tools().paste {
            let output = match Command::new(tool.program)
                .args(tool.args)
                .stdin(Stdio::null())
                .output()
            {
                Ok(output) => output,
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    debug!(program = tool.program, "clipboard utility not installed");
                    continue;
                }
                Err(e) => {
                    return Err(ClipboardError::Command {
                        tool: tool.program,
                        source: anyhow::Error::new(e).context("could not start"),
                    })
                }
            };
            let text = pasted_text(output).map_err(|source| ClipboardError::Command {
                tool: tool.program,
                source,
            })?;
            if text.trim().is_empty() {
                return Err(ClipboardError::Empty);
            }
            debug!(program = tool.program, bytes = text.len(), "read clipboard");
            return Ok(text);
        }
        Err(ClipboardError::NoBackend)
    }

    fn write(&self, text: &str) -> Result<(), ClipboardError> {
        for tool in self.tools().copy {
            let child = match Command::new(tool.program)
                .args(tool.args)
                .stdin(Stdio::piped())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .spawn()
            {
                Ok(child) => child,
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    debug!(program = tool.program, "clipboard utility not installed");
                    continue;
                }
                Err(e) => {
                    return Err(ClipboardError::Command {
                        tool: tool.program,
                        source: anyhow::Error::new(e).context("could not start"),
                    })
                }
            };
            feed(child, text).map_err(|source| ClipboardError::Command {
                tool: tool.program,
                source,
            })?;
            debug!(program = tool.program, "copied to clipboard");
            return Ok(());
        }
        Err(ClipboardError::NoBackend)
    }
}

fn pasted_text(output: Output) -> anyhow::Result<String> {
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("exited with {}: {}", output.status, stderr.trim());
    }
    String::from_utf8(output.stdout).context("clipboard does not hold UTF-8 text")
}

fn feed(mut child: std::process::Child, text: &str) -> anyhow::Result<()> {
    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(text.as_bytes())
            .context("writing to the utility's stdin")?;
    }
    let status = child.wait().context("waiting for the utility")?;
    if !status.success() {
        bail!("exited with {status}");
    }
    Ok(())
}
