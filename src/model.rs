// Domain values shared by the router, the dispatcher and the API client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Access scope of a note on the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Visibility {
    #[default]
    Private,
    Protected,
    Public,
}

impl Visibility {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Private => "PRIVATE",
            Self::Protected => "PROTECTED",
            Self::Public => "PUBLIC",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Visibility {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PRIVATE" => Ok(Self::Private),
            "PROTECTED" => Ok(Self::Protected),
            "PUBLIC" => Ok(Self::Public),
            other => Err(other.to_string()),
        }
    }
}

/// A note as returned by the service, normalized for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub id: String,
    pub content: String,
    pub visibility: Visibility,
    pub created_at: Option<DateTime<Utc>>,
    pub resource_url: String,
}

impl Note {
    /// First line of the content, without code fences, cut to `max` chars.
    pub fn preview(&self, max: usize) -> String {
        let stripped = self
            .content
            .replace("```text\n", "")
            .replace("\n```", "");
        let first = stripped.lines().next().unwrap_or("");
        first.chars().take(max).collect()
    }
}

/// One page of search results; never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHits {
    pub first: Note,
    pub others: Vec<Note>,
}

/// The single operation an invocation performs against the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Create {
        content: String,
        visibility: Visibility,
    },
    ListLast,
    Search {
        keyword: String,
    },
    Update {
        id: String,
        content: String,
    },
    Delete {
        id: String,
    },
}
