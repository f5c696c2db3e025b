// API client module: a small blocking HTTP client for the Memos v1 API.
// Every action maps to exactly one request; nothing is retried. Responses
// are normalized into `Note` values before they leave this module.

use crate::config::Config;
use crate::error::ApiError;
use crate::model::{Note, SearchHits, Visibility};
use chrono::{DateTime, Utc};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Per-request timeout, connection included.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Results fetched for a search; only this one page is requested.
pub const SEARCH_PAGE_SIZE: usize = 5;

const MEMOS_PATH: &str = "/api/v1/memos";

/// Path under the endpoint where a note is viewed in the browser.
pub const NOTE_URL_PATH: &str = "/memos/";

/// The operations the dispatcher needs from the notes service.
pub trait NotesApi {
    fn create(&self, content: &str, visibility: Visibility) -> Result<Note, ApiError>;
    /// Most recent note of the authenticated user.
    fn list_last(&self) -> Result<Note, ApiError>;
    fn search(&self, keyword: &str) -> Result<SearchHits, ApiError>;
    fn update(&self, id: &str, content: &str) -> Result<Note, ApiError>;
    fn delete(&self, id: &str) -> Result<(), ApiError>;
}

/// Blocking client holding the configured endpoint and a reqwest client
/// that sends the bearer token with every request.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

/// Memo resource as serialized by the server.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct MemoWire {
    #[serde(default)]
    name: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    visibility: Option<String>,
    #[serde(default)]
    create_time: Option<DateTime<Utc>>,
}

#[derive(Deserialize, Debug)]
struct ListMemosWire {
    #[serde(default)]
    memos: Vec<MemoWire>,
}

/// gRPC-gateway error body.
#[derive(Deserialize, Debug)]
struct ErrorWire {
    message: String,
}

#[derive(Serialize, Debug)]
struct CreateMemoRequest<'a> {
    content: &'a str,
    visibility: Visibility,
}

#[derive(Serialize, Debug)]
struct UpdateMemoRequest<'a> {
    content: &'a str,
}

impl ApiClient {
    /// Build a client for the endpoint and token in `config`.
    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .default_headers(auth_headers(&config.token)?)
            .build()
            .map_err(|e| ApiError::Setup(e.to_string()))?;
        Ok(ApiClient {
            client,
            base_url: config.endpoint.clone(),
        })
    }

    fn memos_url(&self) -> String {
        format!("{}{}", self.base_url, MEMOS_PATH)
    }

    fn memo_url(&self, id: &str) -> String {
        format!("{}{}/{}", self.base_url, MEMOS_PATH, id)
    }

    /// Send one request and return the body of a successful response.
    /// `what` names the resource in a not-found error.
    fn execute(&self, req: RequestBuilder, what: &str) -> Result<String, ApiError> {
        let req = req.build().map_err(|e| ApiError::Setup(e.to_string()))?;
        debug!(method = %req.method(), url = %req.url(), "sending request");

        let res = self.client.execute(req).map_err(ApiError::Unreachable)?;
        let status = res.status();
        let body = res.text().map_err(ApiError::Unreachable)?;
        debug!(status = status.as_u16(), bytes = body.len(), "received response");

        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(what.to_string()));
        }
        if !status.is_success() {
            return Err(ApiError::Rejected {
                status: status.as_u16(),
                message: error_message(status, &body),
            });
        }
        Ok(body)
    }

    fn list(&self, params: &[(&str, String)]) -> Result<Vec<Note>, ApiError> {
        let req = self.client.get(self.memos_url()).query(params);
        let body = self.execute(req, "memo list")?;
        let list: ListMemosWire = parse(&body)?;
        list.memos
            .into_iter()
            .map(|m| self.normalize(m))
            .collect()
    }

    fn normalize(&self, memo: MemoWire) -> Result<Note, ApiError> {
        let id = memo
            .name
            .rsplit('/')
            .next()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                ApiError::MalformedResponse(format!("memo has no usable name: {:?}", memo.name))
            })?
            .to_string();
        let visibility = memo
            .visibility
            .as_deref()
            .and_then(|v| v.parse().ok())
            .unwrap_or_default();
        Ok(Note {
            resource_url: format!("{}{}{}", self.base_url, NOTE_URL_PATH, id),
            id,
            content: memo.content,
            visibility,
            created_at: memo.create_time,
        })
    }
}

impl NotesApi for ApiClient {
    fn create(&self, content: &str, visibility: Visibility) -> Result<Note, ApiError> {
        let req = self
            .client
            .post(self.memos_url())
            .json(&CreateMemoRequest {
                content,
                visibility,
            });
        let body = self.execute(req, "memo collection")?;
        self.normalize(parse(&body)?)
    }

    fn list_last(&self) -> Result<Note, ApiError> {
        self.list(&[("page_size", "1".to_string())])?
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::NotFound("latest memo".to_string()))
    }

    fn search(&self, keyword: &str) -> Result<SearchHits, ApiError> {
        let mut notes = self
            .list(&[
                ("page_size", SEARCH_PAGE_SIZE.to_string()),
                ("filter", content_filter(keyword)),
            ])?
            .into_iter();
        let first = notes
            .next()
            .ok_or_else(|| ApiError::NotFound(format!("memo matching {keyword:?}")))?;
        Ok(SearchHits {
            first,
            others: notes.collect(),
        })
    }

    fn update(&self, id: &str, content: &str) -> Result<Note, ApiError> {
        let req = self
            .client
            .patch(self.memo_url(id))
            .query(&[("update_mask", "content")])
            .json(&UpdateMemoRequest { content });
        let body = self.execute(req, &format!("memo {id}"))?;
        self.normalize(parse(&body)?)
    }

    fn delete(&self, id: &str) -> Result<(), ApiError> {
        let req = self.client.delete(self.memo_url(id));
        self.execute(req, &format!("memo {id}"))?;
        Ok(())
    }
}

/// Authorization header carrying the bearer token.
fn auth_headers(token: &str) -> Result<HeaderMap, ApiError> {
    let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
        .map_err(|_| ApiError::Setup("token is not a valid header value".to_string()))?;
    value.set_sensitive(true);
    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, value);
    Ok(headers)
}

fn parse<'a, T: Deserialize<'a>>(body: &'a str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::MalformedResponse(e.to_string()))
}

/// Message from an error body, falling back to the raw text, then the
/// status reason.
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(err) = serde_json::from_str::<ErrorWire>(body) {
        if !err.message.is_empty() {
            return err.message;
        }
    }
    let text = body.trim();
    if !text.is_empty() {
        return text.chars().take(200).collect();
    }
    status
        .canonical_reason()
        .unwrap_or("unknown status")
        .to_string()
}

/// CEL filter matching notes whose content contains `keyword`.
pub fn content_filter(keyword: &str) -> String {
    let escaped = keyword.replace('\\', "\\\\").replace('"', "\\\"");
    format!("content.contains(\"{escaped}\")")
}
