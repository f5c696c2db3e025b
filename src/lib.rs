// Library root
// ------------
// The `memo` binary is a thin shell around these modules so that routing,
// input resolution and dispatch can be tested without a terminal, a
// clipboard or a live server.
//
// Module responsibilities:
// - `config`: loads `~/.memos.conf` and environment overrides.
// - `cli`: the clap flag surface.
// - `router`: picks exactly one command from the flags, enforcing gating.
// - `input`: reads stdin or the clipboard into a finished `Action`.
// - `api`: the blocking HTTP client for the Memos v1 API.
// - `clipboard`: system clipboard utilities behind a small trait.
// - `app`: runs one invocation end to end.
// - `ui`: terminal output.
pub mod api;
pub mod app;
pub mod cli;
pub mod clipboard;
pub mod config;
pub mod error;
pub mod input;
pub mod model;
pub mod router;
pub mod ui;
