// Library root
// -----------
// This crate exposes a small library surface for the CLI. The binary
// (`main.rs`) loads configuration, builds the client and runs the menu.
//
// Module responsibilities:
// - `api`: blocking HTTP client for the remote files/assistants endpoints
//   and the `ResourceClient` trait the menu depends on.
// - `config`: `.env` loading and `OPENAI_*` variable resolution.
// - `error`: the `ClientError` type returned by the API layer.
// - `terminal`: console input/output seam (dialoguer, indicatif, crossterm).
// - `ui`: the main menu loop and its six actions.
pub mod api;
pub mod config;
pub mod error;
pub mod terminal;
pub mod ui;
