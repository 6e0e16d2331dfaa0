//! Cross-cutting support code shared by the helpers and the CLI.

pub mod output;
