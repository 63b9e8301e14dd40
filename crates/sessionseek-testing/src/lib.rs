//! Testing infrastructure for sessionseek integration tests.
//!
//! - `TestWorld`: isolated workspace with a fluent corpus builder
//! - `fixtures`: canned corpora used across crates
//! - `assertions`: checks over grouped results and CLI JSON output

pub mod assertions;
pub mod fixtures;
pub mod world;

pub use world::{CliResult, TestWorld};
