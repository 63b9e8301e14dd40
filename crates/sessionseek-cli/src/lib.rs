// Thin front-end over sessionseek-runtime.
// Commands parse arguments, call one runtime operation and render the result;
// no query logic lives here.

mod args;
mod commands;
mod handlers;
mod logging;
pub mod presentation;
pub mod types;

pub use args::{Cli, Commands, FilterArgs};
pub use commands::{exit_code, run};
pub use logging::init_logging;
