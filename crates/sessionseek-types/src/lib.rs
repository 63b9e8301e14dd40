pub mod domain;
pub mod error;
pub mod search;
mod util;

pub use domain::*;
pub use error::{Error, Result};
pub use search::*;
pub use util::*;
