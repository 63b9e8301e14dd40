pub mod project;
pub mod record;

pub use project::*;
pub use record::*;
