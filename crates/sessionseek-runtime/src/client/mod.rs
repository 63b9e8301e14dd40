mod search;
mod workspace;

pub use search::SearchOps;
pub use workspace::SessionSeek;
