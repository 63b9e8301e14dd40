// Engine module - pure pagination and grouping logic
// Sits between the index (ranked sessions, matching rows) and callers

mod assembler;
mod paginator;

pub use assembler::{assemble, sort_session_rows};
pub use paginator::{PageRequest, PaginationError, check_row_window};
