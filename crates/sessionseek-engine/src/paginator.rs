use std::fmt;

use sessionseek_types::{RankedSession, SessionWindow};

/// Rejected page parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaginationError {
    /// `sessions_per_page` was zero or negative.
    NonPositivePageSize(i64),
    /// `page` was negative.
    NegativePage(i64),
    /// A row offset was negative.
    NegativeOffset(i64),
    /// `page * sessions_per_page` does not fit the offset type.
    OffsetOverflow { page: i64, sessions_per_page: i64 },
}

impl fmt::Display for PaginationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaginationError::NonPositivePageSize(size) => write!(
                f,
                "Invalid page size {}: sessions per page must be a positive integer",
                size
            ),
            PaginationError::NegativePage(page) => write!(
                f,
                "Invalid page index {}: pages are numbered from 0",
                page
            ),
            PaginationError::NegativeOffset(offset) => {
                write!(f, "Invalid offset {}: must not be negative", offset)
            }
            PaginationError::OffsetOverflow {
                page,
                sessions_per_page,
            } => write!(
                f,
                "Page {} with {} sessions per page is out of range",
                page, sessions_per_page
            ),
        }
    }
}

impl std::error::Error for PaginationError {}

/// Validate a flat `limit`/`offset` pair.
pub fn check_row_window(limit: i64, offset: i64) -> Result<(), PaginationError> {
    if limit <= 0 {
        return Err(PaginationError::NonPositivePageSize(limit));
    }
    if offset < 0 {
        return Err(PaginationError::NegativeOffset(offset));
    }
    Ok(())
}

/// One page of sessions, measured in sessions rather than rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: i64,
    sessions_per_page: i64,
    offset: i64,
}

impl PageRequest {
    pub fn new(page: i64, sessions_per_page: i64) -> Result<Self, PaginationError> {
        if sessions_per_page <= 0 {
            return Err(PaginationError::NonPositivePageSize(sessions_per_page));
        }
        if page < 0 {
            return Err(PaginationError::NegativePage(page));
        }

        // the over-fetch limit must fit too
        let offset = page
            .checked_mul(sessions_per_page)
            .filter(|_| sessions_per_page < i64::MAX)
            .ok_or(PaginationError::OffsetOverflow {
                page,
                sessions_per_page,
            })?;

        Ok(Self {
            page,
            sessions_per_page,
            offset,
        })
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn sessions_per_page(&self) -> i64 {
        self.sessions_per_page
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }

    /// Sessions to request from the ranking: one more than the page holds.
    pub fn fetch_limit(&self) -> i64 {
        self.sessions_per_page + 1
    }

    /// Split an over-fetched ranking into the page window and `has_more`.
    pub fn window(&self, mut ranked: Vec<RankedSession>) -> (SessionWindow, bool) {
        let keep = self.sessions_per_page as usize;
        let has_more = ranked.len() > keep;
        ranked.truncate(keep);
        (SessionWindow { sessions: ranked }, has_more)
    }

    /// The following page, if its offset is representable.
    pub fn next(&self) -> Option<PageRequest> {
        let page = self.page.checked_add(1)?;
        PageRequest::new(page, self.sessions_per_page).ok()
    }
}
