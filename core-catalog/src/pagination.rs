//! Pagination helper types for catalog queries

use serde::{Deserialize, Serialize};

use crate::error::BindError;

/// Rows per page for every paginated catalog query
pub const PAGE_SIZE: u32 = 100;

/// Pagination request parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Current page number (0-indexed)
    pub page: u32,
    /// Number of items per page
    pub page_size: u32,
}

impl PageRequest {
    /// Create a request for the given page with the standard page size
    ///
    /// # Examples
    ///
    /// ```
    /// use core_catalog::pagination::{PageRequest, PAGE_SIZE};
    ///
    /// let request = PageRequest::new(2);
    /// assert_eq!(request.page, 2);
    /// assert_eq!(request.page_size, PAGE_SIZE);
    /// assert_eq!(request.offset().unwrap(), 200);
    /// ```
    pub fn new(page: u32) -> Self {
        Self {
            page,
            page_size: PAGE_SIZE,
        }
    }

    /// The first page
    pub fn first() -> Self {
        Self::new(0)
    }

    /// Get the LIMIT value as bound to the statement
    pub fn limit(&self) -> Result<i32, BindError> {
        i32::try_from(self.page_size).map_err(|_| BindError::LimitOverflow(self.page_size))
    }

    /// Calculate the OFFSET value as bound to the statement
    ///
    /// # Errors
    ///
    /// Returns `BindError::OffsetOverflow` when `page * page_size` does not
    /// fit a 32-bit integer.
    pub fn offset(&self) -> Result<i32, BindError> {
        let offset = u64::from(self.page) * u64::from(self.page_size);
        i32::try_from(offset).map_err(|_| BindError::OffsetOverflow {
            page: self.page,
            page_size: self.page_size,
        })
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first()
    }
}
