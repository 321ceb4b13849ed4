//! Limit/offset pagination for list endpoints.

use serde::{Deserialize, Serialize};

/// Default page size.
const DEFAULT_LIMIT: i64 = 20;

/// Limit/offset window for paginated queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageQuery {
    /// Maximum number of items to return.
    pub limit: i64,
    /// Number of items to skip.
    pub offset: i64,
}

impl PageQuery {
    /// Create a page query, falling back to defaults for out-of-range input.
    pub fn new(limit: i64, offset: i64) -> Self {
        Self {
            limit: if limit > 0 { limit } else { DEFAULT_LIMIT },
            offset: offset.max(0),
        }
    }

    /// Coerce loosely-typed numeric query input.
    ///
    /// Fractional values are truncated toward zero; missing or non-positive
    /// limits fall back to the default.
    pub fn coerce(limit: Option<f64>, offset: Option<f64>) -> Self {
        Self::new(
            limit.map(|l| l.trunc() as i64).unwrap_or(DEFAULT_LIMIT),
            offset.map(|o| o.trunc() as i64).unwrap_or(0),
        )
    }

    /// Whether more items remain past this window.
    pub fn has_more(&self, total: i64) -> bool {
        total > self.offset + self.limit
    }
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}
