//! Shared type definitions.

pub mod pagination;

pub use pagination::PageQuery;
