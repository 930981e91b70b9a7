//! Page context pooling.

pub mod manager;

pub use manager::{PageHandle, PagePool};
