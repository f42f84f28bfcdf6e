pub mod core;
pub mod edgar;

// Re-exports
pub use crate::core::config::EdgarConfig;
pub use edgar::{
    EdgarError, FilingHistory, FilingIndex, FilingRecord, Identifier, OwnerFilter, Query,
};
