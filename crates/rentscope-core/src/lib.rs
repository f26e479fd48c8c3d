pub mod error;
pub mod estimate;
pub mod format;
pub mod metrics;
pub mod rents;
pub mod share;
pub mod store;
pub mod types;

pub use error::RentscopeError;
pub use types::*;

/// Standard result type for all rentscope operations
pub type RentscopeResult<T> = Result<T, RentscopeError>;
