//! Result type alias for sharpen operations

use crate::error::SharpenError;

/// Standard Result type for sharpen operations
pub type Result<T> = std::result::Result<T, SharpenError>;
