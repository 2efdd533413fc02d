// Public modules
pub mod codes;
pub mod ensure;
pub mod error;
pub mod types;

// Public modules for CLI access
pub mod defaults;
pub mod paths;

// Re-export common types for convenience
pub use ensure::{ensure, ensure_not, ensure_some, Ensurer, ExceptionSpec};
pub use error::{Error, ErrorCode, ErrorInfo, Result};
pub use types::throw_if_not_type;
