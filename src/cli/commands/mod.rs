//! CLI command implementations
//!
//! Every command returns a process exit code:
//! 0 success, 2 configuration error, 3 malformed input, 5 fatal error.

pub mod anonymize;
pub mod init;
pub mod validate;
