//! Utility modules.

/// Keeps response bodies and secrets out of logs.
pub mod redact;
