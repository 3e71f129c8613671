//! Fixture actions mounted through the code `praxis-codegen` generates.
//!
//! `build.rs` scans `actions/`, which holds a single-word action, a
//! method-suffixed action and a nested action. The generated `actions`,
//! `handlers` and `references` modules are included below.

#![forbid(unsafe_code)]

include!(concat!(env!("OUT_DIR"), "/praxis/mod.rs"));

/// Types shared between fixture actions and their callers.
pub mod model {
    use serde::{Deserialize, Serialize};

    /// Query input of `get-count`.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct CountQuery {
        /// Value to count from.
        pub from: u64,
    }

    /// Input of `auth/login`.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Credentials {
        /// Account email.
        pub email: String,
        /// Account password.
        pub password: String,
    }

    /// Output of `auth/login`.
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Session {
        /// Opaque session token.
        pub token: String,
    }
}
