//! URL handling module for sitesweep
//!
//! This module provides URL canonicalization and same-domain matching. Both
//! the visited set and the domain filter operate on canonical URL strings,
//! so every URL entering the crawler passes through here first.

mod canonical;
mod domain;

// Re-export main functions
pub use canonical::canonicalize;
pub use domain::{host_key, is_same_domain};
