//! Delegated classification path: the authoritative HTTP proxy, its failure
//! taxonomy, and the opt-in heuristic fallback.

mod config;
mod delegate;
mod error;
mod fallback;
mod proxy;

pub use config::{RemoteConfig, DEFAULT_TIMEOUT_SECS};
pub use delegate::{DelegateError, DelegatedClassifier};
pub use error::RemoteError;
pub use fallback::{ConfidenceSource, FallbackClassifier, UniformConfidence, FALLBACK_NOTE};
pub use proxy::{ProbeReport, RemoteClassifier};
