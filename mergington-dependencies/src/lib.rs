//! Shared third-party stack for the Mergington workspace.
//!
//! Member crates pull these through here so that every crate links the same
//! versions. Crates whose derive or attribute macros expand to their own
//! crate path (`serde`, `thiserror`, `tracing`, `maud`, `clap`, `async-trait`,
//! `tokio`, `axum-extra`) are depended on directly by each member instead.

pub use axum;
pub use better_panic;
pub use envy;
pub use kankyo;
pub use reqwest;
pub use serde_json;
pub use url;
