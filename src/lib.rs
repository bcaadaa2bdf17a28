//! # file2md
//!
//! A minimal upload-and-convert web service: documents in, Markdown out.
//!
//! ## Why this crate?
//!
//! Converting "whatever the user drags into the browser" to text is a solved
//! problem — Apache Tika (via the [`extractous`] bindings) already reads PDF,
//! OOXML, images, audio, HTML, CSV, JSON, and XML. What is *not* solved is the
//! glue: accepting an upload safely, staging it on disk with a sanitised name,
//! invoking the engine, and cleaning up afterwards no matter what went wrong.
//! This crate is exactly that glue and nothing more. The conversion engine is
//! a black box; no format parser lives here.
//!
//! ## Request Flow
//!
//! ```text
//! multipart upload
//!  │
//!  ├─ 1. Validate  filename present, extension allow-listed
//!  ├─ 2. Stage     sanitise name, write bytes into a per-request scratch dir
//!  ├─ 3. Convert   GIF → PNG pre-transform, then hand the path to extractous
//!  ├─ 4. Respond   {"success": true, "markdown": …} or {"error": …}
//!  └─ 5. Cleanup   scratch dir deleted on every exit path (RAII)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use file2md::ServerConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ServerConfig::default();
//!     let app = file2md::server::router(&config);
//!     let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `file2md` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when embedding only the library:
//! ```toml
//! file2md = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod allowlist;
pub mod config;
pub mod convert;
pub mod error;
pub mod server;
pub mod staging;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use allowlist::{is_allowed, ALLOWED_EXTENSIONS};
pub use config::ServerConfig;
pub use convert::MarkdownEngine;
pub use error::{ApiError, ConvertError};
pub use staging::{sanitize_filename, ScratchDir};
