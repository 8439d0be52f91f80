//! The beacon discovery and enrichment pipeline.
//!
//! ```text
//! ScanSource ─► eddystone::decode ─► AdmissionFilter ─► MetadataFetcher ─► SessionSnapshot
//!   (radio)        (protocols)         (per session)     (one task/url)      (watch channel)
//! ```
//!
//! * **[`session`]**: the controller actor that owns a scan session and routes events through the pipeline.
//! * **[`admission`]**: at-most-once admission of decoded URLs.
//! * **[`metadata`]**: page metadata extraction with a deterministic fallback.
//!
//! Concrete collaborators live next to the pipeline:
//! [`bluetooth`] (btleplug radio), [`http`] (reqwest transport), [`html`] (scraper documents)
//! and [`permissions`].

pub mod admission;
pub mod bluetooth;
pub mod html;
pub mod http;
pub mod metadata;
pub mod permissions;
pub mod session;

pub use admission::AdmissionFilter;
pub use metadata::MetadataFetcher;
pub use session::{SessionController, SessionHandle};
