//! Shared vocabulary of the eddyweb workspace.
//!
//! * **[`beacon`]**: the records flowing through the discovery pipeline.
//! * **[`session`]**: observable state of a scan session.
//! * **[`scanning`]**, **[`transport`]**, **[`document`]**: the collaborator traits the core is driven through.
//! * **[`error`]**: error taxonomy shared by the adapters and the core.
//! * **[`config`]**: runtime options.

pub mod beacon;
pub mod config;
pub mod document;
pub mod error;
pub mod log;
pub mod scanning;
pub mod session;
pub mod transport;

#[doc(hidden)]
pub use tracing;
