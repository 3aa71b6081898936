//! imagestore-core: shared ids, errors and configuration.
//!
//! Every other imagestore crate depends on this one for the
//! [`DocumentId`] newtype, the unified [`Error`] type and the application
//! [`config::Config`].

pub mod config;
pub mod error;
pub mod ids;

pub use error::{Error, Result};
pub use ids::DocumentId;
