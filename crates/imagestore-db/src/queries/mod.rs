//! Database query modules.

pub mod documents;
