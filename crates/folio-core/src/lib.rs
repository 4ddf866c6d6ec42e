//! Core types and trait definitions for Folio.
//!
//! This crate is deliberately free of HTTP, codec and filesystem
//! dependencies. It owns the request record, its validation, the on-disk
//! path layout and the [`store::DocumentStore`] abstraction.

pub mod error;
pub mod layout;
pub mod request;
pub mod store;

pub use error::{Field, Result, ValidationError};
pub use layout::{Layout, compute_path, file_name};
pub use request::{DocumentMeta, PdfRequest, ValidRecord};
pub use store::{DocumentStore, StoredFile};
