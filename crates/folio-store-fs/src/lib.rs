//! Local-filesystem backend for Folio.
//!
//! Blocking filesystem calls run on tokio's blocking pool so they never stall
//! the async runtime, and so an issued write is not cancelled when the
//! request that started it goes away.

mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::FsStore;
