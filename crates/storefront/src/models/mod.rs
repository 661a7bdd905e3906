//! Session-backed models for storefront.

pub mod session;

pub use session::{dispatch, keys, load_store, visitor_id};
