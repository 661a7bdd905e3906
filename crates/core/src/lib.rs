//! LUMINA Core - Domain types and state transitions.
//!
//! This crate provides the pieces shared by every LUMINA component:
//! - `storefront` - Public-facing store, concierge, dashboard and sync utility
//! - `cli` - Command-line tools for the catalog and repository sync
//!
//! # Architecture
//!
//! The core crate contains only types and pure transition functions - no I/O,
//! no HTTP clients. Every state change a visitor can trigger is expressed here
//! as a function from old state to new state, so it can be tested without a
//! server.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, categories and statuses
//! - [`catalog`] - The static shoe catalog and category filtering
//! - [`cart`] - Cart items and quantity math
//! - [`chat`] - Concierge transcript and turn state machine
//! - [`store`] - Root store state and its reducer
//! - [`snapshot`] - Source files gathered for repository sync

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod chat;
pub mod snapshot;
pub mod store;
pub mod types;

pub use cart::{Cart, CartItem, QuantityPolicy, QuantityPolicyParseError};
pub use catalog::Shoe;
pub use chat::{ChatMessage, ChatPart, Concierge, ConciergeError, Transcript, TurnState};
pub use snapshot::SnapshotFile;
pub use store::{Action, StoreState};
pub use types::*;
