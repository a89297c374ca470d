//! Domain model for to-do items.
//!
//! # Responsibility
//! - Define the canonical record shared by repository, controller and FFI.
//! - Own text normalization rules for item values.
//!
//! # Invariants
//! - Every persisted item is identified by a store-assigned `ItemId`.
//! - Item values are never blank; deletion is a hard delete.

pub mod item;
