//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Translate item use-cases into storage gateway calls.
//! - Normalize gateway rows into domain records.
//!
//! # Invariants
//! - Blank text never reaches the gateway.
//! - Read paths reject invalid persisted state instead of masking it.

pub mod item_repo;
