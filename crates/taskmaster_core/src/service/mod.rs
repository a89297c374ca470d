//! Core use-case services.
//!
//! # Responsibility
//! - Hold in-memory application state for the presentation layer.
//! - Route every side effect through repository implementations.

pub mod todo_controller;
