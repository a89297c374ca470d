//! Flutter-facing bridge crate for TaskMaster core.

pub mod api;
