//! Snapshot output rendering

pub mod json;

pub use json::{render_snapshot, render_snapshot_value};
