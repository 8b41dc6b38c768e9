//! Background Tasks Module
//!
//! # Tasks
//! - Expiry sweep: removes stale snapshots at a configured interval, on top
//!   of the sweep every insert already performs

mod sweep;

pub use sweep::spawn_sweep_task;
