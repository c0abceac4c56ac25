//! Background Tasks Module
//!
//! Contains background tasks owned by a cache store.
//!
//! # Tasks
//! - Expiry Sweep: removes entries whose expiry records have passed

mod sweep;

pub use sweep::{spawn_sweep_task, sweep_expired, SweepReport, DEFAULT_SWEEP_INTERVAL};
