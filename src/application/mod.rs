//! Application layer - admission and dispatch.
//!
//! - `gate`: the single shared rate limit window
//! - `dispatcher`: bounded queue and worker pool for admitted submissions
//! - `config` and `metrics`: shared by both
//! - `ports`: the `Clock` and `Submitter` traits infrastructure implements

pub mod config;
pub mod dispatcher;
pub mod gate;
pub mod metrics;
pub mod ports;
