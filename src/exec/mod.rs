// src/exec/mod.rs

//! Process supervision.
//!
//! - [`supervisor`] spawns the child and hands back a [`RunHandle`].
//! - [`waiter`] owns the child handle and reports its wait result.
//! - [`escalation`] is the timeout → signal → kill state machine.
//! - [`facade`] has the buffered ([`Supervisor::run`]) and streaming
//!   ([`Supervisor::run_streaming`]) entry points.

pub(crate) mod escalation;
pub mod facade;
pub mod supervisor;
pub(crate) mod waiter;

pub use facade::{CapturedRun, OUTPUT_DRAIN_GRACE};
pub use supervisor::{RunHandle, Supervisor};
