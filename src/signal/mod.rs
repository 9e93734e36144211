// src/signal/mod.rs

//! Signals used by the escalation loop.
//!
//! - [`policy`] decides which signal is sent on timeout and parses signal
//!   names given on the command line or in a config file.
//! - [`target`] decides *who* receives it: the child alone, or the child's
//!   whole process group.

pub mod policy;
pub mod target;

pub use policy::{default_signal, parse_signal, Signal};
pub use target::SignalTarget;
