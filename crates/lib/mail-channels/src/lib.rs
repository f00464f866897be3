//! Channels connecting a mailbox watcher with its display.

mod control;
mod status;

pub use control::*;
pub use status::*;
