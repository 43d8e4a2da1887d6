//! Line-oriented debugger.
//!
//! A prompt-driven command loop over one machine:
//! - [`Command`] - the closed set of debugger commands, parsed from a line
//! - [`Session`] - owns the [`Cpu`](crate::Cpu) and a console and runs the loop

pub mod command;
pub mod session;

pub use command::{Command, Target, UsageError};
pub use session::{Session, COMMAND_PROMPT};
