//! Supervision of the single server process launched for the staged test.

pub mod event;
pub mod launcher;
pub mod shell;

pub use event::*;
pub use launcher::*;
pub use shell::*;
