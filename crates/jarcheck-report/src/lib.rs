pub mod log;
pub mod reporter;

pub use log::*;
pub use reporter::*;
