pub mod config;
pub mod doctor;
pub mod feedback;
pub mod harness;
pub mod table;
pub mod util;

pub use config::*;
pub use doctor::*;
pub use feedback::*;
pub use harness::*;
pub use table::*;
pub use util::*;
