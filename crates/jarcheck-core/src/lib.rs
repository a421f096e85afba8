pub mod error;
pub mod model;
pub mod progress;
pub mod registry;

pub use error::*;
pub use model::*;
pub use progress::*;
pub use registry::*;
