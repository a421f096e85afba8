pub mod json;
pub mod memory;
pub mod scan;
pub mod traits;

pub use json::*;
pub use memory::*;
pub use scan::*;
pub use traits::*;
