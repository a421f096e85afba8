pub mod copy;
pub mod script;
pub mod stage;

pub use copy::*;
pub use script::*;
pub use stage::*;
