pub mod matrix;
pub mod report;
pub mod roster;

pub use matrix::*;
pub use report::*;
pub use roster::*;
