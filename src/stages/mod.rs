pub mod stage0_extract;
pub mod stage1_fill;
pub mod stage2_stats;

pub use stage0_extract::*;
pub use stage1_fill::*;
pub use stage2_stats::*;
