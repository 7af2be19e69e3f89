pub mod filter;
pub mod stats;
pub mod task;
pub mod theme;
