pub mod cups;
pub mod towers;
