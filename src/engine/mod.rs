pub mod classify;
pub mod diff;
pub mod render;
