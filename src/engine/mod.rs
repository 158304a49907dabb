pub mod cost;
pub mod lifecycle;
pub mod tracking;
