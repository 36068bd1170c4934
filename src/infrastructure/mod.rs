pub mod api;
pub mod bitcoin;
pub mod persistence;
