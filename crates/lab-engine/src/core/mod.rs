pub mod collision;
pub mod field;
pub mod integrate;
pub mod rng;
pub mod time;
