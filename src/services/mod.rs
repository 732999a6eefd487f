pub mod cache;
pub mod calculations;
pub mod fundamentals;
