pub mod analytics;
pub mod core;
pub mod courses;
pub mod filter;
pub mod students;
