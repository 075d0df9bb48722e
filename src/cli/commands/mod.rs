pub mod admin;
pub mod diagnose;
pub mod seed;
