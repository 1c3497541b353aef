pub mod backends;
pub mod scan;
