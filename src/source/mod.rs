pub mod base;
pub mod gdata;
