pub mod clipboard;
pub mod factory;
pub mod repositories;
