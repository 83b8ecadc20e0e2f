pub mod court;
pub mod identity;
pub mod profile;
pub mod reservation;
pub mod slot;
