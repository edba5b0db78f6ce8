pub mod films;
pub mod health;
pub mod lookups;
pub mod users;
