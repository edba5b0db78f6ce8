pub mod films;
pub mod users;
