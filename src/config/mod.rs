pub mod database;
pub mod secrets;
