pub mod cluster;
pub mod database;
