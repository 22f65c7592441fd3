use services::database::DatabaseHandle;

pub mod config;
pub mod modules;
pub mod services;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseHandle,
}
