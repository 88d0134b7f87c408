pub mod app_config;
pub mod cors;
pub mod database;
pub mod routes;
