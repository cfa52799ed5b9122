use std::sync::Arc;

use common::store::Records;

pub mod config;
pub mod error;
pub mod routes;
pub mod security;

pub struct AppState {
    pub records: Arc<Records>,
}
