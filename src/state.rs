use std::sync::Arc;

use crate::services::ImageHost;
use crate::store::Store;

/// Shared application state threaded through every handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub images: Arc<dyn ImageHost>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, images: Arc<dyn ImageHost>) -> Self {
        Self { store, images }
    }
}
