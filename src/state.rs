use std::sync::Arc;

use crate::db::BookStore;

/// Shared by every worker. The store handle is the only state a request touches.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn BookStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn BookStore>) -> Self {
        AppState { store }
    }
}
