use std::sync::Arc;

use nd_scrapers::ScraperManager;

pub struct AppState {
    pub manager: Arc<ScraperManager>,
    /// Listing entries per job when the request has no `limit`
    pub default_limit: usize,
}

impl AppState {
    pub fn new(manager: Arc<ScraperManager>) -> Self {
        let default_limit = manager.config().default_limit;
        Self { manager, default_limit }
    }
}
