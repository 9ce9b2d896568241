use std::sync::Arc;

use crate::config::Config;
use crate::rate_limit::RateLimiter;
use crate::storage::Storage;

#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn Storage>,
    pub limiter: Arc<RateLimiter>,
    pub config: Config,
}
