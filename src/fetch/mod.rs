pub mod fetcher;
pub mod throttle;
pub mod traits;

pub use fetcher::ReqwestFetcher;
pub use throttle::Throttle;
pub use traits::{FetchRequest, Fetcher, HeaderProfile};

use crate::model::FetchError;
use std::sync::Arc;

/// Shared HTTP session for one query: a fetcher plus the pause taken after
/// every outbound request.
pub struct Session {
    fetcher: Arc<dyn Fetcher>,
    throttle: Throttle,
}

impl Session {
    pub fn new(fetcher: Arc<dyn Fetcher>, throttle: Throttle) -> Self {
        Self { fetcher, throttle }
    }

    pub async fn get(&self, req: &FetchRequest) -> Result<String, FetchError> {
        let result = self.fetcher.fetch(req).await;
        self.throttle.pause().await;
        result
    }
}
