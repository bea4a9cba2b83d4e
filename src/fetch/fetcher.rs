use crate::config::HttpConfig;
use crate::fetch::traits::{FetchRequest, Fetcher, HeaderProfile};
use crate::model::FetchError;

use reqwest::Client;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue, USER_AGENT};
use std::time::Duration;

pub struct ReqwestFetcher {
    client: Client,
    mobile_user_agent: String,
}

impl ReqwestFetcher {
    pub fn new(cfg: &HttpConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));

        let client = Client::builder()
            .user_agent(cfg.user_agent.as_str())
            .default_headers(headers)
            .timeout(Duration::from_secs(cfg.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            mobile_user_agent: cfg.mobile_user_agent.clone(),
        })
    }
}

#[async_trait::async_trait]
impl Fetcher for ReqwestFetcher {
    async fn fetch(&self, req: &FetchRequest) -> Result<String, FetchError> {
        let mut request = self.client.get(&req.url);
        if req.profile == HeaderProfile::Mobile {
            request = request
                .header(USER_AGENT, self.mobile_user_agent.as_str())
                .header("Upgrade-Insecure-Requests", "1");
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status().as_u16()));
        }

        Ok(response.text().await?)
    }
}
