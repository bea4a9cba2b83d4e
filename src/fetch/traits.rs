use crate::model::FetchError;

/// Which set of request headers to present to a site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderProfile {
    Desktop,
    Mobile,
}

#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub url: String,
    pub profile: HeaderProfile,
}

impl FetchRequest {
    pub fn desktop(url: impl Into<String>) -> Self {
        Self { url: url.into(), profile: HeaderProfile::Desktop }
    }

    pub fn mobile(url: impl Into<String>) -> Self {
        Self { url: url.into(), profile: HeaderProfile::Mobile }
    }
}

#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, req: &FetchRequest) -> Result<String, FetchError>;
}
