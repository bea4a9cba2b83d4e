// General web search through DuckDuckGo's HTML endpoint
use crate::config::{AppConfig, KnownVendor};
use crate::fetch::FetchRequest;
use crate::model::ListingRecord;
use crate::probe::{Probe, ProbeContext, css, text_of};
use crate::utils::{title_case, truncate_chars};
use reqwest::Url;
use scraper::{Html, Selector};
use std::sync::{Arc, LazyLock};
use tracing::debug;

const SOURCE: &str = "DuckDuckGo";
const SEARCH_URL: &str = "https://duckduckgo.com/html/";

static RESULT_LINK: LazyLock<Selector> = LazyLock::new(|| css("a.result__a"));

/// Vendor and source attributed to a search hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attribution {
    Vendor { vendor: String, source: String },
    /// Destination is on an excluded domain; the hit is dropped.
    Excluded,
}

pub struct DuckDuckGoProbe {
    ctx: Arc<ProbeContext>,
    limit: usize,
    excluded_domains: Vec<String>,
    known_vendors: Vec<KnownVendor>,
}

impl DuckDuckGoProbe {
    pub fn new(ctx: Arc<ProbeContext>, cfg: &AppConfig) -> Self {
        Self {
            ctx,
            limit: cfg.search_result_limit,
            excluded_domains: cfg.excluded_domains.clone(),
            known_vendors: cfg.known_vendors.clone(),
        }
    }

    pub fn search_url(brand: &str, model: &str) -> String {
        let query = format!("{} {} price buy", brand, model);
        Url::parse_with_params(SEARCH_URL, &[("q", query.as_str())])
            .map(|u| u.to_string())
            .unwrap_or_else(|_| SEARCH_URL.to_string())
    }

    /// Works out who is selling behind a result link. Redirect links carry
    /// the real destination in their `uddg` parameter.
    pub fn attribute(&self, href: &str) -> Attribution {
        let unknown = || Attribution::Vendor {
            vendor: "Unknown".to_string(),
            source: "search_engine".to_string(),
        };

        let domain = if href.contains("uddg=") {
            match redirect_target(href) {
                Some(domain) => domain,
                None => return unknown(),
            }
        } else {
            match host_of(href) {
                Some(domain) => domain,
                None => return unknown(),
            }
        };

        if self.excluded_domains.iter().any(|d| domain.contains(d.as_str())) {
            return Attribution::Excluded;
        }

        let vendor = self
            .known_vendors
            .iter()
            .find(|known| domain.contains(known.domain.as_str()))
            .map(|known| known.name.clone())
            .unwrap_or_else(|| title_case(&domain.replace("www.", "").replace(".com", "")));

        Attribution::Vendor { source: vendor.clone(), vendor }
    }

    pub fn parse(&self, html: &str, brand: &str, model: &str) -> Vec<ListingRecord> {
        let document = Html::parse_document(html);
        let links: Vec<_> = document.select(&RESULT_LINK).collect();
        debug!(found = links.len(), "DuckDuckGo result links");

        let policy = &self.ctx.policy;
        let mut listings = Vec::new();

        for link in links.into_iter().take(self.limit) {
            let title = text_of(link);
            if !policy.is_relevant(&title, brand, model) {
                continue;
            }

            let href = link.value().attr("href").unwrap_or("");
            let Attribution::Vendor { vendor, source } = self.attribute(href) else {
                debug!(href, "skipping excluded domain");
                continue;
            };

            let Some(price) = policy.price_display(policy.extractor.extract(&title)) else {
                continue;
            };

            let web_url = if href.starts_with("//") {
                format!("https:{}", href)
            } else {
                href.to_string()
            };

            debug!(vendor = %vendor, price = %price, "search hit: {}", truncate_chars(&title, 50));
            listings.push(ListingRecord {
                brand: brand.to_string(),
                model: model.to_string(),
                price,
                vendor,
                web_url,
                qty_available: "Check listing".to_string(),
                source,
            });
        }

        listings
    }
}

fn redirect_target(href: &str) -> Option<String> {
    let link = Url::parse("https://duckduckgo.com/").ok()?.join(href).ok()?;
    let target = link
        .query_pairs()
        .find(|(key, _)| key == "uddg")
        .map(|(_, value)| value.into_owned())?;
    host_of(&target)
}

fn host_of(url: &str) -> Option<String> {
    let absolute = if url.starts_with("//") {
        format!("https:{}", url)
    } else {
        url.to_string()
    };
    let parsed = Url::parse(&absolute).ok()?;
    parsed.host_str().map(|h| h.to_lowercase())
}

#[async_trait::async_trait]
impl Probe for DuckDuckGoProbe {
    fn name(&self) -> &str {
        "duckduckgo"
    }

    async fn probe(&self, brand: &str, model: &str) -> Vec<ListingRecord> {
        let req = FetchRequest::desktop(Self::search_url(brand, model));
        match self.ctx.fetch_page(SOURCE, &req).await {
            Some(html) => self.parse(&html, brand, model),
            None => Vec::new(),
        }
    }
}
