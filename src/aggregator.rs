// Runs every probe in order and assembles the aggregate result
use crate::config::AppConfig;
use crate::fallback::FallbackSynthesizer;
use crate::fetch::{Fetcher, Session, Throttle};
use crate::model::AggregateResult;
use crate::probe::{ListingPolicy, Probe, ProbeContext, build_probes};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tracing::info;

pub struct Aggregator {
    probes: Vec<Box<dyn Probe>>,
    fallback: FallbackSynthesizer,
    rng: Mutex<StdRng>,
}

impl Aggregator {
    pub fn new(probes: Vec<Box<dyn Probe>>, fallback: FallbackSynthesizer, rng: StdRng) -> Self {
        Self { probes, fallback, rng: Mutex::new(rng) }
    }

    /// Wires the configured probes to one shared session over `fetcher`.
    pub fn from_config(cfg: &AppConfig, fetcher: Arc<dyn Fetcher>) -> Self {
        let (throttle_rng, fallback_rng) = match cfg.seed {
            Some(seed) => (
                StdRng::seed_from_u64(seed),
                StdRng::seed_from_u64(seed.wrapping_add(1)),
            ),
            None => (StdRng::from_os_rng(), StdRng::from_os_rng()),
        };

        let session = Session::new(fetcher, Throttle::new(cfg.delay, throttle_rng));
        let ctx = Arc::new(ProbeContext {
            session: Arc::new(session),
            policy: ListingPolicy::from_config(cfg),
        });

        Self::new(
            build_probes(cfg, ctx),
            FallbackSynthesizer::new(cfg.fallback.clone()),
            fallback_rng,
        )
    }

    /// Probes run one after another; records keep probe order and each
    /// probe's own order. Placeholder listings are added only when every
    /// probe came back empty.
    pub async fn aggregate(&self, brand: &str, model: &str) -> AggregateResult {
        info!("🔎 Starting market search for {} {}", brand, model);
        let mut result = AggregateResult::default();

        for probe in &self.probes {
            let started = Instant::now();
            let records = probe.probe(brand, model).await;
            info!(
                source = probe.name(),
                duration_ms = started.elapsed().as_millis() as u64,
                count = records.len(),
                "probe finished"
            );
            result.extend(records);
        }

        if result.is_empty() {
            info!("No live listings for {} {}, using placeholder market data", brand, model);
            let records = {
                let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
                self.fallback.synthesize(brand, model, &mut *rng)
            };
            info!(source = "fallback", count = records.len(), "probe finished");
            result.extend(records);
        }

        info!("Found {} listings across {} sources", result.total_found, result.sources.len());
        result
    }
}
