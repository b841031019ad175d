//! In-process hit counter for the static file server.
//!
//! Each counter owns its own registry instead of the prometheus default one,
//! so the value lives in whatever context object created it.

use prometheus::{IntCounter, Opts, Registry};

#[derive(Clone)]
pub struct HitCounter {
    registry: Registry,
    hits: IntCounter,
}

impl HitCounter {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();
        let hits = IntCounter::with_opts(Opts::new(
            "chirpy_fileserver_hits_total",
            "Total requests served by the file server",
        ))?;
        registry.register(Box::new(hits.clone()))?;
        Ok(Self { registry, hits })
    }

    /// Called by the static file server once per request it serves.
    pub fn hit(&self) {
        self.hits.inc();
    }

    pub fn hits(&self) -> u64 {
        self.hits.get()
    }

    /// Back to zero. Only the counter, never the record store.
    pub fn reset(&self) {
        self.hits.reset();
    }
}
