//! Backend-driven feature flags with a short-lived in-process cache.
//!
//! The cache lives in `AppState`; time and the flag source are injected so the
//! freshness window can be tested without sleeping.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use tracing::{debug, warn};

use crate::api_client::{ApiResult, FeatureFlags};
use crate::config::FeatureDefaults;

pub const JOB_DETAIL_VIEW: &str = "JOB_DETAIL_VIEW";
pub const JOB_APPLY: &str = "JOB_APPLY";

/// How long a fetched flag set is served before the backend is asked again.
pub const CACHE_TTL: Duration = Duration::from_secs(5 * 60);

pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Test clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    origin: Instant,
    offset: Mutex<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset: Mutex::new(Duration::ZERO),
        }
    }

    pub fn advance(&self, by: Duration) {
        *self.offset.lock() += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + *self.offset.lock()
    }
}

#[async_trait]
pub trait FlagSource: Send + Sync {
    async fn fetch(&self) -> ApiResult<FeatureFlags>;
}

#[derive(Debug)]
struct CachedFlags {
    flags: Arc<FeatureFlags>,
    fetched_at: Instant,
}

pub struct FeatureFlagCache {
    source: Arc<dyn FlagSource>,
    clock: Arc<dyn Clock>,
    defaults: FeatureDefaults,
    cached: RwLock<Option<Arc<CachedFlags>>>,
}

impl std::fmt::Debug for FeatureFlagCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeatureFlagCache")
            .field("defaults", &self.defaults)
            .field("cached", &self.cached.read().is_some())
            .finish()
    }
}

impl FeatureFlagCache {
    pub fn new(source: Arc<dyn FlagSource>, defaults: FeatureDefaults) -> Self {
        Self::with_clock(source, Arc::new(SystemClock), defaults)
    }

    pub fn with_clock(
        source: Arc<dyn FlagSource>,
        clock: Arc<dyn Clock>,
        defaults: FeatureDefaults,
    ) -> Self {
        Self {
            source,
            clock,
            defaults,
            cached: RwLock::new(None),
        }
    }

    /// Current flags: the cached set while fresh, otherwise a new fetch.
    ///
    /// A failed fetch yields the environment defaults and leaves the cache as
    /// it was.
    pub async fn load(&self) -> Arc<FeatureFlags> {
        let now = self.clock.now();
        let cached = self.cached.read().clone();
        if let Some(cached) = cached {
            if now.saturating_duration_since(cached.fetched_at) < CACHE_TTL {
                return Arc::clone(&cached.flags);
            }
        }

        match self.source.fetch().await {
            Ok(flags) => {
                debug!(count = flags.len(), "feature flags refreshed");
                let flags = Arc::new(flags);
                *self.cached.write() = Some(Arc::new(CachedFlags {
                    flags: Arc::clone(&flags),
                    fetched_at: now,
                }));
                flags
            }
            Err(failure) => {
                warn!(error = %failure, status = ?failure.status, "failed to fetch feature flags, using defaults");
                Arc::new(self.defaults.to_flags())
            }
        }
    }

    /// Whether the cached set holds `name` switched on. Never fetches.
    pub fn is_enabled(&self, name: &str) -> bool {
        self.cached
            .read()
            .as_ref()
            .and_then(|cached| cached.flags.get(name).copied())
            .unwrap_or(false)
    }

    pub fn invalidate(&self) {
        *self.cached.write() = None;
    }

    pub fn defaults(&self) -> FeatureDefaults {
        self.defaults
    }
}
