//! Protocol-wide statistics behind a stale-time cache
//!
//! The stale time comes from the `[stats]` config section:
//!
//! ```no_run
//! # use std::sync::Arc;
//! # use market_sdk::{CachedStatsReader, ProtocolStats, SdkConfig, SdkResult, StatsReader, SystemClock};
//! # struct StatsApi;
//! # #[async_trait::async_trait]
//! # impl StatsReader for StatsApi {
//! #     async fn fetch_stats(&self) -> SdkResult<ProtocolStats> { Ok(ProtocolStats::default()) }
//! # }
//! # let config = SdkConfig::default();
//! let stats = CachedStatsReader::new(StatsApi, Arc::new(SystemClock), config.stats_stale_time());
//! ```

use async_trait::async_trait;
use market_types::QueryState;
use serde::{Deserialize, Serialize};
use std::{sync::Arc, time::Duration};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::{Clock, SdkResult};

/// Aggregate protocol figures in USD
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ProtocolStats {
    pub tvl: f64,
    pub volume: f64,
    pub rewards: f64,
}

/// Source of protocol statistics
#[async_trait]
pub trait StatsReader: Send + Sync {
    async fn fetch_stats(&self) -> SdkResult<ProtocolStats>;
}

#[derive(Debug, Clone, Copy)]
struct CachedStats {
    stats: ProtocolStats,
    fetched_at: u64,
}

/// Caches a `StatsReader` for a stale time
///
/// Fresh data is served without a fetch. When a refresh fails the previous
/// data is kept and served.
pub struct CachedStatsReader<R> {
    inner: R,
    clock: Arc<dyn Clock>,
    stale_time: Duration,
    cache: RwLock<Option<CachedStats>>,
}

impl<R: StatsReader> CachedStatsReader<R> {
    pub fn new(inner: R, clock: Arc<dyn Clock>, stale_time: Duration) -> Self {
        Self {
            inner,
            clock,
            stale_time,
            cache: RwLock::new(None),
        }
    }

    /// Current statistics, refreshing when stale
    pub async fn stats(&self) -> QueryState<ProtocolStats> {
        let now = self.clock.now();
        if let Some(cached) = *self.cache.read().await {
            if !self.is_stale(&cached, now) {
                return QueryState::ready(cached.stats);
            }
        }

        let mut cache = self.cache.write().await;
        // Another caller may have refreshed while we waited for the lock
        if let Some(cached) = *cache {
            if !self.is_stale(&cached, now) {
                return QueryState::ready(cached.stats);
            }
        }

        match self.inner.fetch_stats().await {
            Ok(stats) => {
                debug!(tvl = stats.tvl, volume = stats.volume, "Refreshed protocol stats");
                *cache = Some(CachedStats { stats, fetched_at: now });
                QueryState::ready(stats)
            }
            Err(e) => {
                warn!("Stats refresh failed: {}", e);
                match *cache {
                    Some(previous) => QueryState::ready(previous.stats),
                    None => QueryState::idle(),
                }
            }
        }
    }

    /// Drop cached data so the next read fetches
    pub async fn invalidate(&self) {
        *self.cache.write().await = None;
    }

    fn is_stale(&self, cached: &CachedStats, now: u64) -> bool {
        now.saturating_sub(cached.fetched_at) >= self.stale_time.as_secs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FixedClock, SdkConfig, SdkError};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingReader {
        calls: AtomicUsize,
        failing: AtomicBool,
    }

    #[async_trait]
    impl StatsReader for Arc<CountingReader> {
        async fn fetch_stats(&self) -> SdkResult<ProtocolStats> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if self.failing.load(Ordering::SeqCst) {
                return Err(SdkError::Stats("backend unavailable".to_string()));
            }
            Ok(ProtocolStats {
                tvl: call as f64,
                volume: 0.0,
                rewards: 0.0,
            })
        }
    }

    fn cached(clock: Arc<FixedClock>) -> (Arc<CountingReader>, CachedStatsReader<Arc<CountingReader>>) {
        let reader = Arc::new(CountingReader::default());
        let cached = CachedStatsReader::new(reader.clone(), clock, SdkConfig::default().stats_stale_time());
        (reader, cached)
    }

    #[tokio::test]
    async fn test_fresh_data_is_not_refetched() {
        let clock = Arc::new(FixedClock::new(1_000));
        let (reader, cached) = cached(clock.clone());

        assert_eq!(cached.stats().await.data.unwrap().tvl, 1.0);
        clock.advance(59);
        assert_eq!(cached.stats().await.data.unwrap().tvl, 1.0);
        assert_eq!(reader.calls.load(Ordering::SeqCst), 1);

        clock.advance(1);
        assert_eq!(cached.stats().await.data.unwrap().tvl, 2.0);
        assert_eq!(reader.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_data() {
        let clock = Arc::new(FixedClock::new(1_000));
        let (reader, cached) = cached(clock.clone());

        cached.stats().await;
        reader.failing.store(true, Ordering::SeqCst);
        clock.advance(120);

        let state = cached.stats().await;
        assert!(!state.is_loading);
        assert_eq!(state.data.unwrap().tvl, 1.0);
    }

    #[tokio::test]
    async fn test_failure_without_data_is_idle() {
        let clock = Arc::new(FixedClock::new(1_000));
        let (reader, cached) = cached(clock);
        reader.failing.store(true, Ordering::SeqCst);

        assert_eq!(cached.stats().await, QueryState::idle());

        reader.failing.store(false, Ordering::SeqCst);
        cached.invalidate().await;
        assert!(cached.stats().await.data.is_some());
    }
}
