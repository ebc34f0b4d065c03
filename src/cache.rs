use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use chrono::{DateTime, Local};

use crate::models::SummaryRow;
use crate::summary::BuildSummary;

pub const DEFAULT_TTL_SECS: i64 = 600;

/// Time source for the cache. Freshness is judged on the monotonic
/// `instant`; `now` is only stamped on tables for display.
pub trait Clock {
    fn instant(&self) -> Instant;
    fn now(&self) -> DateTime<Local>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn instant(&self) -> Instant {
        Instant::now()
    }

    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// A Summary Table as handed to callers.
#[derive(Debug, Clone)]
pub struct Summary {
    pub rows: Arc<Vec<SummaryRow>>,
    pub computed_at: DateTime<Local>,
    /// Set when the roster could not be loaded; `rows` is then empty.
    pub error: Option<String>,
    /// True when served without recomputation.
    pub cached: bool,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    rows: Arc<Vec<SummaryRow>>,
    built: Instant,
    computed_at: DateTime<Local>,
    error: Option<String>,
}

/// Single-slot TTL cache in front of a summary builder.
///
/// The slot is locked for the whole rebuild, so concurrent callers wait for
/// one computation instead of racing, and the table and its timestamp are
/// always replaced together.
pub struct SummaryCache<B, C = SystemClock> {
    builder: B,
    clock: C,
    ttl: Duration,
    slot: Mutex<Option<CacheEntry>>,
}

impl<B: BuildSummary> SummaryCache<B, SystemClock> {
    pub fn new(builder: B, ttl_secs: i64) -> Self {
        Self::with_clock(builder, SystemClock, ttl_secs)
    }
}

impl<B: BuildSummary, C: Clock> SummaryCache<B, C> {
    pub fn with_clock(builder: B, clock: C, ttl_secs: i64) -> Self {
        Self {
            builder,
            clock,
            ttl: ttl_duration(ttl_secs),
            slot: Mutex::new(None),
        }
    }

    pub fn get_summary(&self, force_refresh: bool) -> Summary {
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        let instant = self.clock.instant();

        if !force_refresh {
            if let Some(entry) = slot.as_ref() {
                if instant.saturating_duration_since(entry.built) < self.ttl {
                    log::debug!("Serving summary computed at {}", entry.computed_at);
                    return Summary {
                        rows: Arc::clone(&entry.rows),
                        computed_at: entry.computed_at,
                        error: entry.error.clone(),
                        cached: true,
                    };
                }
            }
        }

        let (rows, error) = match self.builder.build_summary() {
            Ok(rows) => (rows, None),
            Err(e) => (Vec::new(), Some(e.to_string())),
        };
        let entry = CacheEntry {
            rows: Arc::new(rows),
            built: instant,
            computed_at: self.clock.now(),
            error,
        };
        *slot = Some(entry.clone());

        Summary {
            rows: entry.rows,
            computed_at: entry.computed_at,
            error: entry.error,
            cached: false,
        }
    }
}

/// Negative TTLs disable caching.
fn ttl_duration(ttl_secs: i64) -> Duration {
    Duration::from_secs(u64::try_from(ttl_secs).unwrap_or(0))
}
