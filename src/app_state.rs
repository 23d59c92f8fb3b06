// =============================================================================
// Shared Application State — API server
// =============================================================================
//
// Holds the analyzer plus a bounded in-memory ring of recent report digests.
// The ring is the only mutable state shared between requests; it is never
// persisted.
//
// Thread safety:
//   - Atomic counter for the number of analyses served.
//   - parking_lot::RwLock for the recent-digest ring.
// =============================================================================

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::analyzer::PatternAnalyzer;
use crate::config::AppConfig;
use crate::report::{AnalysisReport, ReportDigest};
use crate::types::Period;

/// Upper bound on the ring's up-front allocation; it grows on demand past this.
const RECENT_PREALLOC: usize = 64;

pub struct AppState {
    pub config: AppConfig,
    pub analyzer: PatternAnalyzer,
    /// Newest digest at the front.
    recent: RwLock<VecDeque<ReportDigest>>,
    analyses_served: AtomicU64,
}

impl AppState {
    pub fn new(config: AppConfig, analyzer: PatternAnalyzer) -> Self {
        let capacity = config.recent_capacity;
        Self {
            config,
            analyzer,
            recent: RwLock::new(VecDeque::with_capacity(capacity.min(RECENT_PREALLOC))),
            analyses_served: AtomicU64::new(0),
        }
    }

    /// Analyse and remember the result's digest.
    pub async fn run_analysis(&self, symbol: &str, period: Period) -> AnalysisReport {
        let report = self.analyzer.analyze(symbol, period).await;
        self.push_digest(report.digest());
        self.analyses_served.fetch_add(1, Ordering::Relaxed);
        report
    }

    pub fn push_digest(&self, digest: ReportDigest) {
        let capacity = self.config.recent_capacity;
        if capacity == 0 {
            return;
        }
        let mut ring = self.recent.write();
        ring.push_front(digest);
        ring.truncate(capacity);
    }

    /// Recent digests, newest first.
    pub fn recent(&self) -> Vec<ReportDigest> {
        self.recent.read().iter().cloned().collect()
    }

    pub fn analyses_served(&self) -> u64 {
        self.analyses_served.load(Ordering::Relaxed)
    }
}
