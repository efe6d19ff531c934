//! Report queries, aggregate statistics, and export bundles.

use crate::domain::{SlippageReport, SymbolStatistics};
use crate::protection::policy::SlippageProtection;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Conjunctive filters over the report log. `limit` truncates after
/// filtering and newest-first sorting.
#[derive(Debug, Clone, Default)]
pub struct ReportFilter {
    pub symbol: Option<String>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    /// Keep only reports that blew through their limit.
    pub only_exceeded: bool,
    pub limit: Option<usize>,
}

/// Everything a caller needs to take the engine's records elsewhere.
/// `statistics` is absent for a system-wide export (no single-symbol aggregate).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportBundle {
    pub reports: Vec<SlippageReport>,
    pub statistics: Option<SymbolStatistics>,
}

impl SlippageProtection {
    /// Reports matching the filter, newest first.
    pub fn get_reports(&self, filter: &ReportFilter) -> Vec<SlippageReport> {
        let mut reports: Vec<SlippageReport> = self
            .reports()
            .snapshot()
            .into_iter()
            .filter(|r| filter.symbol.as_deref().map_or(true, |s| r.symbol == s))
            .filter(|r| filter.start.map_or(true, |t| r.timestamp >= t))
            .filter(|r| filter.end.map_or(true, |t| r.timestamp <= t))
            .filter(|r| !filter.only_exceeded || !r.within_limits)
            .collect();
        reports.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        if let Some(limit) = filter.limit {
            reports.truncate(limit);
        }
        reports
    }

    /// Aggregate statistics for one symbol over the last `days_back` days.
    ///
    /// All-zero when nothing matches — "no data" is a result here, not an error.
    pub fn get_statistics(&self, symbol: &str, days_back: i64) -> SymbolStatistics {
        let cutoff = Utc::now() - Duration::days(days_back);
        let matching: Vec<SlippageReport> = self
            .reports()
            .snapshot()
            .into_iter()
            .filter(|r| r.symbol == symbol && r.timestamp >= cutoff)
            .collect();
        aggregate(&matching)
    }

    /// Export reports (optionally for one symbol) plus, when a symbol is
    /// given, the aggregate over exactly the exported reports.
    pub fn export_data(&self, symbol: Option<&str>) -> ExportBundle {
        let filter = ReportFilter {
            symbol: symbol.map(String::from),
            ..ReportFilter::default()
        };
        let reports = self.get_reports(&filter);
        let statistics = symbol.map(|_| aggregate(&reports));
        ExportBundle {
            reports,
            statistics,
        }
    }

    /// Drop every report. Intended for test/reset paths.
    pub fn clear_reports(&self) {
        self.reports().clear();
    }

    /// Drop all per-symbol historical stats. The only way they ever reset.
    pub fn clear_history(&self) {
        self.estimator().history().clear();
    }
}

fn aggregate(reports: &[SlippageReport]) -> SymbolStatistics {
    if reports.is_empty() {
        return SymbolStatistics::default();
    }
    let total = reports.len() as f64;
    let sum: f64 = reports.iter().map(|r| r.slippage_percent).sum();
    let max = reports
        .iter()
        .map(|r| r.slippage_percent)
        .fold(f64::MIN, f64::max);
    let min = reports
        .iter()
        .map(|r| r.slippage_percent)
        .fold(f64::MAX, f64::min);
    SymbolStatistics {
        average_percent: sum / total,
        max_percent: max,
        min_percent: min,
        total_trades: reports.len() as u64,
        trades_exceeded: reports.iter().filter(|r| !r.within_limits).count() as u64,
        total_cost: reports.iter().map(|r| r.total_slippage_cost).sum(),
    }
}
