//! Bounded, append-mostly report log with oldest-first eviction.

use crate::domain::SlippageReport;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Default report log capacity.
pub const DEFAULT_REPORT_CAPACITY: usize = 1000;

/// Capability contract for the report log. Appends must be safe under
/// concurrent writers; once capacity is exceeded, eviction is strictly
/// oldest-first, and no report is duplicated or dropped any other way.
pub trait ReportLog: Send + Sync {
    fn append(&self, report: SlippageReport);

    /// Copy of the log, oldest to newest.
    fn snapshot(&self) -> Vec<SlippageReport>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn capacity(&self) -> usize;

    fn clear(&self);
}

/// Default log: a VecDeque behind a mutex. Append and eviction happen under
/// one lock acquisition, so the FIFO invariant holds under any interleaving.
#[derive(Debug)]
pub struct BoundedReportLog {
    capacity: usize,
    reports: Mutex<VecDeque<SlippageReport>>,
}

impl BoundedReportLog {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_REPORT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "report log capacity must be positive");
        Self {
            capacity,
            reports: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }
}

impl Default for BoundedReportLog {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportLog for BoundedReportLog {
    fn append(&self, report: SlippageReport) {
        let mut reports = self.reports.lock().unwrap();
        if reports.len() == self.capacity {
            reports.pop_front();
        }
        reports.push_back(report);
    }

    fn snapshot(&self) -> Vec<SlippageReport> {
        self.reports.lock().unwrap().iter().cloned().collect()
    }

    fn len(&self) -> usize {
        self.reports.lock().unwrap().len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn clear(&self) {
        self.reports.lock().unwrap().clear();
    }
}
