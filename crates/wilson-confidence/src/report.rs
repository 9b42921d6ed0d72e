//! Interval reports and where they go

use crate::types::{ConfidenceInterval, TestStatisticCurve};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use tracing::info;
use wilson_core::{Error, Result};

/// A finished interval together with the curve it was read off
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalReport {
    pub interval: ConfidenceInterval,
    pub confidence_level: f64,
    /// Test-statistic threshold the roots were solved against
    pub cutoff: f64,
    /// `T(c)` over the interval plus a margin
    pub curve: TestStatisticCurve,
}

impl IntervalReport {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| Error::Computation(format!("Failed to serialize report: {}", e)))
    }
}

/// Destination for interval reports
pub trait ReportingSink: Send + Sync {
    fn report(&self, label: &str, report: &IntervalReport) -> Result<()>;
}

/// Logs each report at `info` level
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl ReportingSink for TracingSink {
    fn report(&self, label: &str, report: &IntervalReport) -> Result<()> {
        let interval = &report.interval;
        info!(
            label,
            lower = interval.lower,
            upper = interval.upper,
            estimate = interval.point_estimate,
            min_llr = interval.min_llr,
            cutoff = report.cutoff,
            "{}: {}",
            label,
            interval
        );
        Ok(())
    }
}

/// Keeps reports in memory
#[derive(Debug, Default)]
pub struct CollectingSink {
    reports: Mutex<Vec<(String, IntervalReport)>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take everything collected so far
    pub fn drain(&self) -> Vec<(String, IntervalReport)> {
        match self.reports.lock() {
            Ok(mut reports) => std::mem::take(&mut *reports),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }

    pub fn len(&self) -> usize {
        self.reports.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ReportingSink for CollectingSink {
    fn report(&self, label: &str, report: &IntervalReport) -> Result<()> {
        self.reports
            .lock()
            .map_err(|_| Error::Computation("report collector lock poisoned".to_string()))?
            .push((label.to_string(), report.clone()));
        Ok(())
    }
}

impl<S: ReportingSink + ?Sized> ReportingSink for &S {
    fn report(&self, label: &str, report: &IntervalReport) -> Result<()> {
        (**self).report(label, report)
    }
}
