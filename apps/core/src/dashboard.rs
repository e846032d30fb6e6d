//! Admin dashboard aggregates.
//!
//! Works over whatever screening and incident rows the caller has stored;
//! trends are bucketed by calendar month (UTC).

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::risk::RiskTier;

/// Stored lifecycle of an incident. Owned by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncidentStatus {
    Open,
    Resolved,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningRecord {
    pub created_at: DateTime<Utc>,
    pub risk_tier: RiskTier,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncidentRecord {
    pub created_at: DateTime<Utc>,
    pub status: IncidentStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyTrend {
    /// e.g. "October 2026"
    pub month: String,
    pub screenings: usize,
    pub high_risk: usize,
    pub crisis_incidents: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_screenings: usize,
    pub high_risk_screenings: usize,
    pub open_incidents: usize,
    /// Oldest month first, ending with the month of `now`.
    pub monthly_trends: Vec<MonthlyTrend>,
}

type MonthKey = (i32, u32);

fn month_key(at: &DateTime<Utc>) -> MonthKey {
    (at.year(), at.month())
}

/// The month `back` months before `(year, month)`.
fn shift_back((year, month): MonthKey, back: u32) -> MonthKey {
    let index = year * 12 + (month as i32 - 1) - back as i32;
    (index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
}

fn month_label((year, month): MonthKey) -> String {
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|d| d.format("%B %Y").to_string())
        .unwrap_or_default()
}

impl DashboardSummary {
    pub fn build(
        screenings: &[ScreeningRecord],
        incidents: &[IncidentRecord],
        now: DateTime<Utc>,
        months: u32,
    ) -> Self {
        let mut buckets: HashMap<MonthKey, MonthlyTrend> = HashMap::new();

        for s in screenings {
            let bucket = buckets.entry(month_key(&s.created_at)).or_default();
            bucket.screenings += 1;
            if s.risk_tier == RiskTier::High {
                bucket.high_risk += 1;
            }
        }
        for i in incidents {
            buckets
                .entry(month_key(&i.created_at))
                .or_default()
                .crisis_incidents += 1;
        }

        let current = month_key(&now);
        let monthly_trends = (0..months)
            .rev()
            .map(|back| {
                let key = shift_back(current, back);
                let mut trend = buckets.remove(&key).unwrap_or_default();
                trend.month = month_label(key);
                trend
            })
            .collect();

        Self {
            total_screenings: screenings.len(),
            high_risk_screenings: screenings
                .iter()
                .filter(|s| s.risk_tier == RiskTier::High)
                .count(),
            open_incidents: incidents
                .iter()
                .filter(|i| i.status == IncidentStatus::Open)
                .count(),
            monthly_trends,
        }
    }
}
