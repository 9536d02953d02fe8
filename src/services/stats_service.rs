use chrono::{Duration, Utc};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{LeadPriority, LeadStatus};
use crate::error::ApiError;

/// Per-status counts. A struct rather than a map so every enum value is
/// always present on the wire, zero-filled.
#[derive(Debug, Default, Clone, Serialize, PartialEq)]
pub struct StatusCounts {
    #[serde(rename = "NEW")]
    pub new: i64,
    #[serde(rename = "CONTACTED")]
    pub contacted: i64,
    #[serde(rename = "QUALIFIED")]
    pub qualified: i64,
    #[serde(rename = "PROPOSAL")]
    pub proposal: i64,
    #[serde(rename = "WON")]
    pub won: i64,
    #[serde(rename = "LOST")]
    pub lost: i64,
    #[serde(rename = "FOLLOW_UP")]
    pub follow_up: i64,
}

impl StatusCounts {
    pub fn set(&mut self, status: LeadStatus, count: i64) {
        match status {
            LeadStatus::New => self.new = count,
            LeadStatus::Contacted => self.contacted = count,
            LeadStatus::Qualified => self.qualified = count,
            LeadStatus::Proposal => self.proposal = count,
            LeadStatus::Won => self.won = count,
            LeadStatus::Lost => self.lost = count,
            LeadStatus::FollowUp => self.follow_up = count,
        }
    }

    pub fn sum(&self) -> i64 {
        self.new + self.contacted + self.qualified + self.proposal + self.won + self.lost
            + self.follow_up
    }
}

#[derive(Debug, Default, Clone, Serialize, PartialEq)]
pub struct PriorityCounts {
    #[serde(rename = "LOW")]
    pub low: i64,
    #[serde(rename = "MEDIUM")]
    pub medium: i64,
    #[serde(rename = "HIGH")]
    pub high: i64,
    #[serde(rename = "URGENT")]
    pub urgent: i64,
}

impl PriorityCounts {
    pub fn set(&mut self, priority: LeadPriority, count: i64) {
        match priority {
            LeadPriority::Low => self.low = count,
            LeadPriority::Medium => self.medium = count,
            LeadPriority::High => self.high = count,
            LeadPriority::Urgent => self.urgent = count,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsOverview {
    pub total: i64,
    pub by_status: StatusCounts,
    pub by_priority: PriorityCounts,
    pub total_value: f64,
    pub avg_value: f64,
    pub won_value: f64,
    pub recent: i64,
}

/// `sum / priced-lead-count`, guarding the empty case.
fn average(total_value: f64, priced_count: i64) -> f64 {
    if priced_count > 0 {
        total_value / priced_count as f64
    } else {
        0.0
    }
}

/// Aggregate statistics over one user's leads. Each aggregate is its own
/// statement; there is no cross-statement transaction.
pub async fn overview(pool: &PgPool, user_id: Uuid) -> Result<StatsOverview, ApiError> {
    let (total,) = sqlx::query_as::<_, (i64,)>("SELECT COUNT(*) FROM leads WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await?;

    let mut by_status = StatusCounts::default();
    let status_rows = sqlx::query_as::<_, (LeadStatus, i64)>(
        "SELECT status, COUNT(*) FROM leads WHERE user_id = $1 GROUP BY status",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    for (status, count) in status_rows {
        by_status.set(status, count);
    }

    let mut by_priority = PriorityCounts::default();
    let priority_rows = sqlx::query_as::<_, (LeadPriority, i64)>(
        "SELECT priority, COUNT(*) FROM leads WHERE user_id = $1 GROUP BY priority",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    for (priority, count) in priority_rows {
        by_priority.set(priority, count);
    }

    // Trailing 7x24h window
    let cutoff = Utc::now() - Duration::days(7);
    let (recent,) = sqlx::query_as::<_, (i64,)>(
        "SELECT COUNT(*) FROM leads WHERE user_id = $1 AND created_at >= $2",
    )
    .bind(user_id)
    .bind(cutoff)
    .fetch_one(pool)
    .await?;

    // COUNT(value) counts only non-null values, which is exactly the
    // divisor the average needs
    let (total_value, priced_count) = sqlx::query_as::<_, (f64, i64)>(
        "SELECT COALESCE(SUM(value), 0)::DOUBLE PRECISION, COUNT(value) \
         FROM leads WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    let (won_value,) = sqlx::query_as::<_, (f64,)>(
        "SELECT COALESCE(SUM(value), 0)::DOUBLE PRECISION \
         FROM leads WHERE user_id = $1 AND status = $2",
    )
    .bind(user_id)
    .bind(LeadStatus::Won)
    .fetch_one(pool)
    .await?;

    Ok(StatsOverview {
        total,
        by_status,
        by_priority,
        total_value,
        avg_value: average(total_value, priced_count),
        won_value,
        recent,
    })
}
