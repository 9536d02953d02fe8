use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use uuid::Uuid;

use super::category::Category;
use super::user::UserSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "lead_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeadStatus {
    New,
    Contacted,
    Qualified,
    Proposal,
    Won,
    Lost,
    FollowUp,
}

impl LeadStatus {
    pub const ALL: [LeadStatus; 7] = [
        LeadStatus::New,
        LeadStatus::Contacted,
        LeadStatus::Qualified,
        LeadStatus::Proposal,
        LeadStatus::Won,
        LeadStatus::Lost,
        LeadStatus::FollowUp,
    ];
}

impl FromStr for LeadStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NEW" => Ok(LeadStatus::New),
            "CONTACTED" => Ok(LeadStatus::Contacted),
            "QUALIFIED" => Ok(LeadStatus::Qualified),
            "PROPOSAL" => Ok(LeadStatus::Proposal),
            "WON" => Ok(LeadStatus::Won),
            "LOST" => Ok(LeadStatus::Lost),
            "FOLLOW_UP" => Ok(LeadStatus::FollowUp),
            other => Err(format!("unknown lead status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "lead_priority", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum LeadPriority {
    Low,
    Medium,
    High,
    Urgent,
}

impl LeadPriority {
    pub const ALL: [LeadPriority; 4] = [
        LeadPriority::Low,
        LeadPriority::Medium,
        LeadPriority::High,
        LeadPriority::Urgent,
    ];
}

impl FromStr for LeadPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LOW" => Ok(LeadPriority::Low),
            "MEDIUM" => Ok(LeadPriority::Medium),
            "HIGH" => Ok(LeadPriority::High),
            "URGENT" => Ok(LeadPriority::Urgent),
            other => Err(format!("unknown lead priority: {}", other)),
        }
    }
}

/// Flat row produced by the leads/categories/users join.
/// Aliased columns keep FromRow derivable; `into_response` rebuilds the nesting.
#[derive(Debug, Clone, FromRow)]
pub struct LeadRow {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub notes: Option<String>,
    pub actions: Option<String>,
    pub status: LeadStatus,
    pub priority: LeadPriority,
    pub value: Option<f64>,
    pub category_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub category_name: String,
    pub category_description: Option<String>,
    pub category_color: String,
    pub category_created_at: DateTime<Utc>,
    pub category_updated_at: DateTime<Utc>,
    pub owner_name: String,
    pub owner_email: String,
}

impl LeadRow {
    pub fn into_response(self) -> LeadResponse {
        LeadResponse {
            category: Category {
                id: self.category_id,
                name: self.category_name,
                description: self.category_description,
                color: self.category_color,
                created_at: self.category_created_at,
                updated_at: self.category_updated_at,
            },
            user: UserSummary {
                id: self.user_id,
                name: self.owner_name,
                email: self.owner_email,
            },
            id: self.id,
            title: self.title,
            description: self.description,
            email: self.email,
            phone: self.phone,
            company: self.company,
            notes: self.notes,
            actions: self.actions,
            status: self.status,
            priority: self.priority,
            value: self.value,
            category_id: self.category_id,
            user_id: self.user_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Wire shape for a lead: row fields plus the joined category and a reduced
/// owner projection, matching what list and detail endpoints return.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadResponse {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub notes: Option<String>,
    pub actions: Option<String>,
    pub status: LeadStatus,
    pub priority: LeadPriority,
    pub value: Option<f64>,
    pub category_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub category: Category,
    pub user: UserSummary,
}
