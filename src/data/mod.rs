use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod mock;

pub use mock::MockDataset;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserRole {
    Recruiter,
    #[serde(rename = "HR Manager")]
    HrManager,
    #[serde(rename = "Compliance Officer")]
    ComplianceOfficer,
}

impl UserRole {
    pub const ALL: [UserRole; 3] = [
        UserRole::Recruiter,
        UserRole::HrManager,
        UserRole::ComplianceOfficer,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Recruiter => "Recruiter",
            Self::HrManager => "HR Manager",
            Self::ComplianceOfficer => "Compliance Officer",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_ascii_lowercase().replace(['-', '_'], " ");
        match normalized.as_str() {
            "recruiter" => Some(Self::Recruiter),
            "hr manager" | "hr" => Some(Self::HrManager),
            "compliance officer" | "compliance" => Some(Self::ComplianceOfficer),
            _ => None,
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SearchType {
    Crim,
    Edu,
    Emp,
    Mvr,
    Dhs,
}

impl SearchType {
    pub const ALL: [SearchType; 5] = [
        SearchType::Crim,
        SearchType::Edu,
        SearchType::Emp,
        SearchType::Mvr,
        SearchType::Dhs,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Crim => "CRIM",
            Self::Edu => "EDU",
            Self::Emp => "EMP",
            Self::Mvr => "MVR",
            Self::Dhs => "DHS",
        }
    }
}

impl fmt::Display for SearchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    Draft,
    Pending,
    Completed,
    #[serde(rename = "Discrepancy Found")]
    DiscrepancyFound,
    Dispute,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Draft,
        OrderStatus::Pending,
        OrderStatus::Completed,
        OrderStatus::DiscrepancyFound,
        OrderStatus::Dispute,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Pending => "Pending",
            Self::Completed => "Completed",
            Self::DiscrepancyFound => "Discrepancy Found",
            Self::Dispute => "Dispute",
        }
    }

    /// Statuses that carry an end date and a turnaround time.
    pub fn is_closed(self) -> bool {
        matches!(
            self,
            Self::Completed | Self::DiscrepancyFound | Self::Dispute
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResolutionStatus {
    Open,
    #[serde(rename = "In Progress")]
    InProgress,
    Resolved,
    Escalated,
}

impl ResolutionStatus {
    pub const ALL: [ResolutionStatus; 4] = [
        ResolutionStatus::Open,
        ResolutionStatus::InProgress,
        ResolutionStatus::Resolved,
        ResolutionStatus::Escalated,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::InProgress => "In Progress",
            Self::Resolved => "Resolved",
            Self::Escalated => "Escalated",
        }
    }

    pub fn is_unresolved(self) -> bool {
        matches!(self, Self::Open | Self::InProgress)
    }
}

impl fmt::Display for ResolutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub candidate_id: String,
    pub name: String,
    pub dob: NaiveDate,
    pub region: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: String,
    pub candidate_id: String,
    pub search_type: SearchType,
    pub status: OrderStatus,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    /// Days between `start_date` and `end_date`.
    pub turnaround_time: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dispute {
    pub dispute_id: String,
    pub order_id: String,
    pub reason: String,
    pub resolution_status: ResolutionStatus,
    pub created_date: NaiveDate,
    pub resolved_date: Option<NaiveDate>,
}

pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}
