use crate::audit::AuditLogEntry;
use crate::data::UserRole;
use chrono::{DateTime, Duration, Utc};

const HOUR: i64 = 3_600;
const DAY: i64 = 86_400;

const SEED_LOGS: [(UserRole, i64, &str, &str); 9] = [
    (
        UserRole::ComplianceOfficer,
        10,
        "List all open disputes older than 7 days.",
        "Found 2 high-risk disputes open for more than a week. Displayed details in a table.",
    ),
    (
        UserRole::ComplianceOfficer,
        2 * DAY,
        "Show all orders with a 'Discrepancy Found' status in the West region.",
        "Returned 4 orders with status 'Discrepancy Found' in the specified region.",
    ),
    (
        UserRole::ComplianceOfficer,
        4 * DAY,
        "Generate a report of all background checks for candidates in the financial sector for Q3.",
        "Aggregated data for 58 checks and prepared a downloadable report.",
    ),
    (
        UserRole::HrManager,
        HOUR,
        "What is the average turnaround time for all checks this month?",
        "Calculated average TAT as 4.2 days. Displayed a bar chart breakdown by search type.",
    ),
    (
        UserRole::HrManager,
        3 * DAY,
        "Show me the order volume trend for the last 6 months.",
        "Generated a line chart illustrating monthly order volumes.",
    ),
    (
        UserRole::HrManager,
        5 * DAY,
        "Which search type has the highest rate of discrepancies?",
        "CRIM checks have the highest discrepancy rate at 8.2%. Displayed a comparison chart.",
    ),
    (
        UserRole::Recruiter,
        2 * HOUR,
        "What is the status of the criminal background check for John Smith (C001)?",
        "Returned 1 record: Order ORD001 status is 'Completed'.",
    ),
    (
        UserRole::Recruiter,
        DAY,
        "Are there any pending education verifications for candidate Sarah Johnson?",
        "No pending education checks found for this candidate.",
    ),
    (
        UserRole::Recruiter,
        6 * DAY,
        "Find all candidates from the Northeast region with completed checks.",
        "Found 6 candidates. Displayed their names and completed check types in a table.",
    ),
];

/// Bundled entries shown when nothing usable is persisted, newest first.
pub fn seed_entries(now: DateTime<Utc>) -> Vec<AuditLogEntry> {
    let mut entries = SEED_LOGS
        .iter()
        .map(|(role, age_secs, query, summary)| {
            let timestamp = now - Duration::seconds(*age_secs);
            AuditLogEntry {
                id: format!("LOG_{}", timestamp.timestamp_millis()),
                query_text: query.to_string(),
                role: *role,
                timestamp,
                response_summary: summary.to_string(),
            }
        })
        .collect::<Vec<_>>();
    entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    entries
}
