use crate::data::{
    days_between, Candidate, MockDataset, Order, OrderStatus, ResolutionStatus, SearchType, UserRole,
};
use crate::query::intent::{intent_from_text, search_type_mentioned, QueryIntent};
use crate::query::response::{ChartData, ChartKind, QueryResponse, ResponseContent, TableData};
use chrono::{Datelike, Duration, NaiveDate};
use serde_json::json;
use std::collections::BTreeMap;
use tracing::debug;

pub const NO_DATA: &str = "no data available";

pub const SUGGESTIONS: [&str; 7] = [
    "Show all pending CRIM checks this week",
    "What is the average TAT for EDU checks last quarter?",
    "List disputes unresolved for more than 7 days",
    "Show completion rates by search type",
    "Display turnaround time trends",
    "Analyze discrepancies by search type",
    "Show order volume by region",
];

const SUGGESTIONS_MESSAGE: &str =
    "I can help you analyze background check data. Here are some example queries you can try:";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskLevel {
    High,
    Medium,
    Low,
}

impl RiskLevel {
    pub fn from_days_open(days_open: i64) -> Self {
        if days_open > 14 {
            Self::High
        } else if days_open > 7 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

/// Answers free-text questions against the in-memory dataset.
pub struct QueryProcessor<'a> {
    data: &'a MockDataset,
    role: UserRole,
}

impl<'a> QueryProcessor<'a> {
    pub fn new(data: &'a MockDataset, role: UserRole) -> Self {
        Self { data, role }
    }

    pub fn process_query(&self, query: &str) -> QueryResponse {
        let lowered = query.to_lowercase();
        let intent = intent_from_text(&lowered);
        debug!(intent = intent.name(), role = %self.role, "query classified");
        match intent {
            QueryIntent::PendingChecks(search_type) => self.pending_checks(search_type, &lowered),
            QueryIntent::AverageTurnaround => self.average_turnaround(&lowered),
            QueryIntent::TurnaroundTrend => self.turnaround_trend(),
            QueryIntent::Disputes => self.dispute_analysis(&lowered),
            QueryIntent::StatusDistribution => self.status_distribution(),
            QueryIntent::CompletionRates => self.completion_rates(),
            QueryIntent::VolumeTrend => self.volume_trend(),
            QueryIntent::Discrepancies => self.discrepancy_analysis(),
            QueryIntent::Regional => self.regional_analysis(),
            QueryIntent::Suggestions => suggestions(),
        }
    }

    fn today(&self) -> NaiveDate {
        self.data.today
    }

    fn candidate_field(&self, order: &Order, field: impl Fn(&Candidate) -> &str) -> String {
        self.data
            .candidate_for_order(order)
            .map(|candidate| field(candidate).to_string())
            .unwrap_or_else(|| "Unknown".to_string())
    }

    fn pending_checks(&self, search_type: SearchType, query: &str) -> QueryResponse {
        let this_week = query.contains("this week");
        let (week_start, week_end) = week_bounds(self.today());

        let pending = self
            .data
            .orders
            .iter()
            .filter(|order| order.search_type == search_type && order.status == OrderStatus::Pending)
            .filter(|order| {
                !this_week || (order.start_date >= week_start && order.start_date <= week_end)
            })
            .collect::<Vec<_>>();

        let mut table = if self.role == UserRole::Recruiter {
            TableData::new(&["Order ID", "Candidate", "Search Type", "Started", "Days Waiting"])
        } else {
            TableData::new(&["Order ID", "Search Type", "Started", "Days Waiting", "Region"])
        };

        for order in &pending {
            let days_waiting = days_between(order.start_date, self.today());
            let started = order.start_date.format("%Y-%m-%d").to_string();
            let row = if self.role == UserRole::Recruiter {
                vec![
                    json!(order.order_id),
                    json!(self.candidate_field(order, |c| c.name.as_str())),
                    json!(order.search_type.as_str()),
                    json!(started),
                    json!(days_waiting),
                ]
            } else {
                vec![
                    json!(order.order_id),
                    json!(order.search_type.as_str()),
                    json!(started),
                    json!(days_waiting),
                    json!(self.candidate_field(order, |c| c.region.as_str())),
                ]
            };
            table.push_row(row);
        }

        QueryResponse {
            content: ResponseContent::Table(table),
            summary: format!(
                "Found {} pending {} checks{}",
                pending.len(),
                search_type,
                if this_week { " this week" } else { "" }
            ),
        }
    }

    fn average_turnaround(&self, query: &str) -> QueryResponse {
        let search_type = search_type_mentioned(query);
        let since = (query.contains("last quarter") || query.contains("quarter"))
            .then(|| self.today() - Duration::days(90));

        let matching = self
            .data
            .orders
            .iter()
            .filter(|order| order.status == OrderStatus::Completed)
            .filter_map(|order| order.turnaround_time.map(|tat| (order, tat)))
            .filter(|(order, _)| search_type.map_or(true, |wanted| order.search_type == wanted))
            .filter(|(order, _)| since.map_or(true, |since| order.start_date >= since))
            .collect::<Vec<_>>();

        let overall = mean(matching.iter().map(|(_, tat)| *tat as f64));

        let mut by_type: BTreeMap<SearchType, Vec<f64>> = BTreeMap::new();
        for (order, tat) in &matching {
            by_type.entry(order.search_type).or_default().push(*tat as f64);
        }
        let points = by_type
            .into_iter()
            .filter_map(|(search_type, values)| {
                mean(values.into_iter()).map(|avg| (search_type.to_string(), avg))
            })
            .collect::<Vec<_>>();

        let type_suffix = search_type
            .map(|search_type| format!(" - {search_type}"))
            .unwrap_or_default();
        let chart = ChartData::new(ChartKind::Bar, format!("Average Turnaround Time{type_suffix}"))
            .with_series("Average TAT (Days)", points)
            .with_y_axis("Days");

        let scope = search_type
            .map(|search_type| format!(" for {search_type}"))
            .unwrap_or_default();
        let summary = match overall {
            Some(avg) => format!(
                "Average TAT{scope}: {avg:.1} days (based on {} completed orders)",
                matching.len()
            ),
            None => format!("Average TAT{scope}: {NO_DATA} (no completed orders matched)"),
        };

        QueryResponse {
            content: ResponseContent::Chart(chart),
            summary,
        }
    }

    fn turnaround_trend(&self) -> QueryResponse {
        let mut weekly: BTreeMap<NaiveDate, Vec<f64>> = BTreeMap::new();
        for order in &self.data.orders {
            if order.status != OrderStatus::Completed {
                continue;
            }
            if let Some(tat) = order.turnaround_time {
                let (week_start, _) = week_bounds(order.start_date);
                weekly.entry(week_start).or_default().push(tat as f64);
            }
        }

        let averages = weekly
            .into_iter()
            .filter_map(|(week, values)| {
                mean(values.into_iter()).map(|avg| (week.format("%Y-%m-%d").to_string(), avg))
            })
            .collect::<Vec<_>>();
        let recent = last_n(&averages, 8);

        let chart = ChartData::new(ChartKind::Line, "Turnaround Time Trend (Last 8 Weeks)")
            .with_series("Average TAT (Days)", recent.to_vec())
            .with_y_axis("Days");

        let summary = match averages.last() {
            Some((_, current)) => {
                let direction = match last_n(&averages, 2) {
                    [(_, previous), (_, latest)] if latest > previous => "increasing",
                    _ => "stable/decreasing",
                };
                format!(
                    "TAT trend analysis shows {direction} turnaround times. Current average: {current:.1} days."
                )
            }
            None => format!("TAT trend analysis: {NO_DATA}."),
        };

        QueryResponse {
            content: ResponseContent::Chart(chart),
            summary,
        }
    }

    fn dispute_analysis(&self, query: &str) -> QueryResponse {
        let unresolved_only = query.contains("unresolved") || query.contains("open");
        let aged_only = unresolved_only && (query.contains("7 days") || query.contains("week"));
        let cutoff = self.today() - Duration::days(7);

        let disputes = self
            .data
            .disputes
            .iter()
            .filter(|dispute| !unresolved_only || dispute.resolution_status.is_unresolved())
            .filter(|dispute| !aged_only || dispute.created_date <= cutoff)
            .collect::<Vec<_>>();

        if self.role == UserRole::ComplianceOfficer {
            let mut table = TableData::new(&[
                "Dispute ID",
                "Order ID",
                "Candidate",
                "Search Type",
                "Reason",
                "Status",
                "Days Open",
                "Risk Level",
            ]);
            let mut high_risk = 0;
            for dispute in &disputes {
                let order = self.data.order(&dispute.order_id);
                let candidate = order
                    .and_then(|order| self.data.candidate_for_order(order))
                    .map(|candidate| candidate.name.as_str())
                    .unwrap_or("Unknown");
                let search_type = order
                    .map(|order| order.search_type.as_str())
                    .unwrap_or("Unknown");
                let days_open = days_between(dispute.created_date, self.today());
                let risk = RiskLevel::from_days_open(days_open);
                if risk == RiskLevel::High {
                    high_risk += 1;
                }
                table.push_row(vec![
                    json!(dispute.dispute_id),
                    json!(dispute.order_id),
                    json!(candidate),
                    json!(search_type),
                    json!(dispute.reason),
                    json!(dispute.resolution_status.as_str()),
                    json!(days_open),
                    json!(risk.as_str()),
                ]);
            }

            return QueryResponse {
                content: ResponseContent::Table(table),
                summary: format!(
                    "Found {} disputes{}. {high_risk} are high-risk (>14 days old).",
                    disputes.len(),
                    if query.contains("unresolved") {
                        " requiring attention"
                    } else {
                        ""
                    }
                ),
            };
        }

        let points = ResolutionStatus::ALL
            .iter()
            .filter_map(|status| {
                let count = disputes
                    .iter()
                    .filter(|dispute| dispute.resolution_status == *status)
                    .count();
                (count > 0).then(|| (status.to_string(), count as f64))
            })
            .collect::<Vec<_>>();
        let chart = ChartData::new(ChartKind::Pie, "Dispute Resolution Status Distribution")
            .with_series("Disputes", points);

        QueryResponse {
            content: ResponseContent::Chart(chart),
            summary: format!(
                "Dispute analysis: {} total disputes with varying resolution statuses.",
                disputes.len()
            ),
        }
    }

    fn status_distribution(&self) -> QueryResponse {
        let points = OrderStatus::ALL
            .iter()
            .filter_map(|status| {
                let count = self
                    .data
                    .orders
                    .iter()
                    .filter(|order| order.status == *status)
                    .count();
                (count > 0).then(|| (status.to_string(), count as f64))
            })
            .collect::<Vec<_>>();
        let status_count = points.len();
        let chart = ChartData::new(ChartKind::Doughnut, "Order Status Distribution")
            .with_series("Orders", points);

        QueryResponse {
            content: ResponseContent::Chart(chart),
            summary: format!(
                "Status breakdown: {} total orders across {status_count} different statuses.",
                self.data.orders.len()
            ),
        }
    }

    fn completion_rates(&self) -> QueryResponse {
        let points = SearchType::ALL
            .iter()
            .filter_map(|search_type| {
                let of_type = self
                    .data
                    .orders
                    .iter()
                    .filter(|order| order.search_type == *search_type);
                let (total, completed) = of_type.fold((0usize, 0usize), |(total, completed), order| {
                    (total + 1, completed + usize::from(order.status == OrderStatus::Completed))
                });
                percentage(completed, total).map(|rate| (search_type.to_string(), rate))
            })
            .collect::<Vec<_>>();

        let completed = self
            .data
            .orders
            .iter()
            .filter(|order| order.status == OrderStatus::Completed)
            .count();
        let overall = percentage(completed, self.data.orders.len());
        let best = points
            .iter()
            .fold(None::<&(String, f64)>, |best, point| match best {
                Some(current) if current.1 >= point.1 => Some(current),
                _ => Some(point),
            })
            .map(|(label, _)| label.clone());

        let summary = match (overall, best) {
            (Some(overall), Some(best)) => format!(
                "Overall completion rate: {overall:.1}%. Rates vary by search type with {best} having the highest rate."
            ),
            _ => format!("Completion rates: {NO_DATA}."),
        };
        let chart = ChartData::new(ChartKind::Bar, "Completion Rates by Search Type")
            .with_series("Completion Rate (%)", points)
            .with_y_axis("Completion Rate (%)")
            .with_y_max(100.0);

        QueryResponse {
            content: ResponseContent::Chart(chart),
            summary,
        }
    }

    fn volume_trend(&self) -> QueryResponse {
        let mut monthly: BTreeMap<String, usize> = BTreeMap::new();
        for order in &self.data.orders {
            *monthly
                .entry(order.start_date.format("%Y-%m").to_string())
                .or_default() += 1;
        }

        let volumes = monthly
            .into_iter()
            .map(|(month, count)| (month, count as f64))
            .collect::<Vec<_>>();
        let average = mean(volumes.iter().map(|(_, count)| *count));
        let chart = ChartData::new(ChartKind::Line, "Order Volume Trend (Last 6 Months)")
            .with_series("Order Volume", last_n(&volumes, 6).to_vec())
            .with_y_axis("Number of Orders");

        let summary = match average {
            Some(average) => format!(
                "Volume trends show {} total orders with an average of {average:.0} orders per month.",
                self.data.orders.len()
            ),
            None => format!("Volume trends: {NO_DATA}."),
        };

        QueryResponse {
            content: ResponseContent::Chart(chart),
            summary,
        }
    }

    fn discrepancy_analysis(&self) -> QueryResponse {
        let flagged = self
            .data
            .orders
            .iter()
            .filter(|order| order.status == OrderStatus::DiscrepancyFound)
            .collect::<Vec<_>>();

        let points = SearchType::ALL
            .iter()
            .filter_map(|search_type| {
                let count = flagged
                    .iter()
                    .filter(|order| order.search_type == *search_type)
                    .count();
                (count > 0).then(|| (search_type.to_string(), count as f64))
            })
            .collect::<Vec<_>>();
        let most = points
            .iter()
            .fold(None::<&(String, f64)>, |best, point| match best {
                Some(current) if current.1 >= point.1 => Some(current),
                _ => Some(point),
            })
            .map(|(label, _)| label.clone())
            .unwrap_or_else(|| "N/A".to_string());

        let summary = match percentage(flagged.len(), self.data.orders.len()) {
            Some(rate) => format!(
                "Found {} orders with discrepancies ({rate:.1}% of all orders). {most} searches have the most discrepancies.",
                flagged.len()
            ),
            None => format!("Discrepancy analysis: {NO_DATA}."),
        };
        let chart = ChartData::new(ChartKind::Bar, "Discrepancies by Search Type")
            .with_series("Discrepancies Found", points)
            .with_y_axis("Number of Discrepancies");

        QueryResponse {
            content: ResponseContent::Chart(chart),
            summary,
        }
    }

    fn regional_analysis(&self) -> QueryResponse {
        let mut counts: Vec<(String, usize)> = Vec::new();
        for order in &self.data.orders {
            let region = self.candidate_field(order, |c| c.region.as_str());
            match counts.iter_mut().find(|(name, _)| *name == region) {
                Some((_, count)) => *count += 1,
                None => counts.push((region, 1)),
            }
        }

        let top = counts
            .iter()
            .fold(None::<&(String, usize)>, |best, entry| match best {
                Some(current) if current.1 >= entry.1 => Some(current),
                _ => Some(entry),
            })
            .cloned();
        let summary = match top {
            Some((region, count)) => format!(
                "Regional analysis shows {region} has the highest order volume with {count} orders."
            ),
            None => format!("Regional analysis: {NO_DATA}."),
        };
        let chart = ChartData::new(ChartKind::Bar, "Order Volume by Region")
            .with_series(
                "Orders by Region",
                counts.into_iter().map(|(region, count)| (region, count as f64)),
            )
            .with_y_axis("Number of Orders");

        QueryResponse {
            content: ResponseContent::Chart(chart),
            summary,
        }
    }
}

pub fn suggestions() -> QueryResponse {
    QueryResponse {
        content: ResponseContent::Text {
            message: SUGGESTIONS_MESSAGE.to_string(),
            suggestions: SUGGESTIONS.iter().map(|s| s.to_string()).collect(),
        },
        summary: "Provided query suggestions for background check analysis".to_string(),
    }
}

/// Sunday-to-Saturday calendar week containing `date`.
pub fn week_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = date - Duration::days(i64::from(date.weekday().num_days_from_sunday()));
    (start, start + Duration::days(6))
}

pub fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));
    (count > 0).then(|| sum / count as f64)
}

pub fn percentage(part: usize, total: usize) -> Option<f64> {
    (total > 0).then(|| part as f64 / total as f64 * 100.0)
}

fn last_n<T>(items: &[T], n: usize) -> &[T] {
    &items[items.len().saturating_sub(n)..]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Dispute;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn today() -> NaiveDate {
        // A Wednesday.
        NaiveDate::from_ymd_opt(2024, 6, 12).expect("fixture date should be valid")
    }

    fn generated() -> MockDataset {
        MockDataset::generate(&mut StdRng::seed_from_u64(11), today())
    }

    fn empty() -> MockDataset {
        MockDataset {
            today: today(),
            candidates: Vec::new(),
            orders: Vec::new(),
            disputes: Vec::new(),
        }
    }

    fn order(id: &str, search_type: SearchType, status: OrderStatus, days_ago: i64) -> Order {
        let start_date = today() - Duration::days(days_ago);
        let tat = status.is_closed().then_some(4);
        Order {
            order_id: id.to_string(),
            candidate_id: "C001".to_string(),
            search_type,
            status,
            start_date,
            end_date: tat.map(|days| start_date + Duration::days(days)),
            turnaround_time: tat,
        }
    }

    fn fixture() -> MockDataset {
        let mut data = empty();
        data.candidates.push(Candidate {
            candidate_id: "C001".to_string(),
            name: "John Smith".to_string(),
            dob: NaiveDate::from_ymd_opt(1990, 5, 15).expect("fixture date should be valid"),
            region: "Northeast".to_string(),
        });
        data.orders = vec![
            order("ORD001", SearchType::Crim, OrderStatus::Pending, 1),
            order("ORD002", SearchType::Crim, OrderStatus::Pending, 20),
            order("ORD003", SearchType::Edu, OrderStatus::Pending, 1),
            order("ORD004", SearchType::Crim, OrderStatus::Completed, 30),
            order("ORD005", SearchType::Edu, OrderStatus::Dispute, 40),
            order("ORD006", SearchType::Edu, OrderStatus::Dispute, 10),
        ];
        let mut orphan = order("ORD007", SearchType::Emp, OrderStatus::Pending, 2);
        orphan.candidate_id = "C999".to_string();
        data.orders.push(orphan);
        data.disputes = vec![
            Dispute {
                dispute_id: "DSP001".to_string(),
                order_id: "ORD005".to_string(),
                reason: "Education verification mismatch".to_string(),
                resolution_status: ResolutionStatus::Open,
                created_date: today() - Duration::days(20),
                resolved_date: None,
            },
            Dispute {
                dispute_id: "DSP002".to_string(),
                order_id: "ORD006".to_string(),
                reason: "Identity verification failed".to_string(),
                resolution_status: ResolutionStatus::InProgress,
                created_date: today() - Duration::days(3),
                resolved_date: None,
            },
            Dispute {
                dispute_id: "DSP003".to_string(),
                order_id: "ORD404".to_string(),
                reason: "MVR report contains errors".to_string(),
                resolution_status: ResolutionStatus::Resolved,
                created_date: today() - Duration::days(9),
                resolved_date: Some(today() - Duration::days(2)),
            },
        ];
        data
    }

    fn table(response: &QueryResponse) -> &TableData {
        match &response.content {
            ResponseContent::Table(table) => table,
            other => panic!("expected table, got {other:?}"),
        }
    }

    fn chart(response: &QueryResponse) -> &ChartData {
        match &response.content {
            ResponseContent::Chart(chart) => chart,
            other => panic!("expected chart, got {other:?}"),
        }
    }

    #[test]
    fn pending_crim_this_week_rows_match_filter() {
        let data = generated();
        let (week_start, week_end) = week_bounds(data.today);
        for role in UserRole::ALL {
            let response =
                QueryProcessor::new(&data, role).process_query("Show all pending CRIM checks this week");
            let table = table(&response);
            let id_column = table.column_index("Order ID").expect("order id column");
            for row in &table.rows {
                let id = row[id_column].as_str().expect("order id should be a string");
                let order = data.order(id).expect("row should reference an order");
                assert_eq!(order.search_type, SearchType::Crim);
                assert_eq!(order.status, OrderStatus::Pending);
                assert!(order.start_date >= week_start && order.start_date <= week_end);
            }
            assert!(response.summary.ends_with("this week"));
        }
    }

    #[test]
    fn pending_checks_columns_depend_on_role() {
        let data = fixture();
        let recruiter = QueryProcessor::new(&data, UserRole::Recruiter)
            .process_query("pending criminal checks");
        let recruiter_table = table(&recruiter);
        assert!(recruiter_table.column_index("Candidate").is_some());
        assert!(recruiter_table.column_index("Region").is_none());
        assert_eq!(recruiter_table.rows.len(), 2);
        assert_eq!(recruiter.summary, "Found 2 pending CRIM checks");

        let manager = QueryProcessor::new(&data, UserRole::HrManager)
            .process_query("pending criminal checks this week");
        let manager_table = table(&manager);
        assert!(manager_table.column_index("Region").is_some());
        assert!(manager_table.column_index("Candidate").is_none());
        assert_eq!(manager_table.rows.len(), 1);
        assert_eq!(manager_table.rows[0][4], json!("Northeast"));
    }

    #[test]
    fn missing_candidate_renders_unknown() {
        let data = fixture();
        let response =
            QueryProcessor::new(&data, UserRole::Recruiter).process_query("pending emp checks");
        let table = table(&response);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0][1], json!("Unknown"));
    }

    #[test]
    fn unmatched_query_returns_fixed_suggestions_for_every_role() {
        let data = generated();
        for role in UserRole::ALL {
            let response = QueryProcessor::new(&data, role).process_query("gibberish xyz");
            match response.content {
                ResponseContent::Text { suggestions, .. } => {
                    assert_eq!(suggestions.len(), 7);
                    assert_eq!(suggestions, SUGGESTIONS.map(String::from).to_vec());
                }
                other => panic!("expected text, got {other:?}"),
            }
        }
    }

    #[test]
    fn average_tat_over_empty_set_reports_no_data() {
        let data = empty();
        let response =
            QueryProcessor::new(&data, UserRole::HrManager).process_query("average tat for edu");
        assert!(response.summary.contains(NO_DATA));
        assert!(!response.summary.contains("NaN"));
        assert!(chart(&response).labels.is_empty());
    }

    #[test]
    fn average_tat_filters_by_search_type() {
        let data = fixture();
        let response = QueryProcessor::new(&data, UserRole::HrManager)
            .process_query("What is the average TAT for CRIM checks last quarter?");
        assert_eq!(
            response.summary,
            "Average TAT for CRIM: 4.0 days (based on 1 completed orders)"
        );
        let chart = chart(&response);
        assert_eq!(chart.title, "Average Turnaround Time - CRIM");
        assert_eq!(chart.labels, vec!["CRIM"]);
    }

    #[test]
    fn compliance_officer_sees_dispute_table_with_risk_levels() {
        let data = fixture();
        let response = QueryProcessor::new(&data, UserRole::ComplianceOfficer)
            .process_query("List disputes");
        let table = table(&response);
        let risk = table.column_index("Risk Level").expect("risk column");
        let candidate = table.column_index("Candidate").expect("candidate column");
        let risks = table
            .rows
            .iter()
            .map(|row| row[risk].as_str().unwrap_or_default().to_string())
            .collect::<Vec<_>>();
        assert_eq!(risks, vec!["High", "Low", "Medium"]);
        assert_eq!(table.rows[2][candidate], json!("Unknown"));
        assert_eq!(
            response.summary,
            "Found 3 disputes. 1 are high-risk (>14 days old)."
        );
    }

    #[test]
    fn unresolved_disputes_older_than_a_week() {
        let data = fixture();
        let response = QueryProcessor::new(&data, UserRole::ComplianceOfficer)
            .process_query("List disputes unresolved for more than 7 days");
        let table = table(&response);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0][0], json!("DSP001"));
        assert!(response.summary.contains("requiring attention"));
    }

    #[test]
    fn other_roles_see_dispute_status_pie() {
        let data = fixture();
        let response =
            QueryProcessor::new(&data, UserRole::Recruiter).process_query("open disputes");
        let chart = chart(&response);
        assert_eq!(chart.kind, ChartKind::Pie);
        assert_eq!(chart.labels, vec!["Open", "In Progress"]);
        assert_eq!(chart.first_series(), &[1.0, 1.0]);
    }

    #[test]
    fn risk_level_thresholds() {
        assert_eq!(RiskLevel::from_days_open(15), RiskLevel::High);
        assert_eq!(RiskLevel::from_days_open(14), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_days_open(8), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_days_open(7), RiskLevel::Low);
    }

    #[test]
    fn completion_rates_use_percentages_and_cap_axis() {
        let data = fixture();
        let response = QueryProcessor::new(&data, UserRole::HrManager)
            .process_query("Show completion rates by search type");
        let chart = chart(&response);
        assert_eq!(chart.y_max, Some(100.0));
        assert_eq!(chart.labels, vec!["CRIM", "EDU", "EMP"]);
        let crim = chart.first_series()[0];
        assert!((crim - 100.0 / 3.0).abs() < 1e-9);
        assert!(response.summary.contains("CRIM having the highest rate"));
    }

    #[test]
    fn empty_dataset_never_produces_nan_summaries() {
        let data = empty();
        let processor = QueryProcessor::new(&data, UserRole::HrManager);
        for query in [
            "Display turnaround time trends",
            "Show completion rates by search type",
            "order volume",
            "Analyze discrepancies",
            "orders by region",
        ] {
            let response = processor.process_query(query);
            assert!(response.summary.contains(NO_DATA), "{query}: {}", response.summary);
            assert!(!response.summary.contains("NaN"));
        }
    }

    #[test]
    fn trend_charts_keep_only_recent_buckets() {
        let data = generated();
        let processor = QueryProcessor::new(&data, UserRole::HrManager);
        let turnaround = processor.process_query("Display turnaround time trends");
        assert!(chart(&turnaround).labels.len() <= 8);
        let volume = processor.process_query("order volume");
        let volume_chart = chart(&volume);
        assert!(volume_chart.labels.len() <= 6);
        let mut sorted = volume_chart.labels.clone();
        sorted.sort();
        assert_eq!(sorted, volume_chart.labels);
    }

    #[test]
    fn week_bounds_start_on_sunday() {
        let (start, end) = week_bounds(today());
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 6, 9).expect("valid date"));
        assert_eq!(end, NaiveDate::from_ymd_opt(2024, 6, 15).expect("valid date"));
    }
}
