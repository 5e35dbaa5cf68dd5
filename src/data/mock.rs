use crate::data::{
    Candidate, Dispute, Order, OrderStatus, ResolutionStatus, SearchType,
};
use chrono::{Duration, NaiveDate};
use rand::seq::SliceRandom;
use rand::Rng;

const CANDIDATES: [(&str, &str, (i32, u32, u32), &str); 20] = [
    ("C001", "John Smith", (1990, 5, 15), "Northeast"),
    ("C002", "Sarah Johnson", (1988, 12, 3), "West"),
    ("C003", "Michael Brown", (1992, 8, 22), "Southeast"),
    ("C004", "Emily Davis", (1989, 11, 10), "Midwest"),
    ("C005", "David Wilson", (1991, 3, 7), "Southwest"),
    ("C006", "Lisa Anderson", (1987, 9, 18), "Northeast"),
    ("C007", "Robert Taylor", (1993, 1, 25), "West"),
    ("C008", "Jennifer Martinez", (1990, 7, 14), "Southeast"),
    ("C009", "Christopher Lee", (1986, 4, 30), "Midwest"),
    ("C010", "Amanda White", (1994, 12, 8), "Southwest"),
    ("C011", "James Garcia", (1985, 6, 12), "Northeast"),
    ("C012", "Maria Rodriguez", (1991, 10, 27), "West"),
    ("C013", "Daniel Thompson", (1989, 2, 14), "Southeast"),
    ("C014", "Michelle Clark", (1992, 11, 3), "Midwest"),
    ("C015", "Kevin Lewis", (1988, 8, 17), "Southwest"),
    ("C016", "Laura Walker", (1990, 5, 29), "Northeast"),
    ("C017", "Brian Hall", (1987, 1, 11), "West"),
    ("C018", "Nancy Allen", (1993, 9, 5), "Southeast"),
    ("C019", "Steven Young", (1991, 12, 20), "Midwest"),
    ("C020", "Kimberly King", (1986, 7, 8), "Southwest"),
];

const DISPUTE_REASONS: [&str; 5] = [
    "Incomplete criminal record information",
    "Education verification mismatch",
    "Employment dates discrepancy",
    "MVR report contains errors",
    "Identity verification failed",
];

/// Static reference data the local query path and the analytics view read from.
#[derive(Debug, Clone)]
pub struct MockDataset {
    pub today: NaiveDate,
    pub candidates: Vec<Candidate>,
    pub orders: Vec<Order>,
    pub disputes: Vec<Dispute>,
}

impl MockDataset {
    pub fn generate<R: Rng + ?Sized>(rng: &mut R, today: NaiveDate) -> Self {
        let candidates = CANDIDATES
            .iter()
            .map(|(id, name, (year, month, day), region)| Candidate {
                candidate_id: id.to_string(),
                name: name.to_string(),
                dob: NaiveDate::from_ymd_opt(*year, *month, *day).unwrap_or_default(),
                region: region.to_string(),
            })
            .collect::<Vec<_>>();

        let mut orders = Vec::new();
        for candidate in &candidates {
            let order_count = rng.gen_range(3..=8);
            for _ in 0..order_count {
                let order_id = format!("ORD{:03}", orders.len() + 1);
                orders.push(random_order(rng, today, order_id, &candidate.candidate_id));
            }
        }

        let disputes = orders
            .iter()
            .filter(|order| order.status == OrderStatus::Dispute)
            .enumerate()
            .filter_map(|(index, order)| {
                let end_date = order.end_date?;
                Some(random_dispute(rng, index, order, end_date))
            })
            .collect();

        Self {
            today,
            candidates,
            orders,
            disputes,
        }
    }

    pub fn candidate(&self, candidate_id: &str) -> Option<&Candidate> {
        self.candidates
            .iter()
            .find(|candidate| candidate.candidate_id == candidate_id)
    }

    pub fn order(&self, order_id: &str) -> Option<&Order> {
        self.orders.iter().find(|order| order.order_id == order_id)
    }

    pub fn candidate_for_order(&self, order: &Order) -> Option<&Candidate> {
        self.candidate(&order.candidate_id)
    }
}

fn random_order<R: Rng + ?Sized>(
    rng: &mut R,
    today: NaiveDate,
    order_id: String,
    candidate_id: &str,
) -> Order {
    let search_type = *SearchType::ALL
        .choose(rng)
        .unwrap_or(&SearchType::Crim);
    let status = *OrderStatus::ALL
        .choose(rng)
        .unwrap_or(&OrderStatus::Draft);
    let start_date = today - Duration::days(rng.gen_range(0..90));

    let completion_days = status.is_closed().then(|| match status {
        OrderStatus::Dispute => rng.gen_range(3..=12),
        _ => rng.gen_range(1..=14),
    });

    Order {
        order_id,
        candidate_id: candidate_id.to_string(),
        search_type,
        status,
        start_date,
        end_date: completion_days.map(|days| start_date + Duration::days(days)),
        turnaround_time: completion_days,
    }
}

fn random_dispute<R: Rng + ?Sized>(
    rng: &mut R,
    index: usize,
    order: &Order,
    end_date: NaiveDate,
) -> Dispute {
    let created_date = end_date + Duration::days(rng.gen_range(0..5));
    let resolution_status = *ResolutionStatus::ALL
        .choose(rng)
        .unwrap_or(&ResolutionStatus::Open);
    let reason = DISPUTE_REASONS
        .choose(rng)
        .copied()
        .unwrap_or(DISPUTE_REASONS[0]);
    let resolved_date = (resolution_status == ResolutionStatus::Resolved)
        .then(|| created_date + Duration::days(rng.gen_range(1..=7)));

    Dispute {
        dispute_id: format!("DSP{:03}", index + 1),
        order_id: order.order_id.clone(),
        reason: reason.to_string(),
        resolution_status,
        created_date,
        resolved_date,
    }
}
