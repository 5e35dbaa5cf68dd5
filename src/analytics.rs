use crate::data::{MockDataset, OrderStatus, SearchType};
use crate::query::processor::{mean, percentage};
use crate::query::{ChartData, ChartKind};

/// Headline numbers and charts for the analytics view.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardMetrics {
    pub total_orders: usize,
    pub completed_orders: usize,
    pub pending_orders: usize,
    /// Disputes that are Open or In Progress.
    pub open_disputes: usize,
    pub completion_rate: Option<f64>,
    pub average_turnaround: Option<f64>,
    pub search_type_chart: ChartData,
    pub status_chart: ChartData,
}

impl DashboardMetrics {
    pub fn compute(data: &MockDataset) -> Self {
        let count_status = |status: OrderStatus| {
            data.orders
                .iter()
                .filter(|order| order.status == status)
                .count()
        };

        let total_orders = data.orders.len();
        let completed_orders = count_status(OrderStatus::Completed);
        let open_disputes = data
            .disputes
            .iter()
            .filter(|dispute| dispute.resolution_status.is_unresolved())
            .count();

        let search_type_chart = ChartData::new(ChartKind::Doughnut, "Orders by Search Type")
            .with_series(
                "Orders",
                SearchType::ALL.iter().map(|search_type| {
                    let count = data
                        .orders
                        .iter()
                        .filter(|order| order.search_type == *search_type)
                        .count();
                    (search_type.to_string(), count as f64)
                }),
            );
        let status_chart = ChartData::new(ChartKind::Bar, "Order Status Distribution")
            .with_series(
                "Number of Orders",
                OrderStatus::ALL
                    .iter()
                    .map(|status| (status.to_string(), count_status(*status) as f64)),
            )
            .with_y_axis("Number of Orders");

        Self {
            total_orders,
            completed_orders,
            pending_orders: count_status(OrderStatus::Pending),
            open_disputes,
            completion_rate: percentage(completed_orders, total_orders),
            average_turnaround: mean(
                data.orders
                    .iter()
                    .filter_map(|order| order.turnaround_time)
                    .map(|days| days as f64),
            ),
            search_type_chart,
            status_chart,
        }
    }
}
