pub mod intent;
pub mod processor;
pub mod response;

pub use processor::QueryProcessor;
pub use response::{ChartData, ChartKind, QueryResponse, ResponseContent, TableData};
