pub mod canvas;
pub mod chart;
pub mod event;
pub mod workspace;
