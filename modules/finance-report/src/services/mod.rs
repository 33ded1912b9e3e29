pub mod data_loader;
pub mod metrics_calculator;
pub mod month_data;
pub mod report_formatter;
pub mod report_service;
