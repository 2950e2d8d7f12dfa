pub mod prescription;
pub mod stock;

pub use prescription::PrescriptionService;
pub use stock::StockService;
