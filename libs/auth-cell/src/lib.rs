pub mod handlers;
pub mod models;
pub mod nav;
pub mod router;
pub mod services;

pub use models::*;
pub use router::*;
