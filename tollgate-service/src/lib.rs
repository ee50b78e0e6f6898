pub mod error;
pub mod locks;
pub mod service;
pub mod telemetry;

pub use error::ServiceError;
pub use service::FulfillmentService;
