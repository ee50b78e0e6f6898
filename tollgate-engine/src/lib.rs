pub mod engine;

pub use engine::FulfillmentEngine;
