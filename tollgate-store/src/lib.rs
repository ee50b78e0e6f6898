pub mod app_config;
pub mod repository;
pub mod memory_repo;
pub mod events;

pub use app_config::Config;
pub use repository::{OrderRepository, RepoResult, ReservationRepository};
pub use memory_repo::{MemoryOrderRepository, MemoryReservationRepository};
pub use events::EventLog;
