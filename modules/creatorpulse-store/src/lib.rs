pub mod entities;
pub mod memory;
pub mod postgres;
pub mod store;

pub use entities::*;
pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use store::DashboardStore;
