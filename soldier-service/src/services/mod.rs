pub mod database;
pub mod metrics;
pub mod store;

pub use database::MongoSoldierStore;
pub use metrics::{get_metrics, init_metrics};
pub use store::{InMemorySoldierStore, SoldierStore};
