pub mod health;
pub mod soldiers;

pub use health::{health_check, metrics_endpoint, readiness_check};
pub use soldiers::{
    create_random_soldier, create_soldier, delete_all_soldiers, delete_soldier,
    delete_soldier_named_random, get_soldier, get_soldier_named_random, list_soldiers,
};
