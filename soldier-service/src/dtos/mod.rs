pub mod soldiers;

pub use soldiers::{CreateSoldierRequest, SoldierResponse};
