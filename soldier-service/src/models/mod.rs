pub mod soldier;

pub use soldier::Soldier;
