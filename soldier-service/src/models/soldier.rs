use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A soldier as stored in the `soldiers` collection.
///
/// `name` is unique among soldiers with a non-empty name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Soldier {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub weapon: String,
}

impl Soldier {
    pub fn new(name: String, weapon: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            weapon,
        }
    }

    /// A recruit with only an identifier; name and weapon are left empty.
    pub fn recruit() -> Self {
        Self::new(String::new(), String::new())
    }

    pub fn has_name(&self) -> bool {
        !self.name.is_empty()
    }
}
