use crate::models::Soldier;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Body of `POST /soldiers`.
///
/// Missing fields deserialize as empty strings so they fail the same
/// not-blank rule as explicit blanks.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateSoldierRequest {
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "Name must not be blank"))]
    pub name: String,
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "Weapon must not be blank"))]
    pub weapon: String,
}

impl From<CreateSoldierRequest> for Soldier {
    fn from(req: CreateSoldierRequest) -> Self {
        Soldier::new(req.name, req.weapon)
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SoldierResponse {
    pub id: String,
    pub name: String,
    pub weapon: String,
}

impl From<Soldier> for SoldierResponse {
    fn from(soldier: Soldier) -> Self {
        Self {
            id: soldier.id,
            name: soldier.name,
            weapon: soldier.weapon,
        }
    }
}
