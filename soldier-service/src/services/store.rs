use crate::models::Soldier;
use async_trait::async_trait;
use service_core::error::AppError;
use std::sync::Mutex;

/// Persistence for soldiers.
///
/// Implementations enforce name uniqueness for non-empty names on `save`,
/// answering a duplicate with [`AppError::Conflict`].
#[async_trait]
pub trait SoldierStore: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Soldier>, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Soldier>, AppError>;
    async fn find_by_name(&self, name: &str) -> Result<Option<Soldier>, AppError>;
    async fn save(&self, soldier: Soldier) -> Result<Soldier, AppError>;
    async fn delete(&self, soldier: &Soldier) -> Result<(), AppError>;
    async fn health_check(&self) -> Result<(), AppError>;
}

pub fn already_exists(name: &str) -> AppError {
    AppError::Conflict(anyhow::anyhow!(
        "A soldier called '{}' already exists",
        name
    ))
}

pub fn not_found(name: &str) -> AppError {
    AppError::NotFound(anyhow::anyhow!(
        "Could not find a soldier called '{}'",
        name
    ))
}

/// Store kept in process memory, in insertion order.
pub struct InMemorySoldierStore {
    soldiers: Mutex<Vec<Soldier>>,
}

impl Default for InMemorySoldierStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemorySoldierStore {
    pub fn new() -> Self {
        Self {
            soldiers: Mutex::new(Vec::new()),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<Soldier>>, AppError> {
        self.soldiers.lock().map_err(|e| {
            AppError::InternalError(anyhow::anyhow!("Soldier store mutex poisoned: {}", e))
        })
    }
}

#[async_trait]
impl SoldierStore for InMemorySoldierStore {
    async fn find_all(&self) -> Result<Vec<Soldier>, AppError> {
        Ok(self.lock()?.clone())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Soldier>, AppError> {
        Ok(self.lock()?.iter().find(|s| s.id == id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Soldier>, AppError> {
        Ok(self.lock()?.iter().find(|s| s.name == name).cloned())
    }

    async fn save(&self, soldier: Soldier) -> Result<Soldier, AppError> {
        let mut soldiers = self.lock()?;

        if soldier.has_name()
            && soldiers
                .iter()
                .any(|s| s.name == soldier.name && s.id != soldier.id)
        {
            return Err(already_exists(&soldier.name));
        }

        match soldiers.iter_mut().find(|s| s.id == soldier.id) {
            Some(existing) => *existing = soldier.clone(),
            None => soldiers.push(soldier.clone()),
        }

        Ok(soldier)
    }

    async fn delete(&self, soldier: &Soldier) -> Result<(), AppError> {
        self.lock()?.retain(|s| s.id != soldier.id);
        Ok(())
    }

    async fn health_check(&self) -> Result<(), AppError> {
        self.lock().map(|_| ())
    }
}
