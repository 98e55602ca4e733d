use crate::models::Soldier;
use crate::services::store::{already_exists, SoldierStore};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::doc,
    error::{ErrorKind, WriteFailure},
    options::IndexOptions,
    Client as MongoClient, Collection, Database, IndexModel,
};
use service_core::error::AppError;

const DUPLICATE_KEY_CODE: i32 = 11000;

#[derive(Clone)]
pub struct MongoSoldierStore {
    client: MongoClient,
    db: Database,
}

impl MongoSoldierStore {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, AppError> {
        tracing::info!(uri = %uri, "Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to connect to MongoDB at {}: {}", uri, e);
            AppError::from(e)
        })?;
        let db = client.database(database);
        tracing::info!(database = %database, "Successfully connected to MongoDB database");
        Ok(Self { client, db })
    }

    pub async fn initialize_indexes(&self) -> Result<(), AppError> {
        tracing::info!("Creating MongoDB indexes for soldier-service");

        // Unique on name, but only for named soldiers so recruits can share ""
        let name_index = IndexModel::builder()
            .keys(doc! { "name": 1 })
            .options(
                IndexOptions::builder()
                    .name("name_unique".to_string())
                    .unique(true)
                    .partial_filter_expression(doc! { "name": { "$gt": "" } })
                    .build(),
            )
            .build();

        self.soldiers()
            .create_index(name_index, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create name index on soldiers collection: {}", e);
                AppError::from(e)
            })?;
        tracing::info!("Created unique index on soldiers.name");

        Ok(())
    }

    pub fn soldiers(&self) -> Collection<Soldier> {
        self.db.collection("soldiers")
    }

    pub fn client(&self) -> &MongoClient {
        &self.client
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error))
            if write_error.code == DUPLICATE_KEY_CODE
    )
}

#[async_trait]
impl SoldierStore for MongoSoldierStore {
    async fn find_all(&self) -> Result<Vec<Soldier>, AppError> {
        let mut cursor = self.soldiers().find(None, None).await?;

        let mut soldiers = Vec::new();
        while let Some(soldier) = cursor.try_next().await? {
            soldiers.push(soldier);
        }
        Ok(soldiers)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Soldier>, AppError> {
        Ok(self.soldiers().find_one(doc! { "_id": id }, None).await?)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Soldier>, AppError> {
        Ok(self
            .soldiers()
            .find_one(doc! { "name": name }, None)
            .await?)
    }

    async fn save(&self, soldier: Soldier) -> Result<Soldier, AppError> {
        match self.soldiers().insert_one(&soldier, None).await {
            Ok(_) => Ok(soldier),
            Err(e) if is_duplicate_key(&e) => {
                tracing::warn!(name = %soldier.name, "Duplicate soldier name rejected by index");
                Err(already_exists(&soldier.name))
            }
            Err(e) => {
                tracing::error!(soldier_id = %soldier.id, "Failed to insert soldier: {}", e);
                Err(AppError::from(e))
            }
        }
    }

    async fn delete(&self, soldier: &Soldier) -> Result<(), AppError> {
        self.soldiers()
            .delete_one(doc! { "_id": &soldier.id }, None)
            .await?;
        Ok(())
    }

    async fn health_check(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                AppError::from(e)
            })?;
        Ok(())
    }
}
