//! # Redis
//!
//! Document store for appointments, track entries and user accounts.
//!
//! Records are append-only. Nothing is ever updated or deleted, so every collection is a plain
//! list of JSON documents.
//!
//!
//!
//! ## Layout
//!
//! - `appointments:{userId}`: list of JSON appointments, newest at the head
//! - `tracks:{userId}`: list of JSON track entries, newest at the head
//! - `users`: hash of normalized email to JSON account (profile + password hash)
//!
//! Ownership scoping is a property of the key: a caller can only ever name their own list.
//!
//!
//!
//! ## Operations
//!
//! - Create: `LPUSH` onto the owner's list (single atomic insert)
//! - List: `LRANGE 0 -1`, push order. Timestamps are taken before the push, so two concurrent
//!   creates can land out of `createdAt` order; handlers re-sort by `createdAt`
//! - Register: `HSETNX` so two sign-ups with the same email cannot both win
//!
//!
//!
//! ## Memory backend
//!
//! Same layout kept in process. Used for local runs without Redis and by the test suite.
use std::{collections::HashMap, time::Duration};

use redis::{
    AsyncCommands, Client,
    aio::{ConnectionManager, ConnectionManagerConfig},
};
use serde::{Serialize, de::DeserializeOwned};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::{auth::Account, error::AppError};

pub const USERS_KEY: &str = "users";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Appointments,
    Tracks,
}

impl Collection {
    pub fn key(self, owner: Uuid) -> String {
        let prefix = match self {
            Collection::Appointments => "appointments",
            Collection::Tracks => "tracks",
        };

        format!("{prefix}:{owner}")
    }
}

#[derive(Default)]
pub struct MemoryStore {
    lists: HashMap<String, Vec<String>>,
    users: HashMap<String, String>,
}

pub enum Store {
    Redis(ConnectionManager),
    Memory(RwLock<MemoryStore>),
}

pub async fn init_redis(redis_url: &str) -> Result<ConnectionManager, redis::RedisError> {
    let config = ConnectionManagerConfig::new()
        .set_number_of_retries(1)
        .set_connection_timeout(Duration::from_millis(100));

    let client = Client::open(redis_url)?;

    client.get_connection_manager_with_config(config).await
}

impl Store {
    pub async fn redis(redis_url: &str) -> Result<Self, redis::RedisError> {
        Ok(Self::Redis(init_redis(redis_url).await?))
    }

    pub fn memory() -> Self {
        Self::Memory(RwLock::new(MemoryStore::default()))
    }

    pub async fn push<T: Serialize>(
        &self,
        collection: Collection,
        owner: Uuid,
        record: &T,
    ) -> Result<(), AppError> {
        let key = collection.key(owner);
        let document = serde_json::to_string(record)?;

        match self {
            Store::Redis(manager) => {
                let mut connection = manager.clone();
                let _: () = connection.lpush(&key, document).await?;
            }
            Store::Memory(memory) => {
                memory
                    .write()
                    .await
                    .lists
                    .entry(key.clone())
                    .or_default()
                    .push(document);
            }
        }

        debug!("Stored record under {key}");

        Ok(())
    }

    /// Push order, newest push first.
    pub async fn list<T: DeserializeOwned>(
        &self,
        collection: Collection,
        owner: Uuid,
    ) -> Result<Vec<T>, AppError> {
        let key = collection.key(owner);

        let documents: Vec<String> = match self {
            Store::Redis(manager) => {
                let mut connection = manager.clone();
                connection.lrange(&key, 0, -1).await?
            }
            Store::Memory(memory) => memory
                .read()
                .await
                .lists
                .get(&key)
                .map(|documents| documents.iter().rev().cloned().collect())
                .unwrap_or_default(),
        };

        documents
            .iter()
            .map(|document| serde_json::from_str(document).map_err(AppError::from))
            .collect()
    }

    /// Returns `false` when an account already exists for that email.
    pub async fn insert_account(&self, account: &Account) -> Result<bool, AppError> {
        let document = serde_json::to_string(account)?;

        match self {
            Store::Redis(manager) => {
                let mut connection = manager.clone();
                Ok(connection.hset_nx(USERS_KEY, &account.email, document).await?)
            }
            Store::Memory(memory) => {
                let mut memory = memory.write().await;
                if memory.users.contains_key(&account.email) {
                    return Ok(false);
                }

                memory.users.insert(account.email.clone(), document);
                Ok(true)
            }
        }
    }

    pub async fn find_account(&self, email: &str) -> Result<Option<Account>, AppError> {
        let document: Option<String> = match self {
            Store::Redis(manager) => {
                let mut connection = manager.clone();
                connection.hget(USERS_KEY, email).await?
            }
            Store::Memory(memory) => memory.read().await.users.get(email).cloned(),
        };

        document
            .map(|document| serde_json::from_str(&document).map_err(AppError::from))
            .transpose()
    }
}
