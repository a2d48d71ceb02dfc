//! MongoDB-backed record source.

use crate::config::{CollectionConfig, SourceConfig};
use crate::domain::ports::RecordSource;
use crate::domain::value::{document_fields, Fields};
use crate::utils::error::{EtlError, Result};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::Client;

pub struct MongoSource {
    client: Client,
    database: String,
    collection: CollectionConfig,
}

impl MongoSource {
    /// Builds the client and pings the database so that an unreachable server
    /// fails here rather than halfway through the read.
    pub async fn connect(config: &SourceConfig) -> Result<Self> {
        tracing::info!("Connecting to MongoDB...");

        let client = Client::with_uri_str(&config.uri)
            .await
            .map_err(|e| EtlError::ConnectionError {
                message: e.to_string(),
            })?;

        let ping = client
            .database(&config.database)
            .run_command(doc! { "ping": 1 })
            .await;

        if let Err(e) = ping {
            client.shutdown().await;
            return Err(EtlError::ConnectionError {
                message: e.to_string(),
            });
        }

        tracing::debug!("Connected, database '{}' answered ping", config.database);

        Ok(Self {
            client,
            database: config.database.clone(),
            collection: config.collection.clone(),
        })
    }

    async fn collection_name(&self) -> Result<String> {
        if !self.collection.discover {
            return Ok(self.collection.name.clone());
        }

        let existing = self
            .client
            .database(&self.database)
            .list_collection_names()
            .await?;
        tracing::debug!("Existing collections: {:?}", existing);

        resolve_collection(&self.database, &existing, &self.collection)
    }
}

#[async_trait]
impl RecordSource for MongoSource {
    async fn fetch_all(&self) -> Result<Vec<Fields>> {
        let name = self.collection_name().await?;
        tracing::info!(
            "Fetching data from database: {}, collection: {}",
            self.database,
            name
        );

        let cursor = self
            .client
            .database(&self.database)
            .collection::<Document>(&name)
            .find(doc! {})
            .await?;
        let documents: Vec<Document> = cursor.try_collect().await?;

        Ok(documents.into_iter().map(document_fields).collect())
    }

    async fn release(&self) {
        tracing::debug!("Closing MongoDB connection");
        self.client.clone().shutdown().await;
    }
}

/// Picks the collection to read when discovery is enabled: the configured
/// name, then the first existing candidate, then whatever the server listed
/// first.
pub fn resolve_collection(
    database: &str,
    existing: &[String],
    config: &CollectionConfig,
) -> Result<String> {
    let preferred = std::iter::once(&config.name).chain(config.candidates.iter());
    for name in preferred {
        if existing.contains(name) {
            if *name != config.name {
                tracing::warn!(
                    "Collection '{}' not found, using candidate '{}'",
                    config.name,
                    name
                );
            }
            return Ok(name.clone());
        }
    }

    match existing.first() {
        Some(name) => {
            tracing::warn!(
                "No known collection in '{}', falling back to first collection found: '{}'. \
                 Set collection.name explicitly to avoid exporting the wrong data",
                database,
                name
            );
            Ok(name.clone())
        }
        None => Err(EtlError::NoCollectionError {
            database: database.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(name: &str) -> CollectionConfig {
        CollectionConfig {
            name: name.to_string(),
            discover: true,
            candidates: vec!["hackathons".to_string(), "events".to_string()],
        }
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_configured_name_wins() {
        let existing = names(&["events", "listings"]);
        assert_eq!(
            resolve_collection("dumpy", &existing, &config("listings")).unwrap(),
            "listings"
        );
    }

    #[test]
    fn test_candidates_in_order() {
        let existing = names(&["users", "events", "hackathons"]);
        assert_eq!(
            resolve_collection("dumpy", &existing, &config("missing")).unwrap(),
            "hackathons"
        );
    }

    #[test]
    fn test_falls_back_to_first_collection() {
        let existing = names(&["users", "sessions"]);
        assert_eq!(
            resolve_collection("dumpy", &existing, &config("missing")).unwrap(),
            "users"
        );
    }

    #[test]
    fn test_empty_database_is_error() {
        let err = resolve_collection("dumpy", &[], &config("hackathons")).unwrap_err();
        assert!(matches!(err, EtlError::NoCollectionError { database } if database == "dumpy"));
    }
}
