//! MongoDB store adapters.
//!
//! One collection per entity type. Ids are stored as strings, dates as
//! BSON datetimes, post locations as GeoJSON points under a 2dsphere
//! index so `$nearSphere` serves the feed query.

mod documents;
mod repos;

use mongodb::{Client, IndexModel, bson::doc, options::IndexOptions};

use self::documents::{CommentDocument, PostDocument, UserDocument};
pub use self::repos::{MongoCommentStore, MongoPostStore, MongoUserStore};

/// Configuration for the MongoDB connection.
#[derive(Debug, Clone)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
}

/// The three collection-backed stores, connected and indexed.
pub struct MongoStores {
    pub users: MongoUserStore,
    pub posts: MongoPostStore,
    pub comments: MongoCommentStore,
}

impl MongoStores {
    /// Connect and make sure the unique and geospatial indexes exist.
    /// Index creation is idempotent, so this is safe on every startup.
    pub async fn connect(config: &MongoConfig) -> Result<Self, mongodb::error::Error> {
        tracing::info!(database = %config.database, "Connecting to MongoDB...");

        let client = Client::with_uri_str(&config.uri).await?;
        let db = client.database(&config.database);

        let users = db.collection::<UserDocument>("users");
        let posts = db.collection::<PostDocument>("posts");
        let comments = db.collection::<CommentDocument>("comments");

        let unique = IndexOptions::builder().unique(true).build();
        users
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "username": 1 })
                    .options(unique.clone())
                    .build(),
            )
            .await?;
        users
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "email": 1 })
                    .options(unique)
                    .build(),
            )
            .await?;
        posts
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "location": "2dsphere" })
                    .build(),
            )
            .await?;
        posts
            .create_index(IndexModel::builder().keys(doc! { "author": 1 }).build())
            .await?;
        comments
            .create_index(IndexModel::builder().keys(doc! { "post": 1 }).build())
            .await?;
        comments
            .create_index(IndexModel::builder().keys(doc! { "author": 1 }).build())
            .await?;

        tracing::info!("MongoDB connected, indexes ensured");

        Ok(Self {
            users: MongoUserStore::new(users),
            posts: MongoPostStore::new(posts),
            comments: MongoCommentStore::new(comments),
        })
    }
}
