//! Application state - shared across all handlers.

use std::sync::Arc;

use waypost_core::ports::{CommentStore, PasswordService, PostStore, TokenService, UserStore};
use waypost_core::services::{AccountService, ContentService, FeedService};
use waypost_infra::store::{InMemoryCommentStore, InMemoryPostStore, InMemoryUserStore};

use crate::config::AppConfig;

/// Shared application state: the three domain services, wired to
/// whichever stores the configuration selects.
#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<AccountService>,
    pub content: Arc<ContentService>,
    pub feed: Arc<FeedService>,
}

type Stores = (
    Arc<dyn UserStore>,
    Arc<dyn PostStore>,
    Arc<dyn CommentStore>,
);

fn memory_stores() -> Stores {
    (
        Arc::new(InMemoryUserStore::new()),
        Arc::new(InMemoryPostStore::new()),
        Arc::new(InMemoryCommentStore::new()),
    )
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(
        config: &AppConfig,
        tokens: Arc<dyn TokenService>,
        passwords: Arc<dyn PasswordService>,
    ) -> Self {
        #[cfg(feature = "mongo")]
        let (users, posts, comments): Stores = {
            if let Some(mongo_config) = &config.mongo {
                match waypost_infra::store::MongoStores::connect(mongo_config).await {
                    Ok(stores) => (
                        Arc::new(stores.users),
                        Arc::new(stores.posts),
                        Arc::new(stores.comments),
                    ),
                    Err(e) => {
                        tracing::error!(
                            "Failed to connect to MongoDB: {}. Using in-memory fallback.",
                            e
                        );
                        memory_stores()
                    }
                }
            } else {
                tracing::warn!("MONGODB_URI not set. Running without database (in-memory mode).");
                memory_stores()
            }
        };

        #[cfg(not(feature = "mongo"))]
        let (users, posts, comments): Stores = {
            let _ = config;
            tracing::info!("Running without mongo feature - using in-memory stores");
            memory_stores()
        };

        let accounts = Arc::new(AccountService::new(users.clone(), tokens, passwords));
        let content = Arc::new(ContentService::new(
            users.clone(),
            posts.clone(),
            comments.clone(),
        ));
        let feed = Arc::new(FeedService::new(posts, comments));

        tracing::info!("Application state initialized");

        Self {
            accounts,
            content,
            feed,
        }
    }
}
