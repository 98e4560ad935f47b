//! Domain services. `AccountService` owns identity operations,
//! `ContentService` owns the post/comment mutations and the
//! back-reference bookkeeping they require, `FeedService` owns the
//! geospatial feed query and result hydration.

mod account;
mod content;
mod feed;

pub use account::AccountService;
pub use content::ContentService;
pub use feed::{CommentView, FeedService, PostWithComments, FEED_PAGE_SIZE, FEED_RADIUS_KM};
