//! Service-level tests running the content and feed services against
//! the in-memory stores.

use std::sync::Arc;

use uuid::Uuid;

use waypost_core::domain::{GeoPoint, User};
use waypost_core::error::DomainError;
use waypost_core::services::{ContentService, FeedService};
use waypost_core::ports::{CommentStore, PostStore, UserStore};

use crate::store::memory::{InMemoryCommentStore, InMemoryPostStore, InMemoryUserStore};

struct Fixture {
    users: Arc<InMemoryUserStore>,
    posts: Arc<InMemoryPostStore>,
    comments: Arc<InMemoryCommentStore>,
    content: ContentService,
    feed: FeedService,
}

fn fixture() -> Fixture {
    let users = Arc::new(InMemoryUserStore::new());
    let posts = Arc::new(InMemoryPostStore::new());
    let comments = Arc::new(InMemoryCommentStore::new());
    let content = ContentService::new(users.clone(), posts.clone(), comments.clone());
    let feed = FeedService::new(posts.clone(), comments.clone());
    Fixture {
        users,
        posts,
        comments,
        content,
        feed,
    }
}

async fn seed_user(users: &InMemoryUserStore, username: &str) -> User {
    let user = User::new(
        username,
        &format!("{username}@example.com"),
        "digest".to_string(),
    )
    .unwrap();
    users.insert(user).await.unwrap()
}

// Alexanderplatz, Berlin.
fn center() -> GeoPoint {
    GeoPoint::new(13.4050, 52.5200).unwrap()
}

#[tokio::test]
async fn created_post_appears_in_author_list_exactly_once() {
    let fx = fixture();
    let ada = seed_user(&fx.users, "ada").await;

    let post = fx
        .content
        .create_post(ada.id, "Lost keys", "A set of keys by the fountain.", center())
        .await
        .unwrap();

    let ada = fx.users.find_by_id(ada.id).await.unwrap().unwrap();
    assert_eq!(ada.posts.iter().filter(|p| **p == post.id).count(), 1);
    assert_eq!(post.author_username, "ada");
}

#[tokio::test]
async fn create_post_for_unknown_author_is_not_found() {
    let fx = fixture();
    let err = fx
        .content
        .create_post(Uuid::new_v4(), "Lost keys", "A set of keys by the fountain.", center())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { entity_type: "user", .. }));
}

#[tokio::test]
async fn comment_lands_in_both_back_reference_lists_exactly_once() {
    let fx = fixture();
    let ada = seed_user(&fx.users, "ada").await;
    let bob = seed_user(&fx.users, "bob").await;

    let post = fx
        .content
        .create_post(ada.id, "Lost keys", "A set of keys by the fountain.", center())
        .await
        .unwrap();
    let comment = fx
        .content
        .create_comment(bob.id, post.id, "I saw them!")
        .await
        .unwrap();

    let bob = fx.users.find_by_id(bob.id).await.unwrap().unwrap();
    let post = fx.posts.find_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(bob.comments.iter().filter(|c| **c == comment.id).count(), 1);
    assert_eq!(post.comments.iter().filter(|c| **c == comment.id).count(), 1);
}

#[tokio::test]
async fn commenting_on_missing_post_is_not_found() {
    let fx = fixture();
    let ada = seed_user(&fx.users, "ada").await;

    let err = fx
        .content
        .create_comment(ada.id, Uuid::new_v4(), "hello there")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { entity_type: "post", .. }));
}

#[tokio::test]
async fn delete_cascades_to_comments_and_author_list() {
    let fx = fixture();
    let ada = seed_user(&fx.users, "ada").await;
    let bob = seed_user(&fx.users, "bob").await;

    let post = fx
        .content
        .create_post(ada.id, "Lost keys", "A set of keys by the fountain.", center())
        .await
        .unwrap();
    let c1 = fx
        .content
        .create_comment(bob.id, post.id, "I saw them!")
        .await
        .unwrap();
    let c2 = fx
        .content
        .create_comment(ada.id, post.id, "Where exactly?")
        .await
        .unwrap();

    fx.content.delete_post(ada.id, post.id).await.unwrap();

    assert!(fx.posts.find_by_id(post.id).await.unwrap().is_none());
    assert!(fx.comments.find_by_id(c1.id).await.unwrap().is_none());
    assert!(fx.comments.find_by_id(c2.id).await.unwrap().is_none());
    let ada = fx.users.find_by_id(ada.id).await.unwrap().unwrap();
    assert!(!ada.posts.contains(&post.id));
}

#[tokio::test]
async fn non_owner_mutations_are_forbidden_and_leave_post_unchanged() {
    let fx = fixture();
    let ada = seed_user(&fx.users, "ada").await;
    let eve = seed_user(&fx.users, "eve").await;

    let post = fx
        .content
        .create_post(ada.id, "Lost keys", "A set of keys by the fountain.", center())
        .await
        .unwrap();

    let edit = fx
        .content
        .update_post(eve.id, post.id, Some("Stolen keys"), None)
        .await;
    assert!(matches!(edit.unwrap_err(), DomainError::Forbidden));

    let delete = fx.content.delete_post(eve.id, post.id).await;
    assert!(matches!(delete.unwrap_err(), DomainError::Forbidden));

    let stored = fx.posts.find_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(stored.title, "Lost keys");
    assert!(!stored.edited);
}

#[tokio::test]
async fn owner_edit_sets_edited_flag_and_keeps_references() {
    let fx = fixture();
    let ada = seed_user(&fx.users, "ada").await;

    let post = fx
        .content
        .create_post(ada.id, "Lost keys", "A set of keys by the fountain.", center())
        .await
        .unwrap();
    let updated = fx
        .content
        .update_post(ada.id, post.id, None, Some("Found them again, nevermind."))
        .await
        .unwrap();

    assert!(updated.edited);
    assert_eq!(updated.title, "Lost keys");
    assert_eq!(updated.author, ada.id);
    assert_eq!(updated.location, post.location);
}

#[tokio::test]
async fn feed_excludes_caller_and_far_posts() {
    let fx = fixture();
    let ada = seed_user(&fx.users, "ada").await;
    let bob = seed_user(&fx.users, "bob").await;

    // Bob: one nearby, one ~65 km away. Ada: nearby but hers.
    let near = fx
        .content
        .create_post(bob.id, "Nearby post", "Close to the query point.", center())
        .await
        .unwrap();
    let far_point = GeoPoint::new(13.4050, 53.1000).unwrap();
    fx.content
        .create_post(bob.id, "Far away post", "Well outside the radius.", far_point)
        .await
        .unwrap();
    fx.content
        .create_post(ada.id, "My own post", "Should never show up for me.", center())
        .await
        .unwrap();

    let page = fx
        .feed
        .nearby(ada.id, Some(13.4050), Some(52.5200), 1)
        .await
        .unwrap();

    assert_eq!(page.len(), 1);
    assert_eq!(page[0].post.id, near.id);
    for item in &page {
        assert_ne!(item.post.author, ada.id);
        assert!(center().distance_km(&item.post.location) <= 50.0);
    }
}

#[tokio::test]
async fn feed_requires_both_coordinates_and_valid_page() {
    let fx = fixture();
    let caller = Uuid::new_v4();

    let missing_lon = fx.feed.nearby(caller, None, Some(52.5), 1).await;
    assert!(matches!(
        missing_lon.unwrap_err(),
        DomainError::Validation { field: "longitude", .. }
    ));

    let missing_lat = fx.feed.nearby(caller, Some(13.4), None, 1).await;
    assert!(matches!(
        missing_lat.unwrap_err(),
        DomainError::Validation { field: "latitude", .. }
    ));

    let bad_page = fx.feed.nearby(caller, Some(13.4), Some(52.5), 0).await;
    assert!(matches!(
        bad_page.unwrap_err(),
        DomainError::Validation { field: "page", .. }
    ));

    // A page number so large the skip offset cannot be computed.
    let huge_page = fx.feed.nearby(caller, Some(13.4), Some(52.5), i64::MAX).await;
    assert!(matches!(
        huge_page.unwrap_err(),
        DomainError::Validation { field: "page", .. }
    ));
}

#[tokio::test]
async fn feed_pages_are_disjoint_and_nearest_first() {
    let fx = fixture();
    let ada = seed_user(&fx.users, "ada").await;
    let bob = seed_user(&fx.users, "bob").await;

    // Eight posts at increasing distance north of the center.
    for i in 0..8 {
        let point = GeoPoint::new(13.4050, 52.5200 + 0.02 * i as f64).unwrap();
        fx.content
            .create_post(bob.id, &format!("Post number {i}"), "Somewhere north of here.", point)
            .await
            .unwrap();
    }

    let page1 = fx
        .feed
        .nearby(ada.id, Some(13.4050), Some(52.5200), 1)
        .await
        .unwrap();
    let page2 = fx
        .feed
        .nearby(ada.id, Some(13.4050), Some(52.5200), 2)
        .await
        .unwrap();

    assert_eq!(page1.len(), 5);
    assert_eq!(page2.len(), 3);

    let ids1: Vec<Uuid> = page1.iter().map(|p| p.post.id).collect();
    let ids2: Vec<Uuid> = page2.iter().map(|p| p.post.id).collect();
    assert!(ids1.iter().all(|id| !ids2.contains(id)));

    let all: Vec<f64> = page1
        .iter()
        .chain(page2.iter())
        .map(|p| center().distance_km(&p.post.location))
        .collect();
    assert!(all.windows(2).all(|w| w[0] <= w[1]), "not nearest-first: {all:?}");
}

#[tokio::test]
async fn duplicate_username_rejected_first_record_intact() {
    let fx = fixture();
    seed_user(&fx.users, "ada").await;

    let clone = User::new("ada", "other@example.com", "digest2".to_string()).unwrap();
    let err = fx.users.insert(clone).await.unwrap_err();
    assert!(matches!(
        err,
        waypost_core::error::StoreError::Duplicate { ref field } if field == "username"
    ));

    let original = fx.users.find_by_username("ada").await.unwrap().unwrap();
    assert_eq!(original.email, "ada@example.com");
}

#[tokio::test]
async fn created_post_round_trips_through_fetch() {
    let fx = fixture();
    let ada = seed_user(&fx.users, "ada").await;

    let created = fx
        .content
        .create_post(ada.id, "Lost keys", "A set of keys by the fountain.", center())
        .await
        .unwrap();
    let fetched = fx.content.get_post(created.id).await.unwrap();

    assert_eq!(fetched.post.title, created.title);
    assert_eq!(fetched.post.description, created.description);
    assert_eq!(fetched.post.location, created.location);
    assert!(fetched.comments.is_empty());
}

#[tokio::test]
async fn hydrated_post_carries_comment_author_display_names() {
    let fx = fixture();
    let ada = seed_user(&fx.users, "ada").await;
    let bob = seed_user(&fx.users, "bob").await;

    let post = fx
        .content
        .create_post(ada.id, "Lost keys", "A set of keys by the fountain.", center())
        .await
        .unwrap();
    fx.content
        .create_comment(bob.id, post.id, "I saw them!")
        .await
        .unwrap();

    let fetched = fx.content.get_post(post.id).await.unwrap();
    assert_eq!(fetched.comments.len(), 1);
    assert_eq!(fetched.comments[0].author_username, "bob");
}

#[tokio::test]
async fn commented_posts_excludes_own_and_deleted_posts() {
    let fx = fixture();
    let ada = seed_user(&fx.users, "ada").await;
    let bob = seed_user(&fx.users, "bob").await;

    let own = fx
        .content
        .create_post(ada.id, "My own post", "Ada commenting on herself.", center())
        .await
        .unwrap();
    let bobs = fx
        .content
        .create_post(bob.id, "Bob's post", "Something bob has lost.", center())
        .await
        .unwrap();
    let doomed = fx
        .content
        .create_post(bob.id, "Doomed post", "Will be deleted shortly.", center())
        .await
        .unwrap();

    fx.content.create_comment(ada.id, own.id, "on my own").await.unwrap();
    fx.content.create_comment(ada.id, bobs.id, "on bob's").await.unwrap();
    fx.content.create_comment(ada.id, doomed.id, "on doomed").await.unwrap();
    fx.content.delete_post(bob.id, doomed.id).await.unwrap();

    let listed = fx.content.commented_posts(ada.id).await.unwrap();
    let ids: Vec<Uuid> = listed.iter().map(|p| p.post.id).collect();
    assert_eq!(ids, vec![bobs.id]);
}

#[tokio::test]
async fn commented_posts_follow_first_comment_order() {
    let fx = fixture();
    let ada = seed_user(&fx.users, "ada").await;
    let bob = seed_user(&fx.users, "bob").await;

    let first = fx
        .content
        .create_post(bob.id, "First post", "The one ada finds first.", center())
        .await
        .unwrap();
    let second = fx
        .content
        .create_post(bob.id, "Second post", "The one ada finds later.", center())
        .await
        .unwrap();

    // Ada comments on the second post first, then the first, then the
    // second again; the listing keeps first-comment order without dupes.
    fx.content.create_comment(ada.id, second.id, "saw this one").await.unwrap();
    fx.content.create_comment(ada.id, first.id, "then this one").await.unwrap();
    fx.content.create_comment(ada.id, second.id, "and back again").await.unwrap();

    let listed = fx.content.commented_posts(ada.id).await.unwrap();
    let ids: Vec<Uuid> = listed.iter().map(|p| p.post.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);
}

#[cfg(feature = "auth")]
mod account {
    use super::*;

    use waypost_core::services::AccountService;

    use crate::auth::{Argon2PasswordService, JwtConfig, JwtTokenService};

    fn account() -> (Arc<InMemoryUserStore>, AccountService) {
        let users = Arc::new(InMemoryUserStore::new());
        let tokens = Arc::new(JwtTokenService::new(JwtConfig {
            secret: "test-secret".to_string(),
            expiration_hours: 1,
            issuer: "test".to_string(),
        }));
        let passwords = Arc::new(Argon2PasswordService::new());
        let service = AccountService::new(users.clone(), tokens, passwords);
        (users, service)
    }

    #[tokio::test]
    async fn register_login_round_trip() {
        let (_, service) = account();
        let user = service
            .register("ada", "ada@example.com", "Sup3rSecret")
            .await
            .unwrap();

        let (logged_in, token) = service.login("ada@example.com", "Sup3rSecret").await.unwrap();
        assert_eq!(logged_in.id, user.id);
        assert!(!token.is_empty());

        let wrong = service.login("ada@example.com", "WrongPass1").await;
        assert!(matches!(wrong.unwrap_err(), DomainError::Unauthenticated));
    }

    #[tokio::test]
    async fn register_enforces_password_policy() {
        let (_, service) = account();
        let err = service
            .register("ada", "ada@example.com", "weakpass")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation { field: "password", .. }));
    }

    #[tokio::test]
    async fn duplicate_registration_is_a_duplicate_error() {
        let (_, service) = account();
        service
            .register("ada", "ada@example.com", "Sup3rSecret")
            .await
            .unwrap();

        let err = service
            .register("ada", "elsewhere@example.com", "Sup3rSecret")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Duplicate { ref field } if field == "username"));
    }

    #[tokio::test]
    async fn change_password_verifies_old_digest() {
        let (_, service) = account();
        let user = service
            .register("ada", "ada@example.com", "Sup3rSecret")
            .await
            .unwrap();

        let bad = service.change_password(user.id, "NotTheOld1", "NewSecret2").await;
        assert!(matches!(bad.unwrap_err(), DomainError::Unauthenticated));

        service
            .change_password(user.id, "Sup3rSecret", "NewSecret2")
            .await
            .unwrap();
        service.login("ada@example.com", "NewSecret2").await.unwrap();
    }

    #[tokio::test]
    async fn update_avatar_round_trip() {
        let (users, service) = account();
        let user = service
            .register("ada", "ada@example.com", "Sup3rSecret")
            .await
            .unwrap();

        let updated = service.update_avatar(user.id, "avatars/ada.png").await.unwrap();
        assert_eq!(updated.avatar.as_deref(), Some("avatars/ada.png"));

        let stored = users.find_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(stored.avatar.as_deref(), Some("avatars/ada.png"));
    }
}
