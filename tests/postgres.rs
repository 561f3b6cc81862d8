//! Integration tests against a real PostgreSQL instance.
//!
//! These exercise the relationship, feed and listing queries end to
//! end. They are ignored by default so the suite passes without a
//! database; run them with:
//!
//! ```text
//! DATABASE_URL=postgres://localhost/ripple_test cargo test -- --ignored
//! ```
#![allow(clippy::unwrap_used, clippy::expect_used)]

use ripple::database::MIGRATOR;
use ripple::schema::comment::WriteError;
use ripple::schema::follow::FollowError;
use ripple::schema::like::LikeError;
use ripple::schema::post::{NewPost, UpdatePost};
use ripple::schema::user::NewUser;
use ripple::schema::{Comment, Follow, Like, Post, User};
use ripple::types::id::CommentId;

use sqlx::Connection as _;
use sqlx::PgConnection;
use std::time::{SystemTime, UNIX_EPOCH};

async fn connect() -> PgConnection {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for postgres tests");
    let mut conn = PgConnection::connect(&url).await.expect("could not connect to postgres");
    MIGRATOR.run(&mut conn).await.expect("could not run migrations");
    conn
}

/// Every test works on its own rows, keyed by a unique suffix, so the
/// tests can share one database without stepping on each other.
fn unique(prefix: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before unix epoch")
        .as_nanos();
    format!("{prefix}{nanos}")
}

async fn generate_user(conn: &mut PgConnection, prefix: &str) -> User {
    let username = unique(prefix);
    User::create(
        conn,
        NewUser {
            username: &username,
            email: &format!("{username}@example.com"),
            password_hash: "!",
            full_name: prefix,
        },
    )
    .await
    .expect("could not insert user")
}

async fn generate_post(conn: &mut PgConnection, author: &User, content: &str) -> Post {
    Post::create(
        conn,
        NewPost {
            author_id: author.id,
            content,
            media_url: None,
            comments_enabled: true,
        },
    )
    .await
    .expect("could not insert post")
}

#[tokio::test]
#[ignore = "requires a PostgreSQL database"]
async fn follow_twice_leaves_exactly_one_edge() {
    let mut conn = connect().await;
    let alice = generate_user(&mut conn, "alice").await;
    let bob = generate_user(&mut conn, "bob").await;

    Follow::create(&mut conn, alice.id, bob.id).await.unwrap();
    Follow::create(&mut conn, alice.id, bob.id).await.unwrap();

    let counts = Follow::counts(&mut conn, alice.id).await.unwrap();
    assert_eq!(counts.following_count, 1);
    assert_eq!(counts.follower_count, 0);

    let counts = Follow::counts(&mut conn, bob.id).await.unwrap();
    assert_eq!(counts.following_count, 0);
    assert_eq!(counts.follower_count, 1);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL database"]
async fn self_follow_always_fails() {
    let mut conn = connect().await;
    let alice = generate_user(&mut conn, "alice").await;

    let error = Follow::create(&mut conn, alice.id, alice.id).await.unwrap_err();
    assert!(matches!(error.current_context(), FollowError::SelfFollow));

    let counts = Follow::counts(&mut conn, alice.id).await.unwrap();
    assert_eq!(counts.following_count, 0);
    assert_eq!(counts.follower_count, 0);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL database"]
async fn unfollow_reports_whether_an_edge_was_removed() {
    let mut conn = connect().await;
    let alice = generate_user(&mut conn, "alice").await;
    let bob = generate_user(&mut conn, "bob").await;

    assert!(!Follow::remove(&mut conn, alice.id, bob.id).await.unwrap());

    Follow::create(&mut conn, alice.id, bob.id).await.unwrap();
    assert!(Follow::remove(&mut conn, alice.id, bob.id).await.unwrap());
    assert!(!Follow::remove(&mut conn, alice.id, bob.id).await.unwrap());
}

#[tokio::test]
#[ignore = "requires a PostgreSQL database"]
async fn follow_listings_are_ordered_by_username() {
    let mut conn = connect().await;
    let alice = generate_user(&mut conn, "alice").await;
    // insertion order deliberately differs from username order
    let caryl = generate_user(&mut conn, "zz-caryl").await;
    let bob = generate_user(&mut conn, "aa-bob").await;

    Follow::create(&mut conn, alice.id, caryl.id).await.unwrap();
    Follow::create(&mut conn, alice.id, bob.id).await.unwrap();

    let following = Follow::list_following(&mut conn, alice.id, 20, 0).await.unwrap();
    let usernames = following.iter().map(|u| u.username.as_str()).collect::<Vec<_>>();
    assert_eq!(usernames, vec![bob.username.as_str(), caryl.username.as_str()]);

    let followers = Follow::list_followers(&mut conn, bob.id, 20, 0).await.unwrap();
    assert_eq!(followers.len(), 1);
    assert_eq!(followers[0].id, alice.id);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL database"]
async fn like_twice_fails_until_unliked() {
    let mut conn = connect().await;
    let alice = generate_user(&mut conn, "alice").await;
    let bob = generate_user(&mut conn, "bob").await;
    let post = generate_post(&mut conn, &bob, "Hello, World!").await;

    Like::create(&mut conn, alice.id, post.id).await.unwrap();

    let error = Like::create(&mut conn, alice.id, post.id).await.unwrap_err();
    assert!(matches!(error.current_context(), LikeError::AlreadyLiked));

    assert!(Like::remove(&mut conn, alice.id, post.id).await.unwrap());
    Like::create(&mut conn, alice.id, post.id).await.unwrap();
    assert!(Like::exists(&mut conn, alice.id, post.id).await.unwrap());
}

#[tokio::test]
#[ignore = "requires a PostgreSQL database"]
async fn likes_for_post_are_ordered_by_like_time() {
    let mut conn = connect().await;
    let alice = generate_user(&mut conn, "alice").await;
    let bob = generate_user(&mut conn, "bob").await;
    let caryl = generate_user(&mut conn, "caryl").await;
    let post = generate_post(&mut conn, &alice, "Hello, World!").await;

    Like::create(&mut conn, bob.id, post.id).await.unwrap();
    Like::create(&mut conn, caryl.id, post.id).await.unwrap();

    let likes = Like::list_for_post(&mut conn, post.id).await.unwrap();
    let user_ids = likes.iter().map(|l| l.user_id).collect::<Vec<_>>();
    assert_eq!(user_ids, vec![bob.id, caryl.id]);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL database"]
async fn liked_posts_exclude_tombstones() {
    let mut conn = connect().await;
    let alice = generate_user(&mut conn, "alice").await;
    let bob = generate_user(&mut conn, "bob").await;
    let keep = generate_post(&mut conn, &bob, "kept post").await;
    let gone = generate_post(&mut conn, &bob, "deleted post").await;

    Like::create(&mut conn, alice.id, keep.id).await.unwrap();
    Like::create(&mut conn, alice.id, gone.id).await.unwrap();

    assert!(Post::soft_delete(&mut conn, gone.id, bob.id).await.unwrap());

    let liked = Like::list_posts_liked_by(&mut conn, alice.id).await.unwrap();
    let post_ids = liked.iter().map(|p| p.id).collect::<Vec<_>>();
    assert_eq!(post_ids, vec![keep.id]);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL database"]
async fn feed_only_contains_followed_authors_newest_first() {
    let mut conn = connect().await;
    let alice = generate_user(&mut conn, "alice").await;
    let bob = generate_user(&mut conn, "bob").await;
    let stranger = generate_user(&mut conn, "stranger").await;

    Follow::create(&mut conn, alice.id, bob.id).await.unwrap();

    let bob_post_1 = generate_post(&mut conn, &bob, "first").await;
    let bob_post_2 = generate_post(&mut conn, &bob, "second").await;
    // newer than both of Bob's, but Alice does not follow the author
    let _stranger_post = generate_post(&mut conn, &stranger, "unrelated").await;

    let feed = Post::list_feed(&mut conn, alice.id, 20, 0).await.unwrap();
    let post_ids = feed.iter().map(|p| p.id).collect::<Vec<_>>();
    assert_eq!(post_ids, vec![bob_post_2.id, bob_post_1.id]);

    // tombstoned posts drop out of the feed
    assert!(Post::soft_delete(&mut conn, bob_post_2.id, bob.id).await.unwrap());
    let feed = Post::list_feed(&mut conn, alice.id, 20, 0).await.unwrap();
    let post_ids = feed.iter().map(|p| p.id).collect::<Vec<_>>();
    assert_eq!(post_ids, vec![bob_post_1.id]);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL database"]
async fn deleting_a_post_hides_it_but_keeps_the_row() {
    let mut conn = connect().await;
    let alice = generate_user(&mut conn, "alice").await;
    let marker = unique("tombstone-marker-");
    let post = generate_post(&mut conn, &alice, &marker).await;

    assert!(Post::soft_delete(&mut conn, post.id, alice.id).await.unwrap());

    assert!(Post::by_id(&mut conn, post.id).await.unwrap().is_none());
    assert!(Post::list_by_author(&mut conn, alice.id, 20, 0).await.unwrap().is_empty());
    assert!(Post::search(&mut conn, &marker, 20, 0).await.unwrap().is_empty());

    // ... but the tombstoned row is still there when inspected directly
    let is_deleted =
        sqlx::query_scalar::<_, bool>("SELECT is_deleted FROM posts WHERE id = $1")
            .bind(post.id)
            .fetch_one(&mut conn)
            .await
            .unwrap();
    assert!(is_deleted);

    // deleting twice reports failure, it is no longer "live"
    assert!(!Post::soft_delete(&mut conn, post.id, alice.id).await.unwrap());
}

#[tokio::test]
#[ignore = "requires a PostgreSQL database"]
async fn post_mutations_by_non_owner_never_succeed() {
    let mut conn = connect().await;
    let alice = generate_user(&mut conn, "alice").await;
    let mallory = generate_user(&mut conn, "mallory").await;
    let post = generate_post(&mut conn, &alice, "mine").await;

    let update = Post::update(
        &mut conn,
        post.id,
        mallory.id,
        UpdatePost { content: Some("stolen"), ..Default::default() },
    )
    .await
    .unwrap();
    assert!(update.is_none());

    assert!(!Post::soft_delete(&mut conn, post.id, mallory.id).await.unwrap());

    // the post is untouched
    let view = Post::by_id(&mut conn, post.id).await.unwrap().unwrap();
    assert_eq!(view.content, "mine");
}

#[tokio::test]
#[ignore = "requires a PostgreSQL database"]
async fn comment_mutations_distinguish_not_found_from_not_owner() {
    let mut conn = connect().await;
    let alice = generate_user(&mut conn, "alice").await;
    let mallory = generate_user(&mut conn, "mallory").await;
    let post = generate_post(&mut conn, &alice, "Hello, World!").await;
    let comment = Comment::create(&mut conn, post.id, alice.id, "first!").await.unwrap();

    let error = Comment::update(&mut conn, comment.id, mallory.id, "hijacked")
        .await
        .unwrap_err();
    assert!(matches!(error.current_context(), WriteError::NotOwner));

    let error = Comment::remove(&mut conn, comment.id, mallory.id).await.unwrap_err();
    assert!(matches!(error.current_context(), WriteError::NotOwner));

    let missing = CommentId::new(u64::from(u32::MAX));
    let error = Comment::update(&mut conn, missing, alice.id, "?").await.unwrap_err();
    assert!(matches!(error.current_context(), WriteError::NotFound));

    // the owner can do both
    let updated = Comment::update(&mut conn, comment.id, alice.id, "edited").await.unwrap();
    assert_eq!(updated.content, "edited");
    assert!(updated.updated_at.is_some());
    assert!(Comment::remove(&mut conn, comment.id, alice.id).await.unwrap());
}

#[tokio::test]
#[ignore = "requires a PostgreSQL database"]
async fn comments_list_in_thread_order() {
    let mut conn = connect().await;
    let alice = generate_user(&mut conn, "alice").await;
    let post = generate_post(&mut conn, &alice, "Hello, World!").await;

    let first = Comment::create(&mut conn, post.id, alice.id, "first").await.unwrap();
    let second = Comment::create(&mut conn, post.id, alice.id, "second").await.unwrap();

    let comments = Comment::list_for_post(&mut conn, post.id, 20, 0).await.unwrap();
    let ids = comments.iter().map(|c| c.id).collect::<Vec<_>>();
    assert_eq!(ids, vec![first.id, second.id]);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL database"]
async fn author_listing_paginates_with_limit_and_offset() {
    let mut conn = connect().await;
    let alice = generate_user(&mut conn, "alice").await;

    for n in 0..25 {
        generate_post(&mut conn, &alice, &format!("post #{n}")).await;
    }

    let page_1 = Post::list_by_author(&mut conn, alice.id, 20, 0).await.unwrap();
    assert_eq!(page_1.len(), 20);

    let page_2 = Post::list_by_author(&mut conn, alice.id, 20, 20).await.unwrap();
    assert_eq!(page_2.len(), 5);

    // newest first across the page boundary
    assert_eq!(page_1[0].content, "post #24");
    assert_eq!(page_2[4].content, "post #0");
}

#[tokio::test]
#[ignore = "requires a PostgreSQL database"]
async fn search_matches_substrings_case_insensitively() {
    let mut conn = connect().await;
    let alice = generate_user(&mut conn, "alice").await;
    let marker = unique("sEaRcHaBlE");

    let post = generate_post(&mut conn, &alice, &format!("something {marker} here")).await;
    generate_post(&mut conn, &alice, "unrelated content").await;

    let found = Post::search(&mut conn, &marker.to_lowercase(), 20, 0).await.unwrap();
    let ids = found.iter().map(|p| p.id).collect::<Vec<_>>();
    assert_eq!(ids, vec![post.id]);

    // wildcard characters in the query match literally
    assert!(Post::search(&mut conn, "%{nothing}%", 20, 0).await.unwrap().is_empty());

    // the empty query is an unfiltered recency-ordered listing
    let everything = Post::search(&mut conn, "", 2, 0).await.unwrap();
    assert_eq!(everything.len(), 2);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL database"]
async fn user_search_and_profile_counts() {
    let mut conn = connect().await;
    let marker = unique("Findable");
    let username = format!("{}-user", marker.to_lowercase());

    let target = User::create(
        &mut conn,
        NewUser {
            username: &username,
            email: &format!("{username}@example.com"),
            password_hash: "!",
            full_name: &format!("{marker} Person"),
        },
    )
    .await
    .unwrap();

    let follower = generate_user(&mut conn, "follower").await;
    Follow::create(&mut conn, follower.id, target.id).await.unwrap();

    // matches against the full name, case-insensitively
    let results = User::search_by_name(&mut conn, &marker.to_uppercase(), 20, 0).await.unwrap();
    assert!(results.iter().any(|u| u.id == target.id));

    let profile = User::profile(&mut conn, target.id).await.unwrap().unwrap();
    assert_eq!(profile.follower_count, 1);
    assert_eq!(profile.following_count, 0);
}
