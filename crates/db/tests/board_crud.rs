//! Integration tests for the owner-scoped board repository.
//!
//! Exercises the repository layer against a real database:
//! - Creation defaults
//! - Partial updates (absent vs. cleared nullable columns)
//! - Owner scoping on every operation
//! - Recency ordering of the list
//! - Idempotent delete

use inkboard_core::board::{BoardPatch, DEFAULT_TITLE, EMPTY_ELEMENTS, EMPTY_VIEW_STATE};
use inkboard_core::types::BoardId;
use inkboard_db::repositories::BoardRepo;
use sqlx::PgPool;

const ALICE: &str = "user-alice";
const BOB: &str = "user-bob";

// ---------------------------------------------------------------------------
// Test: Create applies defaults
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_applies_defaults(pool: PgPool) {
    let board = BoardRepo::create(&pool, ALICE, None).await.unwrap();

    assert_eq!(board.owner_id, ALICE);
    assert_eq!(board.title, DEFAULT_TITLE);
    assert_eq!(board.elements, EMPTY_ELEMENTS);
    assert_eq!(board.view_state, EMPTY_VIEW_STATE);
    assert!(board.file_blobs.is_none());
    assert!(board.thumbnail.is_none());
    assert_eq!(board.created_at, board.updated_at);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_with_title(pool: PgPool) {
    let board = BoardRepo::create(&pool, ALICE, Some("Roadmap")).await.unwrap();
    assert_eq!(board.title, "Roadmap");
}

// ---------------------------------------------------------------------------
// Test: Partial update
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_only_touches_provided_fields(pool: PgPool) {
    let board = BoardRepo::create(&pool, ALICE, Some("Sketch")).await.unwrap();

    let patch = BoardPatch::content(
        r#"[{"id":"r1","type":"rectangle"}]"#.to_string(),
        r##"{"viewBackgroundColor":"#fafafa"}"##.to_string(),
        Some(r#"{"f1":{}}"#.to_string()),
    );
    let updated = BoardRepo::update(&pool, board.id, ALICE, &patch)
        .await
        .unwrap()
        .expect("owned board should update");

    assert_eq!(updated.title, "Sketch");
    assert_eq!(updated.elements, r#"[{"id":"r1","type":"rectangle"}]"#);
    assert_eq!(updated.view_state, r##"{"viewBackgroundColor":"#fafafa"}"##);
    assert_eq!(updated.file_blobs.as_deref(), Some(r#"{"f1":{}}"#));
    assert!(updated.updated_at > board.updated_at);

    // Renaming leaves the content alone.
    let renamed = BoardRepo::update(&pool, board.id, ALICE, &BoardPatch::title("Final"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(renamed.title, "Final");
    assert_eq!(renamed.elements, updated.elements);
    assert_eq!(renamed.file_blobs, updated.file_blobs);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_can_clear_nullable_columns(pool: PgPool) {
    let board = BoardRepo::create(&pool, ALICE, None).await.unwrap();
    let with_files = BoardPatch {
        file_blobs: Some(Some("{}".to_string())),
        thumbnail: Some(Some("data:image/png;base64,AA".to_string())),
        ..BoardPatch::default()
    };
    BoardRepo::update(&pool, board.id, ALICE, &with_files)
        .await
        .unwrap()
        .unwrap();

    let clear_files = BoardPatch {
        file_blobs: Some(None),
        ..BoardPatch::default()
    };
    let cleared = BoardRepo::update(&pool, board.id, ALICE, &clear_files)
        .await
        .unwrap()
        .unwrap();

    assert!(cleared.file_blobs.is_none());
    assert_eq!(cleared.thumbnail.as_deref(), Some("data:image/png;base64,AA"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_empty_update_is_noop(pool: PgPool) {
    let board = BoardRepo::create(&pool, ALICE, None).await.unwrap();

    let same = BoardRepo::update(&pool, board.id, ALICE, &BoardPatch::default())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(same, board);
}

// ---------------------------------------------------------------------------
// Test: Owner scoping
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_foreign_board_is_invisible(pool: PgPool) {
    let board = BoardRepo::create(&pool, ALICE, Some("Private")).await.unwrap();

    assert!(BoardRepo::find_by_id(&pool, board.id, BOB)
        .await
        .unwrap()
        .is_none());

    let hijack = BoardRepo::update(&pool, board.id, BOB, &BoardPatch::title("Mine now"))
        .await
        .unwrap();
    assert!(hijack.is_none());

    assert!(!BoardRepo::delete(&pool, board.id, BOB).await.unwrap());

    let untouched = BoardRepo::find_by_id(&pool, board.id, ALICE)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(untouched.title, "Private");

    assert!(BoardRepo::list(&pool, BOB).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_missing_board_is_none(pool: PgPool) {
    let found = BoardRepo::find_by_id(&pool, BoardId::now_v7(), ALICE)
        .await
        .unwrap();
    assert!(found.is_none());
}

// ---------------------------------------------------------------------------
// Test: List ordering
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_orders_by_recency(pool: PgPool) {
    let first = BoardRepo::create(&pool, ALICE, Some("First")).await.unwrap();
    let second = BoardRepo::create(&pool, ALICE, Some("Second")).await.unwrap();
    BoardRepo::create(&pool, BOB, Some("Other owner")).await.unwrap();

    // Touch the older board so it becomes the most recent.
    BoardRepo::update(&pool, first.id, ALICE, &BoardPatch::title("First, edited"))
        .await
        .unwrap()
        .unwrap();

    let list = BoardRepo::list(&pool, ALICE).await.unwrap();
    let ids: Vec<BoardId> = list.iter().map(|b| b.id).collect();
    assert_eq!(ids, vec![first.id, second.id]);
    assert_eq!(list[0].title, "First, edited");
}

// ---------------------------------------------------------------------------
// Test: Delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_is_idempotent(pool: PgPool) {
    let board = BoardRepo::create(&pool, ALICE, None).await.unwrap();

    assert!(BoardRepo::delete(&pool, board.id, ALICE).await.unwrap());
    assert!(!BoardRepo::delete(&pool, board.id, ALICE).await.unwrap());
    assert!(BoardRepo::find_by_id(&pool, board.id, ALICE)
        .await
        .unwrap()
        .is_none());
}
