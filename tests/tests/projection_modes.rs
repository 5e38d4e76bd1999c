use quire::{stmt::Direction, FindOptions, Record};
use tests::{json, pretty_assertions::assert_eq, setup};

fn keys(record: &Record) -> Vec<&str> {
    record.keys().map(String::as_str).collect()
}

fn by_id() -> FindOptions {
    FindOptions::new().order_by([("id", Direction::Asc)])
}

#[tokio::test]
async fn all_fields_by_default() {
    let t = setup().await;

    let authors = t.db.find_many("authors", by_id()).await.unwrap();
    assert_eq!(keys(&authors[0]), ["id", "name", "bio", "_title"]);
    assert_eq!(authors[0]["_title"], json!("Ada"));
    assert_eq!(authors[2]["bio"], json!(null));
}

#[tokio::test]
async fn inclusion_mode() {
    let t = setup().await;

    let authors = t
        .db
        .find_many("authors", by_id().columns([("name", true)]))
        .await
        .unwrap();

    assert_eq!(keys(&authors[0]), ["id", "name"]);
    assert_eq!(authors[1], *json!({ "id": 2, "name": "Grace" }).as_object().unwrap());
}

#[tokio::test]
async fn exclusion_mode() {
    let t = setup().await;

    let authors = t
        .db
        .find_many("authors", by_id().columns([("name", false)]))
        .await
        .unwrap();

    assert_eq!(keys(&authors[0]), ["id", "bio"]);
}

#[tokio::test]
async fn primary_key_cannot_be_excluded() {
    let t = setup().await;

    let authors = t
        .db
        .find_many("authors", by_id().columns([("id", false), ("bio", false)]))
        .await
        .unwrap();

    assert_eq!(keys(&authors[0]), ["id", "name"]);
}

#[tokio::test]
async fn title_on_request() {
    let t = setup().await;

    let posts = t
        .db
        .find_many(
            "posts",
            by_id().columns([("views", true), ("_title", true)]),
        )
        .await
        .unwrap();

    assert_eq!(keys(&posts[0]), ["id", "views", "_title"]);
    assert_eq!(posts[0]["_title"], json!("Hello"));
}

#[tokio::test]
async fn localized_fields_are_returned_under_their_own_name() {
    let t = setup().await;

    let posts = t
        .db
        .find_many(
            "posts",
            by_id().columns([("title", true)]).locale("de").locale_fallback("en"),
        )
        .await
        .unwrap();

    assert_eq!(keys(&posts[0]), ["id", "title"]);
    assert_eq!(posts[0]["title"], json!("Hallo"));
}

#[tokio::test]
async fn deserialized_request() {
    let t = setup().await;

    let options: FindOptions = serde_json::from_value(json!({
        "where": { "views": { "gte": 50 } },
        "orderBy": { "views": "desc" },
        "columns": { "slug": true },
        "limit": 1,
    }))
    .unwrap();

    let posts = t.db.find_many("posts", options).await.unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0], *json!({ "id": 4, "slug": "graphs" }).as_object().unwrap());
}

#[tokio::test]
async fn paging() {
    let t = setup().await;

    let posts = t
        .db
        .find_many("posts", by_id().columns([("slug", true)]).limit(2).offset(1))
        .await
        .unwrap();

    assert_eq!(
        posts.iter().map(|post| post["id"].clone()).collect::<Vec<_>>(),
        [json!(2), json!(3)]
    );
}
