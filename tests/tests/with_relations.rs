use quire::{schema, stmt::Direction, Config, FindOptions};
use tests::{json, pluck, pretty_assertions::assert_eq, setup, setup_with};

fn by_id() -> FindOptions {
    FindOptions::new().order_by([("id", Direction::Asc)])
}

fn names(value: &serde_json::Value, field: &str) -> Vec<serde_json::Value> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|record| record[field].clone())
        .collect()
}

#[tokio::test]
async fn to_one_is_an_object() {
    let t = setup().await;

    let options = by_id()
        .columns([("views", true)])
        .with("author", FindOptions::new().columns([("name", true)]));
    let posts = t.db.find_many("posts", options).await.unwrap();

    assert_eq!(t.ops(), 2);
    assert_eq!(
        posts[0],
        *json!({ "id": 1, "views": 10, "author": { "id": 1, "name": "Ada" } })
            .as_object()
            .unwrap()
    );

    // Soft-deleted posts are still returned at the top level
    assert_eq!(posts[2]["author"]["name"], json!("Grace"));
}

#[tokio::test]
async fn to_one_filtered_out_is_null() {
    let t = setup().await;

    let author = FindOptions::new().filter(json!({ "name": "Ada" }));
    let posts = t
        .db
        .find_many("posts", by_id().with("author", author))
        .await
        .unwrap();

    assert_eq!(
        pluck(&posts, "author")
            .iter()
            .map(|author| !author.is_null())
            .collect::<Vec<_>>(),
        [true, true, false, false]
    );
}

#[tokio::test]
async fn to_many_is_an_array() {
    let t = setup().await;

    let options = by_id().with("posts", by_id().columns([("slug", true)]));
    let authors = t.db.find_many("authors", options).await.unwrap();

    assert_eq!(t.ops(), 2);
    assert_eq!(names(&authors[0]["posts"], "slug"), [json!("hello-world"), json!("rust-tips")]);

    // Soft-deleted posts are not related
    assert_eq!(names(&authors[1]["posts"], "slug"), [json!("graphs")]);
    assert_eq!(authors[2]["posts"], json!([]));
}

#[tokio::test]
async fn paging_applies_per_parent() {
    let t = setup().await;

    let posts = FindOptions::new()
        .order_by([("views", Direction::Desc)])
        .columns([("views", true)])
        .limit(1);
    let authors = t
        .db
        .find_many("authors", by_id().with("posts", posts))
        .await
        .unwrap();

    assert_eq!(names(&authors[0]["posts"], "id"), [json!(2)]);
    assert_eq!(names(&authors[1]["posts"], "id"), [json!(4)]);
    assert_eq!(authors[2]["posts"], json!([]));

    let posts = by_id().offset(1);
    let authors = t
        .db
        .find_many("authors", by_id().with("posts", posts))
        .await
        .unwrap();

    assert_eq!(names(&authors[0]["posts"], "id"), [json!(2)]);
    assert_eq!(authors[1]["posts"], json!([]));
}

#[tokio::test]
async fn child_filters() {
    let t = setup().await;

    let posts = by_id().filter(json!({ "views": { "gt": 20 } }));
    let authors = t
        .db
        .find_many("authors", by_id().with("posts", posts))
        .await
        .unwrap();

    assert_eq!(names(&authors[0]["posts"], "id"), [json!(2)]);
    assert_eq!(names(&authors[1]["posts"], "id"), [json!(4)]);
}

#[tokio::test]
async fn many_to_many_through_junction() {
    let t = setup().await;

    let options = by_id().with("tags", by_id());
    let posts = t.db.find_many("posts", options).await.unwrap();

    assert_eq!(t.ops(), 2);
    assert_eq!(names(&posts[0]["tags"], "name"), [json!("rust")]);
    assert_eq!(names(&posts[1]["tags"], "name"), [json!("rust"), json!("db")]);
    assert_eq!(posts[2]["tags"], json!([]));
    assert_eq!(names(&posts[3]["tags"], "name"), [json!("db")]);

    // Junction keys stay internal
    let tag = posts[1]["tags"][0].as_object().unwrap();
    assert_eq!(tag.keys().collect::<Vec<_>>(), ["id", "name", "_title"]);
}

#[tokio::test]
async fn nested_relations_and_locale_inheritance() {
    let t = setup().await;

    let posts = by_id()
        .columns([("title", true)])
        .with("tags", by_id().columns([("name", true)]));
    let options = by_id()
        .columns([("name", true)])
        .locale("de")
        .locale_fallback("en")
        .with("posts", posts);

    let authors = t.db.find_many("authors", options).await.unwrap();

    // One statement per level
    assert_eq!(t.ops(), 3);
    assert_eq!(
        authors[0]["posts"],
        json!([
            { "id": 1, "title": "Hallo", "tags": [{ "id": 1, "name": "rust" }] },
            {
                "id": 2,
                "title": "Rust tips",
                "tags": [{ "id": 1, "name": "rust" }, { "id": 2, "name": "db" }]
            },
        ])
    );
}

#[tokio::test]
async fn deserialized_with() {
    let t = setup().await;

    let options: FindOptions = serde_json::from_value(json!({
        "where": { "id": 4 },
        "columns": { "slug": true },
        "with": { "author": true, "tags": false },
        "locale": "fr",
    }))
    .unwrap();

    let posts = t.db.find_many("posts", options).await.unwrap();
    assert_eq!(posts[0]["author"]["name"], json!("Grace"));
    assert!(posts[0].get("tags").is_none());

    let nested = serde_json::from_value::<FindOptions>(json!({
        "with": { "author": { "locale": "de" } },
    }));
    assert!(nested.is_err());
}

#[tokio::test]
async fn same_shaped_relations_share_a_statement() {
    let mut builder = schema::Builder::new();
    builder
        .collection("authors", |c| {
            c.field("name");
            c.has_many("posts", "posts");
            c.has_many("drafts", "posts").pair("author");
        })
        .collection("posts", |c| {
            c.field("views");
            c.belongs_to("author", "authors");
        });

    let t = setup_with(builder, Config::default()).await;

    let options = by_id()
        .with("posts", by_id())
        .with("drafts", by_id());
    let authors = t.db.find_many("authors", options).await.unwrap();

    assert_eq!(t.ops(), 2);
    assert_eq!(authors[0]["posts"], authors[0]["drafts"]);
    assert_eq!(names(&authors[1]["drafts"], "id"), [json!(3), json!(4)]);
}

#[tokio::test]
async fn access_rules_keep_same_shaped_relations_apart() {
    let mut builder = schema::Builder::new();
    builder
        .collection("authors", |c| {
            c.field("name");
            c.has_many("posts", "posts");
            c.has_many("visible", "posts").pair("author");
        })
        .collection("posts", |c| {
            c.field("views");
            c.belongs_to("author", "authors");
        });

    let t = setup_with(builder, Config::default()).await;

    let visible = by_id().access(json!({ "views": { "gt": 20 } }));
    let options = by_id().with("posts", by_id()).with("visible", visible);
    let authors = t.db.find_many("authors", options).await.unwrap();

    assert_eq!(t.ops(), 3);
    assert_eq!(names(&authors[0]["posts"], "id"), [json!(1), json!(2)]);
    assert_eq!(names(&authors[0]["visible"], "id"), [json!(2)]);
    assert_eq!(names(&authors[1]["visible"], "id"), [json!(4)]);
}

#[tokio::test]
async fn fallback_locale_keeps_same_shaped_relations_apart() {
    let mut builder = schema::Builder::new();
    builder
        .collection("authors", |c| {
            c.field("name");
            c.has_many("posts", "posts");
            c.has_many("featured", "posts").pair("author");
        })
        .collection("posts", |c| {
            c.localized("title");
            c.belongs_to("author", "authors");
        });

    let t = setup_with(builder, Config::default()).await;

    let posts = by_id().columns([("title", true)]);
    let options = by_id()
        .filter(json!({ "id": 1 }))
        .locale("de")
        .with("posts", posts.clone())
        .with("featured", posts.locale_fallback("en"));
    let authors = t.db.find_many("authors", options).await.unwrap();

    assert_eq!(t.ops(), 3);
    assert_eq!(authors[0]["posts"][1]["title"], json!(null));
    assert_eq!(authors[0]["featured"][1]["title"], json!("Rust tips"));
}

#[tokio::test]
async fn unknown_relation() {
    let t = setup().await;

    let err = t
        .db
        .find_many("posts", FindOptions::new().with("comments", FindOptions::new()))
        .await
        .unwrap_err();
    assert!(err.is_unknown_relation());
    assert_eq!(t.ops(), 0);
}

#[tokio::test]
async fn load_depth_is_bounded() {
    let config = Config {
        max_relation_depth: 1,
        ..Config::default()
    };
    let t = setup_with(tests::blog_schema(), config).await;

    let posts = FindOptions::new().with("author", FindOptions::new());
    let err = t
        .db
        .find_many("authors", FindOptions::new().with("posts", posts))
        .await
        .unwrap_err();
    assert!(err.is_recursion_limit());
}
