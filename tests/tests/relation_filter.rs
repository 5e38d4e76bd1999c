use quire::{schema, stmt::Direction, Config, FindOptions};
use tests::{ids, json, pretty_assertions::assert_eq, setup, setup_with, TestDb};

async fn authors(t: &TestDb, filter: serde_json::Value) -> Vec<i64> {
    let options = FindOptions::new()
        .filter(filter)
        .order_by([("id", Direction::Asc)]);
    ids(&t.db.find_many("authors", options).await.unwrap())
}

async fn posts(t: &TestDb, filter: serde_json::Value) -> Vec<i64> {
    let options = FindOptions::new()
        .filter(filter)
        .order_by([("id", Direction::Asc)]);
    ids(&t.db.find_many("posts", options).await.unwrap())
}

#[tokio::test]
async fn some_and_none() {
    let t = setup().await;

    assert_eq!(
        authors(&t, json!({ "posts": { "some": { "views": { "gt": 20 } } } })).await,
        [1, 2]
    );
    assert_eq!(
        authors(&t, json!({ "posts": { "none": { "views": { "gt": 20 } } } })).await,
        [3]
    );

    // Bare filter on a to-many relation means `some`
    assert_eq!(
        authors(&t, json!({ "posts": { "views": { "gte": 100 } } })).await,
        [2]
    );
}

#[tokio::test]
async fn soft_deleted_rows_are_not_related() {
    let t = setup().await;

    // Post 3 is the only one with fewer than 8 views, and it is deleted
    assert_eq!(
        authors(&t, json!({ "posts": { "some": { "views": { "lt": 8 } } } })).await,
        Vec::<i64>::new()
    );
}

#[tokio::test]
async fn every_is_none_of_the_complement() {
    let t = setup().await;

    for inner in [
        json!({ "views": { "gte": 50 } }),
        json!({ "views": { "gte": 10 } }),
        json!({ "slug": { "contains": "-" } }),
    ] {
        let every = authors(&t, json!({ "posts": { "every": inner.clone() } })).await;
        let none_not = authors(&t, json!({ "posts": { "none": { "NOT": inner } } })).await;
        assert_eq!(every, none_not);
    }

    // Linus has no posts, so every filter holds for him
    assert_eq!(
        authors(&t, json!({ "posts": { "every": { "views": { "gte": 50 } } } })).await,
        [2, 3]
    );
}

#[tokio::test]
async fn empty_every_matches_all() {
    let t = setup().await;

    assert_eq!(
        authors(&t, json!({ "posts": { "every": {} } })).await,
        [1, 2, 3]
    );
}

#[tokio::test]
async fn to_one_is_and_is_not() {
    let t = setup().await;

    assert_eq!(
        posts(&t, json!({ "author": { "is": { "name": "Ada" } } })).await,
        [1, 2]
    );
    assert_eq!(
        posts(&t, json!({ "author": { "isNot": { "name": "Ada" } } })).await,
        [3, 4]
    );
    assert_eq!(
        posts(&t, json!({ "author": null })).await,
        Vec::<i64>::new()
    );
    assert_eq!(
        posts(&t, json!({ "author": { "isNot": null } })).await,
        [1, 2, 3, 4]
    );
}

#[tokio::test]
async fn many_to_many_through_junction() {
    let t = setup().await;

    assert_eq!(
        posts(&t, json!({ "tags": { "some": { "name": "db" } } })).await,
        [2, 4]
    );
    assert_eq!(
        posts(&t, json!({ "tags": { "none": {} } })).await,
        [3]
    );
}

#[tokio::test]
async fn nested_relations_and_localized_leaves() {
    let t = setup().await;

    let filter = json!({
        "posts": { "some": { "tags": { "some": { "name": "rust" } } } }
    });
    assert_eq!(authors(&t, filter).await, [1]);

    let filter = json!({ "posts": { "some": { "title": { "eq": "Graphs" } } } });
    assert_eq!(authors(&t, filter).await, [2]);
}

#[tokio::test]
async fn quantifier_must_fit_the_relation() {
    let t = setup().await;

    let options = FindOptions::new().filter(json!({ "posts": { "is": { "views": 1 } } }));
    let err = t.db.find_many("authors", options).await.unwrap_err();
    assert!(err.is_invalid_filter());
    assert!(err.is_validation());
}

#[tokio::test]
async fn relation_depth_is_bounded() {
    let config = Config {
        max_relation_depth: 1,
        ..Config::default()
    };
    let t = setup_with(tests::blog_schema(), config).await;

    let filter = json!({ "posts": { "some": { "author": { "is": { "name": "Ada" } } } } });
    let err = t
        .db
        .find_many("authors", FindOptions::new().filter(filter))
        .await
        .unwrap_err();
    assert!(err.is_recursion_limit());
}

#[tokio::test]
async fn incomplete_relation_is_ignored() {
    let mut builder = tests::blog_schema();
    builder.collection("notes", |c| {
        c.field("body");
    });
    builder.collection("drafts", |c| {
        // No keys and no `belongs_to` on `notes` to pair with
        c.has_many("notes", "notes");
        c.table("authors");
    });

    let t = setup_with(builder, Config::default()).await;

    let options = FindOptions::new()
        .filter(json!({ "notes": { "some": { "body": "x" } } }))
        .order_by([("id", Direction::Asc)]);
    let drafts = t.db.find_many("drafts", options).await.unwrap();
    assert_eq!(ids(&drafts), [1, 2, 3]);
}

#[test]
fn incomplete_relation_fails_strict_schemas() {
    let mut builder = schema::Builder::new();
    builder
        .collection("notes", |c| {
            c.field("body");
        })
        .collection("drafts", |c| {
            c.has_many("notes", "notes");
        });

    let config = Config {
        strict_relations: true,
        ..Config::default()
    };

    let err = quire::Db::builder()
        .schema_builder(builder)
        .config(config)
        .build(quire_driver_sqlite::Sqlite::in_memory().unwrap())
        .unwrap_err();
    assert!(err.is_invalid_schema());
}
