use quire::{stmt::Direction, FindOptions};
use tests::{ids, json, pluck, pretty_assertions::assert_eq, setup, TestDb};

async fn matching(t: &TestDb, filter: serde_json::Value) -> Vec<i64> {
    let options = FindOptions::new()
        .filter(filter)
        .order_by([("id", Direction::Asc)]);
    ids(&t.db.find_many("posts", options).await.unwrap())
}

#[tokio::test]
async fn empty_groups_match_everything() {
    let t = setup().await;

    for filter in [
        json!({}),
        json!(null),
        json!({ "AND": [] }),
        json!({ "OR": [] }),
        json!({ "AND": [{}, { "OR": [] }] }),
    ] {
        assert_eq!(matching(&t, filter.clone()).await, [1, 2, 3, 4], "filter={filter}");
    }
}

#[tokio::test]
async fn boolean_groups() {
    let t = setup().await;

    let filter = json!({
        "OR": [
            { "views": { "lt": 8 } },
            { "slug": "graphs" },
        ]
    });
    assert_eq!(matching(&t, filter).await, [3, 4]);

    let filter = json!({
        "AND": [
            { "views": { "gte": 10 } },
            { "NOT": { "slug": "graphs" } },
        ]
    });
    assert_eq!(matching(&t, filter).await, [1, 2]);

    // Sibling keys are ANDed
    let filter = json!({ "views": { "gt": 5 }, "slug": { "endsWith": "s" } });
    assert_eq!(matching(&t, filter).await, [2, 4]);
}

#[tokio::test]
async fn comparison_and_list_operators() {
    let t = setup().await;

    assert_eq!(matching(&t, json!({ "views": { "in": [10, 100] } })).await, [1, 4]);
    assert_eq!(matching(&t, json!({ "views": { "notIn": [10, 100] } })).await, [2, 3]);
    assert_eq!(matching(&t, json!({ "views": { "ne": 50 } })).await, [1, 3, 4]);
    assert_eq!(
        matching(&t, json!({ "views": { "gte": 10, "lte": 50 } })).await,
        [1, 2]
    );
    assert_eq!(matching(&t, json!({ "slug": "rust-tips" })).await, [2]);
}

#[tokio::test]
async fn pattern_operators() {
    let t = setup().await;

    assert_eq!(matching(&t, json!({ "slug": { "contains": "TIPS" } })).await, [2]);
    assert_eq!(matching(&t, json!({ "slug": { "startsWith": "dr" } })).await, [3]);

    // Wildcards in the needle are matched literally
    assert_eq!(
        matching(&t, json!({ "slug": { "contains": "_" } })).await,
        Vec::<i64>::new()
    );

    assert_eq!(matching(&t, json!({ "slug": { "like": "%-%" } })).await, [1, 2, 3]);
    assert_eq!(matching(&t, json!({ "slug": { "notLike": "%-%" } })).await, [4]);

    // `like` respects case; `ilike` does not
    assert_eq!(
        matching(&t, json!({ "slug": { "like": "HELLO%" } })).await,
        Vec::<i64>::new()
    );
    assert_eq!(matching(&t, json!({ "slug": { "notLike": "GRAPHS" } })).await, [1, 2, 3, 4]);
    assert_eq!(matching(&t, json!({ "slug": { "ilike": "HELLO%" } })).await, [1]);
    assert_eq!(matching(&t, json!({ "slug": { "notIlike": "GRAPHS" } })).await, [1, 2, 3]);
}

#[tokio::test]
async fn null_checks() {
    let t = setup().await;

    assert_eq!(matching(&t, json!({ "meta": null })).await, [2, 3, 4]);
    assert_eq!(matching(&t, json!({ "meta": { "isNull": false } })).await, [1]);
    assert_eq!(matching(&t, json!({ "meta": { "ne": null } })).await, [1]);
}

#[tokio::test]
async fn unusable_operators_are_ignored() {
    let t = setup().await;

    assert_eq!(
        matching(&t, json!({ "views": { "between": [1, 2] } })).await,
        [1, 2, 3, 4]
    );
    assert_eq!(matching(&t, json!({ "views": { "gt": null } })).await, [1, 2, 3, 4]);
    assert_eq!(matching(&t, json!({ "views": { "in": 10 } })).await, [1, 2, 3, 4]);
}

#[tokio::test]
async fn virtual_fields_are_computed_in_sql() {
    let t = setup().await;

    // LENGTH(slug): 11, 9, 11, 6
    assert_eq!(matching(&t, json!({ "readingTime": { "gt": 9 } })).await, [1, 3]);

    let options = FindOptions::new()
        .order_by([("readingTime", Direction::Asc), ("id", Direction::Asc)])
        .columns([("readingTime", true)]);
    let posts = t.db.find_many("posts", options).await.unwrap();
    assert_eq!(ids(&posts), [4, 2, 1, 3]);
    assert_eq!(pluck(&posts, "readingTime"), [json!(6), json!(9), json!(11), json!(11)]);
}

#[tokio::test]
async fn opaque_virtual_fields() {
    let t = setup().await;

    let options = FindOptions::new().filter(json!({ "popular": true }));
    let err = t.db.find_many("posts", options).await.unwrap_err();
    assert!(err.is_non_queryable_field());
    assert!(err.is_validation());

    // Ordering on it is skipped rather than rejected
    let options =
        FindOptions::new().order_by([("popular", Direction::Desc), ("id", Direction::Desc)]);
    let posts = t.db.find_many("posts", options).await.unwrap();
    assert_eq!(ids(&posts), [4, 3, 2, 1]);
    assert!(!t.last_sql().contains("popular"));

    // Selected as null, for the caller to fill in
    let posts = t.db.find_many("posts", FindOptions::new()).await.unwrap();
    assert!(posts.iter().all(|post| post.get("popular") == Some(&json!(null))));
}

#[tokio::test]
async fn unknown_names() {
    let t = setup().await;

    let options = FindOptions::new().filter(json!({ "nope": 1 }));
    let err = t.db.find_many("posts", options).await.unwrap_err();
    assert!(err.is_field_not_found());
    assert!(err.is_validation());

    let options = FindOptions::new().filter(json!({ "comments": { "some": {} } }));
    let err = t.db.find_many("posts", options).await.unwrap_err();
    assert!(err.is_unknown_relation());

    let err = t.db.find_many("comments", FindOptions::new()).await.unwrap_err();
    assert!(err.is_invalid_filter());
}

#[tokio::test]
async fn malformed_trees_and_unresolved_ordering() {
    let t = setup().await;

    for filter in [
        json!([{ "views": 1 }]),
        json!({ "AND": { "views": 1 } }),
        json!({ "NOT": [{ "views": 1 }] }),
        json!({ "author": 1 }),
    ] {
        let options = FindOptions::new().filter(filter.clone());
        let err = t.db.find_many("posts", options).await.unwrap_err();
        assert!(err.is_invalid_filter(), "filter={filter} err={err}");
    }

    let options =
        FindOptions::new().order_by([("author", Direction::Asc), ("nope", Direction::Asc)]);
    let posts = t.db.find_many("posts", options).await.unwrap();
    assert_eq!(posts.len(), 4);
    assert!(!t.last_sql().contains("ORDER BY"));
}

#[tokio::test]
async fn access_fragment_is_anded() {
    let t = setup().await;

    let options = FindOptions::new()
        .filter(json!({ "views": { "lt": 100 } }))
        .access(json!({ "views": { "gte": 50 } }));
    assert_eq!(ids(&t.db.find_many("posts", options).await.unwrap()), [2]);

    let options = FindOptions::new()
        .access(json!({ "author": { "is": { "name": "Grace" } } }))
        .order_by([("id", Direction::Asc)]);
    assert_eq!(ids(&t.db.find_many("posts", options).await.unwrap()), [3, 4]);
}

#[tokio::test]
async fn filters_bind_their_values() {
    let t = setup().await;

    matching(&t, json!({ "slug": "x' OR 1=1 --" })).await;

    let sql = t.last_sql();
    assert!(!sql.contains("OR 1=1"), "{sql}");
    assert!(sql.contains("?1"), "{sql}");
}
