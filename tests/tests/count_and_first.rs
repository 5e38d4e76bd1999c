use quire::{stmt::Direction, Db, FindOptions};
use tests::{json, pretty_assertions::assert_eq, setup};

#[tokio::test]
async fn count_applies_the_filter() {
    let t = setup().await;

    assert_eq!(t.db.count("posts", FindOptions::new()).await.unwrap(), 4);
    assert_eq!(
        t.db
            .count("posts", FindOptions::new().filter(json!({ "views": { "gt": 6 } })))
            .await
            .unwrap(),
        3
    );
    assert_eq!(
        t.db
            .count(
                "authors",
                FindOptions::new().filter(json!({ "posts": { "none": {} } }))
            )
            .await
            .unwrap(),
        1
    );
}

#[tokio::test]
async fn count_ignores_paging_and_ordering() {
    let t = setup().await;

    let options = FindOptions::new()
        .order_by([("views", Direction::Desc)])
        .limit(1)
        .offset(2);
    assert_eq!(t.db.count("posts", options).await.unwrap(), 4);

    let sql = t.last_sql();
    assert!(sql.starts_with("SELECT COUNT(*)"), "{sql}");
    assert!(!sql.contains("ORDER BY"), "{sql}");
}

#[tokio::test]
async fn count_on_localized_values() {
    let t = setup().await;

    let options = FindOptions::new()
        .filter(json!({ "title": { "contains": "a" } }))
        .locale("de")
        .locale_fallback("en");

    // Hallo, Graphs
    assert_eq!(t.db.count("posts", options).await.unwrap(), 2);
    assert!(t.last_sql().contains("JOIN"));

    t.db.count("posts", FindOptions::new()).await.unwrap();
    assert!(!t.last_sql().contains("JOIN"));
}

#[tokio::test]
async fn find_first() {
    let t = setup().await;

    let options = FindOptions::new().order_by([("views", Direction::Desc)]);
    let post = t.db.find_first("posts", options).await.unwrap().unwrap();
    assert_eq!(post["id"], json!(4));
    assert!(t.last_sql().contains("LIMIT"));

    let options = FindOptions::new().filter(json!({ "views": { "gt": 1000 } }));
    assert_eq!(t.db.find_first("posts", options).await.unwrap(), None);
}

#[tokio::test]
async fn compile_without_running() {
    let t = setup().await;

    let options = FindOptions::new()
        .filter(json!({ "views": { "gte": 10 } }))
        .order_by([("title", Direction::Asc)]);
    let compiled = t.db.compile("posts", &options).unwrap();

    assert!(compiled.filter.is_some());
    assert_eq!(compiled.order_by.len(), 1);
    assert_eq!(t.ops(), 0);
}

#[tokio::test]
async fn connect_by_url() {
    let db = Db::builder()
        .schema_builder(tests::blog_schema())
        .connect("sqlite::memory:")
        .await
        .unwrap();

    db.driver()
        .execute("CREATE TABLE authors (id INTEGER PRIMARY KEY, name TEXT, bio TEXT)", &[])
        .await
        .unwrap();
    db.driver()
        .execute("INSERT INTO authors (id, name) VALUES (1, 'Ada')", &[])
        .await
        .unwrap();

    let authors = db.find_many("authors", FindOptions::new()).await.unwrap();
    assert_eq!(authors[0]["name"], json!("Ada"));
    assert_eq!(db.count("authors", FindOptions::new()).await.unwrap(), 1);

    let err = Db::builder()
        .schema_builder(tests::blog_schema())
        .connect("postgresql://localhost/blog")
        .await
        .unwrap_err();
    assert!(!err.is_validation());
}
