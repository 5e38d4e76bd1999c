use pretty_assertions::assert_eq;
use quire_core::{stmt::Value, Driver};
use quire_driver_sqlite::Sqlite;

fn driver() -> Sqlite {
    let driver = Sqlite::new("sqlite::memory:").unwrap();
    driver
        .execute_batch(
            "CREATE TABLE posts (id INTEGER PRIMARY KEY, title TEXT, score REAL, meta TEXT);
             INSERT INTO posts VALUES (1, 'Hello', 1.5, '{\"a\":1}');
             INSERT INTO posts VALUES (2, NULL, NULL, NULL);",
        )
        .unwrap();
    driver
}

#[tokio::test]
async fn query_returns_rows_keyed_by_alias() {
    let driver = driver();

    let rows = driver
        .query(
            "SELECT id AS \"id\", title AS \"title\", score AS \"score\" FROM posts ORDER BY id",
            &[],
        )
        .await
        .unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["id"], Value::I64(1));
    assert_eq!(rows[0]["title"], Value::from("Hello"));
    assert_eq!(rows[0]["score"], Value::F64(1.5));
    assert_eq!(rows[1]["title"], Value::Null);
    assert_eq!(rows[0].keys().collect::<Vec<_>>(), ["id", "title", "score"]);
}

#[tokio::test]
async fn params_are_bound_positionally() {
    let driver = driver();

    let rows = driver
        .query(
            "SELECT id FROM posts WHERE id = ?1 OR title = ?2",
            &[Value::I64(2), Value::from("Hello")],
        )
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);

    let rows = driver
        .query("SELECT ?1 AS b, ?2 AS j", &[Value::Bool(true), Value::List(vec![Value::I64(1)])])
        .await
        .unwrap();
    assert_eq!(rows[0]["b"], Value::I64(1));
    assert_eq!(rows[0]["j"], Value::from("[1]"));
}

#[tokio::test]
async fn execute_counts_affected_rows() {
    let driver = driver();

    let count = driver
        .execute("UPDATE posts SET score = ?1 WHERE score IS NULL", &[Value::F64(0.0)])
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn errors_are_driver_errors() {
    let driver = driver();

    let err = driver.query("SELECT nope FROM posts", &[]).await.unwrap_err();
    assert!(err.is_driver());
}

#[tokio::test]
async fn like_respects_case() {
    let driver = driver();

    let rows = driver
        .query("SELECT id FROM posts WHERE title LIKE ?1", &[Value::from("hello")])
        .await
        .unwrap();
    assert!(rows.is_empty());

    let rows = driver
        .query("SELECT id FROM posts WHERE title LIKE ?1", &[Value::from("He%")])
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
}

#[test]
fn rejects_other_schemes() {
    assert!(Sqlite::new("postgresql://localhost/db").is_err());
}
