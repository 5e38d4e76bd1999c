mod logging_driver;
pub use logging_driver::{DriverOp, LoggingDriver};

use quire::{schema, stmt::Expr, Config, Db, Record, Shape};
use quire_driver_sqlite::Sqlite;

use serde_json::Value as Json;
use std::sync::{Arc, Mutex, Once};

pub use pretty_assertions;
pub use serde_json::json;

/// A database loaded with fixtures, and the log of statements run against it.
pub struct TestDb {
    pub db: Db,
    pub ops_log: Arc<Mutex<Vec<DriverOp>>>,
}

impl TestDb {
    /// Number of statements run so far.
    pub fn ops(&self) -> usize {
        self.ops_log.lock().unwrap().len()
    }

    pub fn last_sql(&self) -> String {
        self.ops_log
            .lock()
            .unwrap()
            .last()
            .map(|op| op.sql.clone())
            .unwrap_or_default()
    }
}

/// Installs a `tracing` subscriber honoring `RUST_LOG`.
pub fn init_tracing() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Authors write posts; posts are localized, tagged through `post_tags`, and
/// soft deleted.
pub fn blog_schema() -> schema::Builder {
    let mut builder = quire::Schema::builder();

    builder
        .collection("authors", |c| {
            c.field("name");
            c.field("bio");
            c.title("name");
            c.has_many("posts", "posts");
        })
        .collection("posts", |c| {
            c.field("views");
            c.field("slug");
            c.localized("title");
            c.localized("body");
            c.structured(
                "meta",
                Shape::object([("seo", Shape::object([("title", Shape::Localized)]))]),
            );
            c.virtual_field(
                "readingTime",
                Expr::func("LENGTH", [Expr::this_column("slug")]),
            );
            c.virtual_field("popular", None);
            c.title("title");
            c.soft_delete();
            c.belongs_to("author", "authors");
            c.many_to_many("tags", "tags", "postTags")
                .source_key("post_id")
                .target_key("tag_id");
        })
        .collection("tags", |c| {
            c.field("name");
            c.many_to_many("posts", "posts", "postTags")
                .source_key("tag_id")
                .target_key("post_id");
        })
        .collection("postTags", |c| {
            c.table("post_tags");
            c.field("postId");
            c.field("tagId");
        });

    builder
}

pub const BLOG_SQL: &str = r#"
CREATE TABLE authors (id INTEGER PRIMARY KEY, name TEXT, bio TEXT);
CREATE TABLE posts (
    id INTEGER PRIMARY KEY,
    author_id INTEGER,
    views INTEGER,
    slug TEXT,
    meta TEXT,
    deleted_at TEXT
);
CREATE TABLE posts_i18n (parent_id INTEGER, locale TEXT, title TEXT, body TEXT, meta TEXT);
CREATE TABLE tags (id INTEGER PRIMARY KEY, name TEXT);
CREATE TABLE post_tags (id INTEGER PRIMARY KEY, post_id INTEGER, tag_id INTEGER);

INSERT INTO authors VALUES (1, 'Ada', 'Counts'), (2, 'Grace', 'Compiles'), (3, 'Linus', NULL);

INSERT INTO posts VALUES
    (1, 1, 10, 'hello-world', '{"seo":{"title":{"$i18n":true}},"featured":1}', NULL),
    (2, 1, 50, 'rust-tips', NULL, NULL),
    (3, 2, 5, 'draft-notes', NULL, '2024-01-01'),
    (4, 2, 100, 'graphs', NULL, NULL);

INSERT INTO posts_i18n VALUES
    (1, 'en', 'Hello', 'Body', '{"seo":{"title":"Hello SEO"}}'),
    (1, 'de', 'Hallo', NULL, '{"seo":{"title":"Hallo SEO"}}'),
    (2, 'en', 'Rust tips', 'Tips', NULL),
    (3, 'en', 'Notes', NULL, NULL),
    (4, 'en', 'Graphs', 'Nodes', NULL),
    (4, 'fr', 'Graphes', NULL, NULL);

INSERT INTO tags VALUES (1, 'rust'), (2, 'db');

INSERT INTO post_tags VALUES (1, 1, 1), (2, 2, 1), (3, 2, 2), (4, 4, 2);
"#;

/// An in-memory blog database.
pub async fn setup() -> TestDb {
    setup_with(blog_schema(), Config::default()).await
}

pub async fn setup_with(schema: schema::Builder, config: Config) -> TestDb {
    init_tracing();

    let sqlite = Sqlite::in_memory().unwrap();
    sqlite.execute_batch(BLOG_SQL).unwrap();

    let driver = LoggingDriver::new(Box::new(sqlite));
    let ops_log = driver.ops_log_handle();

    let db = Db::builder()
        .schema_builder(schema)
        .config(config)
        .build(driver)
        .unwrap();

    TestDb { db, ops_log }
}

/// The values of `field` across `records`, in order.
pub fn pluck(records: &[Record], field: &str) -> Vec<Json> {
    records
        .iter()
        .map(|record| record.get(field).cloned().unwrap_or(Json::Null))
        .collect()
}

/// The `id`s of `records`, in order.
pub fn ids(records: &[Record]) -> Vec<i64> {
    records
        .iter()
        .filter_map(|record| record.get("id").and_then(Json::as_i64))
        .collect()
}
