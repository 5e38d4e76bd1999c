use quire::{stmt::Direction, Config, FindOptions};
use tests::{blog_schema, json, pluck, pretty_assertions::assert_eq, setup, setup_with};

fn by_id() -> FindOptions {
    FindOptions::new().order_by([("id", Direction::Asc)])
}

#[tokio::test]
async fn current_locale_falls_back_per_field() {
    let t = setup().await;

    let posts = t
        .db
        .find_many("posts", by_id().locale("de").locale_fallback("en"))
        .await
        .unwrap();

    assert_eq!(
        pluck(&posts, "title"),
        [json!("Hallo"), json!("Rust tips"), json!("Notes"), json!("Graphs")]
    );

    // Post 1 has a German row without a body
    assert_eq!(pluck(&posts, "body")[0], json!("Body"));
}

#[tokio::test]
async fn missing_in_both_locales_is_null() {
    let t = setup().await;

    let posts = t
        .db
        .find_many("posts", by_id().locale("fr"))
        .await
        .unwrap();

    assert_eq!(
        pluck(&posts, "title"),
        [json!(null), json!(null), json!(null), json!("Graphes")]
    );
}

#[tokio::test]
async fn configured_fallback_applies_without_request_fallback() {
    let config = Config {
        default_locale: "fr".to_string(),
        fallback_locale: Some("en".to_string()),
        ..Config::default()
    };
    let t = setup_with(blog_schema(), config).await;

    let posts = t.db.find_many("posts", by_id()).await.unwrap();

    assert_eq!(
        pluck(&posts, "title"),
        [json!("Hello"), json!("Rust tips"), json!("Notes"), json!("Graphes")]
    );
}

#[tokio::test]
async fn filter_and_order_on_fallback_aware_value() {
    let t = setup().await;

    let options = FindOptions::new()
        .filter(json!({ "title": { "startsWith": "r" } }))
        .locale("de")
        .locale_fallback("en");

    let posts = t.db.find_many("posts", options).await.unwrap();
    assert_eq!(pluck(&posts, "id"), [json!(2)]);

    let options = FindOptions::new()
        .order_by([("title", Direction::Desc)])
        .locale("de")
        .locale_fallback("en");

    let posts = t.db.find_many("posts", options).await.unwrap();
    assert_eq!(
        pluck(&posts, "title"),
        [json!("Rust tips"), json!("Notes"), json!("Hallo"), json!("Graphs")]
    );
}

#[tokio::test]
async fn structured_leaves_follow_the_locale_chain() {
    let t = setup().await;

    let options = by_id()
        .filter(json!({ "id": 1 }))
        .columns([("meta", true)]);

    let de = t
        .db
        .find_many("posts", options.clone().locale("de"))
        .await
        .unwrap();
    assert_eq!(
        de[0]["meta"],
        json!({ "seo": { "title": "Hallo SEO" }, "featured": 1 })
    );

    let fr = t
        .db
        .find_many("posts", options.locale("fr").locale_fallback("en"))
        .await
        .unwrap();
    assert_eq!(
        fr[0]["meta"],
        json!({ "seo": { "title": "Hello SEO" }, "featured": 1 })
    );
}

#[tokio::test]
async fn merged_records_are_stable_under_a_second_merge() {
    let t = setup().await;

    let posts = t
        .db
        .find_many("posts", by_id().locale("de").locale_fallback("en"))
        .await
        .unwrap();

    for post in posts {
        let again = quire::merge_locales(post.clone(), &Default::default(), &Default::default());
        assert_eq!(again, post);
    }
}

#[tokio::test]
async fn title_is_derived_from_the_localized_title_field() {
    let t = setup().await;

    let posts = t
        .db
        .find_many("posts", by_id().locale("fr").locale_fallback("en"))
        .await
        .unwrap();

    assert_eq!(
        pluck(&posts, "_title"),
        [json!("Hello"), json!("Rust tips"), json!("Notes"), json!("Graphes")]
    );
}
