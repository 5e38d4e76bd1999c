use serde::Deserialize;

/// Engine settings.
///
/// ```
/// let config: quire::Config = serde_json::from_value(serde_json::json!({
///     "defaultLocale": "fr",
///     "fallbackLocale": "en",
/// }))
/// .unwrap();
///
/// assert_eq!(config.max_relation_depth, 8);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Locale used when a request does not name one
    pub default_locale: String,

    /// Locale consulted when a request does not name a fallback
    pub fallback_locale: Option<String>,

    /// Maximum nesting of relation filters and `with` loads
    pub max_relation_depth: usize,

    /// Maximum nesting walked when merging structured localized values.
    /// Deeper values are left as stored.
    pub max_merge_depth: usize,

    /// Fail schema verification on incomplete relation join configurations
    /// instead of warning and ignoring filters on them
    pub strict_relations: bool,
}

impl Config {
    pub const DEFAULT_MAX_RELATION_DEPTH: usize = 8;
    pub const DEFAULT_MAX_MERGE_DEPTH: usize = 32;
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_locale: "en".to_string(),
            fallback_locale: None,
            max_relation_depth: Self::DEFAULT_MAX_RELATION_DEPTH,
            max_merge_depth: Self::DEFAULT_MAX_MERGE_DEPTH,
            strict_relations: false,
        }
    }
}
