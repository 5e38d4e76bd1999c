use indexmap::IndexMap;

/// Describes which parts of a structured value are localized.
///
/// Localized leaves are stored as `{"$i18n": true}` markers in the main
/// column; their per-locale values live in an overlay with the same layout.
/// Block lists are arrays of `{"id", "type", "values"}` objects; their
/// overlay is keyed by block `id`.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Kept as stored
    Plain,

    /// Replaced by the overlay value
    Localized,

    /// An object with known keys; unknown keys are kept as stored
    Object(IndexMap<String, Shape>),

    /// Every element shares the shape
    Array(Box<Shape>),

    /// A list of tagged blocks; block type to the shape of its `values`
    Blocks(IndexMap<String, Shape>),
}

impl Shape {
    /// Marker key left in place of localized leaves.
    pub const MARKER: &'static str = "$i18n";

    pub fn object<K: Into<String>>(fields: impl IntoIterator<Item = (K, Shape)>) -> Self {
        Self::Object(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn array(element: Shape) -> Self {
        Self::Array(Box::new(element))
    }

    pub fn blocks<K: Into<String>>(variants: impl IntoIterator<Item = (K, Shape)>) -> Self {
        Self::Blocks(variants.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Whether any leaf is localized.
    pub fn has_localized(&self) -> bool {
        match self {
            Self::Plain => false,
            Self::Localized => true,
            Self::Object(fields) | Self::Blocks(fields) => {
                fields.values().any(Shape::has_localized)
            }
            Self::Array(element) => element.has_localized(),
        }
    }

    /// Nesting depth, counting the shape itself.
    pub fn depth(&self) -> usize {
        match self {
            Self::Plain | Self::Localized => 1,
            Self::Object(fields) | Self::Blocks(fields) => {
                1 + fields.values().map(Shape::depth).max().unwrap_or(0)
            }
            Self::Array(element) => 1 + element.depth(),
        }
    }
}
