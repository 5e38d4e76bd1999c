use super::Shape;
use crate::stmt::Expr;

#[derive(Debug, Clone)]
pub struct Field {
    /// The field name, as used in filters and returned records
    pub name: String,

    /// Where the field's value comes from
    pub location: FieldLocation,

    /// Set for structured fields that carry localized leaves
    pub structure: Option<Structure>,
}

#[derive(Debug, Clone)]
pub enum FieldLocation {
    /// A column of the main table
    Main { column: String },

    /// A column of the translation table
    Translation { column: String },

    /// Computed. Fields without an expression are opaque: they are filled in
    /// after the read and cannot be filtered or sorted on.
    Virtual { expr: Option<Expr> },

    /// A declared relation; loaded through `with`, filtered through
    /// quantifiers
    Relation,
}

/// A structured (JSON) main-table column whose localized leaves are stored
/// separately, per locale, in an overlay column of the translation table.
#[derive(Debug, Clone)]
pub struct Structure {
    /// Translation table column holding the localized overlay
    pub overlay_column: String,

    /// Which parts of the value are localized
    pub shape: Shape,
}

impl Field {
    pub fn is_localized(&self) -> bool {
        matches!(self.location, FieldLocation::Translation { .. })
    }

    pub fn is_virtual(&self) -> bool {
        matches!(self.location, FieldLocation::Virtual { .. })
    }

    pub fn is_relation(&self) -> bool {
        matches!(self.location, FieldLocation::Relation)
    }

    pub fn is_structured(&self) -> bool {
        self.structure.is_some()
    }

    /// Storage column for stored fields.
    pub fn column(&self) -> Option<&str> {
        match &self.location {
            FieldLocation::Main { column } | FieldLocation::Translation { column } => Some(column),
            _ => None,
        }
    }

    /// Computed expression of a virtual field.
    pub fn expr(&self) -> Option<&Expr> {
        match &self.location {
            FieldLocation::Virtual { expr } => expr.as_ref(),
            _ => None,
        }
    }

    /// Whether the database can evaluate the field in filters and ordering.
    pub fn is_queryable(&self) -> bool {
        match &self.location {
            FieldLocation::Main { .. } | FieldLocation::Translation { .. } => true,
            FieldLocation::Virtual { expr } => expr.is_some(),
            FieldLocation::Relation => false,
        }
    }
}
