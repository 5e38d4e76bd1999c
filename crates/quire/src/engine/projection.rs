use super::{locale, Scope};

use quire_core::{
    query::Columns,
    schema::{Field, FieldLocation, Shape},
    stmt::{Expr, SelectItem},
};

/// Prefix of the current-locale translation selections.
pub const CURRENT_PREFIX: &str = "_i18n_";

/// Prefix of the fallback-locale translation selections.
pub const FALLBACK_PREFIX: &str = "_i18n_fb_";

/// Alias of the derived display title.
pub const TITLE: &str = "_title";

/// The select list of a query and how to turn its rows back into records.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub items: Vec<SelectItem>,

    /// One entry per returned field, in selection order
    pub plan: Vec<ReadField>,
}

/// How a returned field is read from a row.
#[derive(Debug, Clone, PartialEq)]
pub enum ReadField {
    /// Selected under its own name
    Column(String),

    /// Selected as `_i18n_<name>` and `_i18n_fb_<name>`
    Localized(String),

    /// Structural value selected under its own name with localized overlays
    /// under the prefixed names
    Structured { name: String, shape: Shape },

    /// Not selected; returned as null and filled in after the read
    Opaque(String),

    /// The derived display title
    Title,
}

impl ReadField {
    pub fn name(&self) -> &str {
        match self {
            Self::Column(name) | Self::Localized(name) | Self::Opaque(name) => name,
            Self::Structured { name, .. } => name,
            Self::Title => TITLE,
        }
    }
}

pub(crate) fn compile(scope: &Scope<'_>, columns: Option<&Columns>) -> Projection {
    let collection = scope.collection;
    let mut projection = Projection {
        items: vec![],
        plan: vec![],
    };

    for field in collection.fields.values() {
        let is_pk = field.name == collection.primary_key;
        let included = columns.map_or(true, |columns| columns.includes(&field.name));

        if field.is_relation() || !(is_pk || included) {
            continue;
        }

        project_field(scope, field, &mut projection);
    }

    let wants_title = match columns {
        None => true,
        Some(columns) => columns.0.get(TITLE).copied().unwrap_or(false),
    };

    if wants_title {
        projection.items.push(SelectItem::new(title(scope), TITLE));
        projection.plan.push(ReadField::Title);
    }

    projection
}

fn project_field(scope: &Scope<'_>, field: &Field, projection: &mut Projection) {
    let name = &field.name;

    match &field.location {
        FieldLocation::Main { column } => {
            projection
                .items
                .push(SelectItem::new(scope.column(column), name));

            match &field.structure {
                Some(structure) => {
                    push_translations(scope, name, &structure.overlay_column, projection);
                    projection.plan.push(ReadField::Structured {
                        name: name.clone(),
                        shape: structure.shape.clone(),
                    });
                }
                None => projection.plan.push(ReadField::Column(name.clone())),
            }
        }
        FieldLocation::Translation { column } => {
            push_translations(scope, name, column, projection);
            projection.plan.push(ReadField::Localized(name.clone()));
        }
        FieldLocation::Virtual { expr: Some(expr) } => {
            projection
                .items
                .push(SelectItem::new(expr.bound_to(&scope.alias()), name));
            projection.plan.push(ReadField::Column(name.clone()));
        }
        FieldLocation::Virtual { expr: None } => {
            projection.plan.push(ReadField::Opaque(name.clone()));
        }
        FieldLocation::Relation => {}
    }
}

/// Current and fallback values are selected separately and merged after the
/// read.
fn push_translations(scope: &Scope<'_>, name: &str, column: &str, projection: &mut Projection) {
    if let Some(alias) = scope.translation_alias() {
        scope.mark_translations_used();
        projection.items.push(SelectItem::new(
            Expr::column(alias, column),
            format!("{CURRENT_PREFIX}{name}"),
        ));
    }

    if let Some(alias) = scope.fallback_alias() {
        projection.items.push(SelectItem::new(
            Expr::column(alias, column),
            format!("{FALLBACK_PREFIX}{name}"),
        ));
    }
}

/// The title field's value, or the primary key.
fn title(scope: &Scope<'_>) -> Expr {
    let collection = scope.collection;
    let pk = || scope.column(collection.primary_key_column());

    let Some(field) = collection.title.as_deref().and_then(|name| collection.field(name)) else {
        return pk();
    };

    match &field.location {
        FieldLocation::Translation { column } => locale::localized(scope, column).unwrap_or_else(pk),
        FieldLocation::Main { column } => scope.column(column),
        FieldLocation::Virtual { expr: Some(expr) } => expr.bound_to(&scope.alias()),
        FieldLocation::Virtual { expr: None } | FieldLocation::Relation => pk(),
    }
}
