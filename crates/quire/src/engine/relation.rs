use super::{filter, Scope};

use quire_core::{
    schema::{Collection, JoinKeys, Relation, RelationKind},
    stmt::{Expr, Join, Select, TableFactor, TableWithJoins},
    Error, Result,
};

use serde_json::{json, Value as Json};

/// How a quantifier uses the existence subquery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Quantifier {
    /// `EXISTS (... AND filter)`
    Some,

    /// `NOT EXISTS (... AND filter)`
    None,

    /// `NOT EXISTS (... AND NOT filter)`
    Every,
}

/// Compiles a filter on a relation into an existence subquery.
///
/// Relations with an incomplete join configuration compile to no condition.
pub(crate) fn compile(scope: &Scope<'_>, relation: &Relation, value: &Json) -> Result<Option<Expr>> {
    let collection = scope.collection;

    if !relation.is_complete() {
        tracing::warn!(
            collection = %collection.name,
            relation = %relation.name,
            "ignoring filter on relation with incomplete join configuration"
        );
        return Ok(None);
    }

    let target = relation.target(scope.cx.schema());
    let child = scope.child(target, "relation filter")?;

    let terms = match value {
        // `{author: null}` means `is: null`, `{posts: null}` means `none: null`
        Json::Null if relation.is_to_one() => vec![(Quantifier::Some, &Json::Null)],
        Json::Null => vec![(Quantifier::None, &Json::Null)],
        Json::Object(map) if filter::is_quantifier_map(value) => map
            .iter()
            .map(|(key, inner)| Ok((quantifier(collection, relation, key)?, inner)))
            .collect::<Result<Vec<_>>>()?,
        Json::Object(_) => vec![(Quantifier::Some, value)],
        _ => {
            return Err(Error::invalid_filter(format!(
                "filter on relation `{}.{}` must be an object or null",
                collection.name, relation.name
            )))
        }
    };

    let mut operands = vec![];

    for (quantifier, inner) in terms {
        operands.extend(compile_quantifier(scope, &child, relation, quantifier, inner)?);
    }

    Ok(Expr::and_all(operands))
}

fn quantifier(collection: &Collection, relation: &Relation, key: &str) -> Result<Quantifier> {
    let to_one = relation.is_to_one();

    match key {
        "is" if to_one => Ok(Quantifier::Some),
        "isNot" if to_one => Ok(Quantifier::None),
        "some" if !to_one => Ok(Quantifier::Some),
        "none" if !to_one => Ok(Quantifier::None),
        "every" if !to_one => Ok(Quantifier::Every),
        _ => Err(Error::invalid_filter(format!(
            "quantifier `{key}` does not apply to {} relation `{}.{}`",
            if to_one { "to-one" } else { "to-many" },
            collection.name,
            relation.name
        ))),
    }
}

fn compile_quantifier(
    scope: &Scope<'_>,
    child: &Scope<'_>,
    relation: &Relation,
    quantifier: Quantifier,
    inner: &Json,
) -> Result<Option<Expr>> {
    // `is: null` and `isNot: null` test for the related record itself
    let (quantifier, inner) = match (quantifier, inner) {
        (Quantifier::Some, Json::Null) if relation.is_to_one() => (Quantifier::None, None),
        (Quantifier::None, Json::Null) if relation.is_to_one() => (Quantifier::Some, None),
        (_, Json::Null) => (quantifier, None),
        (_, inner) => (quantifier, Some(inner)),
    };

    let nested = match (quantifier, inner) {
        (Quantifier::Every, None) => return Ok(None),
        (Quantifier::Every, Some(inner)) => {
            // Every related row matches: no related row fails the filter
            match filter::compile(child, &json!({ "NOT": inner }))? {
                Some(negated) => Some(negated),
                None => return Ok(None),
            }
        }
        (_, Some(inner)) => filter::compile(child, inner)?,
        (_, None) => None,
    };

    let mut subquery = subquery(scope, child, relation);
    subquery.add_filter(nested);

    if child.translations_used() {
        subquery.source.joins.extend(child.translation_joins());
    }

    Ok(Some(match quantifier {
        Quantifier::Some => Expr::exists(subquery),
        Quantifier::None | Quantifier::Every => Expr::not_exists(subquery),
    }))
}

/// `SELECT 1` over the related rows of the parent row, excluding soft-deleted
/// rows.
fn subquery(parent: &Scope<'_>, child: &Scope<'_>, relation: &Relation) -> Select {
    let target = child.collection;

    let mut select = match &relation.kind {
        RelationKind::ToOne(to_one) => {
            Select::new(child.table(), key_condition(parent, child, &to_one.keys))
        }
        RelationKind::ToMany(to_many) => {
            Select::new(child.table(), key_condition(parent, child, &to_many.keys))
        }
        RelationKind::ManyToMany(m2m) => {
            let junction = parent.cx.schema().collection(m2m.through);
            let junction_alias = child.junction_alias();

            let on = Expr::eq(
                child.column(target.primary_key_column()),
                Expr::column(&junction_alias, &m2m.target_key),
            );

            let source = TableWithJoins {
                table: TableFactor::new(&junction.table, &junction_alias),
                joins: vec![Join::inner(child.table(), on)],
            };

            let mut select = Select::new(
                source,
                Expr::eq(
                    Expr::column(&junction_alias, &m2m.source_key),
                    parent.column(parent.collection.primary_key_column()),
                ),
            );

            if let Some(deleted_at) = junction.soft_delete_column() {
                select.add_filter(Expr::is_null(Expr::column(&junction_alias, deleted_at)));
            }

            select
        }
    };

    if let Some(discriminator) = relation.discriminator() {
        select.add_filter(Expr::eq(
            child.column(&discriminator.column),
            discriminator.value.clone(),
        ));
    }

    if let Some(deleted_at) = target.soft_delete_column() {
        select.add_filter(Expr::is_null(child.column(deleted_at)));
    }

    select
}

/// `child.target[i] = parent.source[i]` for every key pair.
fn key_condition(parent: &Scope<'_>, child: &Scope<'_>, keys: &JoinKeys) -> Expr {
    Expr::and_from_vec(
        keys.pairs()
            .map(|(source, target)| Expr::eq(child.column(target), parent.column(source)))
            .collect(),
    )
}
