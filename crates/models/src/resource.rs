//! Per-entity CRUD descriptor.
//!
//! Every routable entity implements [`Resource`]: the path segment it is served
//! under, which columns callers may filter and sort on, the optional owner column,
//! and how typed create/update payloads become active models.

use std::collections::HashSet;
use std::fmt::Display;

use sea_orm::{ActiveValue, ColumnTrait, ColumnType, EntityTrait, IdenStatic};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::ModelError;

pub type Timestamp = sea_orm::prelude::DateTimeWithTimeZone;

/// How a JSON filter value is converted for a column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Int,
    Text,
    Float,
    Timestamp,
}

/// One caller-visible field: public name, backing column, value kind.
#[derive(Clone, Copy, Debug)]
pub struct FieldSpec<C: 'static> {
    pub name: &'static str,
    pub column: C,
    pub kind: FieldKind,
}

pub trait Resource: EntityTrait {
    /// Path segment under `/api/v1/entities`.
    const PATH: &'static str;
    /// Human readable name used in responses ("Inventory not found").
    const LABEL: &'static str;

    type Id: DeserializeOwned
        + Serialize
        + Into<sea_orm::Value>
        + Clone
        + Display
        + Send
        + Sync
        + 'static;
    type Active;
    type Create: DeserializeOwned + Send + 'static;
    type Update: DeserializeOwned + Send + 'static;

    /// The allow-list. Names outside it never reach a query.
    fn fields() -> &'static [FieldSpec<Self::Column>];

    fn primary() -> Self::Column;

    /// Column holding the owning caller id, for ownership-scoped entities.
    fn owner() -> Option<Self::Column> {
        None
    }

    fn scoped() -> bool {
        Self::owner().is_some()
    }

    fn field(name: &str) -> Option<&'static FieldSpec<Self::Column>> {
        Self::fields().iter().find(|f| f.name == name)
    }

    /// Build the insert. `owner` replaces any owner value from the payload.
    fn new_active(data: Self::Create, owner: Option<&str>, now: Timestamp) -> Self::Active;

    /// Copy the present fields of `patch` into `active`; returns whether any value changed.
    fn apply_update(active: &mut Self::Active, patch: Self::Update, now: Timestamp) -> bool;

    /// Startup check of the allow-list against the entity's columns.
    fn validate_fields() -> Result<(), ModelError> {
        let mut seen = HashSet::new();
        for spec in Self::fields() {
            if !seen.insert(spec.name) {
                return Err(ModelError::Fields(format!("{}: duplicate field `{}`", Self::PATH, spec.name)));
            }
            let column_name = spec.column.as_str();
            if column_name != spec.name {
                return Err(ModelError::Fields(format!(
                    "{}: field `{}` is mapped to column `{}`",
                    Self::PATH,
                    spec.name,
                    column_name
                )));
            }
            let def = spec.column.def();
            if !kind_matches(spec.kind, def.get_column_type()) {
                return Err(ModelError::Fields(format!(
                    "{}: field `{}` declared as {:?} but column type is {:?}",
                    Self::PATH,
                    spec.name,
                    spec.kind,
                    def.get_column_type()
                )));
            }
        }
        let primary = Self::primary();
        let pk = primary.as_str();
        if !seen.contains(pk) {
            return Err(ModelError::Fields(format!("{}: primary key `{}` is not listed", Self::PATH, pk)));
        }
        if let Some(owner) = Self::owner() {
            if !seen.contains(owner.as_str()) {
                return Err(ModelError::Fields(format!("{}: owner column `{}` is not listed", Self::PATH, owner.as_str())));
            }
        }
        Ok(())
    }
}

fn kind_matches(kind: FieldKind, ty: &ColumnType) -> bool {
    match kind {
        FieldKind::Int => matches!(ty, ColumnType::Integer),
        FieldKind::Text => matches!(ty, ColumnType::String(_) | ColumnType::Text),
        FieldKind::Float => matches!(ty, ColumnType::Double | ColumnType::Float),
        FieldKind::Timestamp => matches!(ty, ColumnType::TimestampWithTimeZone),
    }
}

/// Overwrite `slot` with `value` when present and different.
pub fn assign<V>(slot: &mut ActiveValue<V>, value: Option<V>) -> bool
where
    V: Into<sea_orm::Value> + PartialEq,
{
    let Some(v) = value else { return false };
    let same = match slot {
        ActiveValue::Set(old) | ActiveValue::Unchanged(old) => *old == v,
        ActiveValue::NotSet => false,
    };
    if !same {
        *slot = ActiveValue::Set(v);
    }
    !same
}

/// Same as [`assign`] for a nullable column. A `None` patch never clears the column.
pub fn assign_opt<V>(slot: &mut ActiveValue<Option<V>>, value: Option<V>) -> bool
where
    Option<V>: Into<sea_orm::Value>,
    V: PartialEq,
{
    assign(slot, value.map(Some))
}

/// Refresh `updated_at` after a real change unless the patch carried its own value.
pub fn touch(slot: &mut ActiveValue<Option<Timestamp>>, changed: bool, supplied: bool, now: Timestamp) {
    if changed && !supplied {
        *slot = ActiveValue::Set(Some(now));
    }
}
