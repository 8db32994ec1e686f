//! List query parsing: pagination bounds, the JSON equality filter and the
//! sort token. Field names resolve through each entity's allow-list.

use chrono::DateTime;
use models::resource::{FieldKind, FieldSpec, Resource};
use sea_orm::{ColumnTrait, Condition, IdenStatic, Order, Value};
use serde_json::Value as Json;
use tracing::debug;

use crate::errors::ServiceError;

pub const DEFAULT_LIMIT: u64 = 20;
pub const MAX_LIMIT: u64 = 2000;
/// OFFSET is bound as a signed 64-bit integer.
pub const MAX_SKIP: u64 = i64::MAX as u64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Page {
    pub skip: u64,
    pub limit: u64,
}

impl Page {
    pub fn new(skip: Option<u64>, limit: Option<u64>) -> Result<Self, ServiceError> {
        Self::with_default(skip, limit, DEFAULT_LIMIT)
    }

    pub fn with_default(skip: Option<u64>, limit: Option<u64>, default_limit: u64) -> Result<Self, ServiceError> {
        let limit = limit.unwrap_or(default_limit);
        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(ServiceError::Validation(format!("limit must be between 1 and {}", MAX_LIMIT)));
        }
        let skip = skip.unwrap_or(0);
        if skip > MAX_SKIP {
            return Err(ServiceError::Validation(format!("skip must be at most {}", MAX_SKIP)));
        }
        Ok(Self { skip, limit })
    }
}

impl Default for Page {
    fn default() -> Self {
        Self { skip: 0, limit: DEFAULT_LIMIT }
    }
}

/// Equality filter decoded from the `query` parameter.
#[derive(Clone, Debug, Default)]
pub struct Filter {
    pairs: Vec<(String, Json)>,
}

pub fn parse_filter(raw: Option<&str>) -> Result<Filter, ServiceError> {
    let raw = match raw.map(str::trim) {
        None | Some("") => return Ok(Filter::default()),
        Some(r) => r,
    };
    match serde_json::from_str::<Json>(raw) {
        Ok(Json::Object(map)) => Ok(Filter { pairs: map.into_iter().collect() }),
        _ => Err(ServiceError::BadRequest("Invalid query JSON format".into())),
    }
}

impl Filter {
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// AND of one predicate per known field. Unknown names are dropped.
    pub fn conditions<E: Resource>(&self) -> Result<Condition, ServiceError> {
        let mut cond = Condition::all();
        for (name, value) in &self.pairs {
            let Some(spec) = E::field(name) else {
                debug!(resource = E::PATH, field = %name, "ignoring unknown filter field");
                continue;
            };
            if value.is_null() {
                cond = cond.add(spec.column.is_null());
            } else {
                cond = cond.add(spec.column.eq(to_value(spec, value)?));
            }
        }
        Ok(cond)
    }
}

fn to_value<C: 'static>(spec: &FieldSpec<C>, value: &Json) -> Result<Value, ServiceError> {
    let mismatch = || ServiceError::Validation(format!("invalid value for field `{}`", spec.name));
    match spec.kind {
        FieldKind::Int => {
            let n = match value {
                Json::Number(n) => n.as_i64(),
                Json::String(s) => s.trim().parse::<i64>().ok(),
                _ => None,
            };
            let n = n.and_then(|n| i32::try_from(n).ok()).ok_or_else(mismatch)?;
            Ok(n.into())
        }
        FieldKind::Float => value.as_f64().map(Value::from).ok_or_else(mismatch),
        FieldKind::Text => value.as_str().map(|s| Value::from(s.to_string())).ok_or_else(mismatch),
        FieldKind::Timestamp => value
            .as_str()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(Value::from)
            .ok_or_else(mismatch),
    }
}

/// Parsed `sort` token: `field` ascending, `-field` descending.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SortSpec {
    field: Option<String>,
    descending: bool,
}

impl SortSpec {
    pub fn parse(token: Option<&str>) -> Self {
        let token = token.map(str::trim).unwrap_or_default();
        let (name, descending) = match token.strip_prefix('-') {
            Some(rest) => (rest, true),
            None => (token, false),
        };
        if name.is_empty() {
            return Self::default();
        }
        Self { field: Some(name.to_string()), descending }
    }

    /// ORDER BY terms. Falls back to primary key descending; other columns get
    /// the primary key as a tie-breaker.
    pub fn order<E: Resource>(&self) -> Vec<(E::Column, Order)> {
        let pk = E::primary();
        let spec = self.field.as_deref().and_then(E::field);
        match spec {
            Some(spec) => {
                let dir = if self.descending { Order::Desc } else { Order::Asc };
                if spec.column.as_str() == pk.as_str() {
                    vec![(pk, dir)]
                } else {
                    vec![(spec.column, dir), (pk, Order::Desc)]
                }
            }
            None => {
                if let Some(name) = &self.field {
                    debug!(resource = E::PATH, field = %name, "ignoring unknown sort field");
                }
                vec![(pk, Order::Desc)]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::{consignments, inventory};
    use sea_orm::{EntityTrait, QueryFilter, QueryTrait};

    fn sql(cond: Condition) -> String {
        inventory::Entity::find()
            .filter(cond)
            .build(sea_orm::DatabaseBackend::Postgres)
            .to_string()
    }

    fn names<E: Resource>(order: &[(E::Column, Order)]) -> Vec<(String, Order)> {
        order.iter().map(|(c, o)| (c.as_str().to_string(), o.clone())).collect()
    }

    #[test]
    fn page_defaults_and_bounds() {
        assert_eq!(Page::new(None, None).unwrap(), Page { skip: 0, limit: 20 });
        assert_eq!(Page::new(Some(40), Some(2000)).unwrap(), Page { skip: 40, limit: 2000 });
        assert!(matches!(Page::new(None, Some(0)), Err(ServiceError::Validation(_))));
        assert!(matches!(Page::new(None, Some(2001)), Err(ServiceError::Validation(_))));
    }

    #[test]
    fn skip_must_fit_a_signed_offset() {
        assert_eq!(Page::new(Some(MAX_SKIP), None).unwrap().skip, MAX_SKIP);
        assert!(matches!(Page::new(Some(MAX_SKIP + 1), None), Err(ServiceError::Validation(_))));
        assert!(matches!(Page::with_default(Some(u64::MAX), None, 50), Err(ServiceError::Validation(_))));
    }

    #[test]
    fn filter_rejects_bad_json() {
        assert!(matches!(parse_filter(Some("{status:")), Err(ServiceError::BadRequest(_))));
        assert!(matches!(parse_filter(Some("[1,2]")), Err(ServiceError::BadRequest(_))));
        assert!(matches!(parse_filter(Some("\"x\"")), Err(ServiceError::BadRequest(_))));
        assert!(parse_filter(None).unwrap().is_empty());
        assert!(parse_filter(Some("  ")).unwrap().is_empty());
    }

    #[test]
    fn filter_builds_typed_predicates() {
        let f = parse_filter(Some(r#"{"status":"SOLD","id":5,"description":null,"__class__":"x"}"#)).unwrap();
        let q = sql(f.conditions::<inventory::Entity>().unwrap());
        assert!(q.contains(r#""inventory"."status" = 'SOLD'"#), "{}", q);
        assert!(q.contains(r#""inventory"."id" = 5"#), "{}", q);
        assert!(q.contains(r#""inventory"."description" IS NULL"#), "{}", q);
        assert!(!q.contains("__class__"));
    }

    #[test]
    fn filter_type_mismatch_is_validation_error() {
        let f = parse_filter(Some(r#"{"unit_cost":"cheap"}"#)).unwrap();
        assert!(matches!(f.conditions::<inventory::Entity>(), Err(ServiceError::Validation(_))));
        let f = parse_filter(Some(r#"{"id":99999999999}"#)).unwrap();
        assert!(matches!(f.conditions::<inventory::Entity>(), Err(ServiceError::Validation(_))));
        let f = parse_filter(Some(r#"{"created_at":"yesterday"}"#)).unwrap();
        assert!(matches!(f.conditions::<inventory::Entity>(), Err(ServiceError::Validation(_))));
    }

    #[test]
    fn filter_accepts_rfc3339_timestamps() {
        let f = parse_filter(Some(r#"{"created_at":"2024-03-01T12:00:00+02:00"}"#)).unwrap();
        assert!(f.conditions::<inventory::Entity>().is_ok());
    }

    #[test]
    fn sort_descending_prefix() {
        let s = SortSpec::parse(Some("-retail_price"));
        assert_eq!(
            names::<inventory::Entity>(&s.order::<inventory::Entity>()),
            vec![("retail_price".to_string(), Order::Desc), ("id".to_string(), Order::Desc)]
        );
        let s = SortSpec::parse(Some("quantity"));
        assert_eq!(
            names::<consignments::Entity>(&s.order::<consignments::Entity>()),
            vec![("quantity".to_string(), Order::Asc), ("id".to_string(), Order::Desc)]
        );
    }

    #[test]
    fn sort_defaults_to_primary_key_desc() {
        for token in [None, Some(""), Some("-"), Some("no_such_field")] {
            let s = SortSpec::parse(token);
            assert_eq!(
                names::<inventory::Entity>(&s.order::<inventory::Entity>()),
                vec![("id".to_string(), Order::Desc)]
            );
        }
        let s = SortSpec::parse(Some("id"));
        assert_eq!(names::<inventory::Entity>(&s.order::<inventory::Entity>()), vec![("id".to_string(), Order::Asc)]);
    }
}
