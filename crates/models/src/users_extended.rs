//! Role and profile data keyed by the auth user id.
use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::{Deserialize, Serialize};

use crate::resource::{assign, assign_opt, FieldKind, FieldSpec, Resource, Timestamp};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users_extended")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub role: String,
    pub status: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub created_at: Option<DateTimeWithTimeZone>,
    pub deleted_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_AFFILIATE: &str = "affiliate";
pub const ROLE_DRIVER: &str = "driver";
pub const ROLES: [&str; 3] = [ROLE_ADMIN, ROLE_AFFILIATE, ROLE_DRIVER];

pub const STATUS_ACTIVE: &str = "active";
pub const STATUS_SUSPENDED: &str = "suspended";
pub const STATUSES: [&str; 2] = [STATUS_ACTIVE, STATUS_SUSPENDED];

#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserExtended {
    pub id: String,
    pub role: String,
    pub status: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub created_at: Option<Timestamp>,
    pub deleted_at: Option<Timestamp>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserExtended {
    pub role: Option<String>,
    pub status: Option<String>,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub created_at: Option<Timestamp>,
    pub deleted_at: Option<Timestamp>,
}

const FIELDS: &[FieldSpec<Column>] = &[
    FieldSpec { name: "id", column: Column::Id, kind: FieldKind::Text },
    FieldSpec { name: "role", column: Column::Role, kind: FieldKind::Text },
    FieldSpec { name: "status", column: Column::Status, kind: FieldKind::Text },
    FieldSpec { name: "full_name", column: Column::FullName, kind: FieldKind::Text },
    FieldSpec { name: "phone", column: Column::Phone, kind: FieldKind::Text },
    FieldSpec { name: "created_at", column: Column::CreatedAt, kind: FieldKind::Timestamp },
    FieldSpec { name: "deleted_at", column: Column::DeletedAt, kind: FieldKind::Timestamp },
];

impl Resource for Entity {
    const PATH: &'static str = "users_extended";
    const LABEL: &'static str = "User";

    type Id = String;
    type Active = ActiveModel;
    type Create = CreateUserExtended;
    type Update = UpdateUserExtended;

    fn fields() -> &'static [FieldSpec<Column>] {
        FIELDS
    }

    fn primary() -> Column {
        Column::Id
    }

    fn new_active(data: CreateUserExtended, _owner: Option<&str>, now: Timestamp) -> ActiveModel {
        ActiveModel {
            id: Set(data.id),
            role: Set(data.role),
            status: Set(data.status),
            full_name: Set(data.full_name),
            phone: Set(data.phone),
            created_at: Set(Some(data.created_at.unwrap_or(now))),
            deleted_at: Set(data.deleted_at),
        }
    }

    fn apply_update(am: &mut ActiveModel, p: UpdateUserExtended, _now: Timestamp) -> bool {
        let mut changed = false;
        changed |= assign(&mut am.role, p.role);
        changed |= assign(&mut am.status, p.status);
        changed |= assign(&mut am.full_name, p.full_name);
        changed |= assign_opt(&mut am.phone, p.phone);
        changed |= assign_opt(&mut am.created_at, p.created_at);
        changed |= assign_opt(&mut am.deleted_at, p.deleted_at);
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::IntoActiveModel;

    #[test]
    fn id_is_not_patchable() {
        let stored = Model {
            id: "a@example.com".into(),
            role: ROLE_DRIVER.into(),
            status: STATUS_ACTIVE.into(),
            full_name: "A".into(),
            phone: None,
            created_at: None,
            deleted_at: None,
        };
        // an "id" key in the patch body is not a field of the update payload
        let patch: UpdateUserExtended =
            serde_json::from_value(serde_json::json!({"id": "other", "status": "suspended"})).unwrap();
        let mut am = stored.into_active_model();
        assert!(Entity::apply_update(&mut am, patch, chrono::Utc::now().into()));
        assert!(matches!(am.id, sea_orm::ActiveValue::Unchanged(ref id) if id == "a@example.com"));
        assert!(matches!(am.status, sea_orm::ActiveValue::Set(ref s) if s == STATUS_SUSPENDED));
    }
}
