//! Change history rows. Not owned; `user_id` records the actor only.
use sea_orm::entity::prelude::*;
use sea_orm::{NotSet, Set};
use serde::{Deserialize, Serialize};

use crate::resource::{assign, assign_opt, FieldKind, FieldSpec, Resource, Timestamp};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "audit_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub table_name: String,
    pub record_id: String,
    pub action: String,
    pub old_data: Option<String>,
    pub new_data: String,
    pub user_id: Option<String>,
    pub created_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateAuditLog {
    pub table_name: String,
    pub record_id: String,
    pub action: String,
    pub old_data: Option<String>,
    pub new_data: String,
    pub user_id: Option<String>,
    pub created_at: Option<Timestamp>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAuditLog {
    pub table_name: Option<String>,
    pub record_id: Option<String>,
    pub action: Option<String>,
    pub old_data: Option<String>,
    pub new_data: Option<String>,
    pub user_id: Option<String>,
    pub created_at: Option<Timestamp>,
}

const FIELDS: &[FieldSpec<Column>] = &[
    FieldSpec { name: "id", column: Column::Id, kind: FieldKind::Int },
    FieldSpec { name: "table_name", column: Column::TableName, kind: FieldKind::Text },
    FieldSpec { name: "record_id", column: Column::RecordId, kind: FieldKind::Text },
    FieldSpec { name: "action", column: Column::Action, kind: FieldKind::Text },
    FieldSpec { name: "old_data", column: Column::OldData, kind: FieldKind::Text },
    FieldSpec { name: "new_data", column: Column::NewData, kind: FieldKind::Text },
    FieldSpec { name: "user_id", column: Column::UserId, kind: FieldKind::Text },
    FieldSpec { name: "created_at", column: Column::CreatedAt, kind: FieldKind::Timestamp },
];

impl Resource for Entity {
    const PATH: &'static str = "audit_logs";
    const LABEL: &'static str = "Audit log";

    type Id = i32;
    type Active = ActiveModel;
    type Create = CreateAuditLog;
    type Update = UpdateAuditLog;

    fn fields() -> &'static [FieldSpec<Column>] {
        FIELDS
    }

    fn primary() -> Column {
        Column::Id
    }

    fn new_active(data: CreateAuditLog, _owner: Option<&str>, now: Timestamp) -> ActiveModel {
        ActiveModel {
            id: NotSet,
            table_name: Set(data.table_name),
            record_id: Set(data.record_id),
            action: Set(data.action),
            old_data: Set(data.old_data),
            new_data: Set(data.new_data),
            user_id: Set(data.user_id),
            created_at: Set(Some(data.created_at.unwrap_or(now))),
        }
    }

    fn apply_update(am: &mut ActiveModel, p: UpdateAuditLog, _now: Timestamp) -> bool {
        let mut changed = false;
        changed |= assign(&mut am.table_name, p.table_name);
        changed |= assign(&mut am.record_id, p.record_id);
        changed |= assign(&mut am.action, p.action);
        changed |= assign_opt(&mut am.old_data, p.old_data);
        changed |= assign(&mut am.new_data, p.new_data);
        changed |= assign_opt(&mut am.user_id, p.user_id);
        changed |= assign_opt(&mut am.created_at, p.created_at);
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actor_is_data_not_owner() {
        assert!(!Entity::scoped());
        let data: CreateAuditLog = serde_json::from_value(serde_json::json!({
            "table_name": "inventory", "record_id": "12", "action": "UPDATE",
            "new_data": "{}", "user_id": "bob"
        }))
        .unwrap();
        let am = Entity::new_active(data, Some("alice"), chrono::Utc::now().into());
        assert!(matches!(am.user_id, sea_orm::ActiveValue::Set(Some(ref u)) if u == "bob"));
    }
}
