//! Stock handed to an affiliate, owned by the caller that recorded it.
use sea_orm::entity::prelude::*;
use sea_orm::{NotSet, Set};
use serde::{Deserialize, Serialize};

use crate::resource::{assign, assign_opt, touch, FieldKind, FieldSpec, Resource, Timestamp};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "consignments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: String,
    pub affiliate_id: String,
    pub inventory_id: i32,
    pub quantity: i32,
    pub consigned_date: Option<DateTimeWithTimeZone>,
    pub return_date: Option<DateTimeWithTimeZone>,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: Option<DateTimeWithTimeZone>,
    pub updated_at: Option<DateTimeWithTimeZone>,
    pub deleted_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateConsignment {
    pub affiliate_id: String,
    pub inventory_id: i32,
    pub quantity: i32,
    pub consigned_date: Option<Timestamp>,
    pub return_date: Option<Timestamp>,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: Option<Timestamp>,
    pub deleted_at: Option<Timestamp>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateConsignment {
    pub affiliate_id: Option<String>,
    pub inventory_id: Option<i32>,
    pub quantity: Option<i32>,
    pub consigned_date: Option<Timestamp>,
    pub return_date: Option<Timestamp>,
    pub status: Option<String>,
    pub notes: Option<String>,
    pub created_at: Option<Timestamp>,
    pub updated_at: Option<Timestamp>,
    pub deleted_at: Option<Timestamp>,
}

const FIELDS: &[FieldSpec<Column>] = &[
    FieldSpec { name: "id", column: Column::Id, kind: FieldKind::Int },
    FieldSpec { name: "user_id", column: Column::UserId, kind: FieldKind::Text },
    FieldSpec { name: "affiliate_id", column: Column::AffiliateId, kind: FieldKind::Text },
    FieldSpec { name: "inventory_id", column: Column::InventoryId, kind: FieldKind::Int },
    FieldSpec { name: "quantity", column: Column::Quantity, kind: FieldKind::Int },
    FieldSpec { name: "consigned_date", column: Column::ConsignedDate, kind: FieldKind::Timestamp },
    FieldSpec { name: "return_date", column: Column::ReturnDate, kind: FieldKind::Timestamp },
    FieldSpec { name: "status", column: Column::Status, kind: FieldKind::Text },
    FieldSpec { name: "notes", column: Column::Notes, kind: FieldKind::Text },
    FieldSpec { name: "created_at", column: Column::CreatedAt, kind: FieldKind::Timestamp },
    FieldSpec { name: "updated_at", column: Column::UpdatedAt, kind: FieldKind::Timestamp },
    FieldSpec { name: "deleted_at", column: Column::DeletedAt, kind: FieldKind::Timestamp },
];

impl Resource for Entity {
    const PATH: &'static str = "consignments";
    const LABEL: &'static str = "Consignment";

    type Id = i32;
    type Active = ActiveModel;
    type Create = CreateConsignment;
    type Update = UpdateConsignment;

    fn fields() -> &'static [FieldSpec<Column>] {
        FIELDS
    }

    fn primary() -> Column {
        Column::Id
    }

    fn owner() -> Option<Column> {
        Some(Column::UserId)
    }

    fn new_active(data: CreateConsignment, owner: Option<&str>, now: Timestamp) -> ActiveModel {
        ActiveModel {
            id: NotSet,
            user_id: Set(owner.unwrap_or_default().to_string()),
            affiliate_id: Set(data.affiliate_id),
            inventory_id: Set(data.inventory_id),
            quantity: Set(data.quantity),
            consigned_date: Set(data.consigned_date),
            return_date: Set(data.return_date),
            status: Set(data.status),
            notes: Set(data.notes),
            created_at: Set(Some(data.created_at.unwrap_or(now))),
            updated_at: Set(Some(now)),
            deleted_at: Set(data.deleted_at),
        }
    }

    fn apply_update(am: &mut ActiveModel, p: UpdateConsignment, now: Timestamp) -> bool {
        let mut changed = false;
        changed |= assign(&mut am.affiliate_id, p.affiliate_id);
        changed |= assign(&mut am.inventory_id, p.inventory_id);
        changed |= assign(&mut am.quantity, p.quantity);
        changed |= assign_opt(&mut am.consigned_date, p.consigned_date);
        changed |= assign_opt(&mut am.return_date, p.return_date);
        changed |= assign(&mut am.status, p.status);
        changed |= assign_opt(&mut am.notes, p.notes);
        changed |= assign_opt(&mut am.created_at, p.created_at);
        changed |= assign_opt(&mut am.deleted_at, p.deleted_at);
        let supplied = p.updated_at.is_some();
        changed |= assign_opt(&mut am.updated_at, p.updated_at);
        touch(&mut am.updated_at, changed, supplied, now);
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::ActiveValue;

    #[test]
    fn owner_comes_from_caller() {
        // a user_id in the body is not part of the payload and never reaches the row
        let data: CreateConsignment = serde_json::from_value(serde_json::json!({
            "user_id": "mallory", "affiliate_id": "aff-1", "inventory_id": 4,
            "quantity": 2, "status": "ACTIVE"
        }))
        .unwrap();
        let am = Entity::new_active(data, Some("alice"), chrono::Utc::now().into());
        assert!(matches!(am.user_id, ActiveValue::Set(ref u) if u == "alice"));
        assert!(matches!(Entity::owner(), Some(Column::UserId)));
    }
}
