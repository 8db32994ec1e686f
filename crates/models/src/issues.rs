//! Damage or loss reports against an inventory item.
use sea_orm::entity::prelude::*;
use sea_orm::{NotSet, Set};
use serde::{Deserialize, Serialize};

use crate::resource::{assign, assign_opt, touch, FieldKind, FieldSpec, Resource, Timestamp};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "issues")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: String,
    pub affiliate_id: String,
    pub inventory_id: i32,
    pub issue_type: String,
    pub description: String,
    pub photo_url: Option<String>,
    pub status: String,
    pub created_at: Option<DateTimeWithTimeZone>,
    pub updated_at: Option<DateTimeWithTimeZone>,
    pub deleted_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateIssue {
    pub affiliate_id: String,
    pub inventory_id: i32,
    pub issue_type: String,
    pub description: String,
    pub photo_url: Option<String>,
    pub status: String,
    pub created_at: Option<Timestamp>,
    pub deleted_at: Option<Timestamp>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateIssue {
    pub affiliate_id: Option<String>,
    pub inventory_id: Option<i32>,
    pub issue_type: Option<String>,
    pub description: Option<String>,
    pub photo_url: Option<String>,
    pub status: Option<String>,
    pub created_at: Option<Timestamp>,
    pub updated_at: Option<Timestamp>,
    pub deleted_at: Option<Timestamp>,
}

const FIELDS: &[FieldSpec<Column>] = &[
    FieldSpec { name: "id", column: Column::Id, kind: FieldKind::Int },
    FieldSpec { name: "user_id", column: Column::UserId, kind: FieldKind::Text },
    FieldSpec { name: "affiliate_id", column: Column::AffiliateId, kind: FieldKind::Text },
    FieldSpec { name: "inventory_id", column: Column::InventoryId, kind: FieldKind::Int },
    FieldSpec { name: "issue_type", column: Column::IssueType, kind: FieldKind::Text },
    FieldSpec { name: "description", column: Column::Description, kind: FieldKind::Text },
    FieldSpec { name: "photo_url", column: Column::PhotoUrl, kind: FieldKind::Text },
    FieldSpec { name: "status", column: Column::Status, kind: FieldKind::Text },
    FieldSpec { name: "created_at", column: Column::CreatedAt, kind: FieldKind::Timestamp },
    FieldSpec { name: "updated_at", column: Column::UpdatedAt, kind: FieldKind::Timestamp },
    FieldSpec { name: "deleted_at", column: Column::DeletedAt, kind: FieldKind::Timestamp },
];

impl Resource for Entity {
    const PATH: &'static str = "issues";
    const LABEL: &'static str = "Issue";

    type Id = i32;
    type Active = ActiveModel;
    type Create = CreateIssue;
    type Update = UpdateIssue;

    fn fields() -> &'static [FieldSpec<Column>] {
        FIELDS
    }

    fn primary() -> Column {
        Column::Id
    }

    fn owner() -> Option<Column> {
        Some(Column::UserId)
    }

    fn new_active(data: CreateIssue, owner: Option<&str>, now: Timestamp) -> ActiveModel {
        ActiveModel {
            id: NotSet,
            user_id: Set(owner.unwrap_or_default().to_string()),
            affiliate_id: Set(data.affiliate_id),
            inventory_id: Set(data.inventory_id),
            issue_type: Set(data.issue_type),
            description: Set(data.description),
            photo_url: Set(data.photo_url),
            status: Set(data.status),
            created_at: Set(Some(data.created_at.unwrap_or(now))),
            updated_at: Set(Some(now)),
            deleted_at: Set(data.deleted_at),
        }
    }

    fn apply_update(am: &mut ActiveModel, p: UpdateIssue, now: Timestamp) -> bool {
        let mut changed = false;
        changed |= assign(&mut am.affiliate_id, p.affiliate_id);
        changed |= assign(&mut am.inventory_id, p.inventory_id);
        changed |= assign(&mut am.issue_type, p.issue_type);
        changed |= assign(&mut am.description, p.description);
        changed |= assign_opt(&mut am.photo_url, p.photo_url);
        changed |= assign(&mut am.status, p.status);
        changed |= assign_opt(&mut am.created_at, p.created_at);
        changed |= assign_opt(&mut am.deleted_at, p.deleted_at);
        let supplied = p.updated_at.is_some();
        changed |= assign_opt(&mut am.updated_at, p.updated_at);
        touch(&mut am.updated_at, changed, supplied, now);
        changed
    }
}
