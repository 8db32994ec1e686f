use sea_orm::entity::prelude::*;
use sea_orm::{NotSet, Set};
use serde::{Deserialize, Serialize};

use crate::resource::{assign, assign_opt, touch, FieldKind, FieldSpec, Resource, Timestamp};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "deliveries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: String,
    pub driver_id: String,
    pub consignment_id: i32,
    pub delivery_address: String,
    pub scheduled_date: Option<DateTimeWithTimeZone>,
    pub completed_date: Option<DateTimeWithTimeZone>,
    pub status: String,
    pub route_priority: i32,
    pub signature_url: Option<String>,
    pub photo_url: Option<String>,
    pub notes: Option<String>,
    pub created_at: Option<DateTimeWithTimeZone>,
    pub updated_at: Option<DateTimeWithTimeZone>,
    pub deleted_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub const STATUS_PENDING: &str = "PENDING";
pub const STATUS_IN_PROGRESS: &str = "IN_PROGRESS";
pub const STATUS_COMPLETED: &str = "COMPLETED";

#[derive(Debug, Clone, Deserialize)]
pub struct CreateDelivery {
    pub driver_id: String,
    pub consignment_id: i32,
    pub delivery_address: String,
    pub scheduled_date: Option<Timestamp>,
    pub completed_date: Option<Timestamp>,
    pub status: String,
    pub route_priority: i32,
    pub signature_url: Option<String>,
    pub photo_url: Option<String>,
    pub notes: Option<String>,
    pub created_at: Option<Timestamp>,
    pub deleted_at: Option<Timestamp>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateDelivery {
    pub driver_id: Option<String>,
    pub consignment_id: Option<i32>,
    pub delivery_address: Option<String>,
    pub scheduled_date: Option<Timestamp>,
    pub completed_date: Option<Timestamp>,
    pub status: Option<String>,
    pub route_priority: Option<i32>,
    pub signature_url: Option<String>,
    pub photo_url: Option<String>,
    pub notes: Option<String>,
    pub created_at: Option<Timestamp>,
    pub updated_at: Option<Timestamp>,
    pub deleted_at: Option<Timestamp>,
}

const FIELDS: &[FieldSpec<Column>] = &[
    FieldSpec { name: "id", column: Column::Id, kind: FieldKind::Int },
    FieldSpec { name: "user_id", column: Column::UserId, kind: FieldKind::Text },
    FieldSpec { name: "driver_id", column: Column::DriverId, kind: FieldKind::Text },
    FieldSpec { name: "consignment_id", column: Column::ConsignmentId, kind: FieldKind::Int },
    FieldSpec { name: "delivery_address", column: Column::DeliveryAddress, kind: FieldKind::Text },
    FieldSpec { name: "scheduled_date", column: Column::ScheduledDate, kind: FieldKind::Timestamp },
    FieldSpec { name: "completed_date", column: Column::CompletedDate, kind: FieldKind::Timestamp },
    FieldSpec { name: "status", column: Column::Status, kind: FieldKind::Text },
    FieldSpec { name: "route_priority", column: Column::RoutePriority, kind: FieldKind::Int },
    FieldSpec { name: "signature_url", column: Column::SignatureUrl, kind: FieldKind::Text },
    FieldSpec { name: "photo_url", column: Column::PhotoUrl, kind: FieldKind::Text },
    FieldSpec { name: "notes", column: Column::Notes, kind: FieldKind::Text },
    FieldSpec { name: "created_at", column: Column::CreatedAt, kind: FieldKind::Timestamp },
    FieldSpec { name: "updated_at", column: Column::UpdatedAt, kind: FieldKind::Timestamp },
    FieldSpec { name: "deleted_at", column: Column::DeletedAt, kind: FieldKind::Timestamp },
];

impl Resource for Entity {
    const PATH: &'static str = "deliveries";
    const LABEL: &'static str = "Delivery";

    type Id = i32;
    type Active = ActiveModel;
    type Create = CreateDelivery;
    type Update = UpdateDelivery;

    fn fields() -> &'static [FieldSpec<Column>] {
        FIELDS
    }

    fn primary() -> Column {
        Column::Id
    }

    fn owner() -> Option<Column> {
        Some(Column::UserId)
    }

    fn new_active(data: CreateDelivery, owner: Option<&str>, now: Timestamp) -> ActiveModel {
        ActiveModel {
            id: NotSet,
            user_id: Set(owner.unwrap_or_default().to_string()),
            driver_id: Set(data.driver_id),
            consignment_id: Set(data.consignment_id),
            delivery_address: Set(data.delivery_address),
            scheduled_date: Set(data.scheduled_date),
            completed_date: Set(data.completed_date),
            status: Set(data.status),
            route_priority: Set(data.route_priority),
            signature_url: Set(data.signature_url),
            photo_url: Set(data.photo_url),
            notes: Set(data.notes),
            created_at: Set(Some(data.created_at.unwrap_or(now))),
            updated_at: Set(Some(now)),
            deleted_at: Set(data.deleted_at),
        }
    }

    fn apply_update(am: &mut ActiveModel, p: UpdateDelivery, now: Timestamp) -> bool {
        let mut changed = false;
        changed |= assign(&mut am.driver_id, p.driver_id);
        changed |= assign(&mut am.consignment_id, p.consignment_id);
        changed |= assign(&mut am.delivery_address, p.delivery_address);
        changed |= assign_opt(&mut am.scheduled_date, p.scheduled_date);
        changed |= assign_opt(&mut am.completed_date, p.completed_date);
        changed |= assign(&mut am.status, p.status);
        changed |= assign(&mut am.route_priority, p.route_priority);
        changed |= assign_opt(&mut am.signature_url, p.signature_url);
        changed |= assign_opt(&mut am.photo_url, p.photo_url);
        changed |= assign_opt(&mut am.notes, p.notes);
        changed |= assign_opt(&mut am.created_at, p.created_at);
        changed |= assign_opt(&mut am.deleted_at, p.deleted_at);
        let supplied = p.updated_at.is_some();
        changed |= assign_opt(&mut am.updated_at, p.updated_at);
        touch(&mut am.updated_at, changed, supplied, now);
        changed
    }
}
