//! Affiliate payouts and receipts, scoped to the recording caller.
//!
//! Payments carry a non-null `user_id` and are owner-scoped like consignments.
use sea_orm::entity::prelude::*;
use sea_orm::{NotSet, Set};
use serde::{Deserialize, Serialize};

use crate::resource::{assign, assign_opt, touch, FieldKind, FieldSpec, Resource, Timestamp};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: String,
    pub affiliate_id: String,
    pub consignment_id: Option<i32>,
    pub amount: f64,
    pub payment_type: String,
    pub payment_date: Option<DateTimeWithTimeZone>,
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
pub struct CreatePayment {
    pub affiliate_id: String,
    pub consignment_id: Option<i32>,
    pub amount: f64,
    pub payment_type: String,
    pub payment_date: Option<Timestamp>,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: Option<Timestamp>,
    pub deleted_at: Option<Timestamp>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePayment {
    pub affiliate_id: Option<String>,
    pub consignment_id: Option<i32>,
    pub amount: Option<f64>,
    pub payment_type: Option<String>,
    pub payment_date: Option<Timestamp>,
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
    FieldSpec { name: "consignment_id", column: Column::ConsignmentId, kind: FieldKind::Int },
    FieldSpec { name: "amount", column: Column::Amount, kind: FieldKind::Float },
    FieldSpec { name: "payment_type", column: Column::PaymentType, kind: FieldKind::Text },
    FieldSpec { name: "payment_date", column: Column::PaymentDate, kind: FieldKind::Timestamp },
    FieldSpec { name: "status", column: Column::Status, kind: FieldKind::Text },
    FieldSpec { name: "notes", column: Column::Notes, kind: FieldKind::Text },
    FieldSpec { name: "created_at", column: Column::CreatedAt, kind: FieldKind::Timestamp },
    FieldSpec { name: "updated_at", column: Column::UpdatedAt, kind: FieldKind::Timestamp },
    FieldSpec { name: "deleted_at", column: Column::DeletedAt, kind: FieldKind::Timestamp },
];

impl Resource for Entity {
    const PATH: &'static str = "payments";
    const LABEL: &'static str = "Payment";

    type Id = i32;
    type Active = ActiveModel;
    type Create = CreatePayment;
    type Update = UpdatePayment;

    fn fields() -> &'static [FieldSpec<Column>] {
        FIELDS
    }

    fn primary() -> Column {
        Column::Id
    }

    fn owner() -> Option<Column> {
        Some(Column::UserId)
    }

    fn new_active(data: CreatePayment, owner: Option<&str>, now: Timestamp) -> ActiveModel {
        ActiveModel {
            id: NotSet,
            user_id: Set(owner.unwrap_or_default().to_string()),
            affiliate_id: Set(data.affiliate_id),
            consignment_id: Set(data.consignment_id),
            amount: Set(data.amount),
            payment_type: Set(data.payment_type),
            payment_date: Set(data.payment_date),
            status: Set(data.status),
            notes: Set(data.notes),
            created_at: Set(Some(data.created_at.unwrap_or(now))),
            updated_at: Set(Some(now)),
            deleted_at: Set(data.deleted_at),
        }
    }

    fn apply_update(am: &mut ActiveModel, p: UpdatePayment, now: Timestamp) -> bool {
        let mut changed = false;
        changed |= assign(&mut am.affiliate_id, p.affiliate_id);
        changed |= assign_opt(&mut am.consignment_id, p.consignment_id);
        changed |= assign(&mut am.amount, p.amount);
        changed |= assign(&mut am.payment_type, p.payment_type);
        changed |= assign_opt(&mut am.payment_date, p.payment_date);
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
