//! Warehouse stock. Global: every caller sees every row.
use sea_orm::entity::prelude::*;
use sea_orm::{NotSet, Set};
use serde::{Deserialize, Serialize};

use crate::resource::{assign, assign_opt, touch, FieldKind, FieldSpec, Resource, Timestamp};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "inventory")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub sku: String,
    pub product_name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub unit_cost: f64,
    pub retail_price: f64,
    pub status: String,
    pub location: Option<String>,
    pub barcode: Option<String>,
    pub created_at: Option<DateTimeWithTimeZone>,
    pub updated_at: Option<DateTimeWithTimeZone>,
    pub deleted_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub const STATUS_WAREHOUSE: &str = "WAREHOUSE";
pub const STATUS_CONSIGNED: &str = "CONSIGNED";
pub const STATUS_SOLD: &str = "SOLD";

#[derive(Debug, Clone, Deserialize)]
pub struct CreateInventory {
    pub sku: String,
    pub product_name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub unit_cost: f64,
    pub retail_price: f64,
    pub status: String,
    pub location: Option<String>,
    pub barcode: Option<String>,
    pub created_at: Option<Timestamp>,
    pub deleted_at: Option<Timestamp>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateInventory {
    pub sku: Option<String>,
    pub product_name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub unit_cost: Option<f64>,
    pub retail_price: Option<f64>,
    pub status: Option<String>,
    pub location: Option<String>,
    pub barcode: Option<String>,
    pub created_at: Option<Timestamp>,
    pub updated_at: Option<Timestamp>,
    pub deleted_at: Option<Timestamp>,
}

const FIELDS: &[FieldSpec<Column>] = &[
    FieldSpec { name: "id", column: Column::Id, kind: FieldKind::Int },
    FieldSpec { name: "sku", column: Column::Sku, kind: FieldKind::Text },
    FieldSpec { name: "product_name", column: Column::ProductName, kind: FieldKind::Text },
    FieldSpec { name: "description", column: Column::Description, kind: FieldKind::Text },
    FieldSpec { name: "category", column: Column::Category, kind: FieldKind::Text },
    FieldSpec { name: "unit_cost", column: Column::UnitCost, kind: FieldKind::Float },
    FieldSpec { name: "retail_price", column: Column::RetailPrice, kind: FieldKind::Float },
    FieldSpec { name: "status", column: Column::Status, kind: FieldKind::Text },
    FieldSpec { name: "location", column: Column::Location, kind: FieldKind::Text },
    FieldSpec { name: "barcode", column: Column::Barcode, kind: FieldKind::Text },
    FieldSpec { name: "created_at", column: Column::CreatedAt, kind: FieldKind::Timestamp },
    FieldSpec { name: "updated_at", column: Column::UpdatedAt, kind: FieldKind::Timestamp },
    FieldSpec { name: "deleted_at", column: Column::DeletedAt, kind: FieldKind::Timestamp },
];

impl Resource for Entity {
    const PATH: &'static str = "inventory";
    const LABEL: &'static str = "Inventory";

    type Id = i32;
    type Active = ActiveModel;
    type Create = CreateInventory;
    type Update = UpdateInventory;

    fn fields() -> &'static [FieldSpec<Column>] {
        FIELDS
    }

    fn primary() -> Column {
        Column::Id
    }

    fn new_active(data: CreateInventory, _owner: Option<&str>, now: Timestamp) -> ActiveModel {
        ActiveModel {
            id: NotSet,
            sku: Set(data.sku),
            product_name: Set(data.product_name),
            description: Set(data.description),
            category: Set(data.category),
            unit_cost: Set(data.unit_cost),
            retail_price: Set(data.retail_price),
            status: Set(data.status),
            location: Set(data.location),
            barcode: Set(data.barcode),
            created_at: Set(Some(data.created_at.unwrap_or(now))),
            updated_at: Set(Some(now)),
            deleted_at: Set(data.deleted_at),
        }
    }

    fn apply_update(am: &mut ActiveModel, p: UpdateInventory, now: Timestamp) -> bool {
        let mut changed = false;
        changed |= assign(&mut am.sku, p.sku);
        changed |= assign(&mut am.product_name, p.product_name);
        changed |= assign_opt(&mut am.description, p.description);
        changed |= assign_opt(&mut am.category, p.category);
        changed |= assign(&mut am.unit_cost, p.unit_cost);
        changed |= assign(&mut am.retail_price, p.retail_price);
        changed |= assign(&mut am.status, p.status);
        changed |= assign_opt(&mut am.location, p.location);
        changed |= assign_opt(&mut am.barcode, p.barcode);
        changed |= assign_opt(&mut am.created_at, p.created_at);
        changed |= assign_opt(&mut am.deleted_at, p.deleted_at);
        let supplied = p.updated_at.is_some();
        changed |= assign_opt(&mut am.updated_at, p.updated_at);
        touch(&mut am.updated_at, changed, supplied, now);
        changed
    }
}
