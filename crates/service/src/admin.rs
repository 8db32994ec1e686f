//! Admin-only operations: user provisioning, status changes, platform counts
//! and the audit-log viewer. Every entry point assumes `require_admin` passed.

use models::{audit_logs, deliveries, inventory, users_extended};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, IntoActiveModel, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::crud::CrudService;
use crate::errors::ServiceError;
use crate::query::Page;

pub const AUDIT_DEFAULT_LIMIT: u64 = 50;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub role: String,
    /// Accepted for compatibility; credentials live with the auth provider.
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateUserResponse {
    pub success: bool,
    pub user_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateUserStatusRequest {
    pub user_id: String,
    pub status: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateUserStatusResponse {
    pub success: bool,
    pub user_id: String,
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Analytics {
    pub total_inventory: u64,
    pub warehouse_count: u64,
    pub consigned_count: u64,
    pub sold_count: u64,
    pub total_affiliates: u64,
    pub active_deliveries: u64,
}

#[derive(Debug, Serialize)]
pub struct AuditLogPage {
    pub logs: Vec<audit_logs::Model>,
    pub total: u64,
}

pub struct AdminService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> AdminService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn require_admin(&self, caller: &str) -> Result<users_extended::Model, ServiceError> {
        let found = users_extended::Entity::find_by_id(caller.to_string()).one(self.db).await?;
        match found {
            Some(user) if user.role == users_extended::ROLE_ADMIN => Ok(user),
            _ => {
                warn!(caller, "admin access denied");
                Err(ServiceError::Forbidden("Admin access required".into()))
            }
        }
    }

    pub async fn create_user(&self, req: CreateUserRequest) -> Result<CreateUserResponse, ServiceError> {
        validate_create(&req)?;
        let email = req.email.trim().to_string();
        if users_extended::Entity::find_by_id(email.clone()).one(self.db).await?.is_some() {
            return Err(ServiceError::Conflict(format!("User {} already exists", email)));
        }
        let am = users_extended::ActiveModel {
            id: Set(email),
            role: Set(req.role),
            status: Set(users_extended::STATUS_ACTIVE.to_string()),
            full_name: Set(req.full_name),
            phone: Set(req.phone),
            created_at: Set(Some(chrono::Utc::now().into())),
            deleted_at: Set(None),
        };
        let user = am.insert(self.db).await?;
        info!(user_id = %user.id, role = %user.role, "user created");
        Ok(CreateUserResponse { success: true, user_id: user.id })
    }

    pub async fn update_user_status(&self, req: UpdateUserStatusRequest) -> Result<UpdateUserStatusResponse, ServiceError> {
        if !users_extended::STATUSES.contains(&req.status.as_str()) {
            return Err(ServiceError::Validation(format!(
                "status must be one of: {}",
                users_extended::STATUSES.join(", ")
            )));
        }
        let user = users_extended::Entity::find_by_id(req.user_id.clone())
            .one(self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("User"))?;
        let mut am = user.into_active_model();
        am.status = Set(req.status);
        let user = am.update(self.db).await?;
        info!(user_id = %user.id, status = %user.status, "user status updated");
        Ok(UpdateUserStatusResponse { success: true, user_id: user.id, status: user.status })
    }

    pub async fn analytics(&self) -> Result<Analytics, ServiceError> {
        let inv = CrudService::<inventory::Entity>::new(self.db);
        let by_status = |s: &str| Condition::all().add(inventory::Column::Status.eq(s));
        let users = CrudService::<users_extended::Entity>::new(self.db);
        let deliveries = CrudService::<deliveries::Entity>::new(self.db);

        Ok(Analytics {
            total_inventory: inv.count_where(Condition::all()).await?,
            warehouse_count: inv.count_where(by_status(inventory::STATUS_WAREHOUSE)).await?,
            consigned_count: inv.count_where(by_status(inventory::STATUS_CONSIGNED)).await?,
            sold_count: inv.count_where(by_status(inventory::STATUS_SOLD)).await?,
            total_affiliates: users
                .count_where(Condition::all().add(users_extended::Column::Role.eq(users_extended::ROLE_AFFILIATE)))
                .await?,
            active_deliveries: deliveries
                .count_where(Condition::all().add(
                    deliveries::Column::Status.is_in([deliveries::STATUS_PENDING, deliveries::STATUS_IN_PROGRESS]),
                ))
                .await?,
        })
    }

    /// Newest first; `total` counts every row matching the table filter.
    pub async fn audit_logs(&self, page: Page, table_name: Option<&str>) -> Result<AuditLogPage, ServiceError> {
        let mut select = audit_logs::Entity::find();
        if let Some(t) = table_name.filter(|t| !t.is_empty()) {
            select = select.filter(audit_logs::Column::TableName.eq(t));
        }
        let total = select.clone().count(self.db).await?;
        let logs = select
            .order_by_desc(audit_logs::Column::CreatedAt)
            .order_by_desc(audit_logs::Column::Id)
            .offset(page.skip)
            .limit(page.limit)
            .all(self.db)
            .await?;
        Ok(AuditLogPage { logs, total })
    }
}

fn validate_create(req: &CreateUserRequest) -> Result<(), ServiceError> {
    if !req.email.contains('@') {
        return Err(ServiceError::Validation("invalid email".into()));
    }
    if req.full_name.trim().is_empty() {
        return Err(ServiceError::Validation("full_name required".into()));
    }
    if !users_extended::ROLES.contains(&req.role.as_str()) {
        return Err(ServiceError::Validation(format!("role must be one of: {}", users_extended::ROLES.join(", "))));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;
    use uuid::Uuid;

    fn request(role: &str) -> CreateUserRequest {
        CreateUserRequest {
            email: format!("admin_{}@example.com", Uuid::new_v4()),
            full_name: "Test Admin".into(),
            phone: Some("555-0100".into()),
            role: role.into(),
            password: Some("secret".into()),
        }
    }

    #[test]
    fn create_request_validation() {
        assert!(validate_create(&request("driver")).is_ok());
        assert!(matches!(validate_create(&request("root")), Err(ServiceError::Validation(_))));
        let mut bad = request("admin");
        bad.email = "not-an-email".into();
        assert!(validate_create(&bad).is_err());
    }

    #[tokio::test]
    async fn admin_user_lifecycle() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let Some(db) = get_db().await? else { return Ok(()); };
        let admin = AdminService::new(&db);

        let created = admin.create_user(request("affiliate")).await?;
        assert!(created.success);
        assert!(matches!(
            admin.require_admin(&created.user_id).await,
            Err(ServiceError::Forbidden(_))
        ));
        assert!(matches!(
            admin.require_admin("nobody@example.com").await,
            Err(ServiceError::Forbidden(_))
        ));

        let dup = CreateUserRequest { email: created.user_id.clone(), ..request("driver") };
        assert!(matches!(admin.create_user(dup).await, Err(ServiceError::Conflict(_))));

        let suspended = admin
            .update_user_status(UpdateUserStatusRequest { user_id: created.user_id.clone(), status: "suspended".into() })
            .await?;
        assert_eq!(suspended.status, "suspended");
        assert!(matches!(
            admin
                .update_user_status(UpdateUserStatusRequest { user_id: created.user_id.clone(), status: "banned".into() })
                .await,
            Err(ServiceError::Validation(_))
        ));
        assert!(matches!(
            admin
                .update_user_status(UpdateUserStatusRequest { user_id: "ghost@example.com".into(), status: "active".into() })
                .await,
            Err(ServiceError::NotFound(_))
        ));

        let boss = admin.create_user(request("admin")).await?;
        assert_eq!(admin.require_admin(&boss.user_id).await?.role, "admin");

        users_extended::Entity::delete_by_id(created.user_id).exec(&db).await?;
        users_extended::Entity::delete_by_id(boss.user_id).exec(&db).await?;
        Ok(())
    }

    #[tokio::test]
    async fn audit_log_total_counts_filtered_rows() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let Some(db) = get_db().await? else { return Ok(()); };
        let table = format!("t_{}", Uuid::new_v4().simple());
        for i in 0..3 {
            audit_logs::ActiveModel {
                table_name: Set(table.clone()),
                record_id: Set(i.to_string()),
                action: Set("INSERT".into()),
                new_data: Set("{}".into()),
                created_at: Set(Some(chrono::Utc::now().into())),
                ..Default::default()
            }
            .insert(&db)
            .await?;
        }
        let admin = AdminService::new(&db);
        let page = admin.audit_logs(Page::with_default(None, Some(2), AUDIT_DEFAULT_LIMIT)?, Some(&table)).await?;
        assert_eq!(page.total, 3);
        assert_eq!(page.logs.len(), 2);
        assert_eq!(page.logs[0].record_id, "2");

        audit_logs::Entity::delete_many()
            .filter(audit_logs::Column::TableName.eq(table))
            .exec(&db)
            .await?;
        Ok(())
    }
}
