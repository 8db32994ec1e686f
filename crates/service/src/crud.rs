//! Generic CRUD service shared by every routable entity.
//!
//! Each single-row mutation runs in its own transaction. Batch policies:
//! create commits item by item and stops at the first failure, update is best
//! effort with a per-item outcome, delete is one transaction for the whole list.

use std::marker::PhantomData;

use models::resource::{Resource, Timestamp};
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection,
    DatabaseTransaction, DbErr, EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::errors::ServiceError;
use crate::query::{Filter, Page, SortSpec};

#[derive(Debug, Serialize)]
pub struct ListPage<M> {
    pub items: Vec<M>,
    pub total: u64,
    pub skip: u64,
    pub limit: u64,
}

#[derive(Debug, Deserialize)]
pub struct BatchUpdateItem<I, U> {
    pub id: I,
    pub updates: U,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    Updated,
    NotFound,
    Failed,
}

#[derive(Debug, Serialize)]
pub struct BatchItemOutcome<I, M> {
    pub id: I,
    pub status: BatchStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<M>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn now() -> Timestamp {
    chrono::Utc::now().into()
}

async fn rollback(txn: DatabaseTransaction) {
    if let Err(e) = txn.rollback().await {
        warn!(error = %e, "rollback failed");
    }
}

pub struct CrudService<'a, E> {
    db: &'a DatabaseConnection,
    _entity: PhantomData<E>,
}

impl<'a, E> CrudService<'a, E>
where
    E: Resource,
    E::Model: IntoActiveModel<E::Active> + Serialize + Sync,
    E::Active: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
{
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db, _entity: PhantomData }
    }

    /// Owner predicate for scoped entities; `None` means unrestricted.
    fn owned(owner: Option<&str>) -> Condition {
        let mut cond = Condition::all();
        if let (Some(column), Some(user)) = (E::owner(), owner) {
            cond = cond.add(column.eq(user));
        }
        cond
    }

    async fn find_owned<C: ConnectionTrait>(conn: &C, id: E::Id, owner: Option<&str>) -> Result<Option<E::Model>, DbErr> {
        E::find()
            .filter(E::primary().eq(id))
            .filter(Self::owned(owner))
            .one(conn)
            .await
    }

    async fn delete_owned<C: ConnectionTrait>(conn: &C, id: E::Id, owner: Option<&str>) -> Result<u64, DbErr> {
        let res = E::delete_many()
            .filter(E::primary().eq(id))
            .filter(Self::owned(owner))
            .exec(conn)
            .await?;
        Ok(res.rows_affected)
    }

    pub async fn list(&self, filter: &Filter, sort: &SortSpec, page: Page, owner: Option<&str>) -> Result<ListPage<E::Model>, ServiceError> {
        let cond = filter.conditions::<E>()?.add(Self::owned(owner));
        let total = E::find().filter(cond.clone()).count(self.db).await?;

        let mut select = E::find().filter(cond);
        for (column, order) in sort.order::<E>() {
            select = select.order_by(column, order);
        }
        let items = select.offset(page.skip).limit(page.limit).all(self.db).await?;
        debug!(resource = E::PATH, total, returned = items.len(), skip = page.skip, limit = page.limit, "list");
        Ok(ListPage { items, total, skip: page.skip, limit: page.limit })
    }

    pub async fn get(&self, id: E::Id, owner: Option<&str>) -> Result<Option<E::Model>, ServiceError> {
        Ok(Self::find_owned(self.db, id, owner).await?)
    }

    pub async fn create(&self, data: E::Create, owner: Option<&str>) -> Result<E::Model, ServiceError> {
        if E::scoped() && owner.is_none() {
            return Err(ServiceError::Validation(format!("{} requires an owning user", E::PATH)));
        }
        let txn = self.db.begin().await?;
        match E::new_active(data, owner, now()).insert(&txn).await {
            Ok(model) => {
                txn.commit().await?;
                info!(resource = E::PATH, "created");
                Ok(model)
            }
            Err(e) => {
                error!(resource = E::PATH, error = %e, "create failed");
                rollback(txn).await;
                Err(e.into())
            }
        }
    }

    /// Items before the first failure stay committed.
    pub async fn create_batch(&self, items: Vec<E::Create>, owner: Option<&str>) -> Result<Vec<E::Model>, ServiceError> {
        let mut created = Vec::with_capacity(items.len());
        for (index, data) in items.into_iter().enumerate() {
            match self.create(data, owner).await {
                Ok(model) => created.push(model),
                Err(e) => {
                    error!(resource = E::PATH, index, committed = created.len(), error = %e, "batch create aborted");
                    return Err(ServiceError::batch("Batch create failed", e));
                }
            }
        }
        info!(resource = E::PATH, count = created.len(), "batch created");
        Ok(created)
    }

    async fn update_in(txn: &DatabaseTransaction, id: E::Id, patch: E::Update, owner: Option<&str>) -> Result<Option<E::Model>, ServiceError> {
        let Some(model) = Self::find_owned(txn, id, owner).await? else {
            return Ok(None);
        };
        let mut active: E::Active = model.clone().into_active_model();
        if !E::apply_update(&mut active, patch, now()) {
            return Ok(Some(model));
        }
        Ok(Some(active.update(txn).await?))
    }

    pub async fn update(&self, id: E::Id, patch: E::Update, owner: Option<&str>) -> Result<Option<E::Model>, ServiceError> {
        let txn = self.db.begin().await?;
        match Self::update_in(&txn, id.clone(), patch, owner).await {
            Ok(Some(model)) => {
                txn.commit().await?;
                info!(resource = E::PATH, %id, "updated");
                Ok(Some(model))
            }
            Ok(None) => {
                warn!(resource = E::PATH, %id, "update target not found");
                rollback(txn).await;
                Ok(None)
            }
            Err(e) => {
                error!(resource = E::PATH, %id, error = %e, "update failed");
                rollback(txn).await;
                Err(e)
            }
        }
    }

    /// Best effort: every item gets its own transaction and outcome.
    pub async fn update_batch(
        &self,
        items: Vec<BatchUpdateItem<E::Id, E::Update>>,
        owner: Option<&str>,
    ) -> Vec<BatchItemOutcome<E::Id, E::Model>> {
        let mut outcomes = Vec::with_capacity(items.len());
        for BatchUpdateItem { id, updates } in items {
            let outcome = match self.update(id.clone(), updates, owner).await {
                Ok(Some(model)) => BatchItemOutcome { id, status: BatchStatus::Updated, item: Some(model), error: None },
                Ok(None) => BatchItemOutcome { id, status: BatchStatus::NotFound, item: None, error: None },
                Err(_) => BatchItemOutcome {
                    id,
                    status: BatchStatus::Failed,
                    item: None,
                    error: Some("Update failed".to_string()),
                },
            };
            outcomes.push(outcome);
        }
        let updated = outcomes.iter().filter(|o| o.status == BatchStatus::Updated).count();
        info!(resource = E::PATH, requested = outcomes.len(), updated, "batch updated");
        outcomes
    }

    pub async fn delete(&self, id: E::Id, owner: Option<&str>) -> Result<bool, ServiceError> {
        let txn = self.db.begin().await?;
        match Self::delete_owned(&txn, id.clone(), owner).await {
            Ok(0) => {
                warn!(resource = E::PATH, %id, "delete target not found");
                rollback(txn).await;
                Ok(false)
            }
            Ok(_) => {
                txn.commit().await?;
                info!(resource = E::PATH, %id, "deleted");
                Ok(true)
            }
            Err(e) => {
                error!(resource = E::PATH, %id, error = %e, "delete failed");
                rollback(txn).await;
                Err(e.into())
            }
        }
    }

    /// One transaction; missing ids are skipped, any database error undoes the batch.
    pub async fn delete_batch(&self, ids: Vec<E::Id>, owner: Option<&str>) -> Result<u64, ServiceError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| ServiceError::batch("Batch delete failed", e))?;
        let mut deleted = 0u64;
        for id in ids {
            match Self::delete_owned(&txn, id.clone(), owner).await {
                Ok(0) => debug!(resource = E::PATH, %id, "batch delete skipped missing id"),
                Ok(n) => deleted += n,
                Err(e) => {
                    error!(resource = E::PATH, %id, error = %e, "batch delete rolled back");
                    rollback(txn).await;
                    return Err(ServiceError::batch("Batch delete failed", e));
                }
            }
        }
        txn.commit().await.map_err(|e| ServiceError::batch("Batch delete failed", e))?;
        info!(resource = E::PATH, deleted, "batch deleted");
        Ok(deleted)
    }

    pub async fn count_where(&self, cond: Condition) -> Result<u64, ServiceError> {
        Ok(E::find().filter(cond).count(self.db).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::parse_filter;
    use crate::test_support::get_db;
    use models::{consignments, inventory, users_extended};
    use uuid::Uuid;

    fn item(batch: &str, sku: &str, price: f64) -> inventory::CreateInventory {
        inventory::CreateInventory {
            sku: sku.to_string(),
            product_name: "Widget".into(),
            description: None,
            category: Some(batch.to_string()),
            unit_cost: 1.0,
            retail_price: price,
            status: inventory::STATUS_WAREHOUSE.into(),
            location: None,
            barcode: None,
            created_at: None,
            deleted_at: None,
        }
    }

    fn consignment(quantity: i32) -> consignments::CreateConsignment {
        consignments::CreateConsignment {
            affiliate_id: "aff".into(),
            inventory_id: 1,
            quantity,
            consigned_date: None,
            return_date: None,
            status: "ACTIVE".into(),
            notes: None,
            created_at: None,
            deleted_at: None,
        }
    }

    fn category_filter(batch: &str) -> Filter {
        let raw = serde_json::json!({ "category": batch }).to_string();
        parse_filter(Some(raw.as_str())).unwrap()
    }

    #[tokio::test]
    async fn inventory_crud_roundtrip() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let Some(db) = get_db().await? else { return Ok(()); };
        let svc = CrudService::<inventory::Entity>::new(&db);
        let batch = Uuid::new_v4().to_string();

        let a = svc.create(item(&batch, "A", 5.0), None).await?;
        let b = svc.create(item(&batch, "B", 7.0), None).await?;
        assert!(b.id > a.id);
        assert!(a.created_at.is_some() && a.updated_at.is_some());

        let found = svc.get(a.id, None).await?.unwrap();
        assert_eq!(found.sku, "A");

        // empty diff is a no-op
        let same = svc.update(a.id, inventory::UpdateInventory::default(), None).await?.unwrap();
        assert_eq!(same, found);

        let patch = inventory::UpdateInventory { status: Some(inventory::STATUS_SOLD.into()), ..Default::default() };
        let sold = svc.update(a.id, patch, None).await?.unwrap();
        assert_eq!(sold.status, "SOLD");
        assert_eq!(sold.sku, "A");
        assert_eq!(sold.category.as_deref(), Some(batch.as_str()));

        assert!(svc.update(-1, inventory::UpdateInventory::default(), None).await?.is_none());

        assert!(svc.delete(a.id, None).await?);
        assert!(!svc.delete(a.id, None).await?);
        assert!(svc.get(a.id, None).await?.is_none());
        svc.delete(b.id, None).await?;
        Ok(())
    }

    #[tokio::test]
    async fn list_paginates_filters_and_sorts() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let Some(db) = get_db().await? else { return Ok(()); };
        let svc = CrudService::<inventory::Entity>::new(&db);
        let batch = Uuid::new_v4().to_string();
        let prices = [3.0, 9.0, 1.0, 5.0, 7.0];
        let created = svc
            .create_batch(prices.iter().enumerate().map(|(i, p)| item(&batch, &format!("S{}", i), *p)).collect(), None)
            .await?;
        assert_eq!(created.len(), 5);

        let filter = category_filter(&batch);
        let page = svc.list(&filter, &SortSpec::parse(None), Page::new(Some(1), Some(2))?, None).await?;
        assert_eq!(page.total, 5);
        assert_eq!(page.items.len(), 2);
        assert_eq!((page.skip, page.limit), (1, 2));
        // default order is id descending
        assert_eq!(page.items[0].id, created[3].id);

        let by_price = svc.list(&filter, &SortSpec::parse(Some("-retail_price")), Page::default(), None).await?;
        let got: Vec<f64> = by_price.items.iter().map(|m| m.retail_price).collect();
        assert_eq!(got, vec![9.0, 7.0, 5.0, 3.0, 1.0]);

        let ids: Vec<i32> = created.iter().map(|m| m.id).collect();
        assert_eq!(svc.delete_batch(ids, None).await?, 5);
        Ok(())
    }

    #[tokio::test]
    async fn ownership_isolates_callers() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let Some(db) = get_db().await? else { return Ok(()); };
        let svc = CrudService::<consignments::Entity>::new(&db);
        let alice = format!("alice_{}", Uuid::new_v4());
        let bob = format!("bob_{}", Uuid::new_v4());

        let mine = svc.create(consignment(3), Some(&alice)).await?;
        assert_eq!(mine.user_id, alice);
        assert!(matches!(svc.create(consignment(1), None).await, Err(ServiceError::Validation(_))));

        let none = Filter::default();
        let sort = SortSpec::default();
        assert_eq!(svc.list(&none, &sort, Page::default(), Some(&bob)).await?.total, 0);
        assert_eq!(svc.list(&none, &sort, Page::default(), Some(&alice)).await?.total, 1);
        assert!(svc.get(mine.id, Some(&bob)).await?.is_none());

        let patch = consignments::UpdateConsignment { quantity: Some(99), ..Default::default() };
        assert!(svc.update(mine.id, patch, Some(&bob)).await?.is_none());
        assert!(!svc.delete(mine.id, Some(&bob)).await?);
        assert_eq!(svc.delete_batch(vec![mine.id], Some(&bob)).await?, 0);

        // unscoped read still sees it, untouched
        let stored = svc.get(mine.id, None).await?.unwrap();
        assert_eq!(stored.quantity, 3);

        assert!(svc.delete(mine.id, Some(&alice)).await?);
        Ok(())
    }

    #[tokio::test]
    async fn batch_update_reports_each_item() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let Some(db) = get_db().await? else { return Ok(()); };
        let svc = CrudService::<consignments::Entity>::new(&db);
        let owner = format!("owner_{}", Uuid::new_v4());
        let a = svc.create(consignment(1), Some(&owner)).await?;
        let b = svc.create(consignment(2), Some(&owner)).await?;

        let items = vec![
            BatchUpdateItem { id: a.id, updates: consignments::UpdateConsignment { quantity: Some(10), ..Default::default() } },
            BatchUpdateItem { id: -5, updates: consignments::UpdateConsignment { quantity: Some(10), ..Default::default() } },
            BatchUpdateItem { id: b.id, updates: consignments::UpdateConsignment { status: Some("RETURNED".into()), ..Default::default() } },
        ];
        let outcomes = svc.update_batch(items, Some(&owner)).await;
        let statuses: Vec<BatchStatus> = outcomes.iter().map(|o| o.status).collect();
        assert_eq!(statuses, vec![BatchStatus::Updated, BatchStatus::NotFound, BatchStatus::Updated]);
        assert_eq!(outcomes[0].item.as_ref().map(|m| m.quantity), Some(10));
        assert_eq!(outcomes[2].item.as_ref().map(|m| m.status.as_str()), Some("RETURNED"));

        assert_eq!(svc.delete_batch(vec![a.id, -5, b.id, a.id], Some(&owner)).await?, 2);
        Ok(())
    }

    #[tokio::test]
    async fn batch_create_keeps_items_before_failure() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let Some(db) = get_db().await? else { return Ok(()); };
        let svc = CrudService::<users_extended::Entity>::new(&db);
        let user = |id: &str| users_extended::CreateUserExtended {
            id: id.to_string(),
            role: users_extended::ROLE_DRIVER.into(),
            status: users_extended::STATUS_ACTIVE.into(),
            full_name: "Driver".into(),
            phone: None,
            created_at: None,
            deleted_at: None,
        };
        let first = format!("{}@example.com", Uuid::new_v4());
        let second = format!("{}@example.com", Uuid::new_v4());

        let err = svc.create_batch(vec![user(&first), user(&second), user(&first)], None).await.unwrap_err();
        assert!(matches!(err, ServiceError::Batch { message: "Batch create failed", .. }));
        assert!(svc.get(first.clone(), None).await?.is_some());
        assert!(svc.get(second.clone(), None).await?.is_some());

        assert_eq!(svc.delete_batch(vec![first, second], None).await?, 2);
        Ok(())
    }
}
