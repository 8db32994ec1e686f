//! The nine routes every entity gets under `/api/v1/entities/{path}`.

use std::marker::PhantomData;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use models::Resource;
use sea_orm::{ActiveModelBehavior, ActiveModelTrait, IntoActiveModel};
use serde::{Deserialize, Serialize};
use service::crud::{BatchItemOutcome, BatchUpdateItem, CrudService, ListPage};
use service::query::{parse_filter, Page, SortSpec};

use crate::errors::ApiError;
use crate::extract::Caller;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub query: Option<String>,
    pub sort: Option<String>,
    pub skip: Option<u64>,
    pub limit: Option<u64>,
    /// Accepted for compatibility; responses always carry every column.
    pub fields: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BatchCreate<C> {
    pub items: Vec<C>,
}

#[derive(Debug, Deserialize)]
pub struct BatchUpdate<I, U> {
    pub items: Vec<BatchUpdateItem<I, U>>,
}

#[derive(Debug, Deserialize)]
pub struct BatchDelete<I> {
    pub ids: Vec<I>,
}

#[derive(Debug, Serialize)]
pub struct Deleted<I> {
    pub message: String,
    pub id: I,
}

#[derive(Debug, Serialize)]
pub struct BatchDeleted {
    pub message: String,
    pub deleted_count: u64,
}

pub struct EntityRoutes<E>(PhantomData<E>);

impl<E> EntityRoutes<E>
where
    E: Resource,
    E::Model: IntoActiveModel<E::Active> + Serialize + Sync,
    E::Active: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
{
    pub fn router() -> Router<AppState> {
        Router::new()
            .route("/", get(Self::list).post(Self::create))
            .route("/all", get(Self::list_all))
            .route("/batch", post(Self::create_batch).put(Self::update_batch).delete(Self::delete_batch))
            .route("/:id", get(Self::get).put(Self::update).delete(Self::delete))
    }

    /// Owner for scoped entities (401 without a caller); unscoped entities ignore it.
    fn owner(caller: Caller) -> Result<Option<String>, ApiError> {
        if E::scoped() {
            caller.require().map(Some)
        } else {
            Ok(None)
        }
    }

    async fn run_list(state: &AppState, params: ListParams, owner: Option<&str>) -> Result<Json<ListPage<E::Model>>, ApiError> {
        let filter = parse_filter(params.query.as_deref())?;
        let sort = SortSpec::parse(params.sort.as_deref());
        let page = Page::new(params.skip, params.limit)?;
        let db = state.conn().await?;
        let page = CrudService::<E>::new(db).list(&filter, &sort, page, owner).await?;
        Ok(Json(page))
    }

    async fn list(
        State(state): State<AppState>,
        caller: Caller,
        params: Result<Query<ListParams>, QueryRejection>,
    ) -> Result<Json<ListPage<E::Model>>, ApiError> {
        let owner = Self::owner(caller)?;
        let Query(params) = params?;
        Self::run_list(&state, params, owner.as_deref()).await
    }

    async fn list_all(
        State(state): State<AppState>,
        params: Result<Query<ListParams>, QueryRejection>,
    ) -> Result<Json<ListPage<E::Model>>, ApiError> {
        let Query(params) = params?;
        Self::run_list(&state, params, None).await
    }

    async fn get(
        State(state): State<AppState>,
        caller: Caller,
        id: Result<Path<E::Id>, PathRejection>,
    ) -> Result<Json<E::Model>, ApiError> {
        let owner = Self::owner(caller)?;
        let Path(id) = id?;
        let db = state.conn().await?;
        CrudService::<E>::new(db)
            .get(id, owner.as_deref())
            .await?
            .map(Json)
            .ok_or_else(|| ApiError::not_found(E::LABEL))
    }

    async fn create(
        State(state): State<AppState>,
        caller: Caller,
        body: Result<Json<E::Create>, JsonRejection>,
    ) -> Result<(StatusCode, Json<E::Model>), ApiError> {
        let owner = Self::owner(caller)?;
        let Json(data) = body?;
        let db = state.conn().await?;
        let created = CrudService::<E>::new(db).create(data, owner.as_deref()).await?;
        Ok((StatusCode::CREATED, Json(created)))
    }

    async fn create_batch(
        State(state): State<AppState>,
        caller: Caller,
        body: Result<Json<BatchCreate<E::Create>>, JsonRejection>,
    ) -> Result<(StatusCode, Json<Vec<E::Model>>), ApiError> {
        let owner = Self::owner(caller)?;
        let Json(batch) = body?;
        let db = state.conn().await?;
        let created = CrudService::<E>::new(db).create_batch(batch.items, owner.as_deref()).await?;
        Ok((StatusCode::CREATED, Json(created)))
    }

    async fn update(
        State(state): State<AppState>,
        caller: Caller,
        id: Result<Path<E::Id>, PathRejection>,
        body: Result<Json<E::Update>, JsonRejection>,
    ) -> Result<Json<E::Model>, ApiError> {
        let owner = Self::owner(caller)?;
        let Path(id) = id?;
        let Json(patch) = body?;
        let db = state.conn().await?;
        CrudService::<E>::new(db)
            .update(id, patch, owner.as_deref())
            .await?
            .map(Json)
            .ok_or_else(|| ApiError::not_found(E::LABEL))
    }

    async fn update_batch(
        State(state): State<AppState>,
        caller: Caller,
        body: Result<Json<BatchUpdate<E::Id, E::Update>>, JsonRejection>,
    ) -> Result<Json<Vec<BatchItemOutcome<E::Id, E::Model>>>, ApiError> {
        let owner = Self::owner(caller)?;
        let Json(batch) = body?;
        let db = state.conn().await?;
        Ok(Json(CrudService::<E>::new(db).update_batch(batch.items, owner.as_deref()).await))
    }

    async fn delete(
        State(state): State<AppState>,
        caller: Caller,
        id: Result<Path<E::Id>, PathRejection>,
    ) -> Result<Json<Deleted<E::Id>>, ApiError> {
        let owner = Self::owner(caller)?;
        let Path(id) = id?;
        let db = state.conn().await?;
        if !CrudService::<E>::new(db).delete(id.clone(), owner.as_deref()).await? {
            return Err(ApiError::not_found(E::LABEL));
        }
        Ok(Json(Deleted { message: format!("{} deleted successfully", E::LABEL), id }))
    }

    async fn delete_batch(
        State(state): State<AppState>,
        caller: Caller,
        body: Result<Json<BatchDelete<E::Id>>, JsonRejection>,
    ) -> Result<Json<BatchDeleted>, ApiError> {
        let owner = Self::owner(caller)?;
        let Json(batch) = body?;
        let db = state.conn().await?;
        let deleted_count = CrudService::<E>::new(db).delete_batch(batch.ids, owner.as_deref()).await?;
        Ok(Json(BatchDeleted {
            message: format!("Successfully deleted {} {}", deleted_count, E::PATH),
            deleted_count,
        }))
    }
}
