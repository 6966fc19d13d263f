use crate::domain::todo_item::driving_ports::ItemPort;
use crate::domain::todo_item::storage_precision;
use crate::domain::todo_list::driving_ports::ListPort;
use crate::external_connections::{ExternalConnectivity, Transactable, TransactionHandle};
use crate::persistence::db_item_driven_ports::{DbItemReader, DbItemWriter};
use crate::persistence::db_list_driven_ports::DbListReader;
use crate::routes::{Route, RouteName};
use crate::routing_utils::{
    BasicErrorResponse, DomainErrorResponse, FollowUp, GenericErrorResponse, Json, Path,
};
use crate::{AppState, SharedData, domain, dto};
use axum::Router;
use axum::extract::State;
use axum::response::ErrorResponse;
use axum::routing::get;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::info;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(paths(
    item_add_form,
    create_item,
    item_update_form,
    update_item,
    item_delete_confirmation,
    delete_item
))]
/// Defines the OpenAPI documentation for the item endpoints
pub struct ItemsApi;

/// Builds a router for adding, editing and removing the items of a list
pub fn item_routes() -> Router<Arc<SharedData>> {
    Router::new()
        .route(
            RouteName::ItemAdd.template(),
            get(
                |State(app_state): AppState, Path(list_id): Path<i32>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let list_service = domain::todo_list::ListService {};

                    item_add_form(list_id, Utc::now(), &mut ext_cxn, &list_service).await
                },
            )
            .post(
                |State(app_state): AppState,
                 Path(list_id): Path<i32>,
                 Json(new_item): Json<dto::NewItem>| async move {
                    let item_service = domain::todo_item::ItemService {};

                    create_item(list_id, new_item, &app_state.ext_cxn, &item_service).await
                },
            ),
        )
        .route(
            RouteName::ItemUpdate.template(),
            get(
                |State(app_state): AppState, Path((list_id, item_id)): Path<(i32, i32)>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let item_service = domain::todo_item::ItemService {};

                    item_update_form(list_id, item_id, &mut ext_cxn, &item_service).await
                },
            )
            .post(
                |State(app_state): AppState,
                 Path((list_id, item_id)): Path<(i32, i32)>,
                 Json(update): Json<dto::UpdateItem>| async move {
                    let item_service = domain::todo_item::ItemService {};

                    update_item(list_id, item_id, update, &app_state.ext_cxn, &item_service).await
                },
            ),
        )
        .route(
            RouteName::ItemDelete.template(),
            get(
                |State(app_state): AppState, Path((list_id, item_id)): Path<(i32, i32)>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let item_service = domain::todo_item::ItemService {};

                    item_delete_confirmation(list_id, item_id, &mut ext_cxn, &item_service).await
                },
            )
            .post(
                |State(app_state): AppState, Path((list_id, item_id)): Path<(i32, i32)>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let item_service = domain::todo_item::ItemService {};

                    delete_item(list_id, item_id, &mut ext_cxn, &item_service).await
                },
            ),
        )
}

#[utoipa::path(
    get,
    path = "/list/{list_id}/item/add",
    tag = "Items",
    params(("list_id" = i32, Path, description = "ID of the list the item goes in")),
    responses(
        (status = 200, description = "Context for the new item form", body = dto::ItemForm),
        (status = 404, description = "No such list", body = BasicErrorResponse),
    ),
)]
/// Describes the form for adding an item, with the list and a due date one week from [now]
/// filled in
async fn item_add_form(
    list_id: i32,
    now: DateTime<Utc>,
    ext_cxn: &mut impl ExternalConnectivity,
    list_service: &impl ListPort,
) -> Result<Json<dto::ItemForm>, ErrorResponse> {
    let todo_list = list_service
        .list_by_id(list_id, ext_cxn, &DbListReader)
        .await
        .map_err(DomainErrorResponse::from)?;

    Ok(Json(dto::ItemForm::for_new_item(
        todo_list,
        storage_precision(now),
    )))
}

#[utoipa::path(
    post,
    path = "/list/{list_id}/item/add",
    tag = "Items",
    params(("list_id" = i32, Path, description = "ID of the list the item goes in unless the body picks another")),
    request_body = dto::NewItem,
    responses(
        (status = 303, description = "Item created, continue to its list", body = dto::InsertedItem,
            headers(("Location" = String, description = "Path of the follow-up view"))),
        (status = 400, description = "The title was missing or too long, or the list doesn't exist", body = BasicErrorResponse),
        (status = 500, description = "The item could not be stored", body = BasicErrorResponse),
    ),
)]
/// Creates an item
async fn create_item(
    list_id: i32,
    new_item: dto::NewItem,
    ext_cxn: &impl Transactable,
    item_service: &impl ItemPort,
) -> Result<FollowUp<dto::InsertedItem>, ErrorResponse> {
    info!(list_id, "Creating item");
    let domain_item = new_item.into_domain(list_id);
    let mut txn = ext_cxn
        .start_transaction()
        .await
        .map_err(GenericErrorResponse)?;

    let created = item_service
        .create_item(&domain_item, &mut txn, &DbListReader, &DbItemWriter)
        .await
        .map_err(DomainErrorResponse::from)?;
    txn.commit().await.map_err(GenericErrorResponse)?;

    Ok(FollowUp::with_body(
        Route::List {
            list_id: created.todo_list_id,
        },
        dto::InsertedItem { id: created.id },
    ))
}

#[utoipa::path(
    get,
    path = "/list/{list_id}/item/{item_id}",
    tag = "Items",
    params(
        ("list_id" = i32, Path, description = "ID of the list holding the item"),
        ("item_id" = i32, Path, description = "ID of the item"),
    ),
    responses(
        (status = 200, description = "Context for the edit item form", body = dto::ItemForm),
        (status = 404, description = "No such item in the list", body = BasicErrorResponse),
    ),
)]
/// Describes the form for editing an item, pre-filled with its current values
async fn item_update_form(
    list_id: i32,
    item_id: i32,
    ext_cxn: &mut impl ExternalConnectivity,
    item_service: &impl ItemPort,
) -> Result<Json<dto::ItemForm>, ErrorResponse> {
    let found = item_service
        .item_in_list(list_id, item_id, ext_cxn, &DbListReader, &DbItemReader)
        .await
        .map_err(DomainErrorResponse::from)?;

    Ok(Json(dto::ItemForm::for_existing_item(found)))
}

#[utoipa::path(
    post,
    path = "/list/{list_id}/item/{item_id}",
    tag = "Items",
    params(
        ("list_id" = i32, Path, description = "ID of the list holding the item"),
        ("item_id" = i32, Path, description = "ID of the item"),
    ),
    request_body = dto::UpdateItem,
    responses(
        (status = 303, description = "Item updated, continue to the list it is now in",
            headers(("Location" = String, description = "Path of the follow-up view"))),
        (status = 400, description = "The title was missing or too long, or the list doesn't exist", body = BasicErrorResponse),
        (status = 404, description = "No such item in the list", body = BasicErrorResponse),
        (status = 500, description = "The item could not be updated", body = BasicErrorResponse),
    ),
)]
/// Updates an item, possibly moving it to another list
async fn update_item(
    list_id: i32,
    item_id: i32,
    update: dto::UpdateItem,
    ext_cxn: &impl Transactable,
    item_service: &impl ItemPort,
) -> Result<FollowUp, ErrorResponse> {
    info!(list_id, item_id, "Updating item");
    let domain_update = domain::todo_item::UpdateItem::from(update);
    let mut txn = ext_cxn
        .start_transaction()
        .await
        .map_err(GenericErrorResponse)?;

    let updated = item_service
        .update_item(
            list_id,
            item_id,
            &domain_update,
            &mut txn,
            &DbListReader,
            &DbItemReader,
            &DbItemWriter,
        )
        .await
        .map_err(DomainErrorResponse::from)?;
    txn.commit().await.map_err(GenericErrorResponse)?;

    Ok(FollowUp::to(Route::List {
        list_id: updated.todo_list_id,
    }))
}

#[utoipa::path(
    get,
    path = "/list/{list_id}/item/{item_id}/delete",
    tag = "Items",
    params(
        ("list_id" = i32, Path, description = "ID of the list holding the item"),
        ("item_id" = i32, Path, description = "ID of the item"),
    ),
    responses(
        (status = 200, description = "The item that would be deleted", body = dto::ItemDeleteConfirmation),
        (status = 404, description = "No such item in the list", body = BasicErrorResponse),
    ),
)]
/// Shows which item would be deleted
async fn item_delete_confirmation(
    list_id: i32,
    item_id: i32,
    ext_cxn: &mut impl ExternalConnectivity,
    item_service: &impl ItemPort,
) -> Result<Json<dto::ItemDeleteConfirmation>, ErrorResponse> {
    let found = item_service
        .item_in_list(list_id, item_id, ext_cxn, &DbListReader, &DbItemReader)
        .await
        .map_err(DomainErrorResponse::from)?;

    Ok(Json(found.into()))
}

#[utoipa::path(
    post,
    path = "/list/{list_id}/item/{item_id}/delete",
    tag = "Items",
    params(
        ("list_id" = i32, Path, description = "ID of the list holding the item"),
        ("item_id" = i32, Path, description = "ID of the item"),
    ),
    responses(
        (status = 303, description = "Item deleted, continue to its former list",
            headers(("Location" = String, description = "Path of the follow-up view"))),
        (status = 404, description = "No such item in the list", body = BasicErrorResponse),
        (status = 500, description = "The item could not be deleted", body = BasicErrorResponse),
    ),
)]
/// Deletes an item
async fn delete_item(
    list_id: i32,
    item_id: i32,
    ext_cxn: &mut impl ExternalConnectivity,
    item_service: &impl ItemPort,
) -> Result<FollowUp, ErrorResponse> {
    info!(list_id, item_id, "Deleting item");
    item_service
        .delete_item(list_id, item_id, ext_cxn, &DbItemWriter)
        .await
        .map_err(DomainErrorResponse::from)?;

    Ok(FollowUp::to(Route::List { list_id }))
}
