use crate::domain::todo_item::driving_ports::ItemPort;
use crate::domain::todo_list::driving_ports::ListPort;
use crate::external_connections::{ExternalConnectivity, Transactable, TransactionHandle};
use crate::persistence::db_item_driven_ports::{DbItemReader, DbItemWriter};
use crate::persistence::db_list_driven_ports::{DbListReader, DbListWriter};
use crate::routes::{Route, RouteName};
use crate::routing_utils::{
    BasicErrorResponse, DomainErrorResponse, FollowUp, GenericErrorResponse, Json, Path,
};
use crate::{AppState, SharedData, domain, dto};
use axum::Router;
use axum::extract::State;
use axum::response::ErrorResponse;
use axum::routing::get;
use std::sync::Arc;
use tracing::info;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(paths(
    all_lists,
    list_detail,
    list_add_form,
    create_list,
    list_delete_confirmation,
    delete_list
))]
/// Defines the OpenAPI documentation for the list endpoints
pub struct ListsApi;

/// Builds a router for the overview of lists, a single list's detail, and adding or removing lists
pub fn list_routes() -> Router<Arc<SharedData>> {
    Router::new()
        .route(
            RouteName::Index.template(),
            get(|State(app_state): AppState| async move {
                let mut ext_cxn = app_state.ext_cxn.clone();
                let list_service = domain::todo_list::ListService {};

                all_lists(&mut ext_cxn, &list_service).await
            }),
        )
        .route(
            RouteName::List.template(),
            get(
                |State(app_state): AppState, Path(list_id): Path<i32>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let item_service = domain::todo_item::ItemService {};

                    list_detail(list_id, &mut ext_cxn, &item_service).await
                },
            ),
        )
        .route(
            RouteName::ListAdd.template(),
            get(list_add_form).post(
                |State(app_state): AppState, Json(new_list): Json<dto::NewList>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let list_service = domain::todo_list::ListService {};

                    create_list(new_list, &mut ext_cxn, &list_service).await
                },
            ),
        )
        .route(
            RouteName::ListDelete.template(),
            get(
                |State(app_state): AppState, Path(list_id): Path<i32>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let item_service = domain::todo_item::ItemService {};

                    list_delete_confirmation(list_id, &mut ext_cxn, &item_service).await
                },
            )
            .post(
                |State(app_state): AppState, Path(list_id): Path<i32>| async move {
                    let list_service = domain::todo_list::ListService {};

                    delete_list(list_id, &app_state.ext_cxn, &list_service).await
                },
            ),
        )
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Lists",
    responses(
        (status = 200, description = "Every to-do list", body = Vec<dto::TodoList>),
        (status = 500, description = "Lists could not be read", body = BasicErrorResponse),
    ),
)]
/// Retrieves every to-do list
async fn all_lists(
    ext_cxn: &mut impl ExternalConnectivity,
    list_service: &impl ListPort,
) -> Result<Json<Vec<dto::TodoList>>, ErrorResponse> {
    info!("Requested all lists");
    let lists = list_service
        .all_lists(ext_cxn, &DbListReader)
        .await
        .map_err(DomainErrorResponse::from)?;

    Ok(Json(lists.into_iter().map(dto::TodoList::from).collect()))
}

#[utoipa::path(
    get,
    path = "/list/{list_id}",
    tag = "Lists",
    params(("list_id" = i32, Path, description = "ID of the list")),
    responses(
        (status = 200, description = "The list and its items, soonest due first", body = dto::ListDetail),
        (status = 404, description = "No such list", body = BasicErrorResponse),
        (status = 500, description = "The list could not be read", body = BasicErrorResponse),
    ),
)]
/// Retrieves a list along with its items
async fn list_detail(
    list_id: i32,
    ext_cxn: &mut impl ExternalConnectivity,
    item_service: &impl ItemPort,
) -> Result<Json<dto::ListDetail>, ErrorResponse> {
    info!(list_id, "Requested list detail");
    let detail = item_service
        .list_with_items(list_id, ext_cxn, &DbListReader, &DbItemReader)
        .await
        .map_err(DomainErrorResponse::from)?;

    Ok(Json(detail.into()))
}

#[utoipa::path(
    get,
    path = "/list/add",
    tag = "Lists",
    responses((status = 200, description = "Context for the new list form", body = dto::ListForm)),
)]
/// Describes the form for adding a list
async fn list_add_form() -> Json<dto::ListForm> {
    Json(dto::ListForm::for_new_list())
}

#[utoipa::path(
    post,
    path = "/list/add",
    tag = "Lists",
    request_body = dto::NewList,
    responses(
        (status = 303, description = "List created, continue to the new list", body = dto::InsertedList,
            headers(("Location" = String, description = "Path of the follow-up view"))),
        (status = 400, description = "The title was missing, too long, or already taken", body = BasicErrorResponse),
        (status = 500, description = "The list could not be stored", body = BasicErrorResponse),
    ),
)]
/// Creates a list
async fn create_list(
    new_list: dto::NewList,
    ext_cxn: &mut impl ExternalConnectivity,
    list_service: &impl ListPort,
) -> Result<FollowUp<dto::InsertedList>, ErrorResponse> {
    info!("Creating list: {new_list}");
    let domain_list = domain::todo_list::NewList::from(new_list);
    let list_id = list_service
        .create_list(&domain_list, ext_cxn, &DbListWriter)
        .await
        .map_err(DomainErrorResponse::from)?;

    Ok(FollowUp::with_body(
        Route::List { list_id },
        dto::InsertedList { id: list_id },
    ))
}

#[utoipa::path(
    get,
    path = "/list/{list_id}/delete",
    tag = "Lists",
    params(("list_id" = i32, Path, description = "ID of the list")),
    responses(
        (status = 200, description = "The list and the items that would be deleted with it", body = dto::ListDeleteConfirmation),
        (status = 404, description = "No such list", body = BasicErrorResponse),
    ),
)]
/// Shows what deleting a list would remove
async fn list_delete_confirmation(
    list_id: i32,
    ext_cxn: &mut impl ExternalConnectivity,
    item_service: &impl ItemPort,
) -> Result<Json<dto::ListDeleteConfirmation>, ErrorResponse> {
    let doomed = item_service
        .list_with_items(list_id, ext_cxn, &DbListReader, &DbItemReader)
        .await
        .map_err(DomainErrorResponse::from)?;

    Ok(Json(doomed.into()))
}

#[utoipa::path(
    post,
    path = "/list/{list_id}/delete",
    tag = "Lists",
    params(("list_id" = i32, Path, description = "ID of the list")),
    responses(
        (status = 303, description = "List and its items deleted, continue to the overview of lists",
            headers(("Location" = String, description = "Path of the follow-up view"))),
        (status = 404, description = "No such list", body = BasicErrorResponse),
        (status = 500, description = "The list could not be deleted", body = BasicErrorResponse),
    ),
)]
/// Deletes a list and every item in it, all in one transaction
async fn delete_list(
    list_id: i32,
    ext_cxn: &impl Transactable,
    list_service: &impl ListPort,
) -> Result<FollowUp, ErrorResponse> {
    info!(list_id, "Deleting list");
    let mut txn = ext_cxn
        .start_transaction()
        .await
        .map_err(GenericErrorResponse)?;

    list_service
        .delete_list(list_id, &mut txn, &DbListWriter, &DbItemWriter)
        .await
        .map_err(DomainErrorResponse::from)?;
    txn.commit().await.map_err(GenericErrorResponse)?;

    Ok(FollowUp::to(Route::Index))
}
