use super::test_util::{prepare_db_and_test, router_for, send};
use crate::api::test_util::{ErrorBody, deserialize_body, location_of};
use crate::dto;
use axum::Router;
use axum::http::{Method, StatusCode};
use chrono::Duration;
use serde_json::json;

/// Creates a list through the API and returns its ID
async fn create_list(router: &Router, title: &str) -> i32 {
    let response = send(router, Method::POST, "/list/add", Some(json!({ "title": title }))).await;
    assert_eq!(StatusCode::SEE_OTHER, response.status());
    let location = location_of(&response).map(str::to_owned);

    let inserted: dto::InsertedList = deserialize_body(response.into_body()).await;
    assert_eq!(Some(format!("/list/{}", inserted.id)), location);
    inserted.id
}

/// Creates an item in [list_id] through the API and returns its ID
async fn create_item(router: &Router, list_id: i32, item: serde_json::Value) -> i32 {
    let response = send(
        router,
        Method::POST,
        &format!("/list/{list_id}/item/add"),
        Some(item),
    )
    .await;
    assert_eq!(StatusCode::SEE_OTHER, response.status());

    let inserted: dto::InsertedItem = deserialize_body(response.into_body()).await;
    inserted.id
}

async fn list_detail(router: &Router, list_id: i32) -> dto::ListDetail {
    let response = send(router, Method::GET, &format!("/list/{list_id}"), None).await;
    assert_eq!(StatusCode::OK, response.status());

    deserialize_body(response.into_body()).await
}

#[test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
fn new_item_is_due_a_week_after_creation() {
    prepare_db_and_test(|db| async move {
        let router = router_for(db);
        let list_id = create_list(&router, "Groceries").await;

        let response = send(
            &router,
            Method::POST,
            &format!("/list/{list_id}/item/add"),
            Some(json!({ "title": "Buy milk" })),
        )
        .await;
        assert_eq!(StatusCode::SEE_OTHER, response.status());
        assert_eq!(
            Some(format!("/list/{list_id}").as_str()),
            location_of(&response)
        );

        let detail = list_detail(&router, list_id).await;
        assert_eq!("Groceries", detail.todo_list.title);
        let [milk] = detail.items.as_slice() else {
            panic!("Expected exactly one item, got {:#?}", detail.items);
        };
        assert_eq!("Buy milk", milk.title);
        assert_eq!(Duration::days(7), milk.due_date - milk.created_date);
    });
}

#[test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
fn duplicate_list_title_is_rejected() {
    prepare_db_and_test(|db| async move {
        let router = router_for(db);
        create_list(&router, "Groceries").await;

        let response = send(
            &router,
            Method::POST,
            "/list/add",
            Some(json!({ "title": "Groceries" })),
        )
        .await;
        assert_eq!(StatusCode::BAD_REQUEST, response.status());
        let error: ErrorBody = deserialize_body(response.into_body()).await;
        assert_eq!("invalid_input", error.error_code);

        for title in ["  Groceries ", "   "] {
            let response = send(&router, Method::POST, "/list/add", Some(json!({ "title": title })))
                .await;
            assert_eq!(StatusCode::BAD_REQUEST, response.status());
            let error: ErrorBody = deserialize_body(response.into_body()).await;
            assert_that_field_failed(&error, "title");
        }

        let response = send(&router, Method::GET, "/", None).await;
        let lists: Vec<dto::TodoList> = deserialize_body(response.into_body()).await;
        assert_eq!(1, lists.len());
    });
}

#[test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
fn items_come_back_soonest_due_first() {
    prepare_db_and_test(|db| async move {
        let router = router_for(db);
        let list_id = create_list(&router, "Chores").await;
        let other_list_id = create_list(&router, "Errands").await;

        let later = create_item(
            &router,
            list_id,
            json!({ "title": "Wash the car", "due_date": "2030-05-02T10:00:00Z" }),
        )
        .await;
        let sooner = create_item(
            &router,
            list_id,
            json!({ "title": "Sweep", "due_date": "2030-05-01T10:00:00Z" }),
        )
        .await;
        create_item(
            &router,
            other_list_id,
            json!({ "title": "Post office", "due_date": "2030-04-01T10:00:00Z" }),
        )
        .await;

        let detail = list_detail(&router, list_id).await;
        let item_ids: Vec<i32> = detail.items.iter().map(|item| item.id).collect();
        assert_eq!(vec![sooner, later], item_ids);
    });
}

#[test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
fn deleting_a_list_deletes_its_items() {
    prepare_db_and_test(|db| async move {
        let router = router_for(db.clone());
        let list_id = create_list(&router, "Groceries").await;
        let item_id = create_item(&router, list_id, json!({ "title": "Buy milk" })).await;

        let response = send(
            &router,
            Method::POST,
            &format!("/list/{list_id}/delete"),
            None,
        )
        .await;
        assert_eq!(StatusCode::SEE_OTHER, response.status());
        assert_eq!(Some("/"), location_of(&response));

        let response = send(
            &router,
            Method::GET,
            &format!("/list/{list_id}/item/{item_id}"),
            None,
        )
        .await;
        assert_eq!(StatusCode::NOT_FOUND, response.status());

        let remaining_items: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM todo_item")
            .fetch_one(&db)
            .await
            .expect("Could not count items");
        assert_eq!(0, remaining_items);
    });
}

#[test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
fn items_can_move_between_lists() {
    prepare_db_and_test(|db| async move {
        let router = router_for(db);
        let from_list = create_list(&router, "Someday").await;
        let to_list = create_list(&router, "Today").await;
        let item_id = create_item(&router, from_list, json!({ "title": "Call mum" })).await;

        let response = send(
            &router,
            Method::POST,
            &format!("/list/{from_list}/item/{item_id}"),
            Some(json!({
                "todo_list": to_list,
                "title": "Call mum",
                "description": "About the weekend",
                "due_date": "2030-01-01T18:00:00Z",
            })),
        )
        .await;
        assert_eq!(StatusCode::SEE_OTHER, response.status());
        assert_eq!(
            Some(format!("/list/{to_list}").as_str()),
            location_of(&response)
        );

        assert!(list_detail(&router, from_list).await.items.is_empty());
        let moved = list_detail(&router, to_list).await;
        assert!(matches!(moved.items.as_slice(), [
            dto::TodoItem { id, description: Some(description), .. }
        ] if *id == item_id && description == "About the weekend"));

        let response = send(
            &router,
            Method::GET,
            &format!("/list/{from_list}/item/{item_id}"),
            None,
        )
        .await;
        assert_eq!(StatusCode::NOT_FOUND, response.status());

        let response = send(
            &router,
            Method::POST,
            &format!("/list/{from_list}/item/{item_id}/delete"),
            None,
        )
        .await;
        assert_eq!(StatusCode::NOT_FOUND, response.status());
        assert_eq!(1, list_detail(&router, to_list).await.items.len());
    });
}

#[test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
fn item_into_missing_list_persists_nothing() {
    prepare_db_and_test(|db| async move {
        let router = router_for(db.clone());
        let list_id = create_list(&router, "Groceries").await;

        let response = send(
            &router,
            Method::POST,
            &format!("/list/{list_id}/item/add"),
            Some(json!({ "title": "Buy milk", "todo_list": list_id + 100 })),
        )
        .await;
        assert_eq!(StatusCode::BAD_REQUEST, response.status());
        let error: ErrorBody = deserialize_body(response.into_body()).await;
        assert_that_field_failed(&error, "todo_list");

        let stored_items: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM todo_item")
            .fetch_one(&db)
            .await
            .expect("Could not count items");
        assert_eq!(0, stored_items);
    });
}

fn assert_that_field_failed(error: &ErrorBody, field: &str) {
    assert_eq!("invalid_input", error.error_code);
    let Some(extra_info) = &error.extra_info else {
        panic!("Validation failure should name the failed fields");
    };
    assert!(
        extra_info.get(field).is_some(),
        "Expected a failure on {field}, got {extra_info}"
    );
}

#[test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
fn bad_requests_are_described() {
    prepare_db_and_test(|db| async move {
        let router = router_for(db);

        let response = send(&router, Method::GET, "/list/4000", None).await;
        assert_eq!(StatusCode::NOT_FOUND, response.status());

        let response = send(&router, Method::GET, "/list/not-a-number", None).await;
        assert_eq!(StatusCode::NOT_FOUND, response.status());

        let response = send(&router, Method::POST, "/list/4000/delete", None).await;
        assert_eq!(StatusCode::NOT_FOUND, response.status());

        let response = send(
            &router,
            Method::POST,
            "/list/add",
            Some(json!({ "name": "Groceries" })),
        )
        .await;
        assert_eq!(StatusCode::BAD_REQUEST, response.status());
        let error: ErrorBody = deserialize_body(response.into_body()).await;
        assert_eq!("invalid_json", error.error_code);

        let response = send(&router, Method::GET, "/list/add", None).await;
        assert_eq!(StatusCode::OK, response.status());
        let form: dto::ListForm = deserialize_body(response.into_body()).await;
        assert_eq!("Add a new list", form.heading);
    });
}
