use crate::domain;
use crate::dto::TodoItem;
use crate::routes::Route;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// DTO for a to-do list returned from the API
#[derive(Serialize, ToSchema)]
#[cfg_attr(test, derive(Deserialize, Debug, PartialEq))]
pub struct TodoList {
    #[schema(example = 3)]
    pub id: i32,
    #[schema(example = "Groceries")]
    pub title: String,
    /// Where the list's detail view lives
    #[schema(example = "/list/3")]
    pub url: String,
}

impl From<domain::todo_list::TodoList> for TodoList {
    fn from(value: domain::todo_list::TodoList) -> Self {
        TodoList {
            url: Route::List { list_id: value.id }.path(),
            id: value.id,
            title: value.title,
        }
    }
}

/// DTO for creating a new list via the API
#[derive(Deserialize, Display, ToSchema)]
#[cfg_attr(test, derive(Serialize))]
#[display("{title}")]
pub struct NewList {
    #[schema(example = "Groceries")]
    pub title: String,
}

impl From<NewList> for domain::todo_list::NewList {
    fn from(value: NewList) -> Self {
        domain::todo_list::NewList {
            title: value.title.trim().to_owned(),
        }
    }
}

/// DTO containing the ID of a newly created list
#[derive(Serialize, ToSchema)]
#[cfg_attr(test, derive(Deserialize, Debug))]
pub struct InsertedList {
    #[schema(example = 3)]
    pub id: i32,
}

/// Context for rendering the "add a list" form
#[derive(Serialize, ToSchema)]
#[cfg_attr(test, derive(Deserialize, Debug))]
pub struct ListForm {
    #[schema(example = "Add a new list")]
    pub heading: String,
    /// Where the form is submitted
    #[schema(example = "/list/add")]
    pub action: String,
}

impl ListForm {
    pub fn for_new_list() -> Self {
        ListForm {
            heading: "Add a new list".into(),
            action: Route::ListAdd.path(),
        }
    }
}

/// The list which is about to be deleted, along with the items which go with it
#[derive(Serialize, ToSchema)]
#[cfg_attr(test, derive(Deserialize, Debug))]
pub struct ListDeleteConfirmation {
    pub todo_list: TodoList,
    pub items: Vec<TodoItem>,
    /// Where the deletion is confirmed
    #[schema(example = "/list/3/delete")]
    pub action: String,
}

impl From<domain::todo_item::driving_ports::ListWithItems> for ListDeleteConfirmation {
    fn from(value: domain::todo_item::driving_ports::ListWithItems) -> Self {
        ListDeleteConfirmation {
            action: Route::ListDelete {
                list_id: value.todo_list.id,
            }
            .path(),
            todo_list: value.todo_list.into(),
            items: value.items.into_iter().map(TodoItem::from).collect(),
        }
    }
}
