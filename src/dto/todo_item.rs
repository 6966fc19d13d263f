use crate::domain;
use crate::domain::todo_item::driving_ports::{ItemWithList, ListWithItems};
use crate::dto::TodoList;
use crate::routes::Route;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// DTO for a to-do item returned from the API
#[derive(Serialize, ToSchema)]
#[cfg_attr(test, derive(Deserialize, Debug, PartialEq))]
pub struct TodoItem {
    #[schema(example = 17)]
    pub id: i32,
    #[schema(example = "Buy milk")]
    pub title: String,
    #[schema(example = "Two litres, semi-skimmed")]
    pub description: Option<String>,
    pub created_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    /// ID of the list the item belongs to
    #[schema(example = 3)]
    pub todo_list: i32,
    /// Where the item's edit view lives
    #[schema(example = "/list/3/item/17")]
    pub url: String,
}

impl From<domain::todo_item::TodoItem> for TodoItem {
    fn from(value: domain::todo_item::TodoItem) -> Self {
        TodoItem {
            url: Route::ItemUpdate {
                list_id: value.todo_list_id,
                item_id: value.id,
            }
            .path(),
            id: value.id,
            title: value.title,
            description: value.description,
            created_date: value.created_date,
            due_date: value.due_date,
            todo_list: value.todo_list_id,
        }
    }
}

/// A list and its items, soonest due first
#[derive(Serialize, ToSchema)]
#[cfg_attr(test, derive(Deserialize, Debug))]
pub struct ListDetail {
    pub todo_list: TodoList,
    pub items: Vec<TodoItem>,
}

impl From<ListWithItems> for ListDetail {
    fn from(value: ListWithItems) -> Self {
        ListDetail {
            todo_list: value.todo_list.into(),
            items: value.items.into_iter().map(TodoItem::from).collect(),
        }
    }
}

/// DTO for creating a new item via the API. The list and due date may be left out, in which case
/// the list from the request path and a due date one week out are used.
#[derive(Deserialize, ToSchema)]
#[cfg_attr(test, derive(Serialize))]
pub struct NewItem {
    #[serde(default)]
    #[schema(example = 3)]
    pub todo_list: Option<i32>,
    #[schema(example = "Buy milk")]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
}

impl NewItem {
    /// Converts to the domain type, filling in the list from the request path if none was given
    pub fn into_domain(self, path_list_id: i32) -> domain::todo_item::NewItem {
        domain::todo_item::NewItem {
            todo_list_id: self.todo_list.unwrap_or(path_list_id),
            title: self.title.trim().to_owned(),
            description: self.description,
            due_date: self.due_date,
        }
    }
}

/// DTO for editing an item via the API. Moving an item between lists is done by changing
/// [UpdateItem::todo_list].
#[derive(Deserialize, ToSchema)]
#[cfg_attr(test, derive(Serialize))]
pub struct UpdateItem {
    #[schema(example = 3)]
    pub todo_list: i32,
    #[schema(example = "Buy oat milk")]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub due_date: DateTime<Utc>,
}

impl From<UpdateItem> for domain::todo_item::UpdateItem {
    fn from(value: UpdateItem) -> Self {
        domain::todo_item::UpdateItem {
            todo_list_id: value.todo_list,
            title: value.title.trim().to_owned(),
            description: value.description,
            due_date: value.due_date,
        }
    }
}

/// Editable fields of an item, used as the initial values of item forms
#[derive(Serialize, ToSchema)]
#[cfg_attr(test, derive(Deserialize, Debug, PartialEq))]
pub struct ItemFields {
    pub todo_list: i32,
    pub title: String,
    pub description: Option<String>,
    pub due_date: DateTime<Utc>,
}

/// Context for rendering the item create and edit forms
#[derive(Serialize, ToSchema)]
#[cfg_attr(test, derive(Deserialize, Debug))]
pub struct ItemForm {
    #[schema(example = "Create a new item")]
    pub heading: String,
    pub todo_list: TodoList,
    pub initial: ItemFields,
    /// Where the form is submitted
    #[schema(example = "/list/3/item/add")]
    pub action: String,
}

impl ItemForm {
    /// Blank form for a new item in [todo_list], due a week after [now]
    pub fn for_new_item(todo_list: domain::todo_list::TodoList, now: DateTime<Utc>) -> Self {
        ItemForm {
            heading: "Create a new item".into(),
            action: Route::ItemAdd {
                list_id: todo_list.id,
            }
            .path(),
            initial: ItemFields {
                todo_list: todo_list.id,
                title: String::new(),
                description: None,
                due_date: domain::todo_item::one_week_after(now),
            },
            todo_list: todo_list.into(),
        }
    }

    /// Form pre-filled with an item's current values
    pub fn for_existing_item(found: ItemWithList) -> Self {
        ItemForm {
            heading: "Edit item".into(),
            action: Route::ItemUpdate {
                list_id: found.todo_list.id,
                item_id: found.item.id,
            }
            .path(),
            initial: ItemFields {
                todo_list: found.item.todo_list_id,
                title: found.item.title,
                description: found.item.description,
                due_date: found.item.due_date,
            },
            todo_list: found.todo_list.into(),
        }
    }
}

/// The item which is about to be deleted and the list it belongs to
#[derive(Serialize, ToSchema)]
#[cfg_attr(test, derive(Deserialize, Debug))]
pub struct ItemDeleteConfirmation {
    pub todo_list: TodoList,
    pub item: TodoItem,
    /// Where the deletion is confirmed
    #[schema(example = "/list/3/item/17/delete")]
    pub action: String,
}

impl From<ItemWithList> for ItemDeleteConfirmation {
    fn from(value: ItemWithList) -> Self {
        ItemDeleteConfirmation {
            action: Route::ItemDelete {
                list_id: value.todo_list.id,
                item_id: value.item.id,
            }
            .path(),
            todo_list: value.todo_list.into(),
            item: value.item.into(),
        }
    }
}

/// DTO containing the ID of a newly created item
#[derive(Serialize, ToSchema)]
#[cfg_attr(test, derive(Deserialize, Debug))]
pub struct InsertedItem {
    #[schema(example = 17)]
    pub id: i32,
}
