use crate::domain;
use crate::domain::todo_list::TodoList;
use crate::domain::todo_list::driven_ports::ListReader;
use crate::domain::DrivenPortError;
use crate::external_connections::ExternalConnectivity;
use chrono::{DateTime, Duration, SubsecRound, Utc};
use driven_ports::{ItemReader, ItemWriter};
use tracing::{error, info};
use validator::Validate;

/// A single to-do entry inside a list
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct TodoItem {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub created_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub todo_list_id: i32,
}

/// User input for a new item. The due date is optional and defaults to a week after creation.
#[derive(Debug, Validate)]
#[cfg_attr(test, derive(Clone))]
pub struct NewItem {
    pub todo_list_id: i32,
    #[validate(length(min = 1, max = 100), custom = "domain::not_blank")]
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
}

/// User edits to an existing item. The creation date is never editable.
#[derive(Debug, Validate)]
#[cfg_attr(test, derive(Clone))]
pub struct UpdateItem {
    pub todo_list_id: i32,
    #[validate(length(min = 1, max = 100), custom = "domain::not_blank")]
    pub title: String,
    pub description: Option<String>,
    pub due_date: DateTime<Utc>,
}

/// An item with every field resolved, ready to be stored
#[derive(Debug, Clone)]
pub struct CreateItem {
    pub todo_list_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub created_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
}

/// Due date given to items created without one
pub fn one_week_after(moment: DateTime<Utc>) -> DateTime<Utc> {
    moment + Duration::days(7)
}

/// Drops sub-microsecond precision, which PostgreSQL timestamps can't hold
pub fn storage_precision(moment: DateTime<Utc>) -> DateTime<Utc> {
    moment.trunc_subsecs(6)
}

pub mod driven_ports {
    use super::*;

    pub trait ItemReader {
        /// Items belonging to the given list
        async fn items_in_list(
            &self,
            list_id: i32,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<Vec<TodoItem>, anyhow::Error>;
        async fn item_in_list(
            &self,
            list_id: i32,
            item_id: i32,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<Option<TodoItem>, anyhow::Error>;
    }

    pub trait ItemWriter {
        /// Stores the item and returns its ID. Reports [DrivenPortError::DoesNotExist] if the
        /// owning list is gone.
        async fn create_item(
            &self,
            item: &CreateItem,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<i32, DrivenPortError>;
        async fn update_item(
            &self,
            item_id: i32,
            update: &UpdateItem,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<(), DrivenPortError>;
        /// Removes an item, provided it still belongs to [list_id]
        async fn delete_item(
            &self,
            list_id: i32,
            item_id: i32,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<(), DrivenPortError>;
        /// Removes every item of a list, returning how many were removed
        async fn delete_items_in_list(
            &self,
            list_id: i32,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<u64, anyhow::Error>;
    }
}

pub mod driving_ports {
    use super::*;

    /// A list along with its items, soonest due first
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct ListWithItems {
        pub todo_list: TodoList,
        pub items: Vec<TodoItem>,
    }

    /// An item along with the list that owns it
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct ItemWithList {
        pub todo_list: TodoList,
        pub item: TodoItem,
    }

    pub trait ItemPort {
        async fn list_with_items(
            &self,
            list_id: i32,
            ext_cxn: &mut impl ExternalConnectivity,
            list_read: &impl ListReader,
            item_read: &impl ItemReader,
        ) -> Result<ListWithItems, domain::Error>;
        async fn item_in_list(
            &self,
            list_id: i32,
            item_id: i32,
            ext_cxn: &mut impl ExternalConnectivity,
            list_read: &impl ListReader,
            item_read: &impl ItemReader,
        ) -> Result<ItemWithList, domain::Error>;
        async fn create_item(
            &self,
            new_item: &NewItem,
            ext_cxn: &mut impl ExternalConnectivity,
            list_read: &impl ListReader,
            item_write: &impl ItemWriter,
        ) -> Result<TodoItem, domain::Error>;
        async fn update_item(
            &self,
            list_id: i32,
            item_id: i32,
            update: &UpdateItem,
            ext_cxn: &mut impl ExternalConnectivity,
            list_read: &impl ListReader,
            item_read: &impl ItemReader,
            item_write: &impl ItemWriter,
        ) -> Result<TodoItem, domain::Error>;
        async fn delete_item(
            &self,
            list_id: i32,
            item_id: i32,
            ext_cxn: &mut impl ExternalConnectivity,
            item_write: &impl ItemWriter,
        ) -> Result<(), domain::Error>;
    }
}

fn unknown_list() -> domain::Error {
    domain::Error::invalid_field(
        "todo_list",
        "invalid_choice",
        "Select a valid to-do list.",
    )
}

async fn fetch_list(
    list_id: i32,
    ext_cxn: &mut impl ExternalConnectivity,
    list_read: &impl ListReader,
) -> Result<Option<TodoList>, domain::Error> {
    list_read
        .list_by_id(list_id, ext_cxn)
        .await
        .map_err(|err| domain::Error::failed_to("fetch a list", err))
}

async fn fetch_item(
    list_id: i32,
    item_id: i32,
    ext_cxn: &mut impl ExternalConnectivity,
    item_read: &impl ItemReader,
) -> Result<TodoItem, domain::Error> {
    item_read
        .item_in_list(list_id, item_id, ext_cxn)
        .await
        .map_err(|err| domain::Error::failed_to("fetch an item", err))?
        .ok_or(domain::Error::DoesNotExist)
}

/// Items moved or created against a list the user picked must point at a real list
async fn verify_target_list(
    list_id: i32,
    ext_cxn: &mut impl ExternalConnectivity,
    list_read: &impl ListReader,
) -> Result<(), domain::Error> {
    match fetch_list(list_id, ext_cxn, list_read).await? {
        Some(_) => Ok(()),
        None => Err(unknown_list()),
    }
}

fn item_write_error(port_err: DrivenPortError, action: &str) -> domain::Error {
    match port_err {
        // The target list disappeared between the check and the write
        DrivenPortError::DoesNotExist => unknown_list(),
        other => {
            error!("Failed to {action}: {other}");
            other.into_error_trying_to(action)
        }
    }
}

pub struct ItemService {}

impl driving_ports::ItemPort for ItemService {
    async fn list_with_items(
        &self,
        list_id: i32,
        ext_cxn: &mut impl ExternalConnectivity,
        list_read: &impl ListReader,
        item_read: &impl ItemReader,
    ) -> Result<driving_ports::ListWithItems, domain::Error> {
        let todo_list = fetch_list(list_id, &mut *ext_cxn, list_read)
            .await?
            .ok_or(domain::Error::DoesNotExist)?;
        let mut items = item_read
            .items_in_list(list_id, &mut *ext_cxn)
            .await
            .map_err(|err| domain::Error::failed_to("fetch the items of a list", err))?;
        items.sort_by(|left, right| {
            left.due_date
                .cmp(&right.due_date)
                .then(left.id.cmp(&right.id))
        });

        Ok(driving_ports::ListWithItems { todo_list, items })
    }

    async fn item_in_list(
        &self,
        list_id: i32,
        item_id: i32,
        ext_cxn: &mut impl ExternalConnectivity,
        list_read: &impl ListReader,
        item_read: &impl ItemReader,
    ) -> Result<driving_ports::ItemWithList, domain::Error> {
        let todo_list = fetch_list(list_id, &mut *ext_cxn, list_read)
            .await?
            .ok_or(domain::Error::DoesNotExist)?;
        let item = fetch_item(list_id, item_id, &mut *ext_cxn, item_read).await?;

        Ok(driving_ports::ItemWithList { todo_list, item })
    }

    async fn create_item(
        &self,
        new_item: &NewItem,
        ext_cxn: &mut impl ExternalConnectivity,
        list_read: &impl ListReader,
        item_write: &impl ItemWriter,
    ) -> Result<TodoItem, domain::Error> {
        new_item.validate()?;
        verify_target_list(new_item.todo_list_id, &mut *ext_cxn, list_read).await?;

        let created_date = storage_precision(Utc::now());
        let record = CreateItem {
            todo_list_id: new_item.todo_list_id,
            title: new_item.title.clone(),
            description: new_item.description.clone(),
            created_date,
            due_date: new_item
                .due_date
                .map(storage_precision)
                .unwrap_or_else(|| one_week_after(created_date)),
        };

        let item_id = item_write
            .create_item(&record, &mut *ext_cxn)
            .await
            .map_err(|err| item_write_error(err, "create an item"))?;
        info!(item_id, list_id = record.todo_list_id, "Created item");

        Ok(TodoItem {
            id: item_id,
            title: record.title,
            description: record.description,
            created_date: record.created_date,
            due_date: record.due_date,
            todo_list_id: record.todo_list_id,
        })
    }

    async fn update_item(
        &self,
        list_id: i32,
        item_id: i32,
        update: &UpdateItem,
        ext_cxn: &mut impl ExternalConnectivity,
        list_read: &impl ListReader,
        item_read: &impl ItemReader,
        item_write: &impl ItemWriter,
    ) -> Result<TodoItem, domain::Error> {
        update.validate()?;
        let existing = fetch_item(list_id, item_id, &mut *ext_cxn, item_read).await?;
        if update.todo_list_id != existing.todo_list_id {
            verify_target_list(update.todo_list_id, &mut *ext_cxn, list_read).await?;
        }

        let stored_update = UpdateItem {
            todo_list_id: update.todo_list_id,
            title: update.title.clone(),
            description: update.description.clone(),
            due_date: storage_precision(update.due_date),
        };
        item_write
            .update_item(item_id, &stored_update, &mut *ext_cxn)
            .await
            .map_err(|err| item_write_error(err, "update an item"))?;
        info!(item_id, list_id = stored_update.todo_list_id, "Updated item");

        Ok(TodoItem {
            id: existing.id,
            title: stored_update.title,
            description: stored_update.description,
            created_date: existing.created_date,
            due_date: stored_update.due_date,
            todo_list_id: stored_update.todo_list_id,
        })
    }

    async fn delete_item(
        &self,
        list_id: i32,
        item_id: i32,
        ext_cxn: &mut impl ExternalConnectivity,
        item_write: &impl ItemWriter,
    ) -> Result<(), domain::Error> {
        item_write
            .delete_item(list_id, item_id, &mut *ext_cxn)
            .await
            .map_err(|err| err.into_error_trying_to("delete an item"))?;

        info!(item_id, list_id, "Deleted item");
        Ok(())
    }
}
