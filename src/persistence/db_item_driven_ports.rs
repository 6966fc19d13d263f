use crate::domain;
use crate::domain::todo_item::{CreateItem, TodoItem, UpdateItem};
use crate::domain::DrivenPortError;
use crate::external_connections::{ConnectionHandle, ExternalConnectivity};
use anyhow::Context;
use chrono::{DateTime, Utc};
use sqlx::{query, query_as};

pub struct DbItemReader;

#[derive(sqlx::FromRow)]
struct TodoItemRow {
    id: i32,
    title: String,
    description: Option<String>,
    created_date: DateTime<Utc>,
    due_date: DateTime<Utc>,
    todo_list_id: i32,
}

impl From<TodoItemRow> for TodoItem {
    fn from(value: TodoItemRow) -> Self {
        TodoItem {
            id: value.id,
            title: value.title,
            description: value.description,
            created_date: value.created_date,
            due_date: value.due_date,
            todo_list_id: value.todo_list_id,
        }
    }
}

const ITEM_COLUMNS: &str = "id, title, description, created_date, due_date, todo_list_id";

impl domain::todo_item::driven_ports::ItemReader for DbItemReader {
    async fn items_in_list(
        &self,
        list_id: i32,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<Vec<TodoItem>, anyhow::Error> {
        let mut cxn = ext_cxn.database_cxn().await?;

        let statement = format!(
            "SELECT {ITEM_COLUMNS} FROM todo_item WHERE todo_list_id = $1 ORDER BY due_date, id"
        );
        let items = query_as::<_, TodoItemRow>(&statement)
            .bind(list_id)
            .fetch_all(cxn.borrow_connection())
            .await
            .context("trying to fetch the items of a to-do list")?
            .into_iter()
            .map(TodoItem::from)
            .collect();

        Ok(items)
    }

    async fn item_in_list(
        &self,
        list_id: i32,
        item_id: i32,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<Option<TodoItem>, anyhow::Error> {
        let mut cxn = ext_cxn.database_cxn().await?;

        let statement =
            format!("SELECT {ITEM_COLUMNS} FROM todo_item WHERE todo_list_id = $1 AND id = $2");
        let item = query_as::<_, TodoItemRow>(&statement)
            .bind(list_id)
            .bind(item_id)
            .fetch_optional(cxn.borrow_connection())
            .await
            .context("trying to fetch a to-do item by ID")?
            .map(TodoItem::from);

        Ok(item)
    }
}

pub struct DbItemWriter;

impl domain::todo_item::driven_ports::ItemWriter for DbItemWriter {
    async fn create_item(
        &self,
        item: &CreateItem,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<i32, DrivenPortError> {
        let mut cxn = ext_cxn.database_cxn().await?;

        let new_id = query_as::<_, super::NewId>(
            "INSERT INTO todo_item(title, description, created_date, due_date, todo_list_id) \
             VALUES ($1, $2, $3, $4, $5) RETURNING id",
        )
        .bind(&item.title)
        .bind(&item.description)
        .bind(item.created_date)
        .bind(item.due_date)
        .bind(item.todo_list_id)
        .fetch_one(cxn.borrow_connection())
        .await
        .map_err(|err| super::classify_query_error(err, "trying to insert a new to-do item"))?;

        Ok(new_id.id)
    }

    async fn update_item(
        &self,
        item_id: i32,
        update: &UpdateItem,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<(), DrivenPortError> {
        let mut cxn = ext_cxn.database_cxn().await?;

        let outcome = query(
            "UPDATE todo_item SET title = $1, description = $2, due_date = $3, todo_list_id = $4 \
             WHERE id = $5",
        )
        .bind(&update.title)
        .bind(&update.description)
        .bind(update.due_date)
        .bind(update.todo_list_id)
        .bind(item_id)
        .execute(cxn.borrow_connection())
        .await
        .map_err(|err| super::classify_query_error(err, "trying to update a to-do item"))?;

        if outcome.rows_affected() == 0 {
            return Err(DrivenPortError::DoesNotExist);
        }

        Ok(())
    }

    async fn delete_item(
        &self,
        list_id: i32,
        item_id: i32,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<(), DrivenPortError> {
        let mut cxn = ext_cxn.database_cxn().await?;

        let outcome = query("DELETE FROM todo_item WHERE id = $1 AND todo_list_id = $2")
            .bind(item_id)
            .bind(list_id)
            .execute(cxn.borrow_connection())
            .await
            .map_err(|err| super::classify_query_error(err, "trying to delete a to-do item"))?;

        if outcome.rows_affected() == 0 {
            return Err(DrivenPortError::DoesNotExist);
        }

        Ok(())
    }

    async fn delete_items_in_list(
        &self,
        list_id: i32,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<u64, anyhow::Error> {
        let mut cxn = ext_cxn.database_cxn().await?;

        let outcome = query("DELETE FROM todo_item WHERE todo_list_id = $1")
            .bind(list_id)
            .execute(cxn.borrow_connection())
            .await
            .context("trying to delete the items of a to-do list")?;

        Ok(outcome.rows_affected())
    }
}
