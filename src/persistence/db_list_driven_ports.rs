use crate::domain;
use crate::domain::todo_list::{NewList, TodoList};
use crate::domain::DrivenPortError;
use crate::external_connections::{ConnectionHandle, ExternalConnectivity};
use anyhow::Context;
use sqlx::{query, query_as};

pub struct DbListReader;

#[derive(sqlx::FromRow)]
struct TodoListRow {
    id: i32,
    title: String,
}

impl From<TodoListRow> for TodoList {
    fn from(value: TodoListRow) -> Self {
        TodoList {
            id: value.id,
            title: value.title,
        }
    }
}

impl domain::todo_list::driven_ports::ListReader for DbListReader {
    async fn all_lists(
        &self,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<Vec<TodoList>, anyhow::Error> {
        let mut cxn = ext_cxn.database_cxn().await?;

        let lists = query_as::<_, TodoListRow>("SELECT id, title FROM todo_list ORDER BY id")
            .fetch_all(cxn.borrow_connection())
            .await
            .context("trying to fetch all to-do lists")?
            .into_iter()
            .map(TodoList::from)
            .collect();

        Ok(lists)
    }

    async fn list_by_id(
        &self,
        list_id: i32,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<Option<TodoList>, anyhow::Error> {
        let mut cxn = ext_cxn.database_cxn().await?;

        let todo_list = query_as::<_, TodoListRow>("SELECT id, title FROM todo_list WHERE id = $1")
            .bind(list_id)
            .fetch_optional(cxn.borrow_connection())
            .await
            .context("trying to fetch a to-do list by ID")?
            .map(TodoList::from);

        Ok(todo_list)
    }
}

pub struct DbListWriter;

impl domain::todo_list::driven_ports::ListWriter for DbListWriter {
    async fn create_list(
        &self,
        new_list: &NewList,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<i32, DrivenPortError> {
        let mut cxn = ext_cxn.database_cxn().await?;

        let new_id =
            query_as::<_, super::NewId>("INSERT INTO todo_list(title) VALUES ($1) RETURNING id")
                .bind(&new_list.title)
                .fetch_one(cxn.borrow_connection())
                .await
                .map_err(|err| {
                    super::classify_query_error(err, "trying to insert a new to-do list")
                })?;

        Ok(new_id.id)
    }

    async fn delete_list(
        &self,
        list_id: i32,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<(), DrivenPortError> {
        let mut cxn = ext_cxn.database_cxn().await?;

        let outcome = query("DELETE FROM todo_list WHERE id = $1")
            .bind(list_id)
            .execute(cxn.borrow_connection())
            .await
            .map_err(|err| super::classify_query_error(err, "trying to delete a to-do list"))?;

        if outcome.rows_affected() == 0 {
            return Err(DrivenPortError::DoesNotExist);
        }

        Ok(())
    }
}
