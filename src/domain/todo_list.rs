use crate::domain;
use crate::domain::todo_item::driven_ports::ItemWriter;
use crate::domain::DrivenPortError;
use crate::external_connections::ExternalConnectivity;
use driven_ports::{ListReader, ListWriter};
use tracing::{error, info};
use validator::Validate;

/// A named collection of to-do items
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct TodoList {
    pub id: i32,
    pub title: String,
}

#[derive(Debug, Validate)]
#[cfg_attr(test, derive(Clone))]
pub struct NewList {
    #[validate(length(min = 1, max = 100), custom = "domain::not_blank")]
    pub title: String,
}

pub mod driven_ports {
    use super::*;

    pub trait ListReader {
        /// All lists, in insertion order
        async fn all_lists(
            &self,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<Vec<TodoList>, anyhow::Error>;
        async fn list_by_id(
            &self,
            list_id: i32,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<Option<TodoList>, anyhow::Error>;
    }

    pub trait ListWriter {
        /// Stores a new list and returns its ID. Must report [DrivenPortError::Conflict] when
        /// the title is already taken.
        async fn create_list(
            &self,
            new_list: &NewList,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<i32, DrivenPortError>;

        /// Removes a single list. Reports [DrivenPortError::DoesNotExist] if nothing was removed.
        async fn delete_list(
            &self,
            list_id: i32,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<(), DrivenPortError>;
    }
}

pub mod driving_ports {
    use super::*;

    pub trait ListPort {
        async fn all_lists(
            &self,
            ext_cxn: &mut impl ExternalConnectivity,
            list_read: &impl ListReader,
        ) -> Result<Vec<TodoList>, domain::Error>;
        async fn list_by_id(
            &self,
            list_id: i32,
            ext_cxn: &mut impl ExternalConnectivity,
            list_read: &impl ListReader,
        ) -> Result<TodoList, domain::Error>;
        async fn create_list(
            &self,
            new_list: &NewList,
            ext_cxn: &mut impl ExternalConnectivity,
            list_write: &impl ListWriter,
        ) -> Result<i32, domain::Error>;
        /// Deletes the list along with every item it owns. Should be run inside a transaction.
        async fn delete_list(
            &self,
            list_id: i32,
            ext_cxn: &mut impl ExternalConnectivity,
            list_write: &impl ListWriter,
            item_write: &impl ItemWriter,
        ) -> Result<(), domain::Error>;
    }
}

fn duplicate_title() -> domain::Error {
    domain::Error::invalid_field(
        "title",
        "unique",
        "A to-do list with this title already exists.",
    )
}

pub struct ListService {}

impl driving_ports::ListPort for ListService {
    async fn all_lists(
        &self,
        ext_cxn: &mut impl ExternalConnectivity,
        list_read: &impl ListReader,
    ) -> Result<Vec<TodoList>, domain::Error> {
        list_read
            .all_lists(ext_cxn)
            .await
            .map_err(|err| domain::Error::failed_to("fetch all lists", err))
    }

    async fn list_by_id(
        &self,
        list_id: i32,
        ext_cxn: &mut impl ExternalConnectivity,
        list_read: &impl ListReader,
    ) -> Result<TodoList, domain::Error> {
        list_read
            .list_by_id(list_id, ext_cxn)
            .await
            .map_err(|err| domain::Error::failed_to("fetch a list", err))?
            .ok_or(domain::Error::DoesNotExist)
    }

    async fn create_list(
        &self,
        new_list: &NewList,
        ext_cxn: &mut impl ExternalConnectivity,
        list_write: &impl ListWriter,
    ) -> Result<i32, domain::Error> {
        new_list.validate()?;

        match list_write.create_list(new_list, ext_cxn).await {
            Ok(list_id) => {
                info!(list_id, "Created list");
                Ok(list_id)
            }
            Err(DrivenPortError::Conflict) => Err(duplicate_title()),
            Err(port_err) => {
                error!("List creation failed: {port_err}");
                Err(port_err.into_error_trying_to("create a list"))
            }
        }
    }

    async fn delete_list(
        &self,
        list_id: i32,
        ext_cxn: &mut impl ExternalConnectivity,
        list_write: &impl ListWriter,
        item_write: &impl ItemWriter,
    ) -> Result<(), domain::Error> {
        let removed_items = item_write
            .delete_items_in_list(list_id, &mut *ext_cxn)
            .await
            .map_err(|err| domain::Error::failed_to("delete the items of a list", err))?;
        list_write
            .delete_list(list_id, &mut *ext_cxn)
            .await
            .map_err(|err| err.into_error_trying_to("delete a list"))?;

        info!(list_id, removed_items, "Deleted list");
        Ok(())
    }
}
