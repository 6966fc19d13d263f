use crate::routing_utils::{BasicErrorResponse, ExtraInfo, ValidationErrorSchema};
use utoipa::OpenApi;

pub mod todo_item;
pub mod todo_list;

pub use todo_item::*;
pub use todo_list::*;

/// Collects the schemas of every DTO the API exchanges for the OpenAPI document
#[derive(OpenApi)]
#[openapi(components(schemas(
    TodoList,
    NewList,
    InsertedList,
    ListForm,
    ListDeleteConfirmation,
    TodoItem,
    ListDetail,
    NewItem,
    UpdateItem,
    ItemFields,
    ItemForm,
    ItemDeleteConfirmation,
    InsertedItem,
    BasicErrorResponse,
    ExtraInfo,
    ValidationErrorSchema,
)))]
pub struct OpenApiSchemas;
