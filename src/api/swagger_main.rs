use crate::dto;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "To-do Lists API",
        description = "Keeps named to-do lists and the items in them, each with a due date"
    ),
    tags(
        (name = "Lists", description = "Creating, viewing and deleting to-do lists"),
        (name = "Items", description = "Adding, editing and removing the items of a list"),
    )
)]
struct TodoApi;

/// Constructs the route on the API that renders the swagger UI and returns the OpenAPI schema.
/// Merges in OpenAPI definitions from other locations in the app, such as the [dto] package
/// and submodules of [api][crate::api]
pub fn build_documentation() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api_docs())
}

fn api_docs() -> utoipa::openapi::OpenApi {
    let mut api_docs = TodoApi::openapi();
    api_docs.merge(dto::OpenApiSchemas::openapi());
    api_docs.merge(super::todo_list::ListsApi::openapi());
    api_docs.merge(super::todo_item::ItemsApi::openapi());

    api_docs
}
