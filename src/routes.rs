//! Routing table for the API. Every endpoint is registered from a [RouteName] template, and
//! links or redirects to an endpoint are produced by filling in that same template through
//! [Route::path], so a path is only ever spelled out once.

/// Named endpoints of the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteName {
    /// "index"
    Index,
    /// "list"
    List,
    /// "list-add"
    ListAdd,
    /// "list-delete"
    ListDelete,
    /// "item-add"
    ItemAdd,
    /// "item-update"
    ItemUpdate,
    /// "item-delete"
    ItemDelete,
}

impl RouteName {
    /// Router path template, in the syntax axum expects
    pub const fn template(self) -> &'static str {
        match self {
            RouteName::Index => "/",
            RouteName::List => "/list/:list_id",
            RouteName::ListAdd => "/list/add",
            RouteName::ListDelete => "/list/:list_id/delete",
            RouteName::ItemAdd => "/list/:list_id/item/add",
            RouteName::ItemUpdate => "/list/:list_id/item/:item_id",
            RouteName::ItemDelete => "/list/:list_id/item/:item_id/delete",
        }
    }
}

/// A concrete endpoint, carrying the identifiers its template needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Index,
    List { list_id: i32 },
    ListAdd,
    ListDelete { list_id: i32 },
    ItemAdd { list_id: i32 },
    ItemUpdate { list_id: i32, item_id: i32 },
    ItemDelete { list_id: i32, item_id: i32 },
}

impl Route {
    pub fn name(&self) -> RouteName {
        match self {
            Route::Index => RouteName::Index,
            Route::List { .. } => RouteName::List,
            Route::ListAdd => RouteName::ListAdd,
            Route::ListDelete { .. } => RouteName::ListDelete,
            Route::ItemAdd { .. } => RouteName::ItemAdd,
            Route::ItemUpdate { .. } => RouteName::ItemUpdate,
            Route::ItemDelete { .. } => RouteName::ItemDelete,
        }
    }

    fn list_id(&self) -> Option<i32> {
        match *self {
            Route::Index | Route::ListAdd => None,
            Route::List { list_id }
            | Route::ListDelete { list_id }
            | Route::ItemAdd { list_id }
            | Route::ItemUpdate { list_id, .. }
            | Route::ItemDelete { list_id, .. } => Some(list_id),
        }
    }

    fn item_id(&self) -> Option<i32> {
        match *self {
            Route::ItemUpdate { item_id, .. } | Route::ItemDelete { item_id, .. } => Some(item_id),
            _ => None,
        }
    }

    /// The request path for this endpoint, built from its [RouteName::template]
    pub fn path(&self) -> String {
        self.name()
            .template()
            .split('/')
            .map(|segment| match segment {
                ":list_id" => self.list_id().map(|id| id.to_string()),
                ":item_id" => self.item_id().map(|id| id.to_string()),
                literal => Some(literal.to_owned()),
            })
            .map(|segment| segment.unwrap_or_default())
            .collect::<Vec<_>>()
            .join("/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_in_identifiers() {
        assert_eq!("/", Route::Index.path());
        assert_eq!("/list/add", Route::ListAdd.path());
        assert_eq!("/list/4", Route::List { list_id: 4 }.path());
        assert_eq!("/list/4/delete", Route::ListDelete { list_id: 4 }.path());
        assert_eq!("/list/4/item/add", Route::ItemAdd { list_id: 4 }.path());
        assert_eq!(
            "/list/4/item/17",
            Route::ItemUpdate {
                list_id: 4,
                item_id: 17
            }
            .path()
        );
        assert_eq!(
            "/list/4/item/17/delete",
            Route::ItemDelete {
                list_id: 4,
                item_id: 17
            }
            .path()
        );
    }

    #[test]
    fn every_route_has_a_distinct_template() {
        let names = [
            RouteName::Index,
            RouteName::List,
            RouteName::ListAdd,
            RouteName::ListDelete,
            RouteName::ItemAdd,
            RouteName::ItemUpdate,
            RouteName::ItemDelete,
        ];

        for (index, route) in names.iter().enumerate() {
            for other in &names[index + 1..] {
                assert_ne!(route.template(), other.template());
            }
        }
    }

    #[test]
    fn paths_carry_no_placeholders() {
        let path = Route::ItemDelete {
            list_id: 1,
            item_id: 2,
        }
        .path();
        assert!(!path.contains(':'), "unfilled placeholder in {path}");
    }
}
