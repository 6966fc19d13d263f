use crate::app_env::test::TEST_DB_URL;
use crate::{SharedData, api, db, persistence};
use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, header};
use axum::response::Response;
use dotenv::dotenv;
use lazy_static::lazy_static;
use rand::{Rng, thread_rng};
use sqlx::{Connection, PgConnection, PgPool};
use std::env;
use std::future::Future;
use std::sync::Arc;
use tokio::runtime::Runtime;
use tower::ServiceExt;

lazy_static! {
    static ref TOKIO_RT: Runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Tokio runtime failed to initialize");
}

/// A freshly created database which only lives for the duration of one test
struct TestDatabase {
    name: String,
}

impl TestDatabase {
    async fn create(admin_cxn: &mut PgConnection) -> Result<Self, sqlx::Error> {
        let db_id: u32 = thread_rng().gen_range(10_000..99_999);
        let name = format!("test_db_{db_id}");

        sqlx::query(&format!("CREATE DATABASE {name}"))
            .execute(&mut *admin_cxn)
            .await?;

        Ok(TestDatabase { name })
    }

    async fn remove(self, admin_cxn: &mut PgConnection) {
        let result = sqlx::query(&format!("DROP DATABASE {} WITH (FORCE)", self.name))
            .execute(&mut *admin_cxn)
            .await;
        if let Err(error) = result {
            println!(
                "Warning: failed to drop test database {}, you may need to do it manually. Error: {error}",
                self.name
            );
        }
    }
}

/// Creates a temp database for a test, brings its schema up to date, and hands a pool for it to
/// [test_fn]. The database is dropped again once the test finishes.
///
/// Expects that the TEST_DB_URL environment variable is populated
pub fn prepare_db_and_test<F, R>(test_fn: F)
where
    R: Future<Output = ()>,
    F: FnOnce(PgPool) -> R,
{
    if dotenv().is_err() {
        println!("Test is running without .env file.");
    }

    TOKIO_RT.block_on(async move {
        let pg_connection_base_url = env::var(TEST_DB_URL).expect(
            "You must provide the TEST_DB_URL environment variable as the base postgres connection string",
        );
        let mut admin_cxn = PgConnection::connect(&pg_connection_base_url)
            .await
            .expect("Test failure - could not create initial connection to provision database.");
        let test_db = TestDatabase::create(&mut admin_cxn)
            .await
            .expect("Failed to create test database");

        let sqlx_pool = db::connect_sqlx(&format!("{pg_connection_base_url}/{}", test_db.name))
            .await
            .expect("Could not connect to the test database");
        db::run_migrations(&sqlx_pool)
            .await
            .expect("Could not migrate the test database");

        test_fn(sqlx_pool.clone()).await;

        sqlx_pool.close().await;
        test_db.remove(&mut admin_cxn).await;
    });
}

/// Builds the full application router on top of the given database
pub fn router_for(db: PgPool) -> Router {
    api::build_router(Arc::new(SharedData {
        ext_cxn: persistence::ExternalConnectivity::new(db),
    }))
}

/// Runs a single request through the router, sending [body] as JSON if there is one
pub async fn send(
    router: &Router,
    method: Method,
    path: &str,
    body: Option<serde_json::Value>,
) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(match body {
            Some(json) => Body::from(json.to_string()),
            None => Body::empty(),
        })
        .expect("Test request should be valid");

    router
        .clone()
        .oneshot(request)
        .await
        .expect("Router should never fail to produce a response")
}
