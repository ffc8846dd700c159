use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use catalog::{Catalog, Program};
use reqwest::StatusCode as HttpStatusCode;
use service::{file::counter_store::FileCounterStore, registration::RegistrationService};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use server::routes::{self, ServerState};

const ADMIN_KEY: &str = "test-admin-key";

struct TestApp {
    base_url: String,
}

fn cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

async fn start_server() -> anyhow::Result<TestApp> {
    // Isolated temp counter file per test run
    let counters_path = format!("target/test-data/{}/counters.json", Uuid::new_v4());
    let catalog = Arc::new(Catalog::new(vec![
        Program { id: "week1".into(), limit: 5, display_name: Some("Week 1".into()) },
        Program { id: "week2".into(), limit: 24, display_name: None },
    ])?);
    let counters = FileCounterStore::new(&counters_path).await?;
    let service = Arc::new(RegistrationService::new(catalog, counters, ADMIN_KEY.into()));
    service.initialize().await?;

    let app: Router = routes::build_router(ServerState { service }, cors());
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("server error: {}", e);
        }
    });

    Ok(TestApp { base_url })
}

fn client() -> reqwest::Client {
    reqwest::Client::new()
}

#[tokio::test]
async fn e2e_liveness_marker() -> anyhow::Result<()> {
    let app = start_server().await?;

    for path in ["/", "/health"] {
        let res = client().get(format!("{}{}", app.base_url, path)).send().await?;
        assert_eq!(res.status(), HttpStatusCode::OK);
        let body = res.json::<serde_json::Value>().await?;
        assert_eq!(body["status"], "ok");
    }
    Ok(())
}

#[tokio::test]
async fn e2e_check_limit_unknown_program_404() -> anyhow::Result<()> {
    let app = start_server().await?;

    let res = client()
        .get(format!("{}/check-limit/week9", app.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    let body = res.json::<serde_json::Value>().await?;
    assert!(body["error"].as_str().unwrap().contains("week9"));

    let res = client()
        .post(format!("{}/register/week9", app.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn e2e_register_and_check_limit_flow() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    // Fresh program reads as zero and not full.
    let res = c.get(format!("{}/check-limit/week1", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["full"], false);
    assert_eq!(body["count"], 0);
    assert_eq!(body["limit"], 5);

    // Five registrations fill it.
    for expected in 1..=5 {
        let res = c.post(format!("{}/register/week1", app.base_url)).send().await?;
        assert_eq!(res.status(), HttpStatusCode::OK);
        let body = res.json::<serde_json::Value>().await?;
        assert_eq!(body["success"], true);
        assert_eq!(body["newCount"], expected);
    }

    let body = c
        .get(format!("{}/check-limit/week1", app.base_url))
        .send()
        .await?
        .json::<serde_json::Value>()
        .await?;
    assert_eq!(body["full"], true);
    assert_eq!(body["count"], 5);
    assert_eq!(body["limit"], 5);

    // Capacity is advisory: a sixth registration still succeeds.
    let body = c
        .post(format!("{}/register/week1", app.base_url))
        .send()
        .await?
        .json::<serde_json::Value>()
        .await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["newCount"], 6);
    Ok(())
}

#[tokio::test]
async fn e2e_status_page_lists_programs() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    c.post(format!("{}/register/week2", app.base_url)).send().await?;

    let res = c.get(format!("{}/status", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let html = res.text().await?;
    assert!(html.contains("Week 1"));
    assert!(html.contains("week2"));
    Ok(())
}

#[tokio::test]
async fn e2e_metrics_and_openapi_exposed() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    let res = c.get(format!("{}/metrics", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);

    let res = c
        .get(format!("{}/api-docs/openapi.json", app.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let doc = res.json::<serde_json::Value>().await?;
    assert!(doc["paths"]["/check-limit/{program}"].is_object());
    Ok(())
}
