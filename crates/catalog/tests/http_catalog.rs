use axum::Router;
use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use rust_decimal::Decimal;
use serde_json::json;

use storefront_catalog::{Catalog, CatalogError, HttpCatalog};
use storefront_core::ProductId;

struct StubCatalog {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl StubCatalog {
    async fn spawn() -> Self {
        let app = Router::new()
            .route("/stock/:id", get(stock))
            .route("/products/:id", get(product));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for StubCatalog {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn stock(Path(id): Path<u64>) -> Response {
    match id {
        1 => axum::Json(json!({ "id": 1, "amount": 3 })).into_response(),
        2 => axum::Json(json!({ "id": 2, "amount": 0 })).into_response(),
        // 200 with a body that is not a stock record.
        66 => "definitely not json".into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn product(Path(id): Path<u64>) -> Response {
    match id {
        1 => axum::Json(json!({
            "id": 1,
            "title": "Tênis de Caminhada Leve Confortável",
            "price": 179.9,
            "image": "https://cdn.example.com/1.jpg",
            "brand": "Acme"
        }))
        .into_response(),
        // Catalog answers with the wrong product.
        7 => axum::Json(json!({ "id": 8, "title": "Other", "price": 1, "image": "" })).into_response(),
        _ => (StatusCode::NOT_FOUND, "{}").into_response(),
    }
}

#[tokio::test]
async fn fetches_stock() {
    let server = StubCatalog::spawn().await;
    let catalog = HttpCatalog::new(&server.base_url).unwrap();

    let record = catalog.stock(ProductId::new(1)).await.unwrap();
    assert_eq!(record.amount, 3);
    assert_eq!(record.id, Some(ProductId::new(1)));

    let record = catalog.stock(ProductId::new(2)).await.unwrap();
    assert_eq!(record.amount, 0);
}

#[tokio::test]
async fn fetches_product_metadata() {
    let server = StubCatalog::spawn().await;
    let catalog = HttpCatalog::new(format!("{}/", server.base_url)).unwrap();

    let details = catalog.product(ProductId::new(1)).await.unwrap();
    assert_eq!(details.id, ProductId::new(1));
    assert_eq!(details.price, Decimal::new(1799, 1));
    assert_eq!(details.image, "https://cdn.example.com/1.jpg");
    assert_eq!(details.extra.get("brand"), Some(&json!("Acme")));
}

#[tokio::test]
async fn missing_resources_surface_the_status_code() {
    let server = StubCatalog::spawn().await;
    let catalog = HttpCatalog::new(&server.base_url).unwrap();

    match catalog.stock(ProductId::new(404)).await.unwrap_err() {
        CatalogError::Api(status, _) => assert_eq!(status, 404),
        other => panic!("Expected Api error, got {other:?}"),
    }
    match catalog.product(ProductId::new(5)).await.unwrap_err() {
        CatalogError::Api(status, _) => assert_eq!(status, 404),
        other => panic!("Expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_bodies_are_parse_errors() {
    let server = StubCatalog::spawn().await;
    let catalog = HttpCatalog::new(&server.base_url).unwrap();

    let err = catalog.stock(ProductId::new(66)).await.unwrap_err();
    assert!(matches!(err, CatalogError::Parse(_)), "got {err:?}");

    let err = catalog.product(ProductId::new(7)).await.unwrap_err();
    assert!(matches!(err, CatalogError::Parse(_)), "got {err:?}");
}
