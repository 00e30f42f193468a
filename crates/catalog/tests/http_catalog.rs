use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};
use storefront_catalog::{
    CatalogAdmin, CatalogError, CatalogSource, HttpCatalog, NewProduct,
};
use storefront_core::{Money, ProductId};

#[derive(Clone)]
struct FakeStore {
    products: Arc<Mutex<Vec<Value>>>,
}

async fn list(State(store): State<FakeStore>) -> Json<Vec<Value>> {
    Json(store.products.lock().unwrap().clone())
}

async fn one(State(store): State<FakeStore>, Path(id): Path<u64>) -> String {
    // Unknown ids answer 200 with an empty body, like the real API.
    store
        .products
        .lock()
        .unwrap()
        .iter()
        .find(|p| p["id"] == json!(id))
        .map(|p| p.to_string())
        .unwrap_or_default()
}

async fn create(State(store): State<FakeStore>, Json(mut body): Json<Value>) -> Json<Value> {
    body["id"] = json!(21);
    store.products.lock().unwrap().push(body.clone());
    Json(body)
}

async fn update(Path(id): Path<u64>, Json(mut body): Json<Value>) -> Json<Value> {
    body["id"] = json!(id);
    Json(body)
}

async fn remove(Path(id): Path<u64>) -> Response {
    if id == 999 {
        return (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response();
    }
    Json(json!({ "id": id })).into_response()
}

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        let store = FakeStore {
            products: Arc::new(Mutex::new(vec![
                json!({
                    "id": 1,
                    "title": "Backpack",
                    "price": 109.95,
                    "description": "Your perfect pack",
                    "category": "men's clothing",
                    "image": "https://fakestoreapi.com/img/1.jpg",
                    "rating": { "rate": 3.9, "count": 120 }
                }),
                json!({
                    "id": 2,
                    "title": "T-Shirt",
                    "price": 22.3,
                    "description": "Slim fit",
                    "category": "men's clothing",
                    "image": "https://fakestoreapi.com/img/2.jpg"
                }),
            ])),
        };

        let app = Router::new()
            .route("/products", get(list).post(create))
            .route("/products/:id", get(one).put(update).delete(remove))
            .with_state(store);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn draft(title: &str) -> NewProduct {
    NewProduct {
        title: title.to_string(),
        price: Money::from_cents(2_999),
        description: "This is a new product added via API".to_string(),
        category: "electronics".to_string(),
        image: "https://via.placeholder.com/300".to_string(),
    }
}

#[tokio::test]
async fn lists_and_fetches_products() {
    let server = TestServer::spawn().await;
    let catalog = HttpCatalog::new(format!("{}/", server.base_url));

    let products = catalog.list_products().await.unwrap();
    assert_eq!(products.len(), 2);
    assert_eq!(products[0].price, Money::from_cents(10_995));

    let shirt = catalog.get_product(ProductId::new(2)).await.unwrap();
    assert_eq!(shirt.title, "T-Shirt");
    assert_eq!(shirt.price.cents(), 2_230);
}

#[tokio::test]
async fn empty_body_means_not_found() {
    let server = TestServer::spawn().await;
    let catalog = HttpCatalog::new(server.base_url.clone());

    let err = catalog.get_product(ProductId::new(404)).await.unwrap_err();
    assert!(matches!(err, CatalogError::NotFound(id) if id == ProductId::new(404)));
}

#[tokio::test]
async fn admin_crud_round_trips_through_the_api() {
    let server = TestServer::spawn().await;
    let catalog = HttpCatalog::new(server.base_url.clone());

    let created = catalog.create_product(draft("New Product")).await.unwrap();
    assert_eq!(created.id, ProductId::new(21));
    assert_eq!(created.price, Money::from_cents(2_999));
    assert_eq!(catalog.list_products().await.unwrap().len(), 3);

    let updated = catalog
        .update_product(ProductId::new(7), draft("Renamed"))
        .await
        .unwrap();
    assert_eq!(updated.id, ProductId::new(7));
    assert_eq!(updated.title, "Renamed");

    catalog.delete_product(ProductId::new(7)).await.unwrap();
}

#[tokio::test]
async fn server_errors_surface_as_api_errors() {
    let server = TestServer::spawn().await;
    let catalog = HttpCatalog::new(server.base_url.clone());

    let err = catalog.delete_product(ProductId::new(999)).await.unwrap_err();
    match err {
        CatalogError::Api(500, body) => assert_eq!(body, "boom"),
        other => panic!("expected Api(500), got {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_host_is_a_network_error() {
    let catalog = HttpCatalog::new("http://127.0.0.1:9");
    let err = catalog.list_products().await.unwrap_err();
    assert!(matches!(err, CatalogError::Network(_)));
}
