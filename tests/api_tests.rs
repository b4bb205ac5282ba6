mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use common::{token_for, TestApp};
use http_body_util::BodyExt;
use paman::models::{
    auth::Role,
    product::{ProductForm, ReviewDecision},
};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn get_with_token(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

fn post_json(uri: &str, token: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new();

    let response = app.router().oneshot(get("/api/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"OK");
}

#[tokio::test]
async fn test_protected_route_without_token_is_unauthorized() {
    let app = TestApp::new();

    let (status, body) = send(app.router(), get("/api/users/me")).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], json!(false));
    assert_eq!(
        body["errorMessage"],
        json!("Kamu harus login untuk melakukan aksi ini.")
    );
}

#[tokio::test]
async fn test_garbage_token_is_unauthorized() {
    let app = TestApp::new();

    let (status, body) = send(app.router(), get_with_token("/api/users/me", "bukan-token")).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn test_token_without_profile_is_forbidden() {
    let app = TestApp::new();
    let token = token_for(Uuid::new_v4());

    let (status, body) = send(app.router(), get_with_token("/api/users/me", &token)).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        body["errorMessage"],
        json!("Gagal memuat data pengguna untuk otorisasi.")
    );
}

#[tokio::test]
async fn test_me_returns_success_envelope() {
    let app = TestApp::new();
    let session = app.session(Role::User, "Warga Biasa");

    let (status, body) = send(
        app.router(),
        get_with_token("/api/users/me", &token_for(session.user_id)),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["errorMessage"], Value::Null);
    assert_eq!(body["user"]["userName"], json!("Warga Biasa"));
    assert_eq!(body["user"]["role"], json!("user"));
}

#[tokio::test]
async fn test_categories_are_public() {
    let app = TestApp::new();
    app.db.seed_category("Pertanian");
    app.db.seed_category("Kerajinan");

    let (status, body) = send(app.router(), get("/api/categories")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["categories"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_saved_check_is_false_for_anonymous_visitors() {
    let app = TestApp::new();
    let member = app.session(Role::User, "Warga Biasa");
    let material = app.db.seed_material("Budidaya Sagu", "Sagu di lahan rawa", None);
    app.state
        .saved_material_service
        .save(&member, material.id)
        .await
        .unwrap();
    let uri = format!("/api/saved-materials/{}", material.id);

    let (status, body) = send(app.router(), get(&uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isSaved"], json!(false));

    let (_, body) = send(app.router(), get_with_token(&uri, &token_for(member.user_id))).await;
    assert_eq!(body["isSaved"], json!(true));
}

#[tokio::test]
async fn test_register_profile_over_http() {
    let app = TestApp::new();
    let subject = Uuid::new_v4();
    let token = token_for(subject);

    let (status, body) = send(
        app.router(),
        post_json(
            "/api/users/profile",
            &token,
            json!({ "fullName": "Yohanes Wenda", "email": "yohanes@papuamandiri.id" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["id"], json!(subject));

    // Agora o mesmo token abre as rotas protegidas
    let (status, _) = send(app.router(), get_with_token("/api/users/me", &token)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_government_orders_over_http() {
    let app = TestApp::new();
    let community = app.session(Role::AdminKomunitas, "Mama Yosina");
    let government = app.session(Role::AdminPemerintah, "Dinas Perindag");
    let service = &app.state.product_service;

    let form = ProductForm {
        title: "Madu Hutan".to_string(),
        description: "Madu asli dari hutan Papua".to_string(),
        price: Decimal::new(50000, 0),
        stock: 50,
        address: "Jl. Raya Sentani".to_string(),
        category_id: None,
        image_url: None,
    };
    let product = service.submit_product(&community, form, None).await.unwrap();
    service
        .review_product(&government, product.id, ReviewDecision::Approved, None)
        .await
        .unwrap();

    let token = token_for(government.user_id);
    let (status, body) = send(
        app.router(),
        post_json(
            "/api/government/orders",
            &token,
            json!({ "productId": product.id, "quantity": 20 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["order"]["quantity"], json!(20));
    assert_eq!(body["order"]["status"], json!("in_progress"));

    let (status, body) = send(
        app.router(),
        post_json(
            "/api/government/orders",
            &token,
            json!({ "productId": product.id, "quantity": 40 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], json!(false));
    assert_eq!(app.db.product(product.id).stock, 30);

    // Comunidade não pode pedir
    let (status, _) = send(
        app.router(),
        post_json(
            "/api/government/orders",
            &token_for(community.user_id),
            json!({ "productId": product.id, "quantity": 1 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_error_messages_follow_accept_language() {
    let app = TestApp::new();
    let uri = format!("/api/materials/{}", Uuid::new_v4());

    let (status, body) = send(app.router(), get(&uri)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["errorMessage"], json!("Materi tidak ditemukan."));

    let request = Request::builder()
        .uri(&uri)
        .header(header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
        .body(Body::empty())
        .unwrap();
    let (_, body) = send(app.router(), request).await;
    assert_eq!(body["errorMessage"], json!("Material not found."));
}

#[tokio::test]
async fn test_malformed_path_is_a_validation_error() {
    let app = TestApp::new();

    let (status, body) = send(app.router(), get("/api/materials/nao-e-uuid")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = TestApp::new();

    let (status, body) = send(app.router(), get("/api-docs/openapi.json")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["info"]["title"], json!("Papua Mandiri API"));
    assert!(body["paths"]["/api/government/orders"].is_object());
}

#[tokio::test]
async fn test_restock_over_http() {
    let app = TestApp::new();
    let community = app.session(Role::AdminKomunitas, "Mama Yosina");
    let form = ProductForm {
        title: "Noken Anggrek".to_string(),
        description: "Noken dari serat anggrek hutan".to_string(),
        price: Decimal::new(350000, 0),
        stock: 0,
        address: "Wamena".to_string(),
        category_id: None,
        image_url: None,
    };
    let product = app
        .state
        .product_service
        .submit_product(&community, form, None)
        .await
        .unwrap();

    let request = |stock: i32| {
        Request::builder()
            .method("PATCH")
            .uri(format!("/api/community/products/{}/stock", product.id))
            .header(header::AUTHORIZATION, format!("Bearer {}", token_for(community.user_id)))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({ "stock": stock }).to_string()))
            .unwrap()
    };

    let (status, body) = send(app.router(), request(12)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["product"]["stock"], json!(12));

    let (status, body) = send(app.router(), request(-3)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errorMessage"], json!("Stok tidak boleh negatif."));
}
