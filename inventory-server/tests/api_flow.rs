//! End-to-end tests driving the full HTTP stack (method override, router,
//! handlers, repositories) against an in-memory database.

use axum::body::Body;
use chrono::Days;
use http::{Method, Request, StatusCode, header};
use inventory_server::services::http::App;
use inventory_server::{Config, DbService, HttpService, NegativeStockPolicy, ServerState};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

struct TestApp {
    app: App,
    _work_dir: TempDir,
}

impl TestApp {
    async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    async fn with_config(adjust: impl FnOnce(&mut Config)) -> Self {
        let work_dir = tempfile::tempdir().unwrap();
        let mut config = Config::with_overrides(work_dir.path().to_string_lossy(), 0);
        config.stock_page_size = 15;
        config.negative_stock_policy = NegativeStockPolicy::Allow;
        config.discount_cascade_to_components = false;
        adjust(&mut config);

        std::fs::create_dir_all(config.images_dir()).unwrap();
        let db = DbService::in_memory().await.unwrap();
        let state = ServerState::new(config, db.pool);

        Self {
            app: HttpService::new(state).app(),
            _work_dir: work_dir,
        }
    }

    async fn raw(&self, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, bytes.to_vec())
    }

    async fn request(&self, request: Request<Body>) -> (StatusCode, Value) {
        let (status, bytes) = self.raw(request).await;
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        let request = match body {
            Some(json) => builder.body(Body::from(json.to_string())).unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.request(request).await
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None).await
    }

    async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(body)).await
    }

    /// POST and return `data.id`, failing the test on any error
    async fn create(&self, uri: &str, body: Value) -> i64 {
        let (status, body) = self.post(uri, body).await;
        assert_eq!(status, StatusCode::OK, "POST {uri} failed: {body}");
        body["data"]["id"].as_i64().unwrap()
    }

    async fn brand(&self, name: &str) -> i64 {
        self.create("/api/brands", json!({ "name": name })).await
    }

    async fn component(&self, brand_id: i64, category: &str, name: &str, price: f64) -> i64 {
        self.create(
            "/api/components",
            json!({ "category": category, "name": name, "brand_id": brand_id, "price": price }),
        )
        .await
    }

    async fn movement(&self, category: &str, id: i64, movement_type: &str, quantity: i64) -> (StatusCode, Value) {
        self.post(
            "/api/stock/movements",
            json!({
                "component": { "category": category, "id": id },
                "quantity": quantity,
                "movement_type": movement_type,
                "date": "2025-01-10"
            }),
        )
        .await
    }
}

fn date_offset(days: i64) -> String {
    let today = shared::util::today();
    let day = if days >= 0 {
        today.checked_add_days(Days::new(days as u64))
    } else {
        today.checked_sub_days(Days::new(days.unsigned_abs()))
    };
    day.unwrap().to_string()
}

#[tokio::test]
async fn test_health_and_component_types() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], 0);
    assert_eq!(body["data"]["database"]["status"], "ok");

    let (status, body) = app.get("/api/component-types").await;
    assert_eq!(status, StatusCode::OK);
    let types = body["data"].as_array().unwrap();
    assert_eq!(types.len(), 13);
    assert_eq!(types[0]["key"], "ram");
}

#[tokio::test]
async fn test_component_crud_with_specs() {
    let app = TestApp::new().await;
    let brand = app.brand("Kingston").await;

    let (status, body) = app
        .post(
            "/api/components",
            json!({
                "category": "ram",
                "name": "KSM64R52BD4-64HA",
                "brand_id": brand,
                "price": 389.90,
                "specs": { "category": "ram", "capacity_gb": 64, "speed_mhz": 5600, "memory_type": "DDR5" }
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["message"], "OK");
    let id = body["data"]["id"].as_i64().unwrap();
    assert_eq!(body["data"]["specs"]["capacity_gb"], 64);
    assert_eq!(body["data"]["pricing"]["current_price"], 389.9);
    assert!(body["data"]["pricing"]["applied_discount"].is_null());

    app.component(brand, "processor", "EPYC 9354", 2700.0).await;

    let (_, body) = app.get("/api/components?category=ram").await;
    let list = body["data"].as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["id"], id);

    let (status, body) = app.get("/api/components?category=gpu").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["details"]["category"].is_array());

    let (status, body) = app
        .send(Method::PUT, &format!("/api/components/{id}"), Some(json!({ "price": 350.0 })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["price"], 350.0);
    assert_eq!(body["data"]["name"], "KSM64R52BD4-64HA");

    let (status, _) = app.send(Method::DELETE, &format!("/api/components/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = app.get(&format!("/api/components/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 6001);
}

#[tokio::test]
async fn test_validation_errors_are_per_field() {
    let app = TestApp::new().await;
    let brand = app.brand("Dell").await;

    let (status, body) = app
        .post(
            "/api/components",
            json!({ "category": "storage", "name": "", "brand_id": brand, "price": -5.0 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 2);
    assert!(body["details"]["name"].is_array());
    assert!(body["details"]["price"].is_array());

    let (status, body) = app
        .post(
            "/api/components",
            json!({ "category": "storage", "name": "PM9A3", "brand_id": brand, "price": 10.0,
                    "specs": { "category": "ram", "capacity_gb": 32 } }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 6003);

    let (status, body) = app
        .post("/api/suppliers", json!({ "name": "Ingram", "email": "not-an-email" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["details"]["email"].is_array());
}

#[tokio::test]
async fn test_percentage_discount_prices_component() {
    let app = TestApp::new().await;
    let brand = app.brand("Samsung").await;
    let ram = app.component(brand, "ram", "M321R8GA0BB0", 1000.0).await;

    let (status, body) = app
        .post(
            "/api/discounts",
            json!({
                "name": "Spring sale",
                "discount_type": "percentage",
                "value": 20,
                "start_date": date_offset(-1),
                "end_date": date_offset(30),
                "components": { "ram": [ram] }
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["status"], "active");
    assert_eq!(body["data"]["components"]["ram"], json!([ram]));
    let discount_id = body["data"]["id"].as_i64().unwrap();

    let (_, body) = app.get(&format!("/api/components/{ram}/price")).await;
    let quote = &body["data"];
    assert_eq!(quote["original_price"], 1000.0);
    assert_eq!(quote["current_price"], 800.0);
    assert_eq!(quote["savings"], 200.0);
    assert_eq!(quote["savings_percentage"], 20.0);
    assert_eq!(quote["applied_discount"]["id"], discount_id);

    let (_, body) = app.get("/api/discounts?status=active").await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    let (_, body) = app.get("/api/discounts?status=expired").await;
    assert!(body["data"].as_array().unwrap().is_empty());

    let (status, body) = app.get("/api/discounts?status=someday").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 7005);
}

#[tokio::test]
async fn test_scheduled_discount_does_not_apply() {
    let app = TestApp::new().await;
    let brand = app.brand("Intel").await;
    let cpu = app.component(brand, "processor", "Xeon 6430", 1800.0).await;

    app.create(
        "/api/discounts",
        json!({
            "name": "Next month",
            "discount_type": "fixed",
            "value": 100,
            "start_date": date_offset(10),
            "end_date": date_offset(40),
            "components": { "processor": [cpu] }
        }),
    )
    .await;

    let (_, body) = app.get(&format!("/api/components/{cpu}")).await;
    assert_eq!(body["data"]["pricing"]["current_price"], 1800.0);
    assert!(body["data"]["pricing"]["applied_discount"].is_null());

    let (_, body) = app.get("/api/discounts?status=scheduled").await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_fixed_discount_on_server_floors_at_zero() {
    let app = TestApp::new().await;
    let brand = app.brand("Supermicro").await;
    let board = app.component(brand, "motherboard", "H13SSL", 650.0).await;

    let (status, body) = app
        .post(
            "/api/servers",
            json!({
                "name": "AS-1115CS",
                "brand_id": brand,
                "price": 500.0,
                "components": [
                    { "category": "motherboard", "id": board, "quantity": 1 },
                    { "category": "motherboard", "id": board }
                ]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let server = body["data"]["id"].as_i64().unwrap();
    assert_eq!(body["data"]["components"][0]["quantity"], 2);

    app.create(
        "/api/discounts",
        json!({
            "name": "Clearance",
            "discount_type": "fixed",
            "value": 600,
            "start_date": date_offset(0),
            "end_date": date_offset(0),
            "servers": [server]
        }),
    )
    .await;

    let (_, body) = app.get(&format!("/api/servers/{server}/price")).await;
    assert_eq!(body["data"]["current_price"], 0.0);
    assert_eq!(body["data"]["savings"], 500.0);
    assert_eq!(body["data"]["savings_percentage"], 100.0);

    // Server discounts stay on the server unless cascading is enabled
    let (_, body) = app.get(&format!("/api/components/{board}/price")).await;
    assert_eq!(body["data"]["current_price"], 650.0);
}

#[tokio::test]
async fn test_cascade_applies_server_discount_to_components() {
    let app = TestApp::with_config(|c| c.discount_cascade_to_components = true).await;
    let brand = app.brand("Lenovo").await;
    let psu = app.component(brand, "power_supply", "1100W Titanium", 200.0).await;
    let server = app
        .create(
            "/api/servers",
            json!({ "name": "SR665 V3", "brand_id": brand, "price": 9000.0,
                    "components": [{ "category": "power_supply", "id": psu, "quantity": 2 }] }),
        )
        .await;

    app.create(
        "/api/discounts",
        json!({
            "name": "Bundle",
            "discount_type": "percentage",
            "value": 10,
            "start_date": date_offset(-3),
            "end_date": date_offset(3),
            "servers": [server]
        }),
    )
    .await;

    let (_, body) = app.get(&format!("/api/components/{psu}/price")).await;
    assert_eq!(body["data"]["current_price"], 180.0);

    let (_, body) = app.get(&format!("/api/components/{psu}")).await;
    assert_eq!(body["data"]["servers"], json!([server]));
    assert_eq!(body["data"]["pricing"]["applied_discount"]["name"], "Bundle");
}

#[tokio::test]
async fn test_invalid_discount_reports_every_field() {
    let app = TestApp::new().await;

    let (status, body) = app
        .post(
            "/api/discounts",
            json!({
                "name": "Broken",
                "discount_type": "percentage",
                "value": 150,
                "start_date": "2025-02-01",
                "end_date": "2025-01-01"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 7003);
    assert!(body["details"]["value"].is_array());
    assert!(body["details"]["end_date"].is_array());

    let (status, body) = app
        .post(
            "/api/discounts",
            json!({
                "name": "",
                "description": "x".repeat(501),
                "discount_type": "fixed",
                "value": 10,
                "start_date": "2025-01-01",
                "end_date": "2025-01-31"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 2);
    assert!(body["details"]["name"].is_array());
    assert!(body["details"]["description"].is_array());

    let (status, body) = app
        .post(
            "/api/discounts",
            json!({
                "name": "Too generous",
                "discount_type": "fixed",
                "value": 1e30,
                "start_date": "2025-01-01",
                "end_date": "2025-01-31"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 7003);

    let (_, body) = app.get("/api/discounts").await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_method_override() {
    let app = TestApp::new().await;
    let brand = app.brand("HPE").await;

    let (status, body) = app
        .post(
            &format!("/api/brands/{brand}?_method=PUT"),
            json!({ "website": "https://www.hpe.com" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["website"], "https://www.hpe.com");

    // Percent-encoded "PUT"
    let (status, body) = app
        .post(
            &format!("/api/brands/{brand}?_method=%50UT"),
            json!({ "website": "https://hpe.com" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["website"], "https://hpe.com");

    let request = Request::builder()
        .method(Method::POST)
        .uri(format!("/api/brands/{brand}"))
        .header("X-HTTP-Method-Override", "DELETE")
        .body(Body::empty())
        .unwrap();
    let (status, _) = app.request(request).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.get(&format!("/api/brands/{brand}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 6101);
}

#[tokio::test]
async fn test_brand_in_use_cannot_be_deleted() {
    let app = TestApp::new().await;
    let brand = app.brand("Broadcom").await;
    app.component(brand, "network_card", "P225P", 310.0).await;

    let (status, body) = app.send(Method::DELETE, &format!("/api/brands/{brand}"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 6103);

    let (status, body) = app.post("/api/brands", json!({ "name": "Broadcom" })).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 6102);
}

#[tokio::test]
async fn test_stock_ledger_balance() {
    let app = TestApp::new().await;
    let brand = app.brand("Micron").await;
    let ssd = app.component(brand, "storage", "7450 PRO", 420.0).await;

    for (movement_type, quantity) in [("in", 10), ("out", 3), ("in", 5)] {
        let (status, body) = app.movement("storage", ssd, movement_type, quantity).await;
        assert_eq!(status, StatusCode::OK, "{body}");
    }

    let (_, body) = app.get(&format!("/api/stock/levels/{ssd}")).await;
    assert_eq!(body["data"]["quantity"], 12);
    assert_eq!(body["data"]["component"]["category"], "storage");

    let (_, body) = app.get(&format!("/api/stock/movements?component_id={ssd}&movement_type=out")).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    // Permissive by default: overdrawing shows a negative balance
    app.movement("storage", ssd, "out", 20).await;
    let (_, body) = app.get(&format!("/api/stock/levels/{ssd}")).await;
    assert_eq!(body["data"]["quantity"], -8);

    let (status, body) = app.movement("ram", ssd, "in", 1).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 6003);

    let (status, body) = app.movement("storage", ssd, "in", 0).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["details"]["quantity"].is_array());

    let (status, body) = app.movement("storage", ssd, "in", i64::MAX).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["details"]["quantity"].is_array());

    let (status, _) = app.get("/api/stock/levels").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_reject_policy_refuses_overdraw() {
    let app = TestApp::with_config(|c| c.negative_stock_policy = NegativeStockPolicy::Reject).await;
    let brand = app.brand("APC").await;
    let battery = app.component(brand, "battery", "RBC43", 95.0).await;

    let (status, _) = app.movement("battery", battery, "in", 2).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.movement("battery", battery, "out", 3).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], 8002);
    assert_eq!(body["details"]["available"], 2);

    let (_, body) = app.get(&format!("/api/stock/levels/{battery}")).await;
    assert_eq!(body["data"]["quantity"], 2);
}

#[tokio::test]
async fn test_stock_levels_pagination() {
    let app = TestApp::with_config(|c| c.stock_page_size = 3).await;
    let brand = app.brand("Generic").await;
    for i in 0..4 {
        app.component(brand, "cable", &format!("DAC {i}m"), 20.0).await;
    }

    let (_, body) = app.get("/api/stock/levels").await;
    assert_eq!(body["data"]["total"], 4);
    assert_eq!(body["data"]["per_page"], 3);
    assert_eq!(body["data"]["current_page"], 1);
    assert_eq!(body["data"]["last_page"], 2);
    assert_eq!(body["data"]["data"].as_array().unwrap().len(), 3);

    let (_, body) = app.get("/api/stock/levels?page=2").await;
    assert_eq!(body["data"]["current_page"], 2);
    assert_eq!(body["data"]["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_image_upload_and_serve() {
    let app = TestApp::new().await;

    let mut png = Vec::new();
    image::DynamicImage::ImageRgb8(image::RgbImage::from_pixel(8, 8, image::Rgb([0, 90, 200])))
        .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
        .unwrap();

    let boundary = "inventory-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"rack.png\"\r\nContent-Type: image/png\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(&png);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    let upload = || {
        Request::builder()
            .method(Method::POST)
            .uri("/api/image/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body.clone()))
            .unwrap()
    };

    let (status, first) = app.request(upload()).await;
    assert_eq!(status, StatusCode::OK, "{first}");
    let filename = first["data"]["filename"].as_str().unwrap().to_string();
    assert!(filename.ends_with(".jpg"));
    assert_eq!(first["data"]["url"], format!("/api/image/{filename}"));

    // Same content, same file
    let (_, second) = app.request(upload()).await;
    assert_eq!(second["data"]["filename"], filename.as_str());

    let request = Request::builder()
        .uri(format!("/api/image/{filename}"))
        .body(Body::empty())
        .unwrap();
    let (status, bytes) = app.raw(request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(&bytes[..2], &[0xFF, 0xD8]);

    let (status, _) = app.get("/api/image/..secret.jpg").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = app.get("/api/image/missing.jpg").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
