//! End-to-end tests against the router, no sockets involved.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use reclaim_auth::TokenSigner;
use reclaim_core::{
    AccountService, ClaimService, ContactService, CoreConfig, ItemService, ListingService,
};
use reclaim_db::ReclaimDb;
use reclaim_server::blob::FsBlobStore;
use reclaim_server::{app, AppState};

const SECRET: &str = "test-secret";

struct TestApp {
    router: Router,
    db: ReclaimDb,
    _uploads: TempDir,
}

async fn setup() -> TestApp {
    let db = ReclaimDb::open_in_memory().await.unwrap();
    let uploads = TempDir::new().unwrap();
    let signer = TokenSigner::new(SECRET, 3600);
    let cfg = CoreConfig::default();

    let state = AppState {
        accounts: AccountService::new(db.clone(), signer.clone(), cfg),
        items: ItemService::new(db.clone(), cfg),
        claims: ClaimService::new(db.clone(), cfg),
        listings: ListingService::new(db.clone(), cfg),
        contact: ContactService::new(db.clone(), cfg),
        signer,
        blobs: Arc::new(FsBlobStore::new(uploads.path()).unwrap()),
        dev_errors: false,
    };

    TestApp {
        router: app(state),
        db,
        _uploads: uploads,
    }
}

fn post_json(uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

async fn send(router: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

/// Signup + login, returning (token, user id).
async fn register(app: &TestApp, username: &str, email: &str, password: &str) -> (String, i64) {
    let (status, user) = send(
        &app.router,
        post_json(
            "/api/signup",
            None,
            json!({ "username": username, "email": email, "password": password }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = user["id"].as_i64().unwrap();

    let (status, body) = send(
        &app.router,
        post_json("/api/login", None, json!({ "email": email, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    (body["token"].as_str().unwrap().to_string(), id)
}

async fn register_admin(app: &TestApp, email: &str) -> String {
    let (_, id) = register(app, "admin", email, "admin-pw").await;
    app.db.set_user_admin(id, true).await.unwrap();
    // Fresh token so the admin claim matches the store
    let (status, body) = send(
        &app.router,
        post_json("/api/login", None, json!({ "email": email, "password": "admin-pw" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn blue_backpack_scenario() {
    let app = setup().await;

    let (token_a, _) = register(&app, "alice", "alice@example.com", "pw-a").await;
    let admin_token = register_admin(&app, "root@example.com").await;

    // Alice reports a found backpack
    let (status, item) = send(
        &app.router,
        post_json(
            "/api/items",
            Some(&token_a),
            json!({
                "kind": "FOUND",
                "name": "Blue Backpack",
                "description": "left near the gym",
                "location": "gym",
                "reportedDate": "2024-03-01"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(item["status"], "PENDING");
    let item_id = item["id"].as_i64().unwrap();

    // Pending items are not on the public feed
    let (_, feed) = send(&app.router, get("/api/items", None)).await;
    assert_eq!(feed["total"], 0);

    // Admin approves
    let (status, item) = send(
        &app.router,
        post_json(
            &format!("/api/admin/items/{item_id}/status"),
            Some(&admin_token),
            json!({ "status": "APPROVED" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(item["status"], "APPROVED");

    // Now it is public
    let (_, feed) = send(&app.router, get("/api/items", None)).await;
    assert_eq!(feed["total"], 1);
    assert_eq!(feed["items"][0]["name"], "Blue Backpack");
    assert_eq!(feed["page"], 1);
    assert_eq!(feed["totalPages"], 1);

    // Bob claims it
    let (token_b, _) = register(&app, "bob", "bob@example.com", "pw-b").await;
    let (status, claim) = send(
        &app.router,
        post_json(
            "/api/claims",
            Some(&token_b),
            json!({ "itemId": item_id, "reason": "It's mine" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(claim["status"], "PENDING");
    let claim_id = claim["id"].as_i64().unwrap();

    // Admin verifies the claim
    let (status, claim) = send(
        &app.router,
        post_json(
            &format!("/api/admin/claims/{claim_id}/status"),
            Some(&admin_token),
            json!({ "status": "VERIFIED" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(claim["status"], "VERIFIED");

    // Bob's listing shows the claim verified and the item's current state
    let (status, claims) = send(&app.router, get("/api/my/claims", Some(&token_b))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(claims[0]["status"], "VERIFIED");
    assert_eq!(claims[0]["itemStatus"], "APPROVED");
    assert_eq!(claims[0]["itemName"], "Blue Backpack");

    // Bob's dashboard counts the claim
    let (_, dash) = send(&app.router, get("/api/dashboard", Some(&token_b))).await;
    assert_eq!(dash["summary"]["claimed"], 1);

    // Admin overview reflects everything
    let (_, overview) = send(&app.router, get("/api/admin/overview", Some(&admin_token))).await;
    assert_eq!(overview["stats"]["verifiedClaims"], 1);
    assert_eq!(overview["stats"]["pendingItems"], 0);
    assert_eq!(overview["foundItems"][0]["name"], "Blue Backpack");
}

#[tokio::test]
async fn missing_token_is_401_and_bad_token_is_403_with_discard() {
    let app = setup().await;

    let (status, body) = send(&app.router, get("/api/dashboard", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());
    assert!(body.get("discardToken").is_none());

    let (status, body) = send(&app.router, get("/api/dashboard", Some("not.a.token"))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["discardToken"], true);

    // Correctly signed but expired
    let (_, id) = register(&app, "carol", "carol@example.com", "pw").await;
    let stale = TokenSigner::new(SECRET, -10).issue(id, false).unwrap();
    let (status, body) = send(&app.router, get("/api/dashboard", Some(&stale))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["discardToken"], true);
    assert_eq!(body["error"], "token expired");
}

#[tokio::test]
async fn non_admin_cannot_transition_and_status_is_unchanged() {
    let app = setup().await;
    let (token, _) = register(&app, "mallory", "mallory@example.com", "pw").await;

    let (_, item) = send(
        &app.router,
        post_json(
            "/api/items",
            Some(&token),
            json!({
                "kind": "FOUND",
                "name": "Watch",
                "description": "silver",
                "location": "hall",
                "reportedDate": "2024-04-01"
            }),
        ),
    )
    .await;
    let item_id = item["id"].as_i64().unwrap();

    // Token is valid but the store says not admin
    let (status, _) = send(
        &app.router,
        post_json(
            &format!("/api/admin/items/{item_id}/status"),
            Some(&token),
            json!({ "status": "APPROVED" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, mine) = send(&app.router, get("/api/my/items", Some(&token))).await;
    assert_eq!(mine["items"][0]["status"], "PENDING");
}

#[tokio::test]
async fn duplicate_signup_is_conflict() {
    let app = setup().await;
    register(&app, "dave", "dave@example.com", "pw").await;

    let (status, body) = send(
        &app.router,
        post_json(
            "/api/signup",
            None,
            json!({ "username": "dave2", "email": "dave@example.com", "password": "pw" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("email"));
}

#[tokio::test]
async fn item_validation_lists_offending_fields() {
    let app = setup().await;
    let (token, _) = register(&app, "erin", "erin@example.com", "pw").await;

    let (status, body) = send(
        &app.router,
        post_json(
            "/api/items",
            Some(&token),
            json!({ "kind": "LOST", "location": "park", "reportedDate": "2024-13-99" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error = body["error"].as_str().unwrap();
    assert!(error.contains("name"));
    assert!(error.contains("description"));
    assert!(error.contains("reportedDate"));

    // Nothing was persisted
    let (_, mine) = send(&app.router, get("/api/my/items", Some(&token))).await;
    assert_eq!(mine["total"], 0);
}

#[tokio::test]
async fn public_feed_pagination_and_filters() {
    let app = setup().await;
    let (_, owner_id) = register(&app, "frank", "frank@example.com", "pw").await;

    for i in 0..15 {
        let kind = if i % 3 == 0 {
            reclaim_db::ItemKind::Lost
        } else {
            reclaim_db::ItemKind::Found
        };
        let id = app
            .db
            .insert_item(owner_id, kind, &format!("item-{i}"), "desc", "loc", "2024-05-01", None)
            .await
            .unwrap();
        app.db
            .set_item_status(id, reclaim_db::ItemStatus::Approved)
            .await
            .unwrap();
    }

    let (_, page1) = send(&app.router, get("/api/items?page=1&limit=10", None)).await;
    let (_, page2) = send(&app.router, get("/api/items?page=2&limit=10", None)).await;
    assert_eq!(page1["items"].as_array().unwrap().len(), 10);
    assert_eq!(page2["items"].as_array().unwrap().len(), 5);
    assert_eq!(page1["total"], 15);
    assert_eq!(page1["totalPages"], 2);

    let ids1: Vec<i64> = page1["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["id"].as_i64().unwrap())
        .collect();
    for item in page2["items"].as_array().unwrap() {
        assert!(!ids1.contains(&item["id"].as_i64().unwrap()));
    }

    // Kind filter
    let (_, lost) = send(&app.router, get("/api/items?kind=lost", None)).await;
    assert_eq!(lost["total"], 5);

    // Search filter
    let (_, hits) = send(&app.router, get("/api/items?search=ITEM-14", None)).await;
    assert_eq!(hits["total"], 1);

    // Bad pagination is a 400
    let (status, _) = send(&app.router, get("/api/items?page=0", None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn upload_returns_opaque_image_ref() {
    let app = setup().await;
    let (token, _) = register(&app, "grace", "grace@example.com", "pw").await;

    let boundary = "reclaim-test-boundary";
    let body = format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"photo.png\"\r\nContent-Type: image/png\r\n\r\nfakepngbytes\r\n--{boundary}--\r\n"
    );

    let req = Request::builder()
        .method("POST")
        .uri("/api/uploads")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body))
        .unwrap();

    let (status, body) = send(&app.router, req).await;
    assert_eq!(status, StatusCode::CREATED);
    let image_ref = body["imageRef"].as_str().unwrap();
    assert!(image_ref.starts_with("/uploads/"));
    assert!(image_ref.ends_with(".png"));

    // The reference is accepted verbatim on item creation
    let (status, item) = send(
        &app.router,
        post_json(
            "/api/items",
            Some(&token),
            json!({
                "kind": "FOUND",
                "name": "Camera",
                "description": "black",
                "location": "lab",
                "reportedDate": "2024-06-01",
                "imageRef": image_ref
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(item["imageRef"].as_str().unwrap(), image_ref);
}

#[tokio::test]
async fn contact_form_requires_all_fields() {
    let app = setup().await;

    let (status, _) = send(
        &app.router,
        post_json(
            "/api/contact",
            None,
            json!({ "name": "Ada", "email": "ada@example.com", "message": "hello" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &app.router,
        post_json("/api/contact", None, json!({ "name": "Ada" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("message"));
}
