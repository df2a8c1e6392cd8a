use reqwest::{header, StatusCode};
use serde_json::json;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod with a fresh in-memory store, on an ephemeral port.
        let app = coursebook_api::app::build_app(coursebook_api::app::AppState::in_memory());
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

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn register(&self, client: &reqwest::Client, email: &str, password: &str) {
        let res = client
            .post(self.url("/api/users"))
            .json(&json!({
                "firstName": "Test",
                "lastName": "User",
                "emailAddress": email,
                "password": password,
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    /// Create a course as `email` and return its path.
    async fn create_course(&self, client: &reqwest::Client, email: &str, password: &str, title: &str) -> String {
        let res = client
            .post(self.url("/api/courses"))
            .basic_auth(email, Some(password))
            .json(&json!({ "title": title, "description": "Learn by doing." }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);
        res.headers()[header::LOCATION].to_str().unwrap().to_string()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[tokio::test]
async fn root_and_unknown_routes() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client.get(srv.url("/")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Welcome to the REST API project!");

    let res = client.get(srv.url("/nope")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Route Not Found");

    let res = client.get(srv.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn registered_user_can_authenticate() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/api/users"))
        .json(&json!({
            "firstName": "Ann",
            "lastName": "Example",
            "emailAddress": "a@x.com",
            "password": "pw1234567",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    assert_eq!(res.headers()[header::LOCATION], "/");

    let res = client
        .get(srv.url("/api/users"))
        .basic_auth("a@x.com", Some("pw1234567"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["firstName"], "Ann");
    assert_eq!(body["lastName"], "Example");
    assert_eq!(body["emailAddress"], "a@x.com");
    assert!(body["id"].is_string());
    assert!(body.get("password").is_none());
}

#[tokio::test]
async fn bad_credentials_get_the_same_401() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    srv.register(&client, "a@x.com", "pw1234567").await;

    let attempts = [
        client.get(srv.url("/api/users")),
        client.get(srv.url("/api/users")).basic_auth("a@x.com", Some("wrongpass")),
        client.get(srv.url("/api/users")).basic_auth("nobody@x.com", Some("pw1234567")),
        client.get(srv.url("/api/users")).header(header::AUTHORIZATION, "Basic !!!not-base64"),
        client.get(srv.url("/api/users")).header(header::AUTHORIZATION, "Bearer abc"),
    ];

    for request in attempts {
        let res = request.send().await.unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(res.headers()[header::WWW_AUTHENTICATE], "Basic realm=\"coursebook\"");
        let body: serde_json::Value = res.json().await.unwrap();
        assert_eq!(body, json!({ "message": "Access Denied" }));
    }
}

#[tokio::test]
async fn registration_reports_every_problem() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client.post(srv.url("/api/users")).json(&json!({})).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    let errors = body["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 4);
    assert!(errors.contains(&json!("Please provide a value for \"firstName\"")));
    assert!(errors.contains(&json!("Please provide a value for \"password\"")));

    srv.register(&client, "a@x.com", "pw1234567").await;
    let res = client
        .post(srv.url("/api/users"))
        .json(&json!({
            "firstName": "Other",
            "lastName": "Person",
            "emailAddress": "a@x.com",
            "password": "different",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["errors"], json!(["The email address you entered already exists"]));
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/api/users"))
        .header(header::CONTENT_TYPE, "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["errors"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn course_lifecycle_for_owner() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    srv.register(&client, "a@x.com", "pw1234567").await;

    let path = srv.create_course(&client, "a@x.com", "pw1234567", "Build a Bookcase").await;
    assert!(path.starts_with("/api/courses/"));

    let res = client.get(srv.url(&path)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let course: serde_json::Value = res.json().await.unwrap();
    assert_eq!(course["title"], "Build a Bookcase");
    assert_eq!(course["user"]["emailAddress"], "a@x.com");

    let res = client
        .put(srv.url(&path))
        .basic_auth("a@x.com", Some("pw1234567"))
        .json(&json!({ "title": "Build a Better Bookcase", "estimatedTime": "14 hours" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let course: serde_json::Value = client.get(srv.url(&path)).send().await.unwrap().json().await.unwrap();
    assert_eq!(course["title"], "Build a Better Bookcase");
    assert_eq!(course["description"], "Learn by doing.");
    assert_eq!(course["estimatedTime"], "14 hours");

    let res = client
        .delete(srv.url(&path))
        .basic_auth("a@x.com", Some("pw1234567"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = client.get(srv.url(&path)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Course not found");
}

#[tokio::test]
async fn non_owner_is_forbidden() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    srv.register(&client, "a@x.com", "pw1234567").await;
    srv.register(&client, "b@x.com", "pw7654321").await;

    let path = srv.create_course(&client, "a@x.com", "pw1234567", "A's course").await;

    let res = client
        .delete(srv.url(&path))
        .basic_auth("b@x.com", Some("pw7654321"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Access denied");

    let res = client
        .put(srv.url(&path))
        .basic_auth("b@x.com", Some("pw7654321"))
        .json(&json!({ "title": "Hijacked" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let course: serde_json::Value = client.get(srv.url(&path)).send().await.unwrap().json().await.unwrap();
    assert_eq!(course["title"], "A's course");
}

#[tokio::test]
async fn unknown_course_is_not_found() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    srv.register(&client, "a@x.com", "pw1234567").await;
    let missing = "/api/courses/0190b7a4-0000-7000-8000-000000000000";

    let res = client
        .delete(srv.url(missing))
        .basic_auth("a@x.com", Some("pw1234567"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["message"], "You tried to delete a course that does not exist.");

    let res = client
        .put(srv.url(missing))
        .basic_auth("a@x.com", Some("pw1234567"))
        .json(&json!({ "title": "x" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client.get(srv.url("/api/courses/not-an-id")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn course_validation_and_listing() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    srv.register(&client, "a@x.com", "pw1234567").await;

    let res = client
        .post(srv.url("/api/courses"))
        .basic_auth("a@x.com", Some("pw1234567"))
        .json(&json!({ "estimatedTime": "1 hour" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(
        body["errors"],
        json!([
            "Please provide a value for \"title\"",
            "Please provide a value for \"description\"",
        ])
    );

    let res = client
        .post(srv.url("/api/courses"))
        .json(&json!({ "title": "t", "description": "d" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    srv.create_course(&client, "a@x.com", "pw1234567", "First").await;
    srv.create_course(&client, "a@x.com", "pw1234567", "Second").await;

    let res = client.get(srv.url("/api/courses")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let text = res.text().await.unwrap();
    assert!(!text.contains("password"));
    assert!(!text.contains("argon2"));

    let courses: serde_json::Value = serde_json::from_str(&text).unwrap();
    let titles: Vec<&str> = courses.as_array().unwrap().iter().map(|c| c["title"].as_str().unwrap()).collect();
    assert_eq!(titles, ["First", "Second"]);
}

#[tokio::test]
async fn null_in_update_clears_optional_and_rejects_required() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    srv.register(&client, "a@x.com", "pw1234567").await;

    let res = client
        .post(srv.url("/api/courses"))
        .basic_auth("a@x.com", Some("pw1234567"))
        .json(&json!({ "title": "t", "description": "d", "estimatedTime": "1h", "materialsNeeded": "Saw" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let path = res.headers()[header::LOCATION].to_str().unwrap().to_string();

    let res = client
        .put(srv.url(&path))
        .basic_auth("a@x.com", Some("pw1234567"))
        .json(&json!({ "estimatedTime": null }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let course: serde_json::Value = client.get(srv.url(&path)).send().await.unwrap().json().await.unwrap();
    assert!(course["estimatedTime"].is_null());
    assert_eq!(course["materialsNeeded"], "Saw");
    assert_eq!(course["title"], "t");

    let res = client
        .put(srv.url(&path))
        .basic_auth("a@x.com", Some("pw1234567"))
        .json(&json!({ "title": null }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["errors"], json!(["Please provide a value for \"title\""]));

    let course: serde_json::Value = client.get(srv.url(&path)).send().await.unwrap().json().await.unwrap();
    assert_eq!(course["title"], "t");
}

#[tokio::test]
async fn course_changes_require_credentials() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    srv.register(&client, "a@x.com", "pw1234567").await;
    let path = srv.create_course(&client, "a@x.com", "pw1234567", "Kept").await;

    let res = client.put(srv.url(&path)).json(&json!({ "title": "Changed" })).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client.delete(srv.url(&path)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let course: serde_json::Value = client.get(srv.url(&path)).send().await.unwrap().json().await.unwrap();
    assert_eq!(course["title"], "Kept");
}

#[tokio::test]
async fn unsupported_method_is_checked_after_auth_on_protected_paths() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    srv.register(&client, "a@x.com", "pw1234567").await;

    let res = client.patch(srv.url("/api/courses")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .patch(srv.url("/api/courses"))
        .basic_auth("a@x.com", Some("pw1234567"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn blank_password_is_rejected() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/api/users"))
        .json(&json!({
            "firstName": "Ann",
            "lastName": "Example",
            "emailAddress": "a@x.com",
            "password": "   ",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["errors"], json!(["Please provide a value for \"password\""]));
}
