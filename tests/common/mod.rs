use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use reqwest::Client;
use serde_json::{Value, json};

use estate_crm::config::Config;

pub const PASSWORD: &str = "secret123";

/// A request the mock backend received.
#[derive(Debug, Clone)]
pub struct Seen {
    pub method: &'static str,
    pub path: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: String,
}

/// In-process stand-in for the REST backend.
#[derive(Default)]
pub struct MockBackend {
    pub login_calls: AtomicUsize,
    pub requests: Mutex<Vec<Seen>>,
}

impl MockBackend {
    pub fn requests(&self) -> Vec<Seen> {
        self.requests.lock().unwrap().clone()
    }

    /// Record writes, excluding the login call.
    pub fn writes(&self) -> Vec<Seen> {
        self.requests()
            .into_iter()
            .filter(|r| r.method != "GET" && r.path != "auth/login")
            .collect()
    }

    fn record(&self, method: &'static str, path: String, headers: &HeaderMap, body: &Bytes) {
        let header_text = |name: header::HeaderName| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        self.requests.lock().unwrap().push(Seen {
            method,
            path,
            authorization: header_text(header::AUTHORIZATION),
            content_type: header_text(header::CONTENT_TYPE),
            body: String::from_utf8_lossy(body).into_owned(),
        });
    }
}

type Mock = Arc<MockBackend>;

fn message(status: StatusCode, text: &str) -> Response {
    (status, axum::Json(json!({ "message": text }))).into_response()
}

fn user_for(email: &str) -> Option<Value> {
    let (id, name, role) = match email {
        "admin@crm.test" => (json!(1), "Rina Admin", "Admin"),
        "senior@crm.test" => (json!("u-2"), "Sari Senior", "Senior_Leader"),
        "leader@crm.test" => (json!(3), "Budi Leader", "leader"),
        "member@crm.test" => (json!(4), "Dewi Member", "MEMBER"),
        "ghost@crm.test" => (json!(5), "Ghost", "owner"),
        _ => return None,
    };
    Some(json!({ "id": id, "name": name, "email": email, "role": role }))
}

async fn login(State(mock): State<Mock>, headers: HeaderMap, body: Bytes) -> Response {
    mock.login_calls.fetch_add(1, Ordering::SeqCst);
    mock.record("POST", "auth/login".to_string(), &headers, &body);

    let creds: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let email = creds["email"].as_str().unwrap_or_default();
    let password = creds["password"].as_str().unwrap_or_default();

    match user_for(email) {
        Some(user) if password == PASSWORD => {
            let token = format!("tok-{}", email.split('@').next().unwrap_or_default());
            axum::Json(json!({ "token": token, "user": user })).into_response()
        }
        _ => message(StatusCode::UNAUTHORIZED, "Invalid credentials"),
    }
}

async fn list(
    State(mock): State<Mock>,
    Path(resource): Path<String>,
    headers: HeaderMap,
) -> Response {
    mock.record("GET", resource.clone(), &headers, &Bytes::new());

    if !headers.contains_key(header::AUTHORIZATION) {
        return message(StatusCode::UNAUTHORIZED, "Unauthorized");
    }

    match resource.as_str() {
        "surveys" => message(StatusCode::INTERNAL_SERVER_ERROR, "Database down"),
        "houses" => axum::Json(json!({ "data": [
            { "id": 10, "property_id": 1, "type": "36/72", "price": 350000000 }
        ] }))
        .into_response(),
        "members" => axum::Json(json!([
            { "id": 3, "name": "Budi Leader", "email": "leader@crm.test", "role": "leader", "password": "hash" },
            { "id": 4, "name": "Dewi Member", "email": "member@crm.test", "role": "member", "leader_id": 3 }
        ]))
        .into_response(),
        _ => axum::Json(json!([
            { "id": 1, "name": "Griya Asri", "location": "Bogor" },
            { "id": 2, "name": "Taman Indah", "location": "Depok" }
        ]))
        .into_response(),
    }
}

async fn create(
    State(mock): State<Mock>,
    Path(resource): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    mock.record("POST", resource, &headers, &body);

    if String::from_utf8_lossy(&body).contains("Duplicate") {
        return message(StatusCode::CONFLICT, "Cabuy already exists");
    }
    (StatusCode::CREATED, axum::Json(json!({ "id": 99 }))).into_response()
}

async fn show(
    State(mock): State<Mock>,
    Path((resource, id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    mock.record("GET", format!("{resource}/{id}"), &headers, &Bytes::new());
    axum::Json(json!({ "data": { "id": id, "name": "Griya Asri", "location": "Bogor" } }))
        .into_response()
}

async fn update(
    State(mock): State<Mock>,
    Path((resource, id)): Path<(String, String)>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    mock.record("PUT", format!("{resource}/{id}"), &headers, &body);
    axum::Json(json!({ "id": id })).into_response()
}

async fn remove(
    State(mock): State<Mock>,
    Path((resource, id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    mock.record("DELETE", format!("{resource}/{id}"), &headers, &Bytes::new());
    if id == "locked" {
        return message(StatusCode::FORBIDDEN, "Record is locked");
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn serve(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

async fn spawn_backend() -> (SocketAddr, Mock) {
    let mock: Mock = Arc::new(MockBackend::default());
    let router = Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/{resource}", get(list).post(create))
        .route("/api/{resource}/{id}", get(show).put(update).delete(remove))
        .with_state(mock.clone());
    (serve(router).await, mock)
}

/// A running portal wired to a mock backend.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub backend: Mock,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn get(&self, path: &str, cookies: &str) -> reqwest::Response {
        let mut req = self.client.get(self.url(path));
        if !cookies.is_empty() {
            req = req.header(header::COOKIE, cookies);
        }
        req.send().await.expect("get request failed")
    }

    pub async fn post_login(&self, email: &str, password: &str) -> reqwest::Response {
        self.client
            .post(self.url("/login"))
            .form(&[("email", email), ("password", password)])
            .send()
            .await
            .expect("login request failed")
    }

    /// Log in and return the cookie header to send on later requests.
    pub async fn login_as(&self, email: &str) -> String {
        let resp = self.post_login(email, PASSWORD).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER, "login did not redirect");
        cookie_header(&resp)
    }

    pub async fn post_multipart(
        &self,
        path: &str,
        cookies: &str,
        form: reqwest::multipart::Form,
    ) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .header(header::COOKIE, cookies)
            .multipart(form)
            .send()
            .await
            .expect("multipart request failed")
    }
}

pub fn location(resp: &reqwest::Response) -> &str {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

/// Raw `Set-Cookie` headers of a response.
pub fn set_cookies(resp: &reqwest::Response) -> Vec<String> {
    resp.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .map(str::to_string)
        .collect()
}

/// Turn `Set-Cookie` headers into a `Cookie` request header.
pub fn cookie_header(resp: &reqwest::Response) -> String {
    set_cookies(resp)
        .iter()
        .filter_map(|c| c.split(';').next())
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("; ")
}

pub async fn spawn_app() -> TestApp {
    let (backend_addr, backend) = spawn_backend().await;
    spawn_app_with(Config::for_api(&format!("http://{backend_addr}")), backend).await
}

pub async fn spawn_app_with(config: Config, backend: Mock) -> TestApp {
    let app = estate_crm::build_app(config).expect("failed to build app");
    let addr = serve(app).await;

    let client = Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    TestApp {
        addr,
        client,
        backend,
    }
}

/// A portal whose backend is not listening.
pub async fn spawn_app_without_backend() -> TestApp {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let dead = listener.local_addr().unwrap();
    drop(listener);

    spawn_app_with(
        Config::for_api(&format!("http://{dead}")),
        Arc::new(MockBackend::default()),
    )
    .await
}
