//! Test harness: a mock hotel API on an OS-assigned port, and a data-layer
//! context wired to it.

pub mod mock;

use std::net::TcpListener;
use std::time::Duration;

use actix_web::{App, HttpServer, web};
use dashboard::contexts::toast::{ToastHandle, ToastType};
use dashboard::{Cache, DataContext, FetchOptions, RetryPolicy};
use payloads::APIClient;
use serde_json::{Value, json};

pub use mock::{MockApi, RecordedRequest};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

pub struct TestApp {
    pub address: String,
    pub client: APIClient,
    /// Context whose list reads don't retry, so request counts stay exact.
    pub ctx: DataContext,
    pub toasts: ToastHandle,
    pub mock: MockApi,
}

impl TestApp {
    /// A second, independent cache against the same server.
    pub fn context_with(&self, list_options: FetchOptions) -> DataContext {
        DataContext::new(Cache::new(self.client.clone()), self.toasts.clone())
            .with_list_options(list_options)
    }

    /// A context whose list reads retry quickly.
    pub fn retrying_context(&self) -> DataContext {
        self.context_with(FetchOptions {
            retry: Some(RetryPolicy {
                initial_delay: Duration::from_millis(20),
                max_delay: Duration::from_millis(80),
            }),
            ..FetchOptions::default()
        })
    }

    pub fn error_toasts(&self) -> Vec<String> {
        self.toasts.messages(ToastType::Error)
    }

    pub fn success_toasts(&self) -> Vec<String> {
        self.toasts.messages(ToastType::Success)
    }
}

/// Functions to populate test data
impl TestApp {
    pub fn seed_bookings(&self) {
        self.mock.seed(
            &payloads::endpoints::BOOKING,
            vec![
                booking("b1", "Ada Byron", "r1", "reserved"),
                booking("b2", "Grace Hopper", "r2", "checked-in"),
            ],
        );
    }

    pub fn seed_rooms(&self) {
        self.mock.seed(
            &payloads::endpoints::ROOM,
            vec![
                json!({
                    "_id": "r1",
                    "roomNumber": "101",
                    "description": "Ocean view king",
                    "status": "available",
                    "roomType": {"_id": "rt1", "name": "Deluxe"},
                }),
                json!({
                    "_id": "r2",
                    "roomNumber": "102",
                    "description": "Oceanfront suite",
                    "status": "occupied",
                }),
                json!({
                    "_id": "r3",
                    "roomNumber": "201",
                    "description": "Garden twin",
                }),
            ],
        );
    }

    pub fn seed_tasks(&self) {
        self.mock.seed(
            &payloads::endpoints::TASK,
            vec![
                task("t1", "Turn down 101", Some("h1")),
                task("t2", "Deep clean 102", Some("h2")),
                task("t3", "Restock minibar 201", None),
            ],
        );
    }
}

pub fn booking(id: &str, guest: &str, room: &str, status: &str) -> Value {
    json!({
        "_id": id,
        "guestName": guest,
        "roomId": room,
        "checkIn": "2025-03-01",
        "checkOut": "2025-03-04",
        "status": status,
        "totalPrice": "540.00",
    })
}

pub fn task(id: &str, title: &str, housekeeper: Option<&str>) -> Value {
    let mut task = json!({"_id": id, "title": title});
    if let Some(housekeeper) = housekeeper {
        task["housekeeperId"] = housekeeper.into();
    }
    task
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with_timeout(DEFAULT_TIMEOUT).await
}

/// Spawn the mock API and build a client whose requests time out after
/// `timeout`.
pub async fn spawn_app_with_timeout(timeout: Duration) -> TestApp {
    let subscriber = dashboard::logs::get_subscriber("error".into());
    dashboard::logs::init_subscriber(subscriber);

    let mock = MockApi::new();
    let data = web::Data::new(mock.clone());

    // OS assigns the port if binding to 0
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .default_service(web::to(mock::dispatch))
    })
    .workers(2)
    .listen(listener)
    .unwrap()
    .run();
    tokio::spawn(server);

    let address = format!("http://127.0.0.1:{port}");
    let client = APIClient::new(address.clone(), timeout).unwrap();
    let toasts = ToastHandle::new();
    let ctx = DataContext::new(Cache::new(client.clone()), toasts.clone())
        .with_list_options(FetchOptions {
            retry: None,
            ..FetchOptions::default()
        });

    TestApp {
        address,
        client,
        ctx,
        toasts,
        mock,
    }
}

#[tokio::test]
async fn mock_api_is_reachable() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.client.health_check().await?;
    app.seed_rooms();
    let rooms = app.client.get_json("/api/room", Some("ocean")).await?;
    assert_eq!(rooms.as_array().map(Vec::len), Some(2));
    Ok(())
}
