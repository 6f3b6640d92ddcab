use once_cell::sync::Lazy;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::net::TcpListener;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, OnceCell};
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
struct LatestOrder {
    date: String,
    restaurant: String,
}

#[derive(Debug, Deserialize)]
struct Elapsed {
    days: i64,
    hours: i64,
    minutes: i64,
    seconds: i64,
}

#[derive(Debug, Deserialize)]
struct ElapsedResponse {
    latest: Option<LatestOrder>,
    elapsed: Option<Elapsed>,
    clock: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Summary {
    total_days: u32,
    total_orders: u32,
    days_with_orders: u32,
    success_rate: u32,
}

#[derive(Debug, Deserialize)]
struct Bucket {
    count: u32,
}

#[derive(Debug, Deserialize)]
struct ActivityResponse {
    days: Vec<Bucket>,
    summary: Summary,
}

#[derive(Debug, Deserialize)]
struct Grid {
    weeks: Vec<Vec<serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
struct RestaurantCount {
    restaurant: String,
    count: u32,
}

#[derive(Debug, Deserialize)]
struct YearResponse {
    year: i32,
    days: Vec<Bucket>,
    grid: Grid,
    summary: Summary,
    top_restaurants: Vec<RestaurantCount>,
}

/// The dashboard binary running against a temporary orders file.
struct DashboardProcess {
    base_url: String,
    child: Child,
    orders_path: PathBuf,
}

impl DashboardProcess {
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> T {
        let response = Client::new()
            .get(format!("{}{path}", self.base_url))
            .send()
            .await
            .unwrap();
        assert!(response.status().is_success(), "GET {path}: {}", response.status());
        response.json().await.unwrap()
    }

    async fn status(&self, path: &str) -> StatusCode {
        Client::new()
            .get(format!("{}{path}", self.base_url))
            .send()
            .await
            .unwrap()
            .status()
    }
}

impl Drop for DashboardProcess {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
        let _ = std::fs::remove_file(&self.orders_path);
    }
}

static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
static DASHBOARD: OnceCell<DashboardProcess> = OnceCell::const_new();

#[cfg(unix)]
mod cleanup {
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Once;

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

const ORDERS: &str = r#"{
  "lastUpdated": "2024-12-31",
  "orders": [
    { "date": "2024-03-02", "time": "19:00", "restaurant": "Pho Corner", "total": 20.0, "items": 2, "type": "delivery" },
    { "date": "2024-03-02", "time": "12:00", "restaurant": "Burger Shack", "total": 10.0, "items": 1, "type": "pickup" },
    { "date": "2024-02-10", "restaurant": "Burger Shack", "total": 12.5, "items": 1, "type": "pickup" },
    { "date": "2024-01-05", "time": "18:30", "restaurant": "Pho Corner", "total": 22.0, "items": 3, "type": "delivery" },
    { "date": "2023-11-20", "time": "20:15", "restaurant": "Pizza Town", "total": 30.0, "items": 2, "type": "delivery" }
  ]
}"#;

fn free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

fn fixture_path() -> PathBuf {
    std::env::temp_dir().join(format!("order_dashboard_http_{}.json", std::process::id()))
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    while Instant::now() < deadline {
        let ready = client
            .get(format!("{base_url}/api/elapsed"))
            .send()
            .await
            .is_ok_and(|resp| resp.status().is_success());
        if ready {
            return;
        }
        sleep(Duration::from_millis(100)).await;
    }
    panic!("dashboard did not become ready");
}

/// Starts the dashboard once per test binary. The fixture is removed as soon
/// as the server answers, since orders are only read at startup.
async fn dashboard() -> &'static DashboardProcess {
    DASHBOARD
        .get_or_init(|| async {
            let port = free_port();
            let orders_path = fixture_path();
            std::fs::write(&orders_path, ORDERS).expect("write orders fixture");

            let child = Command::new(env!("CARGO_BIN_EXE_order_dashboard"))
                .env("PORT", port.to_string())
                .env("ORDERS_PATH", &orders_path)
                .env("RUST_LOG", "warn")
                .stdout(Stdio::null())
                .stderr(Stdio::inherit())
                .spawn()
                .expect("failed to spawn dashboard");

            #[cfg(unix)]
            cleanup::register(child.id());

            let base_url = format!("http://127.0.0.1:{port}");
            wait_until_ready(&base_url).await;
            let _ = std::fs::remove_file(&orders_path);

            DashboardProcess {
                base_url,
                child,
                orders_path,
            }
        })
        .await
}

#[tokio::test]
async fn http_elapsed_reports_latest_order() {
    let _guard = TEST_LOCK.lock().await;
    let server = dashboard().await;

    let response: ElapsedResponse = server.get_json("/api/elapsed").await;

    let latest = response.latest.expect("latest order");
    assert_eq!(latest.date, "2024-03-02");
    assert_eq!(latest.restaurant, "Pho Corner");

    let elapsed = response.elapsed.expect("elapsed");
    assert!(elapsed.days > 0);
    assert!(elapsed.hours >= elapsed.days * 24);
    assert!(elapsed.minutes < 60 && elapsed.seconds < 60);
    assert_eq!(response.clock.map(|clock| clock.len()), Some(8));
}

#[tokio::test]
async fn http_year_view_builds_calendar() {
    let _guard = TEST_LOCK.lock().await;
    let server = dashboard().await;

    let year: YearResponse = server.get_json("/api/years/2024").await;

    assert_eq!(year.year, 2024);
    assert_eq!(year.days.len(), 366);
    assert_eq!(year.days.iter().map(|day| day.count).sum::<u32>(), 4);
    assert_eq!(year.grid.weeks.len(), 53);
    assert!(year.grid.weeks.iter().all(|week| week.len() == 7));
    assert_eq!(year.summary.total_days, 366);
    assert_eq!(year.summary.total_orders, 4);
    assert_eq!(year.summary.days_with_orders, 3);
    assert_eq!(year.summary.success_rate, 99);
    assert_eq!(year.top_restaurants[0].restaurant, "Pho Corner");
    assert_eq!(year.top_restaurants[0].count, 2);
    assert_eq!(year.top_restaurants[1].restaurant, "Burger Shack");
}

#[tokio::test]
async fn http_restaurants_respect_year_and_limit() {
    let _guard = TEST_LOCK.lock().await;
    let server = dashboard().await;

    let ranked: Vec<RestaurantCount> = server.get_json("/api/restaurants?limit=1").await;
    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0].restaurant, "Pho Corner");

    let ranked: Vec<RestaurantCount> = server.get_json("/api/restaurants?year=2023").await;
    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0].restaurant, "Pizza Town");

    assert_eq!(server.status("/api/restaurants?limit=0").await, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn http_activity_validates_days() {
    let _guard = TEST_LOCK.lock().await;
    let server = dashboard().await;

    let activity: ActivityResponse = server.get_json("/api/activity?days=14").await;
    assert_eq!(activity.days.len(), 14);
    assert_eq!(activity.summary.total_days, 14);

    assert_eq!(server.status("/api/activity?days=0").await, StatusCode::BAD_REQUEST);
    assert_eq!(server.status("/api/years/300000").await, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn http_index_renders_dashboard() {
    let _guard = TEST_LOCK.lock().await;
    let server = dashboard().await;

    let response = Client::new().get(&server.base_url).send().await.unwrap();
    assert!(response.status().is_success());
    let body = response.text().await.unwrap();
    assert!(body.contains("delivery recovery"));
    assert!(body.contains("Pho Corner"));
    assert!(body.contains("data-year=\"2024\""));
    assert!(body.contains("data-year=\"2023\""));
}

#[tokio::test]
async fn http_fixture_is_removed_once_serving() {
    let _guard = TEST_LOCK.lock().await;
    let server = dashboard().await;

    assert!(!server.orders_path.exists());
    let response: ElapsedResponse = server.get_json("/api/elapsed").await;
    assert!(response.latest.is_some());
}
