//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use provisioning_api::config::ApiConfig;
use provisioning_api::{ApiServer, Shutdown};
use tempfile::TempDir;
use tokio::net::TcpListener;

#[allow(dead_code)]
pub const TOKEN: &str = "0123456789abcdef0123456789abcdef";

/// Fake lifecycle script. Records each invocation as `arg|arg|...|` and
/// behaves according to the PA name:
/// - `broken` exits 2 with a message on stderr
/// - `slow` sleeps for 5 seconds
/// - anything else echoes the verb and name
const FAKE_PACTL: &str = r#"
line=$(printf '%s|' "$@")
echo "$line" >> "$(dirname "$0")/invocations.log"

case "$2" in
  broken)
    echo "partial output"
    echo "pactl: $1 $2 failed" >&2
    exit 2
    ;;
  slow)
    exec sleep 5
    ;;
esac

case "$1" in
  list) echo "alice running"; echo "bob stopped" ;;
  status) echo "$2: running" ;;
  *) echo "ok: $1 $2" ;;
esac
"#;

/// A running API bound to an ephemeral loopback port.
pub struct TestApi {
    pub addr: SocketAddr,
    pub dir: TempDir,
    pub client: reqwest::Client,
    shutdown: Shutdown,
}

#[allow(dead_code)]
impl TestApi {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn sites_dir(&self) -> PathBuf {
        self.dir.path().join("sites")
    }

    /// Lifecycle invocations so far, one argument vector per run.
    pub fn invocations(&self) -> Vec<Vec<String>> {
        read_invocations(self.dir.path())
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .bearer_auth(TOKEN)
            .send()
            .await
            .expect("API unreachable")
    }

    pub async fn post(&self, path: &str, body: serde_json::Value) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .bearer_auth(TOKEN)
            .json(&body)
            .send()
            .await
            .expect("API unreachable")
    }
}

impl Drop for TestApi {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

fn read_invocations(dir: &Path) -> Vec<Vec<String>> {
    let Ok(log) = std::fs::read_to_string(dir.join("invocations.log")) else {
        return Vec::new();
    };
    log.lines()
        .map(|line| {
            line.trim_end_matches('|')
                .split('|')
                .map(str::to_string)
                .collect()
        })
        .collect()
}

/// Start the API with the fake script and `true` as the proxy binary.
pub async fn start_api<F>(configure: F) -> TestApi
where
    F: FnOnce(&mut ApiConfig),
{
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("pactl.sh");
    std::fs::write(&script, FAKE_PACTL).unwrap();

    let mut config = ApiConfig::default();
    config.auth.token = TOKEN.to_string();
    config.listener.port = 0;
    config.lifecycle.script = script.to_string_lossy().into_owned();
    config.proxy.binary = "true".to_string();
    config.proxy.config_file = dir.path().join("Caddyfile").to_string_lossy().into_owned();
    config.proxy.sites_dir = dir.path().join("sites").to_string_lossy().into_owned();
    configure(&mut config);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = ApiServer::new(config);
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    let client = reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap();

    TestApi {
        addr,
        dir,
        client,
        shutdown,
    }
}
