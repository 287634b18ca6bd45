//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use tempfile::TempDir;
use tokio::net::TcpListener;
use translator_service::config::{BackendKind, ModelConfig, ServiceConfig};
use translator_service::http::HttpServer;
use translator_service::lifecycle::{startup, Shutdown};
use translator_service::observability::metrics;
use translator_service::provider::TranslationProvider;

pub const ADMIN_KEY: &str = "test-admin-key";
pub const EN_FR: &str = "opus-mt-en-fr";
pub const EN_ES: &str = "opus-mt-en-es";

/// A server running on an ephemeral port. Shuts down on drop.
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: reqwest::Client,
    pub model_dir: TempDir,
    shutdown: Shutdown,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Write a lexicon for `model_id` under `dir`.
pub fn write_lexicon(dir: &Path, model_id: &str, entries: &[(&str, &str)]) {
    let model_dir = dir.join(model_id);
    fs::create_dir_all(&model_dir).unwrap();
    let mut content = String::from("# test lexicon\n");
    for (source, target) in entries {
        content.push_str(&format!("{source}\t{target}\n"));
    }
    fs::write(model_dir.join("lexicon.tsv"), content).unwrap();
}

/// Lexicon-backed config with en→fr and en→es models written to disk.
pub fn lexicon_config(dir: &Path) -> ServiceConfig {
    write_lexicon(dir, EN_FR, &[("hello", "bonjour"), ("world", "monde")]);
    write_lexicon(dir, EN_ES, &[("hello", "hola"), ("world", "mundo")]);

    let mut config = ServiceConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.provider.backend = BackendKind::Lexicon;
    config.provider.model_dir = dir.to_string_lossy().into_owned();
    config.provider.preload = false;
    config.models = vec![
        ModelConfig::new("en", "fr", EN_FR),
        ModelConfig::new("en", "es", EN_ES),
    ];
    config.admin.enabled = true;
    config.admin.api_key = ADMIN_KEY.into();
    config.observability.app_version = "test".into();
    config
}

/// Start a server; `customize` can adjust the lexicon config first.
pub async fn start_server<F>(customize: F) -> TestServer
where
    F: FnOnce(&mut ServiceConfig),
{
    let model_dir = tempfile::tempdir().unwrap();
    let mut config = lexicon_config(model_dir.path());
    customize(&mut config);

    let registry = startup::build_registry(&config).await;
    spawn_server(config, registry, model_dir).await
}

/// Start a server over a caller-supplied provider.
pub async fn start_server_with_provider<F>(
    provider: Arc<dyn TranslationProvider>,
    customize: F,
) -> TestServer
where
    F: FnOnce(&mut ServiceConfig),
{
    let model_dir = tempfile::tempdir().unwrap();
    let mut config = lexicon_config(model_dir.path());
    customize(&mut config);
    spawn_server(config, provider, model_dir).await
}

async fn spawn_server(
    config: ServiceConfig,
    provider: Arc<dyn TranslationProvider>,
    model_dir: TempDir,
) -> TestServer {
    let handle = metrics::install_recorder().unwrap();
    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, provider, handle);
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    let client = reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap();

    TestServer {
        addr,
        client,
        model_dir,
        shutdown,
    }
}

/// Value of the first sample of `name` whose labels contain every `labels`
/// fragment, or 0 when the series does not exist yet.
pub fn sample(rendered: &str, name: &str, labels: &[&str]) -> f64 {
    rendered
        .lines()
        .filter(|line| !line.starts_with('#'))
        .filter(|line| {
            line.strip_prefix(name)
                .is_some_and(|rest| rest.starts_with('{') || rest.starts_with(' '))
        })
        .find(|line| labels.iter().all(|label| line.contains(label)))
        .and_then(|line| line.rsplit(' ').next())
        .and_then(|value| value.parse().ok())
        .unwrap_or(0.0)
}

pub async fn scrape(server: &TestServer) -> String {
    server
        .client
        .get(server.url("/metrics"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap()
}
