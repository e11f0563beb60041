//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use rq_gateway::config::GatewayConfig;
use rq_gateway::files::{FileStore, InMemoryFileStore};
use rq_gateway::http::HttpServer;
use rq_gateway::ingest::{IngestSettings, Ingestor};
use rq_gateway::lifecycle::Shutdown;
use rq_gateway::records::{InMemoryRecordStore, RecordStore};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// A gateway serving on an ephemeral local port.
pub struct RunningGateway {
    pub addr: SocketAddr,
    shutdown: Shutdown,
    handle: JoinHandle<Result<(), std::io::Error>>,
}

impl RunningGateway {
    /// Full URL of the capture endpoint, with `query` appended.
    pub fn capture_url(&self, query: &str) -> String {
        if query.is_empty() {
            format!("http://{}/api/rq/http", self.addr)
        } else {
            format!("http://{}/api/rq/http?{}", self.addr, query)
        }
    }

    /// Trigger graceful shutdown and wait for the server task.
    pub async fn stop(self) {
        self.shutdown.trigger();
        self.handle.await.unwrap().unwrap();
    }
}

/// Serve `config` with the given stores.
pub async fn spawn_gateway(
    config: GatewayConfig,
    records: Arc<dyn RecordStore>,
    files: Arc<dyn FileStore>,
) -> RunningGateway {
    let settings = IngestSettings::from_config(&config).unwrap();
    let ingestor = Arc::new(Ingestor::new(settings, records, files));
    let server = HttpServer::new(&config, ingestor);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let handle = tokio::spawn(server.run(listener, shutdown.signal()));

    RunningGateway { addr, shutdown, handle }
}

/// Serve `config` backed by in-memory stores the test can inspect.
pub async fn spawn_in_memory(
    config: GatewayConfig,
) -> (RunningGateway, Arc<InMemoryRecordStore>, Arc<InMemoryFileStore>) {
    let records = Arc::new(InMemoryRecordStore::new());
    let files = Arc::new(InMemoryFileStore::new());
    let gateway = spawn_gateway(config, records.clone(), files.clone()).await;
    (gateway, records, files)
}

/// The `RqId` header of a response.
pub fn rq_id(response: &reqwest::Response) -> String {
    response
        .headers()
        .get("rqid")
        .expect("RqId header")
        .to_str()
        .unwrap()
        .to_string()
}
