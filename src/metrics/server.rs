use prometheus::{Encoder, TextEncoder};
use std::net::SocketAddr;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tracing::{error, info};

/// Start a simple Prometheus metrics server in the background
pub async fn start_metrics_server(port: u16) -> Result<SocketAddr, std::io::Error> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    let local_addr = listener.local_addr()?;

    info!(
        "Starting Prometheus metrics server on http://{}/metrics",
        local_addr
    );

    tokio::spawn(async move {
        if let Err(e) = run_metrics_server(listener).await {
            error!("Metrics server error: {}", e);
        }
    });

    Ok(local_addr)
}

/// Render all registered metrics in the Prometheus text format
pub fn render_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        error!("Failed to encode metrics: {}", e);
    }

    String::from_utf8_lossy(&buffer).into_owned()
}

async fn run_metrics_server(listener: TcpListener) -> Result<(), std::io::Error> {
    loop {
        let (mut stream, _) = listener.accept().await?;

        tokio::spawn(async move {
            let mut buffer = [0; 1024];

            // Any request gets the metrics page
            match stream.read(&mut buffer).await {
                Ok(_) => {
                    let body = render_metrics();
                    let response = format!(
                        "HTTP/1.1 200 OK\r\nContent-Type: text/plain; version=0.0.4\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                        body.len(),
                        body
                    );

                    if let Err(e) = stream.write_all(response.as_bytes()).await {
                        error!("Failed to write metrics response: {}", e);
                    }
                }
                Err(e) => {
                    error!("Failed to read from stream: {}", e);
                }
            }
        });
    }
}
