mod catalog;
mod config;
mod form;
mod ipc;
mod model;
mod roster;
mod upload;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{info, warn};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let (settings, mut notes) = config::load_settings();

    // stdout carries responses; logs go to stderr.
    let filter = config::env_filter(&settings, &mut notes);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    config::report_notes(&notes);

    let mut state = ipc::AppState::from_settings(&settings);
    info!(
        students = state.roster.all_students().len(),
        catalog_latency_ms = settings.catalog_latency_ms,
        upload_latency_ms = settings.upload_latency_ms,
        "rosterd ready"
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(v)) => v,
            Ok(None) => break,
            Err(e) => {
                warn!(error = %e, "stdin read failed");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let reply = match serde_json::from_str::<ipc::Request>(&line) {
            Ok(req) => {
                let resp = ipc::handle_request(&mut state, req).await;
                serde_json::to_string(&resp).unwrap_or_else(|_| "{\"ok\":false}".to_string())
            }
            Err(e) => {
                // Can't reply without id.
                warn!(error = %e, "unparseable request line");
                serde_json::json!({
                    "ok": false,
                    "error": { "code": "bad_json", "message": e.to_string() }
                })
                .to_string()
            }
        };

        stdout.write_all(reply.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
    }

    info!("stdin closed, shutting down");
    Ok(())
}
