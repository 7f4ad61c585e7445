//! End-to-end run against a local playlist fixture
//!
//! Spins up a small HTTP fixture on an ephemeral port serving two source
//! playlists and their stream endpoints, then drives a full run through the
//! aggregator and checks the partition, deduplication, and the blocklist
//! artifact written to disk.

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use stream_sentry::app::{
    BatchScheduler, FetchConfig, ProbeConfig, RunAggregator, RunEvent, SchedulerConfig,
    SourceClient, StreamProber,
};
use stream_sentry::cli::commands::write_report;

/// Start the fixture server and return its base URL.
///
/// Routes:
/// - `/us.m3u`: playlist with one live HLS channel and one dead channel
/// - `/uk.m3u`: playlist repeating the same dead channel
/// - `/good.m3u8`: 200 with HLS markers
/// - `/dead.ts`: 404
async fn spawn_fixture() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base = format!("http://{}", addr);

    let server_base = base.clone();
    tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                break;
            };
            let base = server_base.clone();
            tokio::spawn(async move {
                handle_connection(stream, &base).await;
            });
        }
    });

    base
}

async fn handle_connection(mut stream: TcpStream, base: &str) {
    let mut request = Vec::new();
    let mut buf = [0u8; 1024];
    loop {
        match stream.read(&mut buf).await {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                request.extend_from_slice(&buf[..n]);
                if request.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }
        }
    }

    let request = String::from_utf8_lossy(&request);
    let path = request
        .split_whitespace()
        .nth(1)
        .unwrap_or("/")
        .to_string();

    let (status, body) = match path.as_str() {
        "/us.m3u" => (
            "200 OK",
            format!(
                "#EXTM3U\n\
                 #EXTINF:-1 group-title=\"News\",Live One\n\
                 {base}/good.m3u8\n\
                 #EXTINF:-1,Dead One\n\
                 {base}/dead.ts\n"
            ),
        ),
        "/uk.m3u" => (
            "200 OK",
            format!(
                "#EXTM3U\n\
                 #EXTINF:-1,Dead Again\n\
                 {base}/dead.ts\n"
            ),
        ),
        "/good.m3u8" => ("200 OK", "#EXTM3U\n#EXT-X-VERSION:3\n".to_string()),
        _ => ("404 Not Found", "not found".to_string()),
    };

    let response = format!(
        "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.shutdown().await;
}

fn aggregator_for(base: &str) -> RunAggregator {
    let fetch_config = FetchConfig {
        url_template: format!("{}/{{code}}.m3u", base),
        timeout: Duration::from_secs(5),
        ..Default::default()
    };
    let probe_config = ProbeConfig {
        timeout: Duration::from_secs(5),
        connect_timeout: Duration::from_secs(5),
        ..Default::default()
    };
    let scheduler_config = SchedulerConfig {
        concurrency: 4,
        progress_interval: 1,
    };

    RunAggregator::new(
        SourceClient::new(fetch_config).unwrap(),
        StreamProber::new(&probe_config).unwrap(),
        BatchScheduler::new(scheduler_config).unwrap(),
    )
}

#[tokio::test]
async fn full_run_partitions_and_deduplicates() {
    let base = spawn_fixture().await;
    let aggregator = aggregator_for(&base);

    let mut progress_events = 0;
    let report = aggregator
        .run(&["us".to_string(), "uk".to_string()], |event| {
            if matches!(event, RunEvent::Progress { .. }) {
                progress_events += 1;
            }
        })
        .await;

    // Every record is accounted for exactly once per source
    assert_eq!(report.summaries.len(), 2);
    let us = &report.summaries[0];
    assert_eq!(us.source, "US");
    assert_eq!(us.total, 2);
    assert_eq!(us.working, 1);
    assert_eq!(us.broken, 1);

    let uk = &report.summaries[1];
    assert_eq!(uk.source, "UK");
    assert_eq!(uk.total, 1);
    assert_eq!(uk.broken, 1);

    // The dead endpoint appears in both sources but only once in the report
    let dead_url = format!("{}/dead.ts", base);
    assert_eq!(report.blocklist.urls, vec![dead_url]);
    assert_eq!(report.blocklist.total_broken, 1);

    // Progress was observed for both batches
    assert!(progress_events >= 3);
}

#[tokio::test]
async fn unknown_source_is_isolated() {
    let base = spawn_fixture().await;
    let aggregator = aggregator_for(&base);

    let report = aggregator
        .run(&["zz".to_string(), "us".to_string()], |_| {})
        .await;

    // The unknown source 404s at fetch time, contributes zero channels, and
    // does not prevent the next source from being tested
    assert_eq!(report.summaries.len(), 2);
    assert_eq!(report.summaries[0].source, "ZZ");
    assert_eq!(report.summaries[0].total, 0);
    assert_eq!(report.summaries[1].source, "US");
    assert_eq!(report.summaries[1].total, 2);
}

#[tokio::test]
async fn blocklist_artifact_round_trips() {
    let base = spawn_fixture().await;
    let aggregator = aggregator_for(&base);

    let report = aggregator.run(&["us".to_string()], |_| {}).await;

    let temp_dir = tempfile::TempDir::new().unwrap();
    let path = temp_dir.path().join("blocklist.json");
    write_report(&report.blocklist, &path).await.unwrap();

    let content = tokio::fs::read_to_string(&path).await.unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();

    assert_eq!(parsed["total_broken"], 1);
    let urls = parsed["urls"].as_array().unwrap();
    assert_eq!(urls.len(), 1);
    assert!(urls[0].as_str().unwrap().ends_with("/dead.ts"));
    assert!(parsed["generated"].as_str().unwrap().ends_with('Z'));
}
