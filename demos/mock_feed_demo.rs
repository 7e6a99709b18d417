//! Mock Feed Demo
//!
//! This example runs the capture loop on the synthetic frame source, so it
//! works on machines without a camera. Point it at a running backend to see
//! real analysis replies; without one, it demonstrates that per-upload
//! failures are logged and the loop keeps its cadence.
//!
//! Usage: `cargo run --example mock_feed_demo -- [backend-url]`

use std::time::Duration;

use watchfeed::{FeedPhase, WatchFeed};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let base_url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "http://127.0.0.1:5000".to_string());

    println!("🧪 Watchfeed Mock Capture Demo");
    println!("==============================");

    let watchfeed = WatchFeed::init()?;
    let mut feed = watchfeed
        .feed(&base_url)
        .mock_camera()
        .resolution(480, 360)
        .upload_interval(Duration::from_millis(250))
        .start()
        .await?;

    println!("📡 Session {} running on synthetic frames", feed.id());

    for _ in 0..5 {
        tokio::time::sleep(Duration::from_secs(1)).await;
        let stats = feed.stats();
        let view = feed.view();
        println!(
            "   tick={} skipped={} ok={} failed={} banner={} image={}",
            stats.ticks,
            stats.ticks_skipped,
            stats.uploads_ok,
            stats.uploads_failed,
            view.threat_banner,
            view.processed_image.map(|i| i.len()).unwrap_or(0),
        );
    }

    match feed.end().await {
        Ok(summary) => println!("🗺️  Heatmap received: {} chars", summary.heatmap_image.len()),
        Err(e) => println!("📉 End feed error (no backend running?): {}", e),
    }
    assert_eq!(feed.phase(), FeedPhase::Ended);

    println!("\n✨ Mock feed demo completed!");
    Ok(())
}
