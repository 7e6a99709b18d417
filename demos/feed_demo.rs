//! Feed Demo
//!
//! This example runs a full capture-and-upload session against a running
//! analysis backend: ten seconds of live uploads, then end-of-feed, then
//! the final motion heatmap saved to disk.
//!
//! Usage: `cargo run --example feed_demo -- [backend-url]`
//! (defaults to http://127.0.0.1:5000)

use std::time::Duration;

use watchfeed::{FeedEvent, WatchFeed};
use watchfeed_media::decode_data_uri;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let base_url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "http://127.0.0.1:5000".to_string());

    println!("🎥 Watchfeed Capture Demo");
    println!("=========================");
    println!("Backend: {}", base_url);

    let watchfeed = WatchFeed::init()?;
    let mut feed = watchfeed.feed(&base_url).camera(0).start().await?;
    println!("📡 Session {} capturing, uploading every 250ms", feed.id());

    let mut events = feed.events();
    let deadline = tokio::time::Instant::now() + Duration::from_secs(10);
    loop {
        let event = tokio::select! {
            event = events.next() => event,
            _ = tokio::time::sleep_until(deadline) => break,
        };
        match event {
            Some(FeedEvent::FrameAnalyzed { loitering, .. }) => {
                if loitering {
                    println!("🚨 Frame analyzed: LOITERING DETECTED");
                }
            }
            Some(FeedEvent::ThreatBannerChanged { visible }) => {
                println!("⚠️  Threat banner: {}", if visible { "shown" } else { "hidden" });
            }
            Some(FeedEvent::UploadFailed { error }) => {
                println!("📉 Upload failed (loop continues): {}", error);
            }
            Some(_) => {}
            None => break,
        }
    }

    let stats = feed.stats();
    println!("\n📊 Session stats");
    println!("   • Ticks with upload:  {}", stats.ticks);
    println!("   • Ticks skipped:      {}", stats.ticks_skipped);
    println!("   • Uploads ok/failed:  {}/{}", stats.uploads_ok, stats.uploads_failed);

    println!("\n🛑 Ending feed...");
    let summary = feed.end().await?;
    let heatmap = decode_data_uri(&summary.heatmap_image)?;
    std::fs::write("heatmap.jpg", &heatmap)?;
    println!("🗺️  Final motion heatmap saved to heatmap.jpg ({} bytes)", heatmap.len());

    println!("\n✨ Feed demo completed!");
    Ok(())
}
