//! List Cameras
//!
//! Enumerates the camera devices the capture layer can open.
//!
//! Usage: `cargo run --example list_cameras`

use watchfeed::enumerate_devices;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    println!("📋 Available camera devices");
    println!("===========================");

    let devices = enumerate_devices()?;
    if devices.is_empty() {
        println!("No cameras found (the mock source is always available)");
        return Ok(());
    }

    for device in devices {
        println!("  [{}] {} - {}", device.index, device.name, device.description);
    }

    Ok(())
}
