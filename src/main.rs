//! Status page LED matrix monitor
//!
//! Polls Statuspage-style JSON APIs for one or more domains and renders
//! their health onto a 16×16 RGB LED matrix, round-robin, forever.
//!
//! ## Architecture
//! - **Poll driver** (current-thread tokio): fetch → cache → project → flush
//! - **Snapshot cache**: timestamped JSON files under the cache dir
//! - **Matrix**: `rpi-led-matrix` offscreen canvas, swapped per frame
//!
//! ## Usage
//! ```sh
//! sudo ./target/release/status-matrix-rs "www.githubstatus.com www.37status.com"
//! ```

#[cfg(not(feature = "hardware"))]
fn main() {
    eprintln!("This binary requires the 'hardware' feature (rpi-led-matrix).");
    eprintln!("Build with: cargo build --release");
    eprintln!("Tests can run without it: cargo test --no-default-features");
    std::process::exit(1);
}

#[cfg(feature = "hardware")]
fn main() {
    hardware_main();
}

#[cfg(feature = "hardware")]
#[tokio::main(flavor = "current_thread")]
async fn hardware_main() {
    use clap::Parser;
    use status_matrix_rs::cache::SnapshotStore;
    use status_matrix_rs::client::StatusClient;
    use status_matrix_rs::driver::{PollConfig, PollDriver, parse_domain_list};
    use status_matrix_rs::setup_signal_handler;
    use status_matrix_rs::sink::MatrixSink;
    use std::path::PathBuf;
    use std::time::Duration;

    /// Status page monitor for a 16x16 RGB LED matrix
    #[derive(Parser)]
    #[command(name = "status-matrix-rs")]
    #[command(about = "Render status page health onto an RGB LED matrix")]
    #[command(version)]
    struct Args {
        /// Whitespace-separated list of status page domains,
        /// e.g. "www.githubstatus.com www.37status.com"
        domains: String,

        /// Seconds to sleep between domains
        #[arg(long, default_value = "60")]
        interval: u64,

        /// Panel brightness (0.0 to 1.0)
        #[arg(long, default_value = "0.2")]
        brightness: f32,

        /// Panel rotation in degrees (0, 90, 180, 270)
        #[arg(long, default_value = "180")]
        rotation: u16,

        /// Directory for cached snapshots (defaults to the OS temp dir)
        #[arg(long)]
        cache_dir: Option<PathBuf>,
    }

    // Initialize tracing subscriber for cycle logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_ansi(false) // Disable ANSI color codes for systemd/journald
        .compact()
        .init();

    let args = Args::parse();

    let domains = parse_domain_list(&args.domains);
    if domains.is_empty() {
        eprintln!("Usage: status-matrix-rs \"<domain 1> <domain 2>\"");
        eprintln!("  Example: status-matrix-rs \"www.githubstatus.com www.37status.com\"");
        std::process::exit(1);
    }

    let cache_dir = args.cache_dir.unwrap_or_else(std::env::temp_dir);

    tracing::info!("Status matrix v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Domains: {}", domains.join(", "));
    tracing::info!("Cache dir: {}", cache_dir.display());
    tracing::info!("Interval: {}s", args.interval);

    // Initialize the matrix before any network activity — if this fails
    // there is nothing to render onto.
    let sink = match MatrixSink::new() {
        Ok(sink) => sink,
        Err(e) => {
            tracing::error!("Failed to initialize LED matrix: {}", e);
            std::process::exit(1);
        }
    };

    let config = PollConfig {
        domains,
        interval: Duration::from_secs(args.interval),
        brightness: args.brightness,
        rotation: args.rotation,
    };

    let running = setup_signal_handler();
    let mut driver = PollDriver::new(StatusClient::new(), SnapshotStore::new(cache_dir), sink, config);

    driver.run(&running).await;
}
