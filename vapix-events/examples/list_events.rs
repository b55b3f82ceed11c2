//! Fetch the event declarations from a camera and print the tree as JSON
//!
//! Usage: cargo run -p vapix-events --example list_events -- <host>

fn main() {
    tracing_subscriber::fmt::init();

    let host = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "192.168.0.90".to_string());

    let tree = vapix_events::discover_or_empty(&host);

    println!("{}", serde_json::to_string_pretty(&tree).unwrap());
}
