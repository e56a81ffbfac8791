//! Example: Drive the updates service through a client session.
//!
//! Run with: cargo run -p waytrace-service --example run_service

use std::sync::Arc;
use std::time::Duration;
use waytrace_events::{event_names, LocalEventBus};
use waytrace_location::{Location, ManualProvider};
use waytrace_service::{
    InMemoryNotifier, RecordingHost, ServiceConfig, StartCommand, UpdatesService,
};
use waytrace_storage::SettingsStore;

fn main() {
    // Initialize tracing for debug output
    tracing_subscriber::fmt()
        .with_env_filter("waytrace_service=debug,waytrace_location=debug")
        .init();

    println!("=== Updates Service Example ===\n");

    let provider = Arc::new(ManualProvider::new());
    let notifier = Arc::new(InMemoryNotifier::new());
    let host = Arc::new(RecordingHost::new());
    let bus = Arc::new(LocalEventBus::new());
    let settings = Arc::new(SettingsStore::open_in_memory().expect("in-memory settings"));

    // A same-process observer, like a foreground screen.
    bus.subscribe(
        event_names::LOCATION_UPDATE,
        Arc::new(|payload| {
            println!(
                "[{}] broadcast: ({}, {})",
                chrono::Local::now().format("%H:%M:%S"),
                payload["latitude"],
                payload["longitude"]
            );
        }),
    );

    let service = UpdatesService::new(
        ServiceConfig::default(),
        Arc::clone(&provider) as _,
        Arc::clone(&notifier) as _,
        Arc::clone(&host) as _,
        Arc::clone(&bus) as _,
        settings,
    );
    service.on_create();

    // A client binds and asks for updates.
    let handle = service.on_bind();
    handle.request_location_updates();

    println!("Client bound; streaming fixes in background mode...\n");
    for i in 0..3 {
        provider.emit(Location::now(41.38 + f64::from(i) * 0.01, 2.17));
        std::thread::sleep(Duration::from_millis(300));
    }

    // The client goes away; the service promotes itself to foreground.
    service.on_unbind();
    println!(
        "\nClient unbound; foreground = {}",
        service.service_is_running_in_foreground()
    );

    for i in 0..3 {
        provider.emit(Location::now(41.42 + f64::from(i) * 0.01, 2.18));
        std::thread::sleep(Duration::from_millis(300));
    }

    if let Some((id, record)) = notifier.last_post() {
        println!("\nNotification #{id}: {} / {}", record.title, record.body);
    }

    // The user taps "stop updates" on the notification.
    service.on_start_command(StartCommand::from_notification());
    service.on_destroy();

    println!("\nDone.");
}
