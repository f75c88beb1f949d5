//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `setweek_core` linkage.
//! - Start core file logging under the system temp directory.
//! - Print the current local week boundary and the seeded dataset.

use chrono::Local;
use setweek_core::{MemoryStore, TrackerConfig, WeekTracker};

const LOG_SUBDIR: &str = "setweek-logs";

fn main() {
    println!("setweek_core ping={}", setweek_core::ping());
    println!("setweek_core version={}", setweek_core::core_version());
    start_logging();

    let now = Local::now();
    let code = match WeekTracker::open(MemoryStore::new(), TrackerConfig::default(), &now) {
        Ok(tracker) => {
            let marker = tracker.marker();
            let week_label = marker
                .to_datetime(&Local)
                .map(|start| start.format("%Y-%m-%d %H:%M %Z").to_string())
                .unwrap_or_else(|| "unknown".to_string());
            println!("week_start={} ({week_label})", marker);
            for item in tracker.items() {
                println!("{} sets={}", item.name, item.sets);
            }
            0
        }
        Err(err) => {
            eprintln!("invalid tracker config: {err}");
            1
        }
    };

    setweek_core::flush_logging();
    std::process::exit(code);
}

// Logging is best-effort for the probe; failures are reported, not fatal.
fn start_logging() {
    let log_dir = std::env::temp_dir().join(LOG_SUBDIR);
    let Some(log_dir) = log_dir.to_str() else {
        eprintln!("log dir `{}` is not valid UTF-8", log_dir.display());
        return;
    };
    match setweek_core::init_logging(setweek_core::default_log_level(), log_dir) {
        Ok(()) => println!("log_dir={log_dir}"),
        Err(err) => eprintln!("logging disabled: {err}"),
    }
}
