//! Detection-accuracy variant: classifies frames without controlling
//! anything, tallying an explicit statistics accumulator. `RESET` clears
//! the counters; a summary prints when the stream ends.

use std::io::{self, BufRead};
use std::time::Instant;

use anyhow::Result;
use chrono::Local;

use gesture_core::config::Settings;
use gesture_core::frames;
use gesture_core::gesture::{Gesture, GestureClassifier};
use gesture_core::landmarks;
use gesture_core::stats::GestureStats;

fn print_summary(stats: &GestureStats) {
    println!("============================================================");
    println!("FINAL STATISTICS");
    println!("============================================================");
    let total = stats.total();
    for gesture in Gesture::ALL {
        if gesture == Gesture::Unknown {
            continue;
        }
        let count = stats.count(gesture);
        let percentage = if total > 0 {
            count as f32 / total as f32 * 100.0
        } else {
            0.0
        };
        println!("  {:<12} {:4} detections ({:5.1}%)", gesture.label(), count, percentage);
    }
    println!("============================================================");
}

fn main() -> Result<()> {
    println!("Gesture testing program");
    println!("Feed landmark frames on stdin; RESET clears the statistics");

    let mut settings = Settings::new("settings.json");
    if let Err(e) = settings.load() {
        println!("Using default settings ({})", e);
    }

    let classifier = GestureClassifier::new(settings.classifier);
    let mut stats = GestureStats::new();

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed == "RESET" {
            stats.reset();
            println!("Statistics reset");
            continue;
        }

        let now = Instant::now();
        let hands = frames::parse_frame(trimmed);
        let gesture = hands.first().map(|hand| classifier.classify(hand));

        let previous = stats.current();
        let held = stats.current_hold(now);
        stats.observe(gesture, now);

        // Report transitions, not every frame; the closing segment gets
        // its hold duration.
        if gesture != previous {
            let stamp = Local::now().format("%H:%M:%S%.3f");
            if let Some(prev) = previous {
                println!("[{}] {} held for {:.2}s", stamp, prev.label(), held.as_secs_f32());
            }
            match (gesture, hands.first()) {
                (Some(g), Some(hand)) => {
                    let fingers = landmarks::extended_fingers(hand).count();
                    println!("[{}] {} (fingers extended: {})", stamp, g.label(), fingers);
                }
                _ => println!("[{}] no hand detected", stamp),
            }
        }
    }

    // Close the trailing segment so it is counted.
    stats.observe(None, Instant::now());
    print_summary(&stats);
    Ok(())
}
