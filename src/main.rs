//! DNA Fidget CLI - inspection and development entry point
//!
//! Loads settings (from the path given as the first argument, or defaults)
//! and prints what the input core would do with them: the fidget key set and
//! a sample trajectory with its step cadence. Nothing is injected.

use std::env;
use std::process;

use dna_fidget::config::Settings;
use dna_fidget::input::Point;
use dna_fidget::motion::{trajectory, StepTiming};
use dna_fidget::stealth::Humanizer;

fn main() {
    println!("DNA Fidget - humanized input core");
    println!("=================================");
    println!();

    let settings = match env::args().nth(1) {
        Some(path) => match Settings::load(&path) {
            Ok(settings) => {
                println!("Loaded settings from {path}");
                settings
            }
            Err(e) => {
                eprintln!("Error: {e}");
                process::exit(1);
            }
        },
        None => {
            println!("No settings file given, using defaults");
            Settings::default()
        }
    };
    println!();

    println!("Current Configuration:");
    println!("  - Keyboard identity: {}", settings.devices.keyboard);
    println!("  - Mouse identity: {}", settings.devices.mouse);
    println!("  - Spoofing: {}", settings.devices.spoof);
    println!("  - Mouse jitter: {}", settings.afk.mouse_jitter);
    println!("  - Hold LAlt: {}", settings.afk.hold_lalt);
    println!("  - Jump threshold: {} px", settings.motion.jump_threshold);

    match settings.keys.fidget_candidates() {
        Ok(keys) => {
            let keys: Vec<String> = keys.iter().map(|vk| format!("{vk:#04x}")).collect();
            println!("  - Fidget keys: {}", keys.join(", "));
        }
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
    println!();

    let start = Point::new(120, 140);
    let end = Point::new(860, 520);
    let planned = trajectory::plan(start, end);
    let timing = StepTiming::new(planned.duration, planned.len());
    let mut humanizer = Humanizer::new();

    println!(
        "Sample trajectory {start:?} -> {end:?}: {} points over {:.2}s",
        planned.len(),
        planned.duration
    );
    let mut total = 0.0;
    for (i, point) in planned.pixels().enumerate() {
        let delay = timing
            .delay_for(i, humanizer.rng())
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0);
        total += delay;
        println!("  {i:>2}: ({:>4}, {:>4})  +{:.1} ms", point.x, point.y, delay * 1000.0);
    }
    println!("  total {:.0} ms", total * 1000.0);
    println!();

    println!("Sample idle cadence:");
    for _ in 0..3 {
        println!(
            "  key hold {:.3}s, pause {:.3}s, idle {:.2}s",
            humanizer.key_hold(),
            humanizer.quantized_delay(),
            humanizer.idle_interval()
        );
    }
}
