use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::env;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::info;
use vtable::{fetch_blocking, Completion, ListView, MemorySource, VtableConfig};

struct Config {
    rows: usize,
    row_height: f64,
    viewport: f64,
    events: usize,
    seed: u64,
    config_path: Option<PathBuf>,
    output_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            rows: 10_000,
            row_height: 32.0,
            viewport: 720.0,
            events: 200,
            seed: 42,
            config_path: None,
            output_file: None,
        }
    }
}

fn parse_args() -> Result<Config> {
    let args: Vec<String> = env::args().collect();
    let mut config = Config::default();

    let mut i = 1;
    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "-rows" | "-row_height" | "-viewport" | "-events" | "-seed" | "-config" | "-out" => {
                i += 1;
                if i >= args.len() {
                    anyhow::bail!("{} requires an argument", flag);
                }
                let value = &args[i];
                match flag {
                    "-rows" => config.rows = value.parse()?,
                    "-row_height" => config.row_height = value.parse()?,
                    "-viewport" => config.viewport = value.parse()?,
                    "-events" => config.events = value.parse()?,
                    "-seed" => config.seed = value.parse()?,
                    "-config" => config.config_path = Some(PathBuf::from(value)),
                    _ => config.output_file = Some(PathBuf::from(value)),
                }
            }
            "-h" | "-help" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            _ => {
                eprintln!("Warning: Unknown argument: {}", args[i]);
            }
        }
        i += 1;
    }

    Ok(config)
}

fn print_help() {
    println!("Virtual table scroll session generator");
    println!("Usage: vtable-scrollgen [OPTIONS]");
    println!();
    println!("Replays a random scroll session against an in-memory list and prints");
    println!("every page fetch the list view issues as one JSON object per line.");
    println!();
    println!("OPTIONS:");
    println!("  -rows <N>              Rows in the generated list (default: 10000)");
    println!("  -row_height <PX>       Row height in pixels (default: 32)");
    println!("  -viewport <PX>         Viewport height in pixels (default: 720)");
    println!("  -events <N>            Scroll events to generate (default: 200)");
    println!("  -seed <N>              Random seed (default: 42)");
    println!("  -config <PATH>         Tuning config JSON (default: user config dir)");
    println!("  -out <PATH>            Also write the generated rows as a JSON array");
    println!("  -h, --help             Show this help");
}

/// One scroll gesture: a small wheel step or a scrollbar jump.
fn next_scroll(rng: &mut StdRng, current: f64, max_scroll: f64, viewport: f64) -> f64 {
    let next = if rng.gen_bool(0.8) {
        current + rng.gen_range(-1.0..3.0) * viewport / 4.0
    } else {
        rng.gen_range(0.0..=max_scroll.max(1.0))
    };
    next.clamp(0.0, max_scroll.max(0.0))
}

fn main() -> Result<()> {
    vtable::logging::init_tracing();
    let args = parse_args()?;

    let config_path = args.config_path.clone().or_else(VtableConfig::default_path);
    let tuning = VtableConfig::load_or_default(config_path.as_deref());
    info!(?tuning, rows = args.rows, "starting scroll session");

    let source = MemorySource::synthetic_with_seed(args.rows, args.seed);
    if let Some(path) = &args.output_file {
        source.write_json_file(path)?;
        info!(path = %path.display(), "wrote rows");
    }

    let mut view: ListView<serde_json::Value> = ListView::new(&tuning, args.row_height, args.viewport);
    let mut rng = StdRng::seed_from_u64(args.seed);
    let mut fetches = 0usize;

    let order = view.mount()?;
    fetch_blocking(&mut view, &source, order)?;
    fetches += 1;

    let max_scroll = (view.scroll_height_px() - args.viewport).max(0.0);
    let debounce = tuning.debounce();
    let start = Instant::now();
    let mut clock = Duration::ZERO;
    let mut scroll = 0.0;

    for event in 0..args.events {
        // Bursts of quick events with occasional pauses longer than the debounce
        clock += if rng.gen_bool(0.75) {
            Duration::from_millis(rng.gen_range(5..60))
        } else {
            debounce + Duration::from_millis(rng.gen_range(0..500))
        };
        let now = start + clock;

        if let Some(order) = view.poll(now)? {
            let completion = fetch_blocking(&mut view, &source, order)?;
            fetches += 1;
            if completion == Completion::Stale {
                continue;
            }
            let plan = view.rendered().map(|w| w.plan);
            println!(
                "{}",
                serde_json::json!({
                    "event": event,
                    "at_ms": clock.as_millis() as u64,
                    "scroll_px": view.scroll_px(),
                    "generation": view.generation(),
                    "request": order.request,
                    "plan": plan,
                    "rendered_rows": view.rendered().map_or(0, |w| w.rows.len()),
                })
            );
        }

        scroll = next_scroll(&mut rng, scroll, max_scroll, args.viewport);
        view.scrolled(scroll, now);
    }

    if let Some(deadline) = view.next_deadline() {
        if let Some(order) = view.poll(deadline)? {
            fetch_blocking(&mut view, &source, order)?;
            fetches += 1;
        }
    }

    info!(events = args.events, fetches, "scroll session finished");
    Ok(())
}
