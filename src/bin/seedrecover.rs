//! Command-line shell for `seedrecover`.
//!
//! Thin shell around the library: parses flags, reads the observation
//! file, renders progress, and prints accepted candidates. None of the
//! recovery logic lives here — see the `seedrecover` library crate for
//! the PRNG abstraction, the scorer, the search engine and the
//! state-inference engine.

use std::env;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use colored::Colorize;
use seedrecover::{prng, sample, Controller};

const ONE_YEAR_SECS: i64 = 31_536_000;

fn fatal(message: &str) -> ! {
    eprintln!("{message}");
    std::process::exit(1);
}

fn print_usage() {
    println!("Usage: seedrecover [options]");
    println!("  -i PATH   load observations from a file of newline-separated integers");
    println!("  -r NAME   select algorithm (default: {})", prng::names()[0]);
    println!("  -d N      set depth budget, N >= 1 (default: 1000)");
    println!("  -t N      set worker count, N >= 1 (default: available parallelism)");
    println!("  -c PCT    set minimum confidence, 0 < PCT <= 100 (default: 100)");
    println!("  -u        set seed range to [now - 1y, now + 1y]");
    println!("  -g SEED   sample-generation mode");
    println!("  -h        show this help");
    println!();
    println!("Supported algorithms:");
    for name in prng::names() {
        println!("  {name}");
    }
}

struct Args {
    input: Option<String>,
    algorithm: String,
    depth: Option<usize>,
    threads: Option<usize>,
    min_confidence: Option<f64>,
    unix_time_range: bool,
    generate_seed: Option<u32>,
}

fn parse_args() -> Args {
    let mut out = Args {
        input: None,
        algorithm: prng::names()[0].to_string(),
        depth: None,
        threads: None,
        min_confidence: None,
        unix_time_range: false,
        generate_seed: None,
    };

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-i" => {
                out.input = Some(
                    args.next()
                        .unwrap_or_else(|| fatal("-i expects a file path")),
                );
            }
            "-r" => {
                out.algorithm = args
                    .next()
                    .unwrap_or_else(|| fatal("-r expects an algorithm name"));
            }
            "-d" => {
                let raw = args.next().unwrap_or_else(|| fatal("-d expects a number"));
                out.depth = Some(
                    raw.parse()
                        .unwrap_or_else(|_| fatal(&format!("invalid depth: {raw}"))),
                );
            }
            "-t" => {
                let raw = args.next().unwrap_or_else(|| fatal("-t expects a number"));
                out.threads = Some(
                    raw.parse()
                        .unwrap_or_else(|_| fatal(&format!("invalid thread count: {raw}"))),
                );
            }
            "-c" => {
                let raw = args.next().unwrap_or_else(|| fatal("-c expects a number"));
                out.min_confidence = Some(
                    raw.parse()
                        .unwrap_or_else(|_| fatal(&format!("invalid confidence: {raw}"))),
                );
            }
            "-u" => out.unix_time_range = true,
            "-g" => {
                let raw = args.next().unwrap_or_else(|| fatal("-g expects a seed"));
                out.generate_seed = Some(
                    raw.parse()
                        .unwrap_or_else(|_| fatal(&format!("invalid seed: {raw}"))),
                );
            }
            "-h" | "--help" => {
                print_usage();
                std::process::exit(0);
            }
            other => fatal(&format!("unknown argument: {other}")),
        }
    }
    out
}

/// `[now - 1y, now + 1y]` clamped into `[0, u32::MAX]`, per spec.md §6.
fn unix_time_range() -> (u32, u32) {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0);
    let lower = (now - ONE_YEAR_SECS).clamp(0, i64::from(u32::MAX));
    let upper = (now + ONE_YEAR_SECS).clamp(0, i64::from(u32::MAX));
    (lower as u32, upper as u32)
}

/// Tracks the state needed to render the single overwritten progress line:
/// percent complete refreshes every tick (~10 Hz), while the moving-average
/// rate and ETA only refresh every ~2 seconds, per spec.md §4.4.
struct ProgressMeter {
    window_start: Instant,
    window_done: u64,
    rate: f64,
    eta_secs: u64,
}

const ETA_REFRESH_INTERVAL: Duration = Duration::from_secs(2);

impl ProgressMeter {
    fn new() -> Self {
        ProgressMeter {
            window_start: Instant::now(),
            window_done: 0,
            rate: 0.0,
            eta_secs: 0,
        }
    }

    fn tick(&mut self, done: u64, total: u64) {
        let now = Instant::now();
        let window_elapsed = now.duration_since(self.window_start);
        if window_elapsed >= ETA_REFRESH_INTERVAL {
            let delta = done.saturating_sub(self.window_done);
            self.rate = delta as f64 / window_elapsed.as_secs_f64().max(1e-6);
            self.eta_secs = if self.rate > 0.0 {
                (total.saturating_sub(done) as f64 / self.rate).round() as u64
            } else {
                0
            };
            self.window_start = now;
            self.window_done = done;
        }

        let pct = if total == 0 {
            100.0
        } else {
            (done as f64 / total as f64) * 100.0
        };
        print!(
            "\r{} {:>6.2}%  {:>10}/{:<10}  {:>9.0} seeds/s  ETA {:>4}s",
            "searching".cyan(),
            pct,
            done,
            total,
            self.rate,
            self.eta_secs
        );
        use std::io::Write;
        let _ = std::io::stdout().flush();
    }
}

fn run_brute_force(controller: &mut Controller, lower: u32, upper: u32) -> ExitCode {
    // Check the same preconditions `brute_force` validates *before*
    // spawning a progress thread whose only exit condition is the
    // `completed` flag: that flag is set only inside `search::run`, which
    // an early `Err` return from `brute_force` never reaches. Spawning the
    // thread first would hang the process on `progress_thread.join()`.
    if let Err(err) = controller.check_brute_force_preconditions(lower, upper) {
        fatal(&format!("search failed: {err}"));
    }

    let start = Instant::now();
    let handles = controller.progress_handle();
    let cancel_requested = Arc::new(AtomicBool::new(false));
    {
        let cancel_requested = Arc::clone(&cancel_requested);
        let ctrlc_result = ctrlc::set_handler(move || {
            cancel_requested.store(true, Ordering::Relaxed);
        });
        if let Err(err) = ctrlc_result {
            tracing::warn!(%err, "failed to install SIGINT handler; Ctrl-C will not cancel cleanly");
        }
    }

    let total = u64::from(upper) - u64::from(lower);

    let watch_handles = handles.clone();
    let watch_cancel = Arc::clone(&cancel_requested);
    let progress_thread = std::thread::spawn(move || {
        let mut meter = ProgressMeter::new();
        loop {
            if watch_cancel.load(Ordering::Relaxed) {
                watch_handles.cancel();
            }
            if watch_handles.started() {
                meter.tick(watch_handles.total_evaluated(), total);
            }
            if watch_handles.completed() {
                break;
            }
            std::thread::sleep(Duration::from_millis(100));
        }
    });

    let results = match controller.brute_force(lower, upper) {
        Ok(results) => results,
        Err(err) => {
            let _ = progress_thread.join();
            fatal(&format!("search failed: {err}"));
        }
    };
    let _ = progress_thread.join();
    println!();

    for candidate in &results {
        println!(
            "Found seed {} with a confidence of {}%",
            candidate.seed.to_string().green().bold(),
            format!("{:.2}", candidate.confidence).green()
        );
    }
    // Per spec.md §6, the "no candidates above threshold" case prints
    // nothing beyond the elapsed time — so this line is unconditional and
    // is the *only* line printed when `results` is empty.
    println!("elapsed: {:.2}s", start.elapsed().as_secs_f64());
    ExitCode::SUCCESS
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = parse_args();

    let mut controller = Controller::new();
    controller
        .set_algorithm(&args.algorithm)
        .unwrap_or_else(|err| fatal(&format!("{err}")));
    if let Some(depth) = args.depth {
        controller
            .set_depth(depth)
            .unwrap_or_else(|err| fatal(&format!("{err}")));
    }
    if let Some(threads) = args.threads {
        controller
            .set_threads(threads)
            .unwrap_or_else(|err| fatal(&format!("{err}")));
    }
    if let Some(confidence) = args.min_confidence {
        controller
            .set_min_confidence(confidence)
            .unwrap_or_else(|err| fatal(&format!("{err}")));
    }

    let observations = match &args.input {
        Some(path) => match seedrecover::io::read_observations_file(path) {
            Ok(values) => values,
            Err(err) => fatal(&format!("{err}")),
        },
        None => Vec::new(),
    };
    for value in &observations {
        controller.add_observation(*value);
    }

    if let Some(seed) = args.generate_seed {
        if observations.is_empty() {
            let mut depth_rng = rand::thread_rng();
            let samples = sample::from_seed(
                &args.algorithm,
                seed,
                controller.depth().min(32).max(1),
                sample::DEFAULT_DEPTH_RANGE,
                &mut depth_rng,
            )
            .unwrap_or_else(|err| fatal(&format!("{err}")));
            for value in samples {
                println!("{value}");
            }
        } else {
            match controller.infer_state() {
                Ok(report) => {
                    let mut generator = report.generator;
                    let samples = sample::from_state(generator.as_mut(), observations.len().max(1).min(32));
                    for value in samples {
                        println!("{value}");
                    }
                }
                Err(err) => fatal(&format!("{err}")),
            }
        }
        return ExitCode::SUCCESS;
    }

    let descriptor = prng::descriptor(&args.algorithm).unwrap_or_else(|err| fatal(&format!("{err}")));
    if descriptor.supports_inference && observations.len() >= descriptor.state_words {
        match controller.infer_state() {
            Ok(report) if report.verified => {
                println!(
                    "{} recovered internal state for algorithm {}",
                    "success:".green().bold(),
                    args.algorithm
                );
                println!(
                    "state: [{}]",
                    report
                        .state
                        .iter()
                        .map(|word| word.to_string())
                        .collect::<Vec<_>>()
                        .join(", ")
                );
                return ExitCode::SUCCESS;
            }
            _ => {
                tracing::info!("state inference unavailable or unverified, falling back to brute force");
            }
        }
    }

    let (lower, upper) = if args.unix_time_range {
        unix_time_range()
    } else {
        (0u32, u32::MAX)
    };
    if lower >= upper {
        fatal(&format!("seed range [{lower}, {upper}) is empty"));
    }

    run_brute_force(&mut controller, lower, upper)
}
