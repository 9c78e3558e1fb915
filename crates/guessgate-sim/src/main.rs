//! Guessgate simulation binary.
//!
//! Types a script of keystrokes into a simulated guessing form and logs every
//! platform operation the gate performs, in virtual time.
//!
//! # Usage
//!
//! ```bash
//! # Three letters win; the next round starts 3s later
//! guessgate-sim --letters abc
//!
//! # Lose after two misses, keeping the input visible between rounds
//! guessgate-sim --letters 1a2 --miss-limit 2 --keep-visible
//! ```

use std::time::Duration;

use clap::Parser;
use guessgate_app::{GateConfig, RoundConfig, Runtime};
use guessgate_harness::{
    LetterCounter,
    scenario::{FORM, INPUT, RESULTS, guessing_controller, guessing_form},
};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Guessgate simulation
#[derive(Parser, Debug)]
#[command(name = "guessgate-sim")]
#[command(about = "Drive a guessing form with scripted keystrokes")]
#[command(version)]
struct Args {
    /// Keystrokes to type, one event per character
    #[arg(short, long, default_value = "abc")]
    letters: String,

    /// Virtual milliseconds between keystrokes
    #[arg(short, long, default_value = "250")]
    interval_ms: u64,

    /// Pause after a win before the next round
    #[arg(long, default_value = "3000")]
    win_delay_ms: u64,

    /// Pause after a loss before the next round
    #[arg(long, default_value = "5000")]
    loss_delay_ms: u64,

    /// Letters needed to win a round
    #[arg(short, long, default_value = "3")]
    target: u32,

    /// Non-letters that lose a round (never lose if unset)
    #[arg(long)]
    miss_limit: Option<u32>,

    /// Event kind the gate listens for
    #[arg(long, default_value = "input")]
    event_kind: String,

    /// Keep the input visible while suppressed
    #[arg(long)]
    keep_visible: bool,

    /// Do not move focus back to the input when a round resumes
    #[arg(long)]
    no_refocus: bool,

    /// Stop after this many virtual milliseconds, even mid-round
    #[arg(long)]
    quit_after_ms: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn round_config(&self) -> RoundConfig {
        let gate = GateConfig::new(INPUT, FORM)
            .with_event_kind(self.event_kind.as_str())
            .with_hide_on_disable(!self.keep_visible)
            .with_refocus_on_enable(!self.no_refocus);
        RoundConfig::new(gate, RESULTS).with_delays_ms(self.win_delay_ms, self.loss_delay_ms)
    }

    fn counter(&self) -> LetterCounter {
        let counter = LetterCounter::new(self.target);
        match self.miss_limit {
            Some(limit) => counter.with_miss_limit(limit),
            None => counter,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    tracing::info!("Guessgate simulation starting");
    tracing::info!("Typing {:?} every {}ms", args.letters, args.interval_ms);

    let mut platform = guessing_form();
    platform.type_text(INPUT, &args.letters, Duration::from_millis(args.interval_ms));
    if let Some(ms) = args.quit_after_ms {
        platform.quit_at(Duration::from_millis(ms));
    }

    let controller = guessing_controller(args.round_config(), args.counter());
    let mut runtime = Runtime::new(platform, controller);

    let summary = runtime.run()?;

    for line in runtime.driver().trace() {
        tracing::info!("{}", line);
    }
    tracing::info!(
        "{} delivered, {} dropped, {} rounds ended in {}ms (virtual)",
        summary.delivered,
        summary.dropped,
        summary.round_ends,
        summary.elapsed.as_millis()
    );
    tracing::info!("final results text {:?}", runtime.driver().text(RESULTS));

    Ok(())
}
