// SPDX-License-Identifier: MIT
//
// danmaku-overlay — command-line front end for the overlay toolkit.
//
// Wires the crates together:
//
//   dm-color   → parse comment colors, light/dark, outline choice
//   dm-comment → comment documents, sources, per-engine styles
//   dm-player  → player state machine (messages in, effects out)
//
// Every subcommand that produces comments runs a short player session:
// the state is configured from settings + flags, one message is
// dispatched (an upload or a fetch request), and the plan the renderer
// ends up with is printed as JSON.
//
//   classify <COLOR>...   light/dark per color
//   style <FILE>          style an uploaded comment file
//   fetch <ID>            fetch a remote comment set and style it

mod config;
mod host;

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use dm_color::ColorPolicy;
use dm_comment::Engine;
use dm_comment::source;
use dm_player::{Msg, PlayerState, RenderPlan, dispatch};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Settings;
use crate::host::CliHost;

// ─── Command line ───────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "danmaku-overlay", version, about)]
struct Cli {
    /// Settings file (default: ./danmaku-overlay.toml if present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at info level.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log at debug level.
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify colors as light or dark.
    Classify {
        /// Treat unparsable colors as dark instead of failing.
        #[arg(long)]
        lenient: bool,

        #[arg(required = true)]
        colors: Vec<String>,
    },

    /// Style a local comment file and print the render plan.
    Style {
        /// JSON file: an array of comments or a `{ success, items }` envelope.
        file: PathBuf,

        #[command(flatten)]
        render: RenderArgs,
    },

    /// Fetch a remote comment set and print the render plan.
    Fetch {
        /// Comment set id.
        id: String,

        /// Base URL, overriding the configured endpoint.
        #[arg(long)]
        endpoint: Option<String>,

        #[command(flatten)]
        render: RenderArgs,
    },
}

#[derive(Args, Debug, Default)]
struct RenderArgs {
    /// Rendering engine: dom or canvas.
    #[arg(long)]
    engine: Option<Engine>,

    /// Video height in pixels, for font sizing.
    #[arg(long)]
    video_height: Option<u32>,

    /// Seconds added to every comment time (may be negative).
    #[arg(long, allow_hyphen_values = true)]
    delay: Option<f64>,

    /// Treat unparsable colors as dark instead of failing.
    #[arg(long)]
    lenient: bool,

    /// Write the plan here instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl RenderArgs {
    /// Layer these flags over `settings`.
    fn apply(&self, settings: &mut Settings) {
        if let Some(engine) = self.engine {
            settings.engine = engine;
        }
        if let Some(height) = self.video_height {
            settings.video_height = height;
        }
        if let Some(delay) = self.delay {
            settings.delay = delay;
        }
        if self.lenient {
            settings.lenient_colors = true;
        }
    }
}

// ─── Logging ────────────────────────────────────────────────────────────────

/// Logs go to stderr so stdout stays pure JSON. `RUST_LOG` wins over flags.
fn init_tracing(cli: &Cli) {
    let level = if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

// ─── Subcommands ────────────────────────────────────────────────────────────

/// Print `<color>\t<tone>` per color. Fails if any color was rejected.
fn classify(colors: &[String], policy: ColorPolicy, out: &mut impl Write) -> anyhow::Result<()> {
    let mut failed = 0usize;
    for color in colors {
        match policy.classify(color) {
            Ok(tone) => writeln!(out, "{color}\t{tone}")?,
            Err(err) => {
                tracing::error!("{err}");
                failed += 1;
            }
        }
    }
    if failed > 0 {
        bail!("{failed} of {} colors could not be parsed", colors.len());
    }
    Ok(())
}

/// A player configured from `settings`, with no comments or video yet.
fn session(settings: &Settings) -> PlayerState {
    let mut state = PlayerState::new(settings.player_options());
    state.engine = settings.engine;
    state.video_height = settings.video_height;
    state.delay = settings.delay;
    state
}

/// Dispatch `msgs` into a fresh session and return the live plan.
fn run_session(
    settings: &Settings,
    msgs: Vec<Msg>,
    host: &mut CliHost,
) -> anyhow::Result<RenderPlan> {
    let mut state = session(settings);
    for msg in msgs {
        dispatch(&mut state, msg, host);
    }

    match host.plan.take() {
        Some(plan) => Ok(plan),
        None => match host.notices.last() {
            Some(notice) => bail!("{notice}"),
            None => bail!("no comments were loaded"),
        },
    }
}

fn write_plan(plan: &RenderPlan, output: Option<&PathBuf>) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(plan)?;
    match output {
        Some(path) => fs::write(path, json + "\n")
            .with_context(|| format!("writing plan to {}", path.display()))?,
        None => writeln!(io::stdout().lock(), "{json}")?,
    }
    tracing::info!(comments = plan.comments.len(), engine = %plan.engine, "plan written");
    Ok(())
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut settings = Settings::resolve(cli.config.as_deref())?;

    match cli.command {
        Command::Classify { lenient, colors } => {
            let policy = if lenient {
                ColorPolicy::Lenient
            } else {
                settings.policy()
            };
            classify(&colors, policy, &mut io::stdout().lock())
        }
        Command::Style { file, render } => {
            render.apply(&mut settings);
            let records = source::read_upload(&file)?;
            let plan = run_session(&settings, vec![Msg::CommentsUploaded(records)], &mut CliHost::new())?;
            write_plan(&plan, render.output.as_ref())
        }
        Command::Fetch {
            id,
            endpoint,
            render,
        } => {
            render.apply(&mut settings);
            if let Some(endpoint) = endpoint {
                settings.endpoint = endpoint;
            }
            let msgs = vec![Msg::SetDanmakuId(id), Msg::FetchRequested];
            let plan = run_session(&settings, msgs, &mut CliHost::new())?;
            write_plan(&plan, render.output.as_ref())
        }
    }
}

// ─── Entry point ────────────────────────────────────────────────────────────

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);
    tracing::info!("danmaku-overlay v{}", env!("CARGO_PKG_VERSION"));

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("danmaku-overlay: {e:#}");
            ExitCode::FAILURE
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
