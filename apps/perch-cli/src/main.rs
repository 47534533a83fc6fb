use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use glam::{Quat, Vec3};
use perch_common::{ModelProperties, SitPoint};
use perch_kernel::{Host, SimHost};
use perch_motion::AvatarState;
use perch_session::{SessionConfig, SitSession};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "perch-cli",
    about = "Seat discovery and sit/stand transitions on a simulated host"
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and defaults
    Info,
    /// Print the effective configuration as JSON
    Config {
        /// JSON config file to load instead of the defaults
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Replay a scripted scenario
    Demo {
        #[arg(value_enum)]
        scenario: Scenario,
        /// JSON config file to load instead of the defaults
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Time advanced per tick
        #[arg(long, default_value = "0.25")]
        dt: f32,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Scenario {
    /// Walk toward a chair until its indicator appears
    Approach,
    /// Sit down and stand up with the toggle key
    Toggle,
    /// Click a seat indicator and watch the avatar walk, turn and sit
    Click,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            let config = SessionConfig::default();
            println!("perch-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("search radius: {}", config.registry.search_radius);
            println!("transition duration: {}", config.motion.duration);
            println!("toggle key: {:?}", config.input.toggle_key);
        }
        Commands::Config { config } => {
            println!("{}", load_config(config)?.to_json_pretty()?);
        }
        Commands::Demo {
            scenario,
            config,
            dt,
        } => {
            let config = load_config(config)?;
            check_dt(dt, config.motion.duration)?;
            let _span = tracing::info_span!("demo", ?scenario, dt).entered();
            match scenario {
                Scenario::Approach => run_approach(config, dt)?,
                Scenario::Toggle => run_toggle(config, dt)?,
                Scenario::Click => run_click(config, dt)?,
            }
        }
    }

    Ok(())
}

fn load_config(path: Option<PathBuf>) -> anyhow::Result<SessionConfig> {
    Ok(match path {
        Some(path) => SessionConfig::load(&path)?,
        None => SessionConfig::default(),
    })
}

/// Reject ticks too small to advance a transition's elapsed time.
fn check_dt(dt: f32, duration: f32) -> anyhow::Result<()> {
    anyhow::ensure!(
        dt.is_finite() && dt >= duration * 1e-6,
        "--dt must be at least {} for a transition of {duration}, got {dt}",
        duration * 1e-6
    );
    Ok(())
}

/// Enough ticks for the longest chain: walk, turn, then sit.
fn tick_budget(duration: f32, dt: f32) -> u64 {
    (3.0 * duration / dt).ceil() as u64 + 1
}

fn chair(position: Vec3) -> ModelProperties {
    ModelProperties {
        position,
        rotation: Quat::from_rotation_y(std::f32::consts::PI),
        radius: 1.0,
        sitting_points: vec![SitPoint::new("seat", Vec3::new(0.0, 0.5, 0.0), Quat::IDENTITY)],
    }
}

fn print_status(label: &str, host: &SimHost, session: &SitSession) {
    let p = host.avatar_position();
    println!(
        "{label:>8} state={:?} sitting={} pos=({:.2}, {:.2}, {:.2}) indicators={}",
        session.state(),
        session.is_sitting(),
        p.x,
        p.y,
        p.z,
        session.registry().indicator_count()
    );
}

fn is_idle(session: &SitSession) -> bool {
    matches!(
        session.state(),
        AvatarState::IdleSitting | AvatarState::IdleStanding
    )
}

/// Tick until the avatar is idle, printing every state change.
fn tick_until_idle(
    host: &mut SimHost,
    session: &mut SitSession,
    dt: f32,
    max_ticks: u64,
) -> anyhow::Result<()> {
    let mut time = 0.0;
    let mut last = session.state();
    for _ in 0..max_ticks {
        if is_idle(session) {
            return Ok(());
        }
        session.on_tick(host, dt);
        time += dt;
        if session.state() != last {
            last = session.state();
            print_status(&format!("t={time:.2}"), host, session);
        }
    }
    anyhow::ensure!(
        is_idle(session),
        "still {:?} after {max_ticks} ticks of {dt}",
        session.state()
    );
    Ok(())
}

fn run_approach(config: SessionConfig, dt: f32) -> anyhow::Result<()> {
    let mut host = SimHost::new();
    host.spawn_model(chair(Vec3::new(5.0, 0.0, 5.0)));
    let mut session = SitSession::start(&mut host, config)?;
    tracing::info!("approach: chair at (5, 0, 5)");

    for step in 0..=6 {
        let d = step as f32 * 0.5;
        host.set_avatar_position(Vec3::new(d, 0.0, d));
        session.on_tick(&mut host, dt);
        print_status(&format!("step {step}"), &host, &session);
    }
    session.shutdown(&mut host);
    Ok(())
}

fn run_toggle(config: SessionConfig, dt: f32) -> anyhow::Result<()> {
    let mut host = SimHost::new();
    let mut session = SitSession::start(&mut host, config.clone())?;
    let key = config.input.toggle_key.as_str();
    let budget = tick_budget(config.motion.duration, dt);
    tracing::info!(key, "toggle: pressing the toggle key twice");

    print_status("start", &host, &session);
    session.on_key_press(&mut host, key);
    print_status("press", &host, &session);
    tick_until_idle(&mut host, &mut session, dt, budget)?;
    session.on_key_press(&mut host, key);
    print_status("press", &host, &session);
    tick_until_idle(&mut host, &mut session, dt, budget)?;
    session.shutdown(&mut host);
    Ok(())
}

fn run_click(config: SessionConfig, dt: f32) -> anyhow::Result<()> {
    let budget = tick_budget(config.motion.duration, dt);
    let mut host = SimHost::new();
    host.spawn_model(chair(Vec3::new(0.0, 0.0, -3.0)));
    let mut session = SitSession::start(&mut host, config)?;
    session.on_tick(&mut host, 0.0);

    let Some(seat) = session.registry().indicators().next().map(|i| i.position) else {
        anyhow::bail!("no seat indicator in range");
    };
    host.camera_mut().position = Vec3::new(0.0, 1.5, 0.0);
    host.camera_mut().look_at(seat);
    let center = host.viewport_dimensions() / 2.0;
    tracing::info!(?seat, "click: clicking the seat indicator at screen center");

    session.on_pointer_press(&mut host, center);
    print_status("click", &host, &session);
    anyhow::ensure!(
        session.state() == AvatarState::GoingToSeat,
        "click did not hit the seat"
    );
    tick_until_idle(&mut host, &mut session, dt, budget)?;

    let o = host.avatar_orientation();
    println!(
        "Final orientation: ({:.3}, {:.3}, {:.3}, {:.3})",
        o.x, o.y, o.z, o.w
    );
    session.shutdown(&mut host);
    Ok(())
}
