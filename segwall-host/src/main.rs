//! segwall - Minecraft: Pi Edition digit wall host
//!
//! Links GPIO output lines on a Raspberry Pi to blocks in a Minecraft: Pi
//! Edition world. Hitting a marker block toggles a bit: its line follows,
//! a torch marks it and the register's digit wall shows the new value.
//!
//! ```text
//!   world (TCP 4711) ◄──► McpiClient ──► Router ──► Register ──► PinBank ──► GPIO
//! ```

mod client;
mod config;
mod error;
mod pins;
mod session;

use std::fmt::Debug;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use log::{debug, info};
use segwall_core::{Level, PinDriver, PinId, Router};

use crate::client::{ClientOptions, McpiClient};
use crate::config::HostConfig;
use crate::error::{AppError, PinSetupError};
use crate::pins::{dry_run_pins, parse_pin_string, PinSpec};

#[derive(Parser)]
#[command(name = "segwall")]
#[command(version)]
#[command(about = "Drive GPIO lines from a Minecraft: Pi Edition digit wall", long_about = None)]
struct Cli {
    /// Verbose output
    ///
    /// Raises the default log level to `debug`. `RUST_LOG` still wins when
    /// set.
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the scene and poll for hits until Ctrl-C
    Run(RunArgs),

    /// Parse and validate a config, then print a summary
    CheckConfig {
        /// TOML config (default: bundled adder scene)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Toggle one line to check the wiring
    Blink(BlinkArgs),
}

#[derive(Args)]
struct RunArgs {
    /// TOML config (default: bundled adder scene)
    #[arg(long)]
    config: Option<PathBuf>,

    /// World service host (overrides the config)
    #[arg(long)]
    host: Option<String>,

    /// World service port (overrides the config)
    #[arg(long)]
    port: Option<u16>,

    /// Log line changes instead of driving GPIO
    #[arg(long, default_value_t = false)]
    dry_run: bool,
}

#[derive(Args)]
struct BlinkArgs {
    /// Line to toggle (gpioN, pinN, optionally prefixed with `!`)
    #[arg(long)]
    pin: String,

    /// Time spent in each state
    #[arg(long, default_value_t = 1000)]
    period_ms: u64,

    /// Number of on/off cycles (default: until Ctrl-C)
    #[arg(long)]
    count: Option<u32>,

    /// Log line changes instead of driving GPIO
    #[arg(long, default_value_t = false)]
    dry_run: bool,
}

fn main() -> Result<(), AppError> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    // Listen to Ctrl+C and stop the loop
    let stop = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&stop);
    ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst))?;

    match cli.command {
        Commands::Run(args) => run(args, &stop),
        Commands::CheckConfig { config } => check_config(config),
        Commands::Blink(args) => blink(args, &stop),
    }
}

fn run(args: RunArgs, stop: &AtomicBool) -> Result<(), AppError> {
    let mut config = HostConfig::load(args.config.as_deref())?;
    if let Some(host) = args.host {
        config.world.host = host;
    }
    if let Some(port) = args.port {
        config.world.port = port;
    }

    let resolved = config.resolve()?;
    info!(
        "{} register(s), {} line(s)",
        resolved.router.registers().len(),
        resolved.lines.len()
    );

    if args.dry_run {
        let pins = dry_run_pins(&resolved.lines)?;
        serve(&config, resolved.router, pins, stop)
    } else {
        let pins = gpio_pins(&resolved.lines)?;
        serve(&config, resolved.router, pins, stop)
    }
}

fn serve<P>(
    config: &HostConfig,
    mut router: Router,
    mut pins: P,
    stop: &AtomicBool,
) -> Result<(), AppError>
where
    P: PinDriver,
    P::Error: Debug,
{
    debug!("waiting {:?} before connecting", config.timing.startup_delay());
    thread::sleep(config.timing.startup_delay());

    let mut world = McpiClient::connect(ClientOptions::from(&config.world))?;

    if let Err(e) = session::setup_scene(
        &config.scene,
        &config.registers,
        &mut router,
        &mut world,
        &mut pins,
    ) {
        session::shutdown(&mut router, &mut pins);
        return Err(AppError::Setup(format!("{:?}", e)));
    }

    session::run_loop(
        &mut router,
        &mut world,
        &mut pins,
        config.timing.poll_interval(),
        stop,
    );
    session::shutdown(&mut router, &mut pins);
    Ok(())
}

fn check_config(path: Option<PathBuf>) -> Result<(), AppError> {
    let config = HostConfig::load(path.as_deref())?;
    let resolved = config.resolve()?;

    println!(
        "world {}:{} (timeout {} ms, {} retries)",
        config.world.host, config.world.port, config.world.timeout_ms, config.world.retries
    );
    for register in resolved.router.registers() {
        println!("register {} ({} bits)", register.name(), register.width());
        for (bit, marker) in register.markers().iter().enumerate() {
            println!(
                "  bit {} at ({}, {}, {}) -> gpio{}",
                bit, marker.pos.x, marker.pos.y, marker.pos.z, marker.line
            );
        }
        if let Some(wall) = register.wall() {
            let g = wall.geometry();
            let o = g.origin();
            println!(
                "  wall at ({}, {}, {}) {}x{}x{} {:?}",
                o.x,
                o.y,
                o.z,
                g.width(),
                g.height(),
                g.thickness(),
                wall.layout()
            );
        }
    }
    println!("ok");
    Ok(())
}

fn blink(args: BlinkArgs, stop: &AtomicBool) -> Result<(), AppError> {
    let spec = parse_pin_string(&args.pin).ok_or_else(|| AppError::InvalidPin(args.pin.clone()))?;
    let period = Duration::from_millis(args.period_ms);

    if args.dry_run {
        let mut pins = dry_run_pins(&[spec])?;
        toggle_line(&mut pins, spec.line, period, args.count, stop)
    } else {
        let mut pins = gpio_pins(&[spec])?;
        toggle_line(&mut pins, spec.line, period, args.count, stop)
    }
}

/// Alternate one line high and low
fn toggle_line<P>(
    pins: &mut P,
    line: PinId,
    period: Duration,
    count: Option<u32>,
    stop: &AtomicBool,
) -> Result<(), AppError>
where
    P: PinDriver,
    P::Error: Debug,
{
    let pin_err = |e: P::Error| AppError::Pins(PinSetupError::Driver(format!("{:?}", e)));

    pins.configure_output(line).map_err(pin_err)?;
    info!("blinking gpio{} every {} ms", line, period.as_millis());

    let mut cycles = 0;
    while !stop.load(Ordering::SeqCst) && count.map_or(true, |n| cycles < n) {
        pins.set_level(line, Level::High).map_err(pin_err)?;
        thread::sleep(period);
        pins.set_level(line, Level::Low).map_err(pin_err)?;
        thread::sleep(period);
        cycles += 1;
    }

    pins.reset_all().map_err(pin_err)?;
    info!("{} cycle(s)", cycles);
    Ok(())
}

#[cfg(feature = "rpi")]
fn gpio_pins(lines: &[PinSpec]) -> Result<pins::GpioPins, PinSetupError> {
    pins::gpio_pins(lines)
}

#[cfg(not(feature = "rpi"))]
fn gpio_pins(_lines: &[PinSpec]) -> Result<pins::DryRunPins, PinSetupError> {
    Err(PinSetupError::Unsupported)
}
