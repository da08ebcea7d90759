// Native binary for blockrain - Terminal UI mode

use anyhow::{Context, Result};
use rand::{rngs::StdRng, SeedableRng};
use std::fs::File;

use blockrain::{
    config::{load, Config},
    engine::{Engine, SystemClock},
    source_rpc::ZmqRpcConnector,
    source_sub::ZmqSubscription,
    terminal::TerminalSession,
    ui::TuiScreen,
    wake::WakeChannel,
};

fn main() -> Result<()> {
    // Load .env file if it exists (safe to ignore if not found)
    let _ = dotenvy::dotenv();

    let cfg = load().context("Failed to load configuration")?;
    init_logging(&cfg)?;
    cfg.print_summary();

    let wake = WakeChannel::install()
        .context("Failed to install signal handlers")?
        .watch_terminal_input();

    let ctx = zmq::Context::new();
    let sub = ZmqSubscription::connect(&ctx, &cfg.pub_address, wake.clone())
        .with_context(|| format!("Failed to connect to pub socket {}", cfg.pub_address))?;
    let connector = ZmqRpcConnector::new(ctx, cfg.rpc_address.clone(), wake, cfg.rpc_timeout);

    let scheme = cfg.color_scheme.detect();
    let palette = scheme.palette();
    log::info!("color scheme {} resolved to {scheme}", cfg.color_scheme);

    // terminal
    let session = TerminalSession::enter().context("Failed to initialize terminal")?;
    let screen = TuiScreen::new(session.stdout(), palette).context("Failed to create screen")?;

    let result = Engine::new(
        sub,
        connector,
        screen,
        SystemClock,
        palette.falling_styles(),
        StdRng::from_entropy(),
    )
    .and_then(|mut engine| engine.run());

    // restore the terminal before anything is printed
    drop(session);
    result.context("blockrain stopped")?;
    log::info!("clean shutdown");
    Ok(())
}

/// Logs go to a file only; stderr belongs to the full-screen display.
fn init_logging(cfg: &Config) -> Result<()> {
    let Some(path) = &cfg.log_file else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}
