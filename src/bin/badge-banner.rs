use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "badge-banner", version, about)]
struct Cli {
    #[command(subcommand)]
    cmd: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the scrolling GIF banner (the default).
    Render(RenderArgs),
    /// Fetch and compose the badges, then write the static strip as a PNG.
    Strip(StripArgs),
    /// Print the default configuration as JSON.
    Config,
}

#[derive(Parser, Debug, Default)]
struct RenderArgs {
    /// JSON config file; missing fields use the built-in defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output GIF path (overrides `output_path` from the config).
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct StripArgs {
    /// JSON config file; missing fields use the built-in defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match cli.cmd.unwrap_or(Command::Render(RenderArgs::default())) {
        Command::Render(args) => cmd_render(args),
        Command::Strip(args) => cmd_strip(args),
        Command::Config => cmd_config(),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<badge_banner::BannerConfig> {
    let cfg = match path {
        Some(p) => badge_banner::BannerConfig::from_json_path(p)?,
        None => badge_banner::BannerConfig::default(),
    };
    cfg.validate().context("invalid configuration")?;
    Ok(cfg)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut cfg = load_config(args.config.as_deref())?;
    if let Some(out) = args.out {
        cfg = cfg.with_output_path(out);
    }

    let fetcher = badge_banner::HttpFetcher::new()?;
    let stats = badge_banner::render_banner(&cfg, &fetcher)?;

    println!(
        "wrote {} ({} frames @ {}fps, {}/{} badges)",
        stats.out_path.display(),
        stats.frames,
        stats.fps,
        stats.badges_fetched,
        stats.badges_requested
    );
    Ok(())
}

fn cmd_strip(args: StripArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.config.as_deref())?;
    let fetcher = badge_banner::HttpFetcher::new()?;
    let (strip, fetched) = badge_banner::fetch_and_compose(&cfg, &fetcher)?;

    badge_banner::ensure_parent_dir(&args.out)?;
    strip.save_png(&args.out)?;

    println!(
        "wrote {} ({}x{}, {}/{} badges)",
        args.out.display(),
        strip.width,
        strip.height,
        fetched,
        cfg.badge_urls.len()
    );
    Ok(())
}

fn cmd_config() -> anyhow::Result<()> {
    let cfg = badge_banner::BannerConfig::default();
    let json = serde_json::to_string_pretty(&cfg).context("serialize default config")?;
    println!("{json}");
    Ok(())
}
