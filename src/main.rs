use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

use uci_wireless::{
    categorize_value,
    config::{self, Config},
    filter, InterfaceOrder,
};

#[derive(Parser)]
#[command(name = "uci-wireless")]
#[command(about = "Group OpenWrt wireless interfaces by radio mode")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print interfaces grouped by hwmode as JSON
    Categorize {
        /// UCI wireless JSON dump (stdin when omitted or "-")
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Interface ordering (defaults to the saved setting)
        #[arg(short, long, value_enum)]
        order: Option<InterfaceOrder>,

        /// Print JSON on a single line
        #[arg(long)]
        compact: bool,
    },

    /// Render a template that uses the categorize_wireless filter
    Render {
        /// Template name to render
        #[arg(short, long)]
        name: String,

        /// Template glob (defaults to template_glob from the config file)
        #[arg(short, long)]
        templates: Option<String>,

        /// UCI wireless JSON dump (stdin when omitted or "-")
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Write output here instead of stdout
        #[arg(short = 'O', long)]
        output: Option<PathBuf>,

        /// Interface ordering (defaults to the saved setting)
        #[arg(short, long, value_enum)]
        order: Option<InterfaceOrder>,
    },

    /// Print a per-mode summary of interfaces
    Summary {
        /// UCI wireless JSON dump (stdin when omitted or "-")
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Interface ordering (defaults to the saved setting)
        #[arg(short, long, value_enum)]
        order: Option<InterfaceOrder>,
    },

    /// Show saved configuration
    ShowConfig,

    /// Save the default interface ordering
    SetOrder {
        #[arg(value_enum)]
        order: InterfaceOrder,
    },
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Categorize {
            input,
            order,
            compact,
        } => cmd_categorize(input.as_deref(), order, compact),
        Commands::Render {
            name,
            templates,
            input,
            output,
            order,
        } => cmd_render(
            &name,
            templates.as_deref(),
            input.as_deref(),
            output.as_deref(),
            order,
        ),
        Commands::Summary { input, order } => cmd_summary(input.as_deref(), order),
        Commands::ShowConfig => cmd_show_config(),
        Commands::SetOrder { order } => cmd_set_order(order),
    }
}

/// Logs go to stderr so JSON on stdout stays clean. `RUST_LOG` overrides the level.
fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn read_input(path: Option<&Path>) -> Result<Value> {
    let content = match path {
        Some(p) if p != Path::new("-") => fs::read_to_string(p)
            .with_context(|| format!("Failed to read input file: {}", p.display()))?,
        _ => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read input from stdin")?;
            buf
        }
    };

    serde_json::from_str(&content).context("Input is not valid JSON")
}

fn resolve_order(order: Option<InterfaceOrder>, cfg: &Config) -> InterfaceOrder {
    order.unwrap_or(cfg.order)
}

fn cmd_categorize(input: Option<&Path>, order: Option<InterfaceOrder>, compact: bool) -> Result<()> {
    let cfg = Config::load().unwrap_or_default();
    let order = resolve_order(order, &cfg);
    let wireless = read_input(input)?;

    let groups = categorize_value(&wireless, order)
        .context("categorize_wireless plugin error")?;
    info!(interfaces = groups.all().len(), %order, "categorized");

    let value = groups.into_value()?;
    let text = if compact {
        serde_json::to_string(&value)?
    } else {
        serde_json::to_string_pretty(&value)?
    };
    println!("{}", text);

    Ok(())
}

fn cmd_render(
    name: &str,
    templates: Option<&str>,
    input: Option<&Path>,
    output: Option<&Path>,
    order: Option<InterfaceOrder>,
) -> Result<()> {
    let cfg = Config::load().unwrap_or_default();
    let order = resolve_order(order, &cfg);

    let glob = match templates.or(cfg.template_glob.as_deref()) {
        Some(g) => g.to_string(),
        None => bail!("No template glob given and none saved in config"),
    };

    let tera = filter::load_templates(&glob)?;
    let wireless = read_input(input)?;
    let rendered = filter::render(&tera, name, &wireless, order)?;

    match output {
        Some(path) => {
            fs::write(path, rendered)
                .with_context(|| format!("Failed to write output file: {}", path.display()))?;
            println!("Rendered {} to {}", name, path.display());
        }
        None => print!("{}", rendered),
    }

    Ok(())
}

fn cmd_summary(input: Option<&Path>, order: Option<InterfaceOrder>) -> Result<()> {
    let cfg = Config::load().unwrap_or_default();
    let order = resolve_order(order, &cfg);
    let wireless = read_input(input)?;

    print!("{}", filter::render_summary(&wireless, order)?);

    Ok(())
}

fn cmd_show_config() -> Result<()> {
    let path = config::config_path()?;
    println!("Config file: {}", path.display());
    println!();

    let cfg = Config::load()?;
    println!("{:<16} {}", "order", cfg.order);
    println!(
        "{:<16} {}",
        "template_glob",
        cfg.template_glob.as_deref().unwrap_or("-")
    );

    Ok(())
}

fn cmd_set_order(order: InterfaceOrder) -> Result<()> {
    let mut cfg = Config::load().unwrap_or_default();
    cfg.order = order;
    cfg.save()?;

    let path = config::config_path()?;
    println!("Saved order '{}' to {}", order, path.display());

    Ok(())
}
