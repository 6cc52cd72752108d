//! CLI tool to plan a warehouse pick route.
//!
//! Plans locally by default; with `--server` the route server does the work.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wms_cli::{format_grid, format_summary, load_layout, RouteClient};
use wms_core::{PlannerConfig, RoutePlanner, VisitOrder};

/// Plan a pick route through the warehouse
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Rack location codes in picking order (e.g. A3 C12 B7)
    #[arg(required = true)]
    locations: Vec<String>,

    /// JSON warehouse layout (default: reference layout)
    #[arg(long)]
    layout: Option<PathBuf>,

    /// Visit order: as_given or nearest_neighbor
    #[arg(long, default_value = "as_given")]
    order: VisitOrder,

    /// Route server URL; plan remotely instead of locally
    #[arg(long)]
    server: Option<String>,

    /// Print the grid with the route drawn on it
    #[arg(long)]
    grid: bool,

    /// Print the route as JSON instead of a summary
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("wms_core=warn".parse()?),
        )
        .init();

    let args = Args::parse();
    let layout = load_layout(args.layout.as_deref())?;

    let route = match &args.server {
        Some(url) => RouteClient::new(url.as_str()).plan(&args.locations, Some(args.order))?,
        None => {
            let planner = RoutePlanner::with_config(
                layout.clone(),
                PlannerConfig {
                    visit_order: args.order,
                },
            )?;
            planner.plan(args.locations.as_slice())?
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&route)?);
    } else {
        print!("{}", format_summary(&route));
    }

    if args.grid {
        let grid = RoutePlanner::new(layout)?.grid();
        println!();
        print!("{}", format_grid(&grid, &route));
    }

    Ok(())
}
