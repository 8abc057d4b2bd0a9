use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use graphview::config::ViewConfig;
use graphview::io::{JsonWriter, read_source};
use graphview::{GraphView, LayoutMode, ViewState};

/// Turn node/link graph JSON into chart renderer options.
#[derive(Parser)]
#[command(name = "graphview")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a renderer option for one layout
    Render {
        /// Graph source file ({"nodes": [...], "links": [...]})
        #[arg(short, long)]
        input: PathBuf,

        /// Output file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Layout to build (overrides the config)
        #[arg(short, long, value_enum)]
        mode: Option<LayoutMode>,

        /// Render as a small static preview
        #[arg(long)]
        compact: bool,

        /// Write single-line JSON instead of indented JSON
        #[arg(long)]
        minify: bool,

        /// Only show these categories (comma separated)
        #[arg(long, value_delimiter = ',')]
        tags: Vec<String>,

        /// Isolate this node and its direct neighbors
        #[arg(long)]
        neighbors_of: Option<String>,

        /// YAML view configuration
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Print node and category counts and the labelled nodes
    Stats {
        /// Graph source file
        #[arg(short, long)]
        input: PathBuf,
    },
}

/// Options for the render command, after flag parsing
struct RenderArgs {
    input: PathBuf,
    output: Option<PathBuf>,
    mode: Option<LayoutMode>,
    compact: bool,
    minify: bool,
    tags: Vec<String>,
    neighbors_of: Option<String>,
    config: Option<PathBuf>,
}

/// Merge the config file with command-line overrides
fn view_config(args: &RenderArgs) -> anyhow::Result<ViewConfig> {
    let mut config = match &args.config {
        Some(path) => ViewConfig::load(path)?,
        None => ViewConfig::default(),
    };
    if let Some(mode) = args.mode {
        config.mode = mode;
    }
    if args.compact {
        config.compact = true;
    }
    if !args.tags.is_empty() {
        config.tags = args.tags.clone();
    }
    if let Some(center) = &args.neighbors_of {
        config.neighbors_only = true;
        config.center = Some(center.clone());
    }
    Ok(config)
}

fn load_view(input: &Path, config: &ViewConfig) -> anyhow::Result<GraphView> {
    let source = read_source(input)?;
    let view = GraphView::with_config(&source, config);
    if let ViewState::InvalidFormat(reason) = view.view_state() {
        anyhow::bail!("invalid graph format in {}: {}", input.display(), reason);
    }
    Ok(view)
}

fn render(args: RenderArgs) -> anyhow::Result<()> {
    let config = view_config(&args)?;
    let view = load_view(&args.input, &config)?;
    let option = view.option();
    let writer = if args.minify {
        JsonWriter::compact()
    } else {
        JsonWriter::pretty()
    };

    match &args.output {
        Some(output) => {
            writer.write(&option, output)?;
            println!(
                "Wrote {} option ({}) to {}",
                view.mode(),
                view.summary(),
                output.display()
            );
        }
        None => println!("{}", writer.render(&option)?),
    }
    Ok(())
}

fn stats(input: &Path) -> anyhow::Result<()> {
    let view = load_view(input, &ViewConfig::default())?;
    let model = view.model();

    println!("{} ({} links)", view.summary(), model.links.len());
    if view.view_state() == ViewState::NoData {
        println!("no data");
        return Ok(());
    }

    let mut labelled: Vec<_> = model.nodes.iter().filter(|n| n.label_visible).collect();
    labelled.sort_by(|a, b| b.importance_score.total_cmp(&a.importance_score));
    for node in labelled {
        let category = model.category_of(node).unwrap_or("default");
        println!("  {} [{}] ({})", node.name, category, node.importance_score);
    }

    if !model.duplicate_ids.is_empty() {
        println!("duplicate ids: {}", model.duplicate_ids.join(", "));
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            input,
            output,
            mode,
            compact,
            minify,
            tags,
            neighbors_of,
            config,
        } => render(RenderArgs {
            input,
            output,
            mode,
            compact,
            minify,
            tags,
            neighbors_of,
            config,
        })?,
        Commands::Stats { input } => stats(&input)?,
    }

    Ok(())
}
