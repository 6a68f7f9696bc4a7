//! Narrative Atlas CLI
//!
//! Usage:
//!   narrative-atlas [OPTIONS] <FILES>...
//!
//! Options:
//!   -f, --format <FORMAT>  Output format: summary or ron
//!   -p, --palette <FILE>   Color palette file (TOML format)
//!   -r, --routes           Include the label-level route graph
//!   -c, --check            Report unresolved jump targets and exit nonzero

use std::fs;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use narrative_atlas::{
    analyze_with_palette, collect_diagnostics, route_graph_with, Block, LayoutConfig, Palette,
};

#[derive(Parser)]
#[command(name = "narrative-atlas")]
#[command(about = "Static analysis and flow graphs for visual-novel scripts")]
struct Cli {
    /// Script files to analyze (one block per file)
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Summary)]
    format: Format,

    /// Color palette file (TOML format)
    #[arg(short, long)]
    palette: Option<PathBuf>,

    /// Include the label-level route graph in the output
    #[arg(short, long)]
    routes: bool,

    /// Report unresolved jump targets and exit nonzero if any exist
    #[arg(short, long)]
    check: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Summary,
    Ron,
}

fn main() {
    let cli = Cli::parse();

    let palette = match &cli.palette {
        Some(path) => match Palette::from_file(path) {
            Ok(p) => p,
            Err(e) => {
                eprintln!("Error loading palette '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => Palette::default(),
    };

    let mut blocks = Vec::new();
    for path in &cli.files {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        };
        let id = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        blocks.push(Block::new(id, content).with_file_path(path.display().to_string()));
    }

    let result = analyze_with_palette(&blocks, &palette);

    if cli.check {
        let diagnostics = collect_diagnostics(&blocks, &result);
        for diagnostic in &diagnostics {
            let block = blocks.iter().find(|b| b.id == diagnostic.block_id);
            if let Some(block) = block {
                let filename = block.file_path.as_deref().unwrap_or(&block.id);
                eprint!("{}", diagnostic.format(&block.content, filename));
            }
        }
        if !diagnostics.is_empty() {
            std::process::exit(1);
        }
        return;
    }

    match cli.format {
        Format::Summary => print_summary(&blocks, &result, cli.routes, &palette),
        Format::Ron => {
            let config = ron::ser::PrettyConfig::new();
            let rendered = if cli.routes {
                let graph = route_graph_with(&blocks, &result, &palette, &LayoutConfig::default());
                ron::ser::to_string_pretty(&(&result, &graph), config)
            } else {
                ron::ser::to_string_pretty(&result, config)
            };
            match rendered {
                Ok(text) => println!("{}", text),
                Err(e) => {
                    eprintln!("Error serializing analysis: {}", e);
                    std::process::exit(1);
                }
            }
        }
    }
}

fn print_summary(
    blocks: &[Block],
    result: &narrative_atlas::AnalysisResult,
    routes: bool,
    palette: &Palette,
) {
    println!("{} blocks analyzed", blocks.len());
    println!("  labels:     {}", result.labels.len());
    println!("  links:      {}", result.links.len());
    println!("  characters: {}", result.characters.len());
    println!("  variables:  {}", result.variables.len());
    println!("  screens:    {}", result.screens.len());
    println!("  images:     {}", result.defined_images.len());

    if !result.invalid_jumps.is_empty() {
        println!("unresolved jump targets:");
        for (block_id, targets) in &result.invalid_jumps {
            for target in targets {
                println!("  {}: {}", block_id, target);
            }
        }
    }

    if routes {
        let graph = route_graph_with(blocks, result, palette, &LayoutConfig::default());
        println!("route graph:");
        println!("  label nodes: {}", graph.label_nodes.len());
        println!("  route links: {}", graph.route_links.len());
        println!("  routes:      {}", graph.identified_routes.len());
        for route in &graph.identified_routes {
            println!(
                "  {} {} ({} links)",
                route.id,
                route.color,
                route.link_ids.len()
            );
        }
    }
}
