use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use glam::{Vec2, Vec3};
use seascape_lod::{QuadTree, QuadTreeConfig};
use seascape_render::{DebugTextRenderer, RenderView, Renderer};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "seascape-cli", about = "CLI tool for seascape quadtree operations")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Quadtree configuration file (JSON); defaults are used when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version, crate info and the active configuration
    Info,
    /// Build the tree for one camera and print a summary
    Build {
        /// Camera position as x,y,z
        #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true, default_value = "0,30,0")]
        eye: Vec3,
        /// Look-at point as x,y,z
        #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true, default_value = "200,0,0")]
        target: Vec3,
        /// Vertical field of view in degrees
        #[arg(long, default_value = "60")]
        fov: f32,
        /// List every patch with its stitch pattern
        #[arg(short, long)]
        list: bool,
    },
    /// Find the leaf containing a ground point
    Leaf {
        #[arg(long, allow_negative_numbers = true)]
        x: f32,
        #[arg(long, allow_negative_numbers = true)]
        z: f32,
        #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true, default_value = "0,30,0")]
        eye: Vec3,
        #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true, default_value = "200,0,0")]
        target: Vec3,
    },
    /// Write the default configuration to a file
    InitConfig {
        /// Output path
        path: PathBuf,
    },
}

fn parse_vec3(s: &str) -> Result<Vec3, String> {
    let parts = s
        .split(',')
        .map(|p| p.trim().parse::<f32>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("invalid number in '{s}': {e}"))?;
    match parts.as_slice() {
        [x, y, z] => Ok(Vec3::new(*x, *y, *z)),
        _ => Err(format!("expected x,y,z but got '{s}'")),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<QuadTreeConfig> {
    match path {
        Some(path) => QuadTreeConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display())),
        None => Ok(QuadTreeConfig::default()),
    }
}

fn build_tree(config: QuadTreeConfig, view: &RenderView) -> QuadTree {
    let mut tree = QuadTree::new(config);
    view.rebuild(&mut tree);
    tracing::info!(stats = %tree.stats(), "tree built");
    tree
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            let config = load_config(cli.config.as_deref())?;
            println!("seascape-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", seascape_common::crate_info());
            println!("lod: {}", seascape_lod::crate_info());
            println!("render: {}", seascape_render::crate_info());
            println!(
                "domain: origin=({}, {}) size={} lods={} mesh={} min_patch={} max_coverage={}",
                config.origin[0],
                config.origin[1],
                config.size,
                config.lod_count,
                config.mesh_resolution,
                config.min_patch_length,
                config.max_coverage
            );
        }
        Commands::Build {
            eye,
            target,
            fov,
            list,
        } => {
            let config = load_config(cli.config.as_deref())?;
            let view = RenderView {
                fov_degrees: fov,
                ..RenderView::new(eye, target)
            };
            let tree = build_tree(config, &view);

            if list {
                let renderer = DebugTextRenderer::new(&tree);
                print!("{}", renderer.render(&tree, &view));
            } else {
                println!("{}", tree.stats());
            }
        }
        Commands::Leaf { x, z, eye, target } => {
            let config = load_config(cli.config.as_deref())?;
            let tree = build_tree(config, &RenderView::new(eye, target));

            let point = Vec2::new(x, z);
            match tree.find_leaf(point).and_then(|i| tree.node(i).map(|n| (i, n))) {
                Some((index, leaf)) => {
                    println!(
                        "leaf #{index}: start=({}, {}) length={} lod={} stitch=[{}]",
                        leaf.start.x,
                        leaf.start.y,
                        leaf.length,
                        leaf.lod,
                        tree.find_subset_pattern(leaf)
                    );
                }
                None => println!("no visible leaf contains ({x}, {z})"),
            }
        }
        Commands::InitConfig { path } => {
            let config = load_config(cli.config.as_deref())?;
            config
                .save(&path)
                .with_context(|| format!("writing config to {}", path.display()))?;
            println!("wrote {}", path.display());
        }
    }

    Ok(())
}
