#![cfg_attr(
    all(not(debug_assertions), target_os = "windows"),
    windows_subsystem = "windows"
)]

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use json_shelf::app::{configure_egui_fonts, JsonShelfApp};
use json_shelf::loader::{load, ResourceOrigin};
use json_shelf::registry::{default_registry, load_registry, FileDescriptor};
use json_shelf::render::{render_html, render_plain, GridStats};
use json_shelf::store::ViewerStore;

#[derive(Parser, Debug)]
#[command(name = "jsonshelf")]
#[command(about = "Browse, search and inspect a fixed set of JSON files")]
struct Args {
    /// Initial search text (CLI mode only).
    #[arg(default_value = "")]
    query: String,
    /// Directory or http(s) URL the registry names are resolved against.
    #[arg(long, default_value = ".")]
    base: String,
    /// JSON array of {name, description, icon} entries.
    #[arg(long)]
    registry: Option<PathBuf>,
    #[arg(long, default_value_t = false)]
    cli: bool,
    /// Write the rendered card grid as a static HTML page.
    #[arg(long)]
    export_html: Option<PathBuf>,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn descriptors(args: &Args) -> Result<Vec<FileDescriptor>> {
    match &args.registry {
        Some(path) => load_registry(path),
        None => Ok(default_registry()),
    }
}

fn run_cli(args: &Args) -> Result<()> {
    let descriptors = descriptors(args)?;
    let origin = ResourceOrigin::parse(&args.base);

    let mut store = ViewerStore::new();
    store.replace_working_set(load(&descriptors, &origin));
    store.set_query(args.query.as_str());

    let view = store.grid();
    let stats = GridStats {
        files: store.file_count(),
        records: store.total_records(),
    };
    if let Some(path) = &args.export_html {
        fs::write(path, render_html(&view, stats))
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), "exported HTML grid");
    }
    if args.cli {
        print!("{}", render_plain(&view, stats));
    }
    Ok(())
}

fn run_gui(args: &Args) -> Result<()> {
    let descriptors = descriptors(args)?;
    let origin = ResourceOrigin::parse(&args.base);
    let mut native_options = eframe::NativeOptions::default();
    native_options.viewport =
        eframe::egui::ViewportBuilder::default().with_inner_size(eframe::egui::vec2(1200.0, 800.0));

    eframe::run_native(
        "JSON Shelf",
        native_options,
        Box::new(move |cc| {
            configure_egui_fonts(&cc.egui_ctx);
            Ok(Box::new(JsonShelfApp::new(descriptors, origin)))
        }),
    )
    .map_err(|e| anyhow::anyhow!(e.to_string()))?;
    Ok(())
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();
    if args.cli || args.export_html.is_some() {
        run_cli(&args)
    } else {
        run_gui(&args)
    }
}
