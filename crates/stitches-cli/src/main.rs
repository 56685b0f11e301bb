use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use globset::{Glob, GlobSetBuilder};
use image::{ImageReader, RgbaImage};
use serde::{Deserialize, Serialize};
use stitches_core::compositing::{png_data_uri, render_sheet};
use stitches_core::{
    LayoutConfig, LayoutKind, SpriteInput, StylesheetOptions, compare_layouts,
    pack_layout, pack_layout_with_progress, to_css, to_json,
};
use tracing::{error, info, warn};
use walkdir::WalkDir;

#[derive(Parser, Debug)]
#[command(
    name = "stitches",
    about = "Pack images into a sprite sheet with a matching stylesheet",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Show progress bars (disable with --progress false or --quiet)
    #[arg(long, default_value_t = true, action=ArgAction::Set, global=true, help_heading = "Logging/UX")]
    progress: bool,
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action=ArgAction::Count, global=true, help_heading = "Logging/UX")]
    verbose: u8,
    /// Quiet mode (overrides verbose)
    #[arg(
        short,
        long,
        default_value_t = false,
        global = true,
        help_heading = "Logging/UX"
    )]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Pack a folder of images into a sprite sheet (PNG + CSS + JSON)
    Pack(PackArgs),
    /// Layout-only: read sprite sizes from a JSON file and print placements
    Layout(LayoutArgs),
    /// Run every layout on the same inputs and compare canvas sizes
    Compare(CompareArgs),
}

#[derive(Parser, Debug, Clone)]
struct LayoutOpts {
    /// Layout: compact | horizontal | vertical (anything else falls back to compact)
    #[arg(long, default_value = "compact", help_heading = "Layout")]
    layout: String,
    /// Sprites per column (vertical) or row (horizontal); 0 = unlimited
    #[arg(long, help_heading = "Layout")]
    limit: Option<u32>,
    /// Canvas growth retries per sprite
    #[arg(long, default_value_t = 2, help_heading = "Layout")]
    max_pass: u32,
    /// Canvas width when there is nothing to place
    #[arg(long, default_value_t = 100, help_heading = "Layout")]
    default_width: u32,
    /// Canvas height when there is nothing to place
    #[arg(long, default_value_t = 100, help_heading = "Layout")]
    default_height: u32,
}

impl LayoutOpts {
    fn to_config(&self) -> LayoutConfig {
        let layout = LayoutKind::from_key(&self.layout);
        if self.layout.parse::<LayoutKind>().is_err() {
            warn!(requested = %self.layout, "unknown layout, using compact");
        }
        LayoutConfig::builder()
            .layout(layout)
            .limit(self.limit)
            .max_pass(self.max_pass)
            .with_default_dimensions(self.default_width, self.default_height)
            .build()
    }
}

#[derive(Parser, Debug, Clone)]
struct PackArgs {
    // Input/Output
    /// Input file or directory
    #[arg(help_heading = "Input/Output")]
    input: PathBuf,
    /// Output directory
    #[arg(short, long, default_value = "out", help_heading = "Input/Output")]
    out_dir: PathBuf,
    /// Sheet base name (files will be name.png/.css/.json)
    #[arg(short, long, default_value = "spritesheet", help_heading = "Input/Output")]
    name: String,
    /// YAML config file path (overrides layout and stylesheet options)
    #[arg(long, help_heading = "Input/Output")]
    config: Option<PathBuf>,
    /// Include patterns (glob). If set, only files matching any pattern are considered
    #[arg(long, help_heading = "Input/Output")]
    include: Vec<String>,
    /// Exclude patterns (glob). Files matching any pattern will be ignored
    #[arg(long, help_heading = "Input/Output")]
    exclude: Vec<String>,

    #[command(flatten)]
    layout: LayoutOpts,

    // Export
    /// CSS class prefix
    #[arg(long, default_value = "sprite", help_heading = "Export")]
    prefix: String,
    /// Image URL written into the stylesheet (defaults to the PNG file name)
    #[arg(long, help_heading = "Export")]
    image_url: Option<String>,
    /// Embed the sheet in the stylesheet as a base64 PNG data URI
    #[arg(long, default_value_t = false, help_heading = "Export")]
    data_uri: bool,
    /// Print the merged configuration (after CLI/YAML) and exit
    #[arg(long, default_value_t = false, help_heading = "Export")]
    print_config: bool,
    /// Output format for --print-config: json|yaml
    #[arg(long, default_value = "json", value_parser = ["json", "yaml"], help_heading = "Export")]
    print_config_format: String,
    /// Dry run: compute layout and stats but do not write files
    #[arg(long, default_value_t = false, help_heading = "Export")]
    dry_run: bool,
}

#[derive(Parser, Debug, Clone)]
struct LayoutArgs {
    /// JSON file holding an array of {name, width, height}
    input: PathBuf,
    /// Write placements here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
    #[command(flatten)]
    layout: LayoutOpts,
}

#[derive(Parser, Debug, Clone)]
struct CompareArgs {
    /// Input directory
    input: PathBuf,
    /// Sprites per column/row for the directional layouts
    #[arg(long)]
    limit: Option<u32>,
    /// Canvas growth retries per sprite
    #[arg(long, default_value_t = 2)]
    max_pass: u32,
    /// Evaluate layouts in parallel (requires core feature `parallel`)
    #[arg(long, default_value_t = false)]
    parallel: bool,
}

/// Merged settings written by --print-config and read from --config.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SheetConfig {
    #[serde(flatten)]
    layout: LayoutConfig,
    #[serde(flatten)]
    stylesheet: StylesheetOptions,
    /// Replace `image_url` with the rendered sheet as a data URI.
    #[serde(default)]
    data_uri: bool,
}

#[derive(Debug, Deserialize, Default)]
struct YamlConfig {
    layout: Option<String>,
    limit: Option<u32>,
    max_pass: Option<u32>,
    default_width: Option<u32>,
    default_height: Option<u32>,
    prefix: Option<String>,
    image_url: Option<String>,
    data_uri: Option<bool>,
}

impl YamlConfig {
    fn apply(self, mut cfg: SheetConfig) -> SheetConfig {
        if let Some(v) = self.layout {
            cfg.layout.layout = LayoutKind::from_key(&v);
        }
        if let Some(v) = self.limit {
            cfg.layout.limit = Some(v);
        }
        if let Some(v) = self.max_pass {
            cfg.layout.max_pass = v;
        }
        if let Some(v) = self.default_width {
            cfg.layout.default_width = v;
        }
        if let Some(v) = self.default_height {
            cfg.layout.default_height = v;
        }
        if let Some(v) = self.prefix {
            cfg.stylesheet.prefix = v;
        }
        if let Some(v) = self.image_url {
            cfg.stylesheet.image_url = v;
        }
        if let Some(v) = self.data_uri {
            cfg.data_uri = v;
        }
        cfg
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing_with_level(cli.quiet, cli.verbose);
    match &cli.command {
        Commands::Pack(args) => run_pack(args, cli.progress && !cli.quiet),
        Commands::Layout(args) => run_layout(args),
        Commands::Compare(args) => run_compare(args),
    }
}

fn run_pack(cli: &PackArgs, show_progress: bool) -> anyhow::Result<()> {
    let base = SheetConfig {
        layout: cli.layout.to_config(),
        stylesheet: StylesheetOptions {
            prefix: cli.prefix.clone(),
            image_url: cli
                .image_url
                .clone()
                .unwrap_or_else(|| format!("{}.png", cli.name)),
        },
        data_uri: cli.data_uri,
    };
    // Config file overrides layout and stylesheet options en bloc
    let cfg = if let Some(path) = &cli.config {
        let file = fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let y: YamlConfig = serde_yaml::from_str(&file)?;
        y.apply(base)
    } else {
        base
    };

    if cli.print_config {
        match cli.print_config_format.as_str() {
            "yaml" => println!("{}", serde_yaml::to_string(&cfg)?),
            _ => println!("{}", serde_json::to_string_pretty(&cfg)?),
        }
        return Ok(());
    }

    let paths = gather_paths(&cli.input, &cli.include, &cli.exclude)?;
    let images = load_images_with_progress(&cli.input, &paths, show_progress)?;
    info!(count = images.len(), "loaded input images");

    let inputs: Vec<SpriteInput> = images
        .iter()
        .map(|(name, img)| SpriteInput::new(name.clone(), img.width(), img.height()))
        .collect();

    let start = Instant::now();
    let layout = if show_progress {
        use indicatif::{ProgressBar, ProgressStyle};
        let bar = ProgressBar::new(1000);
        bar.set_style(
            ProgressStyle::with_template("{spinner:.green} placing [{bar:40}] {percent}%")
                .context("progress template")?,
        );
        let mut sink = |f: f32| bar.set_position((f * 1000.0) as u64);
        let out = pack_layout_with_progress(&inputs, &cfg.layout, &mut sink);
        bar.finish_and_clear();
        out?
    } else {
        pack_layout(&inputs, &cfg.layout)?
    };
    info!(
        layout = %cfg.layout.layout,
        width = layout.width,
        height = layout.height,
        elapsed = %fmt_dur(start.elapsed()),
        "layout computed"
    );
    for f in &layout.failures {
        warn!(name = %f.name, error = %f.to_error(), "sprite left out");
    }

    let stats = layout.stats();
    if cli.dry_run {
        println!("{}", stats.summary());
        return Ok(());
    }

    fs::create_dir_all(&cli.out_dir)
        .with_context(|| format!("create out_dir {}", cli.out_dir.display()))?;

    let images: HashMap<String, RgbaImage> = images.into_iter().collect();
    let sheet = render_sheet(&layout, &images)?;
    let png_path = cli.out_dir.join(format!("{}.png", cli.name));
    sheet
        .save(&png_path)
        .with_context(|| format!("write {}", png_path.display()))?;
    info!(?png_path, "wrote sheet");

    let mut stylesheet = cfg.stylesheet.clone();
    if cfg.data_uri {
        stylesheet.image_url = png_data_uri(&sheet)?;
        info!(bytes = stylesheet.image_url.len(), "embedded sheet as data URI");
    }
    let css_path = cli.out_dir.join(format!("{}.css", cli.name));
    fs::write(&css_path, to_css(&layout, &stylesheet))
        .with_context(|| format!("write {}", css_path.display()))?;
    info!(?css_path, "stylesheet written");

    let json_path = cli.out_dir.join(format!("{}.json", cli.name));
    fs::write(&json_path, serde_json::to_string_pretty(&to_json(&layout))?)
        .with_context(|| format!("write {}", json_path.display()))?;
    info!(?json_path, occupancy = stats.occupancy, "metadata written");
    Ok(())
}

fn run_layout(args: &LayoutArgs) -> anyhow::Result<()> {
    let text = fs::read_to_string(&args.input)
        .with_context(|| format!("read {}", args.input.display()))?;
    let inputs: Vec<SpriteInput> = serde_json::from_str(&text)
        .with_context(|| format!("parse sprite list {}", args.input.display()))?;
    let cfg = args.layout.to_config();
    let layout = pack_layout(inputs, &cfg)?;
    let out = serde_json::to_string_pretty(&to_json(&layout))?;
    match &args.output {
        Some(path) => {
            fs::write(path, out).with_context(|| format!("write {}", path.display()))?;
            info!(?path, placed = layout.placed_count(), "layout written");
        }
        None => println!("{}", out),
    }
    Ok(())
}

fn run_compare(args: &CompareArgs) -> anyhow::Result<()> {
    let paths = gather_paths(&args.input, &[], &[])?;
    let mut inputs = Vec::with_capacity(paths.len());
    for p in &paths {
        match image::image_dimensions(p) {
            Ok((w, h)) => inputs.push(SpriteInput::new(sprite_name(&args.input, p), w, h)),
            Err(e) => error!(?p, error = %e, "skip image"),
        }
    }
    let cfg = LayoutConfig::builder()
        .limit(args.limit)
        .max_pass(args.max_pass)
        .parallel(args.parallel)
        .build();
    let start = Instant::now();
    let results = compare_layouts(&inputs, &cfg);
    let dur = start.elapsed();
    for (kind, res) in results {
        match res {
            Ok(layout) => {
                let stats = layout.stats();
                println!(
                    "{:<10} {}x{} occupancy={:.2}% waste={:.2}% placed={}/{}",
                    kind.as_str(),
                    layout.width,
                    layout.height,
                    stats.occupancy * 100.0,
                    stats.waste_percentage(),
                    stats.num_placed,
                    stats.num_sprites
                );
            }
            Err(e) => println!("{:<10} error: {}", kind.as_str(), e),
        }
    }
    println!("time={}", fmt_dur(dur));
    Ok(())
}

fn fmt_dur(d: Duration) -> String {
    let ms = d.as_secs_f64() * 1000.0;
    if ms >= 1.0 {
        format!("{:.1}ms", ms)
    } else {
        format!("{}us", d.as_micros())
    }
}

fn gather_paths(
    path: &Path,
    include: &[String],
    exclude: &[String],
) -> anyhow::Result<Vec<PathBuf>> {
    let mut inc_set = None;
    if !include.is_empty() {
        let mut b = GlobSetBuilder::new();
        for pat in include {
            b.add(Glob::new(pat)?);
        }
        inc_set = Some(b.build()?);
    }
    let mut exc_set = None;
    if !exclude.is_empty() {
        let mut b = GlobSetBuilder::new();
        for pat in exclude {
            b.add(Glob::new(pat)?);
        }
        exc_set = Some(b.build()?);
    }
    let mut list: Vec<PathBuf> = Vec::new();
    if path.is_file() {
        if !should_skip(path, inc_set.as_ref(), exc_set.as_ref()) && is_image(path) {
            list.push(path.to_path_buf());
        }
    } else {
        for entry in WalkDir::new(path)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let p = entry.path();
            if p.is_file() && !should_skip(p, inc_set.as_ref(), exc_set.as_ref()) && is_image(p) {
                list.push(p.to_path_buf());
            }
        }
    }
    Ok(list)
}

fn should_skip(
    p: &Path,
    include: Option<&globset::GlobSet>,
    exclude: Option<&globset::GlobSet>,
) -> bool {
    let s = p.to_string_lossy().replace('\\', "/");
    if let Some(ex) = exclude {
        if ex.is_match(&s) {
            return true;
        }
    }
    if let Some(inc) = include {
        if !inc.is_match(&s) {
            return true;
        }
    }
    false
}

fn is_image(p: &Path) -> bool {
    matches!(
        p.extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_ascii_lowercase()),
        Some(ext) if matches!(ext.as_str(), "png" | "jpg" | "jpeg")
    )
}

/// Sprite name: path relative to the input root, `/`-separated.
fn sprite_name(root: &Path, p: &Path) -> String {
    let rel = p.strip_prefix(root).ok().filter(|r| !r.as_os_str().is_empty());
    rel.or_else(|| p.file_name().map(Path::new))
        .unwrap_or(p)
        .to_string_lossy()
        .replace('\\', "/")
}

fn load_images_with_progress(
    root: &Path,
    paths: &[PathBuf],
    progress: bool,
) -> anyhow::Result<Vec<(String, RgbaImage)>> {
    use indicatif::{ProgressBar, ProgressStyle};
    let bar = if progress {
        let b = ProgressBar::new(paths.len() as u64);
        b.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} loading {pos}/{len} [{elapsed_precise}] {wide_msg}",
            )
            .context("progress template")?,
        );
        Some(b)
    } else {
        None
    };
    let mut list = Vec::with_capacity(paths.len());
    for p in paths {
        let msg = p.file_name().and_then(|s| s.to_str()).unwrap_or("");
        if let Some(b) = &bar {
            b.set_message(msg.to_string());
        }
        match load_image(p) {
            Ok(img) => list.push((sprite_name(root, p), img)),
            Err(e) => {
                error!(?p, error = %e, "skip image");
            }
        }
        if let Some(b) = &bar {
            b.inc(1);
        }
    }
    if let Some(b) = &bar {
        b.finish_and_clear();
    }
    Ok(list)
}

fn load_image(p: &Path) -> anyhow::Result<RgbaImage> {
    let img = ImageReader::open(p)?.with_guessed_format()?.decode()?;
    Ok(img.to_rgba8())
}

fn init_tracing_with_level(quiet: bool, verbose: u8) {
    let level = if quiet {
        "error".to_string()
    } else {
        match verbose {
            0 => "info".into(),
            1 => "debug".into(),
            _ => "trace".into(),
        }
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_target(false)
        .try_init();
}
