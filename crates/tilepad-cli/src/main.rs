use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::{ArgAction, Args, Parser, Subcommand};
use globset::{Glob, GlobSetBuilder};
use handlebars::Handlebars;
use image::{DynamicImage, ImageReader};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Deserialize;
use tilepad_core::project::{Project, default_export_path};
use tilepad_core::{
    AtlasOutput, Color, GenerationConfig, generate_image, remove_padding_image, to_json,
};
use tracing::{error, info, warn};
use walkdir::WalkDir;

#[derive(Parser, Debug)]
#[command(
    name = "tilepad",
    about = "Pad tile sheets into texture atlases with bled gutters",
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
    /// Pad a tile sheet (or every image in a directory) into an atlas
    Generate(GenerateArgs),
    /// Strip gutters from a padded atlas, giving back a tight tile sheet
    Remove(RemoveArgs),
    /// Process every file of a project with the project's settings
    Project(ProjectArgs),
    /// Write a new project file
    Init(InitArgs),
}

#[derive(Args, Debug, Clone)]
struct TileArgs {
    /// Tile width in pixels
    #[arg(long, default_value_t = 16, help_heading = "Tiles")]
    tile_width: u32,
    /// Tile height in pixels
    #[arg(long, default_value_t = 16, help_heading = "Tiles")]
    tile_height: u32,
    /// Bleed pixels on each side of a tile
    #[arg(short, long, default_value_t = 1, help_heading = "Tiles")]
    padding: u32,
}

#[derive(Args, Debug, Clone)]
struct GenerationArgs {
    #[command(flatten)]
    tiles: TileArgs,
    /// Round atlas width/height up to powers of two
    #[arg(long, default_value_t = true, action=ArgAction::Set, help_heading = "Layout")]
    pot: bool,
    /// Reflow tiles into the space gained by --pot
    #[arg(long, default_value_t = false, help_heading = "Layout")]
    reorder: bool,
    /// Transparent background (otherwise --background is used)
    #[arg(long, default_value_t = true, action=ArgAction::Set, help_heading = "Layout")]
    transparent: bool,
    /// Background color: #RGB | #RRGGBB | #AARRGGBB
    #[arg(long, default_value = "#FF00FF", help_heading = "Layout")]
    background: String,
}

#[derive(Args, Debug, Clone)]
struct GenerateArgs {
    /// Input image or directory
    #[arg(help_heading = "Input/Output")]
    input: PathBuf,
    /// Output image (single input only). Defaults to <name>.export.<ext> next to the input
    #[arg(short, long, help_heading = "Input/Output")]
    output: Option<PathBuf>,
    /// Output directory; files are named <name>.export.<ext>
    #[arg(long, help_heading = "Input/Output")]
    out_dir: Option<PathBuf>,
    /// YAML config file path (overrides generation options)
    #[arg(long, help_heading = "Input/Output")]
    config: Option<PathBuf>,
    /// Include patterns (glob). If set, only files matching any pattern are considered
    #[arg(long, help_heading = "Input/Output")]
    include: Vec<String>,
    /// Exclude patterns (glob). Files matching any pattern will be ignored
    #[arg(long, help_heading = "Input/Output")]
    exclude: Vec<String>,

    #[command(flatten)]
    generation: GenerationArgs,

    /// Write tile placements as JSON next to each output (tiles.export.png -> tiles.export.json)
    #[arg(long, default_value_t = false, help_heading = "Export")]
    metadata: bool,
    /// Handlebars template rendered with the placement JSON (tiles.export.png -> tiles.export.template.txt)
    #[arg(long, help_heading = "Export")]
    template: Option<PathBuf>,
    /// Print the merged configuration (after CLI/YAML) and exit
    #[arg(long, default_value_t = false, help_heading = "Export")]
    print_config: bool,
    /// Output format for --print-config: json|yaml
    #[arg(long, default_value = "json", value_parser = ["json", "yaml"], help_heading = "Export")]
    print_config_format: String,
    /// Dry run: compute atlases and stats but do not write files
    #[arg(long, default_value_t = false, help_heading = "Export")]
    dry_run: bool,
}

#[derive(Args, Debug, Clone)]
struct RemoveArgs {
    /// Padded atlas image
    input: PathBuf,
    /// Output image. Defaults to <name>.export.<ext> next to the input
    #[arg(short, long)]
    output: Option<PathBuf>,
    #[command(flatten)]
    tiles: TileArgs,
    /// Dry run: do not write files
    #[arg(long, default_value_t = false)]
    dry_run: bool,
}

#[derive(Args, Debug, Clone)]
struct ProjectArgs {
    /// Project file (JSON)
    project: PathBuf,
    /// Dry run: process images but do not write files
    #[arg(long, default_value_t = false)]
    dry_run: bool,
}

#[derive(Args, Debug, Clone)]
struct InitArgs {
    /// Project file to create
    project: PathBuf,
    /// Source images to add
    files: Vec<PathBuf>,
    #[command(flatten)]
    generation: GenerationArgs,
    /// Strip padding from the sources instead of adding it
    #[arg(long, default_value_t = false)]
    remove_padding: bool,
    /// Directory for exported images (default: next to each source)
    #[arg(long)]
    export_dir: Option<PathBuf>,
    /// Overwrite an existing project file
    #[arg(long, default_value_t = false)]
    force: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing_with_level(cli.quiet, cli.verbose);
    let show_progress = cli.progress && !cli.quiet;
    match &cli.command {
        Commands::Generate(args) => run_generate(args, show_progress),
        Commands::Remove(args) => run_remove(args),
        Commands::Project(args) => run_project(args, show_progress),
        Commands::Init(args) => run_init(args),
    }
}

fn run_generate(cli: &GenerateArgs, show_progress: bool) -> anyhow::Result<()> {
    let mut cfg = parse_generation(&cli.generation)?;
    if let Some(path) = &cli.config {
        let file = fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let y: YamlConfig = serde_yaml::from_str(&file)
            .with_context(|| format!("parse config {}", path.display()))?;
        cfg = y.into_generation_config(cfg)?;
    }
    cfg.validate()?;

    if cli.print_config {
        match cli.print_config_format.as_str() {
            "yaml" => println!("{}", serde_yaml::to_string(&cfg)?),
            _ => println!("{}", serde_json::to_string_pretty(&cfg)?),
        }
        return Ok(());
    }

    let template = match &cli.template {
        Some(path) => Some(
            fs::read_to_string(path)
                .with_context(|| format!("read template {}", path.display()))?,
        ),
        None => None,
    };

    let paths = gather_paths(&cli.input, &cli.include, &cli.exclude)?;
    if paths.is_empty() {
        anyhow::bail!("no images found at {}", cli.input.display());
    }
    if cli.output.is_some() && paths.len() > 1 {
        anyhow::bail!("--output takes a single input image; use --out-dir for directories");
    }
    info!(count = paths.len(), "found input images");

    let start = Instant::now();
    let bar = progress_bar(paths.len(), show_progress && paths.len() > 1, "padding");
    let mut written = 0usize;
    for p in &paths {
        if let Some(b) = &bar {
            b.set_message(file_label(p));
        }
        let dest = match (&cli.output, &cli.out_dir) {
            (Some(out), _) => out.clone(),
            (None, Some(dir)) => dir.join(export_file_name(p)),
            (None, None) => default_export_path(p),
        };
        let img = load_image(p)?;
        let out = generate_image(&img, &cfg)
            .with_context(|| format!("generate atlas for {}", p.display()))?;
        if out.is_empty() {
            warn!(?p, "no whole tile in image, skipped");
        } else if !cli.dry_run {
            write_atlas(&out, &dest, cli.metadata, template.as_deref())?;
            written += 1;
        }
        log_stats(p, &out);
        if let Some(b) = &bar {
            b.inc(1);
        }
    }
    if let Some(b) = &bar {
        b.finish_and_clear();
    }
    info!(
        inputs = paths.len(),
        written,
        elapsed = format!("{:.1}ms", start.elapsed().as_secs_f64() * 1000.0),
        "done"
    );
    Ok(())
}

fn run_remove(cli: &RemoveArgs) -> anyhow::Result<()> {
    let img = load_image(&cli.input)?;
    let t = &cli.tiles;
    let tight = remove_padding_image(&img, t.tile_width, t.tile_height, t.padding)
        .with_context(|| format!("remove padding from {}", cli.input.display()))?;
    let dest = cli
        .output
        .clone()
        .unwrap_or_else(|| default_export_path(&cli.input));
    info!(
        input = ?cli.input,
        size = ?tight.dimensions(),
        "padding removed"
    );
    if tight.width() == 0 || tight.height() == 0 {
        warn!(input = ?cli.input, "image holds no whole cell, nothing written");
        return Ok(());
    }
    if !cli.dry_run {
        ensure_parent(&dest)?;
        tight
            .save(&dest)
            .with_context(|| format!("write {}", dest.display()))?;
        info!(?dest, "wrote image");
    }
    Ok(())
}

fn run_project(cli: &ProjectArgs, show_progress: bool) -> anyhow::Result<()> {
    let project = Project::load(&cli.project)
        .with_context(|| format!("load project {}", cli.project.display()))?;
    let settings = project.settings();
    let cfg = settings.generation_config();
    cfg.validate()?;
    let files = project.files();
    info!(
        project = ?cli.project,
        files = files.len(),
        remove_padding = settings.remove_padding,
        "project loaded"
    );

    let bar = progress_bar(files.len(), show_progress, "processing");
    let mut failed = 0usize;
    for entry in files {
        if let Some(b) = &bar {
            b.set_message(file_label(&entry.source_path));
        }
        let result = if settings.remove_padding {
            process_remove(&entry.source_path, &entry.export_path, &cfg, cli.dry_run)
        } else {
            process_generate(&entry.source_path, &entry.export_path, &cfg, cli.dry_run)
        };
        if let Err(e) = result {
            error!(source = ?entry.source_path, error = %e, "file failed");
            failed += 1;
        }
        if let Some(b) = &bar {
            b.inc(1);
        }
    }
    if let Some(b) = &bar {
        b.finish_and_clear();
    }
    if failed > 0 {
        anyhow::bail!("{} of {} project files failed", failed, files.len());
    }
    Ok(())
}

fn process_generate(
    source: &Path,
    dest: &Path,
    cfg: &GenerationConfig,
    dry_run: bool,
) -> anyhow::Result<()> {
    let img = load_image(source)?;
    let out = generate_image(&img, cfg)?;
    log_stats(source, &out);
    if out.is_empty() {
        warn!(?source, "no whole tile in image, skipped");
    } else if !dry_run {
        write_atlas(&out, dest, false, None)?;
    }
    Ok(())
}

fn process_remove(
    source: &Path,
    dest: &Path,
    cfg: &GenerationConfig,
    dry_run: bool,
) -> anyhow::Result<()> {
    let img = load_image(source)?;
    let tight = remove_padding_image(&img, cfg.tile_width, cfg.tile_height, cfg.padding)?;
    if tight.width() == 0 || tight.height() == 0 {
        warn!(?source, "image holds no whole cell, skipped");
    } else if !dry_run {
        ensure_parent(dest)?;
        tight
            .save(dest)
            .with_context(|| format!("write {}", dest.display()))?;
        info!(?dest, "wrote image");
    }
    Ok(())
}

fn run_init(cli: &InitArgs) -> anyhow::Result<()> {
    if cli.project.exists() && !cli.force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            cli.project.display()
        );
    }
    let cfg = parse_generation(&cli.generation)?;
    cfg.validate()?;

    let mut project = Project::new();
    {
        let s = project.settings_mut();
        *s = cfg.into();
        s.remove_padding = cli.remove_padding;
        if let Some(dir) = &cli.export_dir {
            s.export_directory = dir.to_string_lossy().into_owned();
        }
    }
    for f in &cli.files {
        if !f.is_file() {
            warn!(file = ?f, "source does not exist yet");
        }
        project.add_file(f.clone());
    }
    project
        .save(&cli.project)
        .with_context(|| format!("write {}", cli.project.display()))?;
    info!(project = ?cli.project, files = cli.files.len(), "project written");
    Ok(())
}

fn write_atlas(
    out: &AtlasOutput,
    dest: &Path,
    metadata: bool,
    template: Option<&str>,
) -> anyhow::Result<()> {
    ensure_parent(dest)?;
    out.rgba
        .save(dest)
        .with_context(|| format!("write {}", dest.display()))?;
    info!(?dest, size = ?out.rgba.dimensions(), "wrote atlas");

    if !metadata && template.is_none() {
        return Ok(());
    }
    let image_name = dest
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let value = to_json(out, &image_name);
    if metadata {
        let json_path = sidecar_path(dest, "json");
        fs::write(&json_path, serde_json::to_string_pretty(&value)?)
            .with_context(|| format!("write {}", json_path.display()))?;
        info!(?json_path, tiles = out.placements.len(), "metadata written");
    }
    if let Some(tpl) = template {
        let mut reg = Handlebars::new();
        reg.set_strict_mode(true);
        reg.register_template_string("tpl", tpl)?;
        let rendered = reg.render("tpl", &value)?;
        let out_path = sidecar_path(dest, "template.txt");
        fs::write(&out_path, rendered)
            .with_context(|| format!("write {}", out_path.display()))?;
        info!(?out_path, "template written");
    }
    Ok(())
}

fn log_stats(source: &Path, out: &AtlasOutput) {
    let stats = out.stats();
    info!(
        ?source,
        grid = ?(out.grid.cols, out.grid.rows),
        size = ?(out.grid.target_width, out.grid.target_height),
        mode = ?out.mode,
        occupancy = format!("{:.2}%", stats.occupancy * 100.0),
        dead_area = stats.dead_area(),
        "atlas"
    );
}

fn parse_generation(args: &GenerationArgs) -> anyhow::Result<GenerationConfig> {
    let background: Color = args
        .background
        .parse()
        .with_context(|| format!("parse --background {}", args.background))?;
    Ok(GenerationConfig {
        tile_width: args.tiles.tile_width,
        tile_height: args.tiles.tile_height,
        padding: args.tiles.padding,
        force_pot: args.pot,
        reorder: args.reorder,
        transparent: args.transparent,
        background_color: background,
    })
}

/// Output image path with its extension replaced by `ext`.
fn sidecar_path(dest: &Path, ext: &str) -> PathBuf {
    dest.with_extension(ext)
}

fn export_file_name(p: &Path) -> PathBuf {
    default_export_path(p)
        .file_name()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("atlas.png"))
}

fn ensure_parent(p: &Path) -> anyhow::Result<()> {
    if let Some(dir) = p.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("create dir {}", dir.display()))?;
    }
    Ok(())
}

fn file_label(p: &Path) -> String {
    p.file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_string()
}

fn progress_bar(len: usize, enabled: bool, verb: &str) -> Option<ProgressBar> {
    if !enabled {
        return None;
    }
    let b = ProgressBar::new(len as u64);
    let template = format!(
        "{{spinner:.green}} {} {{pos}}/{{len}} [{{elapsed_precise}}] {{wide_msg}}",
        verb
    );
    if let Ok(style) = ProgressStyle::with_template(&template) {
        b.set_style(style);
    }
    Some(b)
}

fn gather_paths(
    path: &Path,
    include: &[String],
    exclude: &[String],
) -> anyhow::Result<Vec<PathBuf>> {
    // Build glob matchers
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
        for entry in WalkDir::new(path).into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file()
                && !is_export(p)
                && !should_skip(p, inc_set.as_ref(), exc_set.as_ref())
                && is_image(p)
            {
                list.push(p.to_path_buf());
            }
        }
    }
    list.sort();
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

/// Previous outputs (`*.export.*`) are not fed back in when walking a directory.
fn is_export(p: &Path) -> bool {
    p.file_stem()
        .and_then(|s| s.to_str())
        .is_some_and(|s| s.ends_with(".export"))
}

fn load_image(p: &Path) -> anyhow::Result<DynamicImage> {
    let img = ImageReader::open(p)
        .with_context(|| format!("open {}", p.display()))?
        .with_guessed_format()?
        .decode()
        .with_context(|| format!("decode {}", p.display()))?;
    Ok(img)
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

#[derive(Debug, Deserialize, Default)]
struct YamlConfig {
    tile_width: Option<u32>,
    tile_height: Option<u32>,
    padding: Option<u32>,
    force_pot: Option<bool>,
    reorder: Option<bool>,
    transparent: Option<bool>,
    background_color: Option<String>,
}

impl YamlConfig {
    fn into_generation_config(self, mut cfg: GenerationConfig) -> anyhow::Result<GenerationConfig> {
        if let Some(v) = self.tile_width {
            cfg.tile_width = v;
        }
        if let Some(v) = self.tile_height {
            cfg.tile_height = v;
        }
        if let Some(v) = self.padding {
            cfg.padding = v;
        }
        if let Some(v) = self.force_pot {
            cfg.force_pot = v;
        }
        if let Some(v) = self.reorder {
            cfg.reorder = v;
        }
        if let Some(v) = self.transparent {
            cfg.transparent = v;
        }
        if let Some(v) = self.background_color {
            cfg.background_color = v
                .parse()
                .with_context(|| format!("config background_color {}", v))?;
        }
        Ok(cfg)
    }
}
