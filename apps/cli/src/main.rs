use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use schemeconv_core::{convert, Palette, ThemeDocument};
use schemeconv_plist::{parse_bytes, TreeNode};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

const DEFAULT_INPUT_DIR: &str = "themes";
const DEFAULT_OUTPUT_DIR: &str = "schemes";
const INPUT_EXTENSION: &str = "tmTheme";
const OUTPUT_EXTENSION: &str = "sublime-color-scheme";

#[derive(Parser)]
#[command(
    name = "schemeconv",
    about = "Convert TextMate .tmTheme files into Sublime Text color schemes",
    author,
    version
)]
struct Cli {
    /// 指定工作區根目錄；預設為目前目錄。 / Workspace root for relative paths (defaults to current directory).
    #[arg(long, global = true, value_name = "PATH")]
    workspace: Option<PathBuf>,
    /// 提高記錄詳細程度（可重複）。 / Increase log verbosity (repeatable); RUST_LOG takes precedence.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 將 tmTheme 轉換為 sublime-color-scheme。 / Convert tmTheme files to sublime-color-scheme files.
    Convert(ConvertArgs),
    /// 僅驗證轉換，不寫入檔案。 / Convert without writing anything, reporting failures.
    Check(CheckArgs),
    /// 列出主題中偵測到的色彩。 / Print the color palette discovered in a theme.
    Palette(PaletteArgs),
}

#[derive(Args)]
struct ConvertArgs {
    /// 輸入檔案或資料夾。 / Theme files or directories to convert.
    #[arg(value_name = "PATH", default_value = DEFAULT_INPUT_DIR)]
    inputs: Vec<PathBuf>,

    /// 輸出資料夾。 / Output directory for converted schemes.
    #[arg(long, value_name = "DIR", default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// 單一檔案轉換時指定輸出路徑。 / Output file path when converting a single theme.
    #[arg(long, value_name = "FILE", conflicts_with = "output_dir")]
    output: Option<PathBuf>,

    /// 遞迴搜尋子資料夾。 / Descend into subdirectories when scanning directories.
    #[arg(long)]
    recursive: bool,

    /// 覆寫既有輸出檔案。 / Overwrite existing output files.
    #[arg(long)]
    force: bool,

    /// 發生錯誤時略過並繼續。 / Skip themes that fail to convert instead of stopping.
    #[arg(long)]
    keep_going: bool,
}

#[derive(Args)]
struct CheckArgs {
    /// 輸入檔案或資料夾。 / Theme files or directories to check.
    #[arg(value_name = "PATH", default_value = DEFAULT_INPUT_DIR)]
    inputs: Vec<PathBuf>,

    /// 遞迴搜尋子資料夾。 / Descend into subdirectories when scanning directories.
    #[arg(long)]
    recursive: bool,
}

#[derive(Args)]
struct PaletteArgs {
    /// 主題檔案。 / Theme file to inspect.
    #[arg(value_name = "FILE")]
    source: PathBuf,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let Cli {
        workspace,
        verbose,
        command,
    } = Cli::parse();
    init_tracing(verbose);
    let workspace_root = resolve_workspace(workspace)?;
    match command {
        Commands::Convert(args) => execute_convert(args, &workspace_root),
        Commands::Check(args) => execute_check(args, &workspace_root),
        Commands::Palette(args) => print_palette(args, &workspace_root),
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn execute_convert(args: ConvertArgs, workspace_root: &Path) -> Result<()> {
    let inputs = collect_theme_files(&args.inputs, args.recursive, workspace_root)?;
    if args.output.is_some() && inputs.len() > 1 {
        bail!("--output can only be used when converting a single theme");
    }

    let output_dir = workspace_root.join(&args.output_dir);
    if args.output.is_none() {
        fs::create_dir_all(&output_dir)
            .with_context(|| format!("failed to create {}", output_dir.display()))?;
    }

    let mut failures = 0usize;
    for input in &inputs {
        let destination = match &args.output {
            Some(output) => workspace_root.join(output),
            None => scheme_path_for(input, &output_dir),
        };
        match convert_single(input, &destination, args.force) {
            Ok(()) => println!("Converted {} -> {}", input.display(), destination.display()),
            Err(err) if args.keep_going => {
                failures += 1;
                warn!(input = %input.display(), "skipping theme: {err:#}");
                eprintln!("Skipped {}: {err:#}", input.display());
            }
            Err(err) => return Err(err),
        }
    }

    if failures > 0 {
        bail!("{failures} of {} theme(s) failed to convert", inputs.len());
    }
    println!("Converted {} theme(s)", inputs.len());
    Ok(())
}

fn convert_single(input: &Path, destination: &Path, force: bool) -> Result<()> {
    if destination.exists() && !force {
        bail!(
            "'{}' already exists (use --force to overwrite)",
            destination.display()
        );
    }
    let document = load_document(input)?;
    let json = document
        .to_json_string()
        .with_context(|| format!("failed to serialize {}", input.display()))?;
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(destination, json)
        .with_context(|| format!("failed to write {}", destination.display()))?;
    info!(
        input = %input.display(),
        output = %destination.display(),
        rules = document.rules.len(),
        "wrote color scheme"
    );
    Ok(())
}

fn execute_check(args: CheckArgs, workspace_root: &Path) -> Result<()> {
    let inputs = collect_theme_files(&args.inputs, args.recursive, workspace_root)?;
    let mut failures = 0usize;
    for input in &inputs {
        match load_document(input) {
            Ok(document) => println!(
                "ok      {} ({} colors, {} rules)",
                input.display(),
                document.variables.len(),
                document.rules.len()
            ),
            Err(err) => {
                failures += 1;
                println!("failed  {}: {err:#}", input.display());
            }
        }
    }
    if failures > 0 {
        bail!("{failures} of {} theme(s) failed to convert", inputs.len());
    }
    Ok(())
}

fn print_palette(args: PaletteArgs, workspace_root: &Path) -> Result<()> {
    let source = workspace_root.join(&args.source);
    let root = load_tree(&source)?;
    let palette = Palette::build(&root);
    if palette.is_empty() {
        println!("No colors found in {}", source.display());
        return Ok(());
    }
    for entry in palette.entries() {
        println!(
            "{}  {:<10}  {}",
            entry.id,
            entry.literal.as_str(),
            entry.definition
        );
    }
    Ok(())
}

fn load_tree(path: &Path) -> Result<TreeNode> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    parse_bytes(&bytes)
        .with_context(|| format!("unable to parse {}; is it a valid plist?", path.display()))
}

fn load_document(path: &Path) -> Result<ThemeDocument> {
    let root = load_tree(path)?;
    convert(&root).with_context(|| format!("failed to convert {}", path.display()))
}

/// Expands directories into their `.tmTheme` files, sorted by name.
fn collect_theme_files(
    inputs: &[PathBuf],
    recursive: bool,
    workspace_root: &Path,
) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        let path = workspace_root.join(input);
        if path.is_file() {
            files.push(path);
            continue;
        }
        if !path.is_dir() {
            bail!("input '{}' does not exist", path.display());
        }
        let max_depth = if recursive { usize::MAX } else { 1 };
        for entry in WalkDir::new(&path)
            .min_depth(1)
            .max_depth(max_depth)
            .sort_by_file_name()
        {
            let entry = entry.with_context(|| format!("scan directory {}", path.display()))?;
            if entry.file_type().is_file() && is_theme_file(entry.path()) {
                files.push(entry.into_path());
            }
        }
    }
    if files.is_empty() {
        bail!("no .{INPUT_EXTENSION} files found");
    }
    debug!(count = files.len(), "collected theme files");
    Ok(files)
}

fn is_theme_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(INPUT_EXTENSION))
        .unwrap_or(false)
}

fn scheme_path_for(input: &Path, output_dir: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("theme");
    output_dir.join(format!("{stem}.{OUTPUT_EXTENSION}"))
}

fn resolve_workspace(workspace: Option<PathBuf>) -> Result<PathBuf> {
    match workspace {
        Some(path) if path.is_absolute() => Ok(path),
        Some(path) => Ok(std::env::current_dir()
            .context("determine current directory")?
            .join(path)),
        None => std::env::current_dir().context("determine current directory"),
    }
}
