use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use tmplc::config::{Config, Mode, Naming, UnknownCalls};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "tmplc",
    about = "Template macro compiler — desugar print/return/execTemplate into plain template code"
)]
struct Cli {
    /// Input file(s) or directory
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output directory, mirroring each input's relative path (default: stdout)
    #[arg(short, long)]
    out_dir: Option<PathBuf>,

    /// Mode: syntax, runtime, conceptual, product (default: from config or syntax)
    #[arg(short, long)]
    mode: Option<String>,

    /// Accumulator naming: reserved, fresh
    #[arg(long)]
    naming: Option<String>,

    /// Fail on calls to templates that are never defined
    #[arg(long)]
    strict_calls: bool,

    /// Config file path
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log every stage (RUST_LOG takes precedence)
    #[arg(short, long)]
    verbose: bool,
}

fn die(msg: &str) -> ! {
    eprintln!("error: {}", msg);
    process::exit(1);
}

fn load_config(path: &PathBuf) -> Config {
    let text = fs::read_to_string(path).unwrap_or_else(|e| die(&format!("cannot read config: {}", e)));
    serde_json::from_str(&text).unwrap_or_else(|e| die(&format!("invalid config JSON: {}", e)))
}

fn init_logging(verbose: bool) {
    let fallback = if verbose { "tmplc=debug" } else { "tmplc=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn collect_jobs(inputs: &[PathBuf]) -> Vec<(PathBuf, PathBuf)> {
    let mut jobs = Vec::new();
    for input in inputs {
        let files = tmplc::list_files(std::slice::from_ref(input))
            .unwrap_or_else(|e| die(&format!("{}: {}", input.display(), e)));
        for file in files {
            let relative = if input.is_dir() {
                file.strip_prefix(input).map(Path::to_path_buf).ok()
            } else {
                file.file_name().map(PathBuf::from)
            };
            let relative = relative.unwrap_or_else(|| file.clone());
            jobs.push((file, relative));
        }
    }
    jobs
}

fn compile_file(path: &Path, config: &Config) -> String {
    let content =
        fs::read_to_string(path).unwrap_or_else(|e| die(&format!("cannot read {}: {}", path.display(), e)));
    tmplc::compile(&content, config).unwrap_or_else(|e| die(&format!("{}: {}", path.display(), e)))
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Load config
    let mut config = if let Some(ref config_path) = cli.config {
        load_config(config_path)
    } else {
        let defaults = ["tmplc.config.json", "config/tmplc.config.json"];
        let mut loaded = None;
        for p in &defaults {
            let path = PathBuf::from(p);
            if path.is_file() {
                loaded = Some(load_config(&path));
                break;
            }
        }
        loaded.unwrap_or_default()
    };

    // CLI overrides
    if let Some(ref mode) = cli.mode {
        config.mode = match mode.as_str() {
            "syntax" => Mode::Syntax,
            "runtime" => Mode::Runtime,
            "conceptual" => Mode::Conceptual,
            "product" => Mode::Product,
            _ => die(&format!("invalid mode: {}", mode)),
        };
    }
    if let Some(ref naming) = cli.naming {
        config.naming = match naming.as_str() {
            "reserved" => Naming::Reserved,
            "fresh" => Naming::Fresh,
            _ => die(&format!("invalid naming: {}", naming)),
        };
    }
    if cli.strict_calls {
        config.unknown_calls = UnknownCalls::Error;
    }

    let jobs = collect_jobs(&cli.inputs);
    if jobs.is_empty() {
        die("no input files found");
    }

    if let Some(ref out_dir) = cli.out_dir {
        for (source, relative) in &jobs {
            let result = compile_file(source, &config);
            let target = out_dir.join(relative);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)
                    .unwrap_or_else(|e| die(&format!("cannot create {}: {}", parent.display(), e)));
            }
            fs::write(&target, &result)
                .unwrap_or_else(|e| die(&format!("cannot write {}: {}", target.display(), e)));
        }
        eprintln!(
            "compiled {} file(s) -> {} ({:?})",
            jobs.len(),
            out_dir.display(),
            config.mode
        );
    } else {
        if jobs.len() > 1 {
            die("several input files need --out-dir");
        }
        print!("{}", compile_file(&jobs[0].0, &config));
    }
}
