use anyhow::{bail, Context, Result};
use std::io::Read;
use std::path::PathBuf;

use reasoncheck_lib::{init_logging, ConfigStore, ReasoningDebugger};

fn parse_arg_value(args: &[String], key: &str) -> Option<String> {
    args.iter()
        .position(|a| a == key)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn has_flag(args: &[String], key: &str) -> bool {
    args.iter().any(|a| a == key)
}

/// First argument that is neither a flag nor a flag's value.
fn input_path(args: &[String]) -> Option<String> {
    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        if arg == "--config" {
            iter.next();
            continue;
        }
        if !arg.starts_with("--") {
            return Some(arg.clone());
        }
    }
    None
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if has_flag(&args, "--help") || has_flag(&args, "-h") {
        eprintln!(
            "Usage:\n  analyze_chain [FILE] [--config <dir>]\n\nReads one reasoning step per line from FILE (or stdin) and prints the analysis as JSON.\nConfiguration is read from <dir>/config.json, defaulting to the platform config directory."
        );
        return Ok(());
    }

    init_logging();

    let config_dir = match parse_arg_value(&args, "--config") {
        Some(dir) => PathBuf::from(dir),
        None => match ConfigStore::default_config_dir() {
            Some(dir) => dir,
            None => bail!("no platform config directory; pass --config <dir>"),
        },
    };
    let store = ConfigStore::new(config_dir);
    let config = store
        .load()
        .with_context(|| format!("loading {}", store.config_file().display()))?;

    let text = match input_path(&args) {
        Some(path) => std::fs::read_to_string(&path).with_context(|| format!("reading {}", path))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading stdin")?;
            buf
        }
    };

    let debugger = ReasoningDebugger::new(config).context("building analyzer")?;
    let result = debugger.analyze(&text).context("analyzing reasoning chain")?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
