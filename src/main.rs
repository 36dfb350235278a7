//! fwconf - Main entry point
//!
//! 1. Install the logger
//! 2. Load defaults and conf0..conf9.json from the config directory
//! 3. Apply `debug.level` to the log filter
//! 4. Run console commands from `--command` or line by line from stdin

use std::io::{self, BufRead, Write as _};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{error, info};

use fwconf::config::SysConfig;
use fwconf::console::{execute, parse_line};
use fwconf::logging;

#[derive(Parser, Debug)]
#[command(name = "fwconf", version, about = "Device configuration console")]
struct Cli {
    /// Directory holding conf0.json .. conf9.json
    #[arg(short, long, default_value = ".")]
    dir: PathBuf,

    /// Run a single console command and exit
    #[arg(short, long)]
    command: Option<String>,
}

fn main() -> ExitCode {
    #[cfg(target_os = "espidf")]
    {
        esp_idf_svc::sys::link_patches();
        esp_idf_svc::log::EspLogger::initialize_default();
    }
    #[cfg(not(target_os = "espidf"))]
    {
        if let Err(e) = logging::init() {
            eprintln!("logger: {}", e);
        }
    }

    let cli = Cli::parse();

    let cfg = match SysConfig::load(&cli.dir) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("config load failed: {}", e);
            return ExitCode::FAILURE;
        }
    };
    logging::apply_debug_level(cfg.lock().debug.level);
    info!("config loaded from {}", cfg.dir().display());

    if let Some(line) = cli.command {
        return if run_line(&cfg, &line) {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        };
    }

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        match line {
            Ok(line) => {
                run_line(&cfg, &line);
            }
            Err(e) => {
                error!("stdin: {}", e);
                return ExitCode::FAILURE;
            }
        }
    }
    ExitCode::SUCCESS
}

/// Execute one console line, printing output or the error code.
fn run_line(cfg: &SysConfig, line: &str) -> bool {
    let cmd = parse_line(line);
    let mut out = String::new();
    let result = execute(&cmd, cfg, &mut out);
    let mut stdout = io::stdout().lock();
    let _ = stdout.write_all(out.as_bytes());
    match result {
        Ok(()) => true,
        Err(e) => {
            let _ = writeln!(stdout, "{}", e);
            false
        }
    }
}
