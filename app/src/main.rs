use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use medact_app::cli::{run, Cli};

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    // 默认的 tracing-log 桥接会转发各 crate 中 `log` 宏的输出
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("错误: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
