use clap::Parser;
use imgconv::concat::run_concat;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "concat")]
#[command(about = "Copy files, or stdin when none are given, to stdout")]
#[command(version)]
struct Cli {
    /// Files to copy, in order
    files: Vec<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();
    let code = run_concat(
        &cli.files,
        &mut io::stdin().lock(),
        &mut io::stdout().lock(),
        &mut io::stderr().lock(),
    );
    ExitCode::from(code as u8)
}
