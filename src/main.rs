use imgconv::app::App;
use std::io::{self, Write};
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();

    let mut app = App::new(io::stdin().lock(), io::stdout().lock(), io::stderr().lock());
    let code = app.run(std::env::args_os());
    let _ = app.output.flush();
    ExitCode::from(code as u8)
}
