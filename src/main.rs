use minish::flags::Flags;
use minish::highlight::Highlighter;
use minish::shell::Shell;
use std::env;
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut flags = Flags::new();
    let args: Vec<String> = env::args().skip(1).collect();
    if let Err(e) = flags.parse(&args) {
        eprintln!("minish: {}", e);
        flags.print_help();
        return ExitCode::FAILURE;
    }

    if flags.is_set("help") {
        flags.print_help();
        return ExitCode::SUCCESS;
    }

    if flags.is_set("version") {
        println!("minish {}", env!("CARGO_PKG_VERSION"));
        return ExitCode::SUCCESS;
    }

    let level = if flags.is_set("debug") {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    match Shell::new(&flags).and_then(|mut shell| shell.run()) {
        Ok(termination) => {
            log::debug!("shell terminated: {:?}", termination);
            ExitCode::SUCCESS
        }
        Err(e) => {
            let highlighter = Highlighter::new(!flags.is_set("no-color"));
            highlighter.report(&mut std::io::stderr(), &e.to_string());
            ExitCode::FAILURE
        }
    }
}
