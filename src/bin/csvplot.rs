use csvplot::cli::{parse_args, Invocation};
use csvplot::config::Settings;
use csvplot::run::plot_files;
use csvplot::{Result, USAGE};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(e) = run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    match parse_args(std::env::args().skip(1))? {
        Invocation::Help => println!("{}", USAGE),
        Invocation::Info(text) => {
            if !text.is_empty() {
                println!("{}", text);
            }
        }
        Invocation::Plot { inputs, outputs } => {
            let settings = Settings::from_env();
            plot_files(&inputs, outputs.as_deref(), &settings)?;
        }
    }
    Ok(())
}
