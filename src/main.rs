use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{fmt, EnvFilter};

use timetrack::cli::args::{Cli, Commands};
use timetrack::cli::commands;
use timetrack::config::{Config, Paths};
use timetrack::error::TimetrackError;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

/// Log to stderr. `RUST_LOG` wins over `-v`, which wins over the default.
fn init_logging(verbose: bool) {
    let default = if verbose { "timetrack=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("warning: logging was already initialized");
    }
}

fn run(cli: Cli) -> Result<(), TimetrackError> {
    let paths = Paths::new()?;
    let config = Config::load(&paths)?;
    config.general.color.apply();

    let format = cli.output.unwrap_or(config.general.default_output);
    tracing::debug!(root = %paths.root.display(), ?format, "resolved data directory");

    let output = match cli.command {
        Commands::Start(args) => commands::start(&paths, &args, format)?,
        Commands::Pause => commands::pause(&paths, format)?,
        Commands::Resume => commands::resume(&paths, format)?,
        Commands::Stop => commands::stop(&paths, format)?,
        Commands::Status => commands::status(&paths, format)?,
        Commands::Add(args) => commands::add(&paths, &args, format)?,
        Commands::Edit(args) => commands::edit(&paths, &args, format)?,
        Commands::Delete { id } => commands::delete(&paths, id, format)?,
        Commands::Remove(args) => commands::remove(&paths, &args, format)?,
        Commands::List(args) => commands::list(&paths, &args, format)?,
        Commands::Report(args) => commands::report(&paths, &config, &args, format)?,
        Commands::Categories(args) => commands::categories(&paths, args.command, format)?,
        Commands::Completions { shell } => commands::completions(shell)?,
    };

    if !output.is_empty() {
        println!("{}", output);
    }
    Ok(())
}
