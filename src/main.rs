use clap::Parser;
use miette::Result;
use maestro::cli::{Cli, Commands, GlobalOpts};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Environment variable overriding the log filter
const LOG_ENV: &str = "MAESTRO_LOG";

fn init_tracing(global: &GlobalOpts) {
    let filter_layer = tracing_subscriber::EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        if global.verbose {
            tracing_subscriber::EnvFilter::new("debug")
        } else if global.quiet {
            tracing_subscriber::EnvFilter::new("error")
        } else {
            tracing_subscriber::EnvFilter::new("warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior so piping to `head` exits quietly
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;
    init_tracing(&global);

    match cli.command {
        Commands::Needs(args) => maestro::cli::commands::needs::run(args, &global),
        Commands::Shortages(args) => maestro::cli::commands::shortages::run(args, &global),
        Commands::Delays(args) => maestro::cli::commands::delays::run(args, &global),
        Commands::Causes(args) => maestro::cli::commands::causes::run(args, &global),
        Commands::Recommend(args) => maestro::cli::commands::recommend::run(args, &global),
        Commands::Stages(args) => maestro::cli::commands::stages::run(args, &global),
        Commands::Employees(args) => maestro::cli::commands::employees::run(args, &global),
        Commands::Parts(args) => maestro::cli::commands::parts::run(args, &global),
        Commands::Validate(args) => maestro::cli::commands::validate::run(args, &global),
        Commands::Import(args) => maestro::cli::commands::import::run(args, &global),
        Commands::Status(args) => maestro::cli::commands::status::run(args, &global),
        Commands::Config(cmd) => maestro::cli::commands::config::run(cmd, &global),
        Commands::Completions(args) => maestro::cli::commands::completions::run(args),
    }
}
