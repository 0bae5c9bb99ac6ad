use clap::{Parser, Subcommand};

mod check_command;
mod run_command;

#[derive(Parser)]
#[command(name = "pscgate", version, about = "PSC archive validation gate")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Process one arriving archive: validate, promote or route, delete.
    Run(run_command::RunArgs),
    /// Validate a local archive offline, with no store interaction.
    Check(check_command::CheckArgs),
}

#[tokio::main(flavor = "multi_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();
    let code = match cli.command {
        Command::Run(args) => run_command::run(args).await,
        Command::Check(args) => check_command::run(args),
    };
    let code = match code {
        Ok(code) => code,
        Err(e) => {
            eprintln!("fatal: {e:?}");
            2
        }
    };
    std::process::exit(code);
}
