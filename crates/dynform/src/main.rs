//! `dynform` -- fill dynamic forms described by a field catalog.
//!
//! Parses CLI arguments with clap, resolves the runtime context, sets up
//! logging and dispatches to command handlers.

mod cli;
mod commands;
mod context;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use context::RuntimeContext;

fn main() {
    let cli = Cli::parse();

    let ctx = match RuntimeContext::from_global_args(&cli.global) {
        Ok(ctx) => ctx,
        Err(e) => exit_with_error(&e, cli.global.json),
    };

    init_logging(&ctx);

    let result = match cli.command {
        Some(Commands::Fields) => commands::fields::run(&ctx),
        Some(Commands::Fill(args)) => commands::fill::run(&ctx, &args),
        Some(Commands::Check(args)) => commands::fill::run_check(&ctx, &args),
        None => {
            use clap::CommandFactory;
            Cli::command().print_help().ok();
            println!();
            Ok(())
        }
    };

    if let Err(e) = result {
        exit_with_error(&e, ctx.json);
    }
}

/// Logs go to stderr. `-v` forces debug; otherwise `RUST_LOG` wins over the
/// configured `log.level`.
fn init_logging(ctx: &RuntimeContext) {
    let filter = if ctx.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&ctx.config.log.level))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Print the error (as JSON in JSON mode) and exit with code 1.
fn exit_with_error(e: &anyhow::Error, json: bool) -> ! {
    if json {
        let err_json = serde_json::json!({
            "error": format!("{:#}", e),
        });
        if let Ok(s) = serde_json::to_string_pretty(&err_json) {
            eprintln!("{}", s);
        }
    } else {
        eprintln!("Error: {:#}", e);
    }
    std::process::exit(1);
}
