// Entrypoint: keep `main` small. Resolve settings, run the pipeline once,
// and turn any failure into a diagnostic plus exit code 1.

use anyhow::Context;
use clap::Parser;
use foldview::api::HttpTransport;
use foldview::cli::Cli;
use foldview::config::Settings;
use foldview::pipeline::Pipeline;
use foldview::viewer::{Artifact, HtmlViewer};
use foldview::{logging, ui, FoldError};
use tracing::debug;

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        debug!("run failed: {err}");
        match err.downcast_ref::<FoldError>() {
            Some(fold_err) => {
                for line in ui::diagnostic(fold_err) {
                    eprintln!("{line}");
                }
                std::process::exit(fold_err.exit_code());
            }
            None => {
                eprintln!("Error: {err:#}");
                std::process::exit(1);
            }
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<Artifact> {
    // A missing .env file is fine; the credential check below reports it.
    dotenvy::dotenv().ok();
    logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())
        .context("Failed to set up logging")?;
    debug!("parsed arguments: {:?}", cli);

    let settings = Settings::from_env(&cli)?;
    let transport = HttpTransport::new().context("Failed to build HTTP client")?;
    let mut viewer = HtmlViewer::new(settings.viewer.clone());
    if let Some(program) = cli.opener {
        viewer = viewer.with_opener(program);
    }

    let artifact = Pipeline::new(settings, transport, viewer).run()?;
    println!("{}", ui::confirmation(&artifact));
    Ok(artifact)
}
