mod color;
mod config;
mod docker;
mod markup;
mod render;
mod units;

use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::process::exit;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::{ColorMode, Settings, SettingsLayer};
use docker::DockerSource;
use render::RenderError;

// ======================================================
// CLI
// ======================================================

#[derive(Parser)]
#[command(name = "dockerate-ps", version)]
#[command(about = "Dockerate (decorate docker commands output): List containers")]
struct Cli {
    /// Show all containers (default shows just running)
    #[arg(short, long)]
    all: bool,

    /// Don't truncate output
    #[arg(long)]
    no_trunc: bool,

    /// Only display numeric IDs
    #[arg(short, long)]
    quiet: bool,

    /// Display total file sizes
    #[arg(short, long)]
    size: bool,

    /// When to colorize the output
    #[arg(long, value_enum, env = "DOCKERATE_COLOR")]
    color: Option<ColorMode>,

    /// Only show containers whose names all contain PATTERN
    #[arg(long, value_name = "PATTERN", conflicts_with = "name_ilike")]
    name_like: Option<String>,

    /// Same as --name-like, ignoring case
    #[arg(long, value_name = "PATTERN")]
    name_ilike: Option<String>,

    /// Columns to show, in order (comma-separated)
    #[arg(long, value_name = "LIST", value_delimiter = ',')]
    columns: Vec<String>,

    /// Docker API version to use instead of negotiating one
    #[arg(long, env = "DOCKER_API_VERSION")]
    api_version: Option<String>,

    /// Log progress and the Docker API version to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Settings file (defaults to ~/.dockerate/config.json)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

impl Cli {
    /// Flags left off defer to the settings file.
    fn layer(&self) -> SettingsLayer {
        let on = |flag: bool| flag.then_some(true);

        SettingsLayer {
            all: on(self.all),
            no_trunc: on(self.no_trunc),
            quiet: on(self.quiet),
            size: on(self.size),
            color: self.color,
            columns: (!self.columns.is_empty()).then(|| self.columns.clone()),
            name_like: self.name_like.clone(),
            name_ilike: self.name_ilike.clone(),
            api_version: self.api_version.clone(),
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = match verbose {
        true => "warn,dockerate_ps=debug",
        false => "warn",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// ======================================================
// MAIN
// ======================================================

async fn run(cli: &Cli) -> Result<String> {
    let file = config::load_layer(cli.config.as_deref())?;

    let no_color = std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());
    let settings = Settings::resolve(cli.layer(), file, std::io::stdout().is_terminal(), no_color)?;

    let source = DockerSource::connect(settings.api_version.as_deref())
        .await
        .map_err(|e| anyhow!(e))
        .context("Failed to connect to the Docker engine")?;

    if cli.verbose {
        info!(api_version = %source.api_version(), "docker client ready");
    }

    Ok(render::compile_output(&source, &settings.render).await?)
}

/// Writes the table. A reader that went away early (`| head`) is not an
/// error.
fn emit<W: Write>(out: &mut W, output: &str) -> io::Result<()> {
    match out.write_all(output.as_bytes()).and_then(|_| out.flush()) {
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        result => result,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli).await {
        Ok(output) => {
            if let Err(e) = emit(&mut io::stdout().lock(), &output) {
                eprintln!("Error: could not write output: {}", e);
                exit(1);
            }
        }
        Err(e) => {
            // RenderError already spells out its cause.
            match e.downcast_ref::<RenderError>() {
                Some(err) => eprintln!("Error: {}", err),
                None => eprintln!("Error: {:#}", e),
            }

            let configuration = e
                .downcast_ref::<RenderError>()
                .is_some_and(RenderError::is_configuration);
            exit(if configuration { 2 } else { 1 });
        }
    }
}
