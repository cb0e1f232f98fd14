use std::{io, process::ExitCode, sync::atomic::Ordering, time::Duration};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use profwatch_api::{model::monitor::ListPolicy, DEFAULT_BASE_URL};
use profwatch_cli::{
    helper::{
        ctx::{Args, OutputFormat},
        detect::Detector,
        form::{Component, Form},
        monitor::Monitor,
        session::{run_interactive, submit_once},
        utils::build_api,
    },
    stdio::stdin_lines,
    DONE,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Fake profile detection client")]
struct Cli {
    /// Origin of the detection backend
    #[arg(
        long,
        global = true,
        env = "PROFWATCH_API_BASE_URL",
        default_value = DEFAULT_BASE_URL
    )]
    api_base_url: String,
    /// Give up on a request after this many seconds
    #[arg(long, global = true, env = "PROFWATCH_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check one username
    Detect {
        /// Read one username per line from stdin when omitted
        username: Option<String>,
        #[arg(long, short = 'i')]
        interactive: bool,
    },
    /// Check a comma-separated list of usernames
    Monitor {
        /// Read one list per line from stdin when omitted
        profiles: Option<String>,
        #[arg(long, short = 'i')]
        interactive: bool,
        /// Drop repeated usernames
        #[arg(long)]
        dedup: bool,
        /// Drop empty entries
        #[arg(long)]
        skip_empty: bool,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_writer(io::stderr),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    info!("Started with arguments: {cli:?}");
    let Cli {
        api_base_url,
        timeout_secs,
        format,
        command,
    } = cli;

    let policy = match command {
        Command::Monitor {
            dedup, skip_empty, ..
        } => ListPolicy { dedup, skip_empty },
        Command::Detect { .. } => ListPolicy::default(),
    };

    let args = Args::builder()
        .api_base_url(api_base_url)
        .timeout(timeout_secs.map(Duration::from_secs))
        .format(format)
        .list_policy(policy)
        .build()?;

    ctrlc::set_handler(move || {
        info!("Signal handler called");
        DONE.store(true, Ordering::Relaxed);
    })?;

    let ok = match command {
        Command::Detect {
            username,
            interactive,
        } => run(&args, Form::new(Detector::new()), username, interactive).await?,
        Command::Monitor {
            profiles,
            interactive,
            ..
        } => run(&args, Form::new(Monitor::new(policy)), profiles, interactive).await?,
    };

    info!("Task Exit");
    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

async fn run<C: Component>(
    args: &Args,
    mut form: Form<C>,
    input: Option<String>,
    interactive: bool,
) -> Result<bool> {
    let api = build_api(&args)?;
    let mut out = io::stdout();

    match input {
        Some(input) if !interactive => {
            submit_once(&args, &api, &mut form, &input, &mut out, &DONE).await
        }
        Some(input) => {
            submit_once(&args, &api, &mut form, &input, &mut out, &DONE).await?;
            run_interactive(&args, &api, &mut form, stdin_lines(), &mut out, &DONE).await?;
            Ok(true)
        }
        None => {
            run_interactive(&args, &api, &mut form, stdin_lines(), &mut out, &DONE).await?;
            Ok(true)
        }
    }
}
