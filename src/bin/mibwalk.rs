//! mibwalk: step through an agent's MIB with GETNEXT and GETBULK.

use clap::Parser;
use mibwalk::cli::args::{CommonArgs, OutputArgs, WalkArgs};
use mibwalk::cli::output::{Labels, TableSink, write_error, write_outcome};
use mibwalk::cli::repl;
use mibwalk::{Browser, Fetcher};
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;

/// Interactive SNMP walker: fetch one record or one page at a time and
/// continue from where the last fetch stopped.
#[derive(Debug, Parser)]
#[command(name = "mibwalk", version, about)]
struct Args {
    #[command(flatten)]
    common: CommonArgs,

    #[command(flatten)]
    walk: WalkArgs,

    #[command(flatten)]
    output: OutputArgs,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    args.output.init_tracing();

    match run(&args).await {
        Ok(code) => code,
        Err(e) => {
            let _ = write_error(&mut std::io::stderr(), &e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &Args) -> mibwalk::Result<ExitCode> {
    let target = args.common.target()?;
    let fetcher = Fetcher::with_config(args.common.session()?, args.walk.fetch_config()?)?;
    let labels = if args.output.names {
        Labels::Names
    } else {
        Labels::LastArc
    };

    let mut browser = Browser::new(fetcher, target, TableSink::new(std::io::stdout(), labels));
    if let Some(start) = args.walk.start_oid()? {
        browser = browser.with_start(start);
    }

    let io_error = |source| mibwalk::Error::Io {
        target: None,
        source,
    };

    match args.walk.once {
        Some(mode) => {
            let cancel = CancellationToken::new();
            let watcher = repl::spawn_ctrl_c_watcher(cancel.clone());
            let outcome = browser.fetch(mode.into(), &cancel).await;
            watcher.abort();

            write_outcome(&mut std::io::stdout(), &outcome).map_err(io_error)?;
            Ok(if outcome.is_ok() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        None => {
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            repl::run(&mut browser, stdin, std::io::stdout())
                .await
                .map_err(io_error)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
