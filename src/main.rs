use std::{path::PathBuf, process::ExitCode, time::Duration};

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};
use url::Url;

use crate::{
    browser::Chromium,
    error::Error,
    timetable::Waits,
    utils::models::{Major, Term},
};

mod browser;
mod error;
mod export;
mod group;
mod timetable;
mod utils;

#[derive(Parser)]
#[clap(version, about, long_about = None)]
struct Args {
    /// The major you want the schedule of
    #[clap(value_enum, default_value_t)]
    major: Major,

    /// The term (i.e.: 20261), or `current` to use today's date
    #[clap(short, long, value_parser, value_name = "TERM", default_value = "20261")]
    term: Term,

    /// Schedule index to scrape, overrides the major and the term
    #[clap(short, long, value_name = "URL")]
    url: Option<Url>,

    /// Output file, default to ./src/data/horario_<term>[_<major>].json
    #[clap(short, long, value_name = "FILE NAME")]
    output: Option<PathBuf>,

    /// Doesn't show the browser window
    #[clap(long)]
    headless: bool,

    /// Seconds to wait for the panels of a page
    #[clap(long, value_name = "SECONDS", default_value_t = 10)]
    timeout: u64,

    /// Pause after each navigation, in milliseconds
    #[clap(long, value_name = "MILLISECONDS", default_value_t = 1000)]
    settle: u64,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("horarios=info")),
        )
        .init();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", report(&e));
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let url = match args.url {
        Some(url) => url,
        None => Url::parse(&utils::get_url(args.major, args.term))?,
    };
    let output = args.output.unwrap_or_else(|| utils::get_output(args.major, args.term));
    let waits = Waits {
        timeout: Duration::from_secs(args.timeout),
        settle: Duration::from_millis(args.settle),
    };

    let executable = browser::find_chromium().ok_or(Error::BrowserNotFound)?;
    info!("Chromium found at {}", executable.display());

    let mut chromium = Chromium::launch(&executable, args.headless)
        .await
        .context("can't start the browser")?;

    println!("Obteniendo los horarios de {url}...");
    // Never fails, so the browser is always closed
    let timetable = timetable::timetable(&mut chromium, &url, waits).await;
    chromium.close().await;

    let (courses, groups) = timetable.count();
    info!(
        "{} semesters, {courses} courses, {groups} groups",
        timetable.semesters.len()
    );

    export::export(&timetable, &output)
        .with_context(|| format!("can't save the schedule to {}", output.display()))?;
    println!("Archivo JSON construido y exportado => {}", output.display());

    Ok(())
}

/// Error and its causes, skipping the causes already spelled out by the message before them
fn report(e: &anyhow::Error) -> String {
    let mut report = String::new();
    let mut last = String::new();
    for cause in e.chain() {
        let text = cause.to_string();
        if !last.contains(&text) {
            if !report.is_empty() {
                report.push_str(": ");
            }
            report.push_str(&text);
        }
        last = text;
    }

    report
}

#[cfg(test)]
mod tests {
    use chromiumoxide::error::CdpError;

    use super::*;

    #[test]
    fn report_shows_each_cause_once() {
        let cause = CdpError::from(std::io::Error::other("unexpected end of stream"));
        let e = anyhow::Error::from(Error::from(cause)).context("can't start the browser");

        let report = report(&e);
        assert_eq!(report.matches("unexpected end of stream").count(), 1);
        assert!(report.starts_with("can't start the browser: "));
    }

    #[test]
    fn report_keeps_distinct_causes() {
        let e = anyhow::anyhow!("disk full").context("can't save the schedule");

        assert_eq!(report(&e), "can't save the schedule: disk full");
    }
}
