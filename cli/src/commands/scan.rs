use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use colored::*;
use tracing::{error, info, warn};

use eddyweb_common::{
    beacon::BeaconInfo,
    config::Config,
    error::ScanError,
    session::{SessionSnapshot, SessionStatus},
    success,
};
use eddyweb_core::{
    MetadataFetcher, SessionController, SessionHandle, bluetooth::BluetoothScanner,
    html::HtmlParser, http::HttpTransport,
};

use crate::terminal::{
    colors, format,
    input::{Control, InputHandle},
    print, spinner,
};
use crate::tprint;

pub async fn scan(cfg: &Config) -> anyhow::Result<()> {
    let scanner = Arc::new(
        BluetoothScanner::new()
            .await
            .context("failed to open the bluetooth stack")?,
    );
    let transport = Arc::new(HttpTransport::new(&cfg.user_agent)?);
    let fetcher = Arc::new(MetadataFetcher::new(transport, Arc::new(HtmlParser)));
    let handle = SessionController::spawn(scanner.clone(), scanner, fetcher, cfg.scan_window);

    let result = if cfg.watch {
        watch(&handle, cfg).await
    } else {
        scan_once(&handle, cfg).await
    };

    handle.shutdown().await;
    result
}

async fn start(handle: &SessionHandle) -> anyhow::Result<()> {
    match handle.start().await {
        Ok(()) => Ok(()),
        Err(e @ ScanError::PermissionDenied(_)) => {
            error!("{e}. Grant bluetooth access to this user and try again.");
            Err(e.into())
        }
        Err(e) => Err(e.into()),
    }
}

async fn scan_once(handle: &SessionHandle, cfg: &Config) -> anyhow::Result<()> {
    let start_time: Instant = Instant::now();
    start(handle).await?;

    if cfg.quiet == 0 {
        spinner::start(false);
    }

    let mut snapshots = handle.subscribe();
    let mut announced: usize = 0;
    let snapshot: SessionSnapshot = loop {
        let snapshot: SessionSnapshot = snapshots.borrow_and_update().clone();
        announce_new(&snapshot.results[announced.min(snapshot.results.len())..]);
        announced = snapshot.results.len();
        spinner::report_progress(&snapshot);

        if snapshot.is_settled() {
            break snapshot;
        }
        if snapshots.changed().await.is_err() {
            break handle.snapshot();
        }
    };

    spinner::finish();
    render(&snapshot.results, start_time.elapsed(), cfg)
}

async fn watch(handle: &SessionHandle, cfg: &Config) -> anyhow::Result<()> {
    start(handle).await?;

    let mut input = InputHandle::new();
    input.start()?;

    let mut snapshots = handle.subscribe();
    let mut start_time: Instant = Instant::now();
    let mut shown: Option<(SessionStatus, Vec<BeaconInfo>)> = None;

    loop {
        let snapshot: SessionSnapshot = snapshots.borrow_and_update().clone();
        let view = (snapshot.status, snapshot.results.clone());
        if shown.as_ref() != Some(&view) {
            render_live(&snapshot, start_time.elapsed(), cfg)?;
            shown = Some(view);
        }

        tokio::select! {
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            control = input.next() => match control {
                Some(Control::Rescan) => {
                    info!("rescanning");
                    if let Err(e) = start(handle).await {
                        error!("rescan failed: {e}");
                    }
                    start_time = Instant::now();
                }
                Some(Control::Dismiss(index)) => {
                    if !handle.dismiss(index).await? {
                        warn!("no result at index {index}");
                    }
                }
                Some(Control::Quit) | None => break,
            },
        }
    }

    drop(input);
    Ok(())
}

fn announce_new(results: &[BeaconInfo]) {
    for info in results {
        if info.is_fallback() {
            warn!("found {} (page unavailable)", info.url);
        } else {
            success!("found {}", info.title);
        }
    }
}

fn render(results: &[BeaconInfo], total_time: Duration, cfg: &Config) -> anyhow::Result<()> {
    if cfg.json {
        println!("{}", serde_json::to_string_pretty(results)?);
        return Ok(());
    }

    if results.is_empty() {
        no_beacons_found(cfg);
        return Ok(());
    }

    if cfg.quiet > 0 {
        tprint!();
    }

    print::header("nearby beacons", cfg.quiet);
    print_beacons(results, cfg);
    print_summary(results.len(), total_time, cfg);
    Ok(())
}

fn render_live(snapshot: &SessionSnapshot, elapsed: Duration, cfg: &Config) -> anyhow::Result<()> {
    if cfg.json {
        let line = serde_json::to_string(snapshot)?;
        print!("{line}\r\n");
        return Ok(());
    }

    let status: &str = match snapshot.status {
        SessionStatus::Scanning => "scanning",
        SessionStatus::Idle => "idle",
    };
    print::header(
        &format!("{status} · {} beacons · {:.0}s", snapshot.results.len(), elapsed.as_secs_f64()),
        0,
    );
    print_beacons(&snapshot.results, cfg);
    Ok(())
}

fn no_beacons_found(cfg: &Config) {
    print::header("zero beacons detected", cfg.quiet);
    if cfg.quiet == 0 {
        print::no_results();
    }
}

pub fn print_beacons(results: &[BeaconInfo], cfg: &Config) {
    for (idx, info) in results.iter().enumerate() {
        match cfg.quiet {
            2 => tprint!(&info.url),
            _ => {
                print::tree_head(idx, &info.title);
                print::as_tree_one_level(format::beacon_to_details(info));
            }
        }
        if idx + 1 != results.len() && cfg.quiet < 2 {
            tprint!();
        }
    }
}

fn print_summary(found: usize, total_time: Duration, cfg: &Config) {
    let beacons: ColoredString = format!("{found} beacons").bold().green();
    let total_time: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();
    let output: ColoredString =
        format!("Scan Complete: {beacons} identified in {total_time}").color(colors::TEXT_DEFAULT);

    match cfg.quiet {
        0 => {
            print::fat_separator();
            print::centerln(&output);
        }
        1 => {
            tprint!();
            success!("{}", output)
        }
        _ => {}
    }
}
