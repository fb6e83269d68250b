use anyhow::{Context, Result};
use clap::Parser;

use link_check::cli::Cli;
use link_check::collectors::NetworkLinkProbe;
use link_check::collectors::device::SshDeviceSession;
use link_check::config::load_settings;
use link_check::formatting::{format_bitrate, format_bytes};
use link_check::models::bits_per_second;
use link_check::storage::CsvReport;
use link_check::{LinkCheck, RunSummary};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let mut settings = load_settings(cli.config.as_deref()).context("loading settings")?;
    cli.apply_overrides(&mut settings);
    let target = cli
        .device_target(&settings)
        .context("checking device arguments")?;

    let probe = NetworkLinkProbe::new(
        cli.ftp_endpoint(&settings),
        &settings.test_file,
        settings.ping_count,
    );
    let session = SshDeviceSession::new(settings.device.timeout_for(cli.family));
    let report = CsvReport::new(&settings.report_path);

    let mut check = LinkCheck::new(&probe, &session, &report);
    let summary = check.run(cli.family, target.as_ref()).await?;

    print_summary(&summary, &settings.report_path);
    Ok(())
}

fn print_summary(summary: &RunSummary, report_path: &str) {
    println!("Link Check {}", summary.started.format("%Y-%m-%d %H:%M:%S"));
    println!("====================");
    println!(
        "  Ping (ms): min {} / avg {} / max {} / dev {}",
        summary.ping.min, summary.ping.avg, summary.ping.max, summary.ping.jitter
    );

    for (label, transfer) in [("Upload", summary.upload), ("Download", summary.download)] {
        // Already validated when the report row was built.
        let rate = bits_per_second(transfer.bytes, transfer.elapsed_secs).unwrap_or_default();
        println!(
            "  {}: {} ({} in {:.3}s)",
            label,
            format_bitrate(rate),
            format_bytes(transfer.bytes),
            transfer.elapsed_secs
        );
    }

    if let Some(stats) = &summary.stats {
        println!("  Device: {}", stats.hostname());
    }
    println!("\nAppended to {}", report_path);
}
