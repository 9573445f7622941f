//! Headless field map viewer.
//!
//! Runs the same load sequence as the browser client against a live record
//! API, then prints the per-category marker counts, the fragment that would
//! be in the address bar, and optionally the detail panel for one marker.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::Parser;
use fieldmap::layers::LayerTrait;
use fieldmap::{
    ClientConfig, HeadlessWidget, HttpRecordSource, MapClient, MarkerBinding,
    MemoryDocument, MemoryLocation, RefreshReport, Viewport,
};

/// Load field records for a viewport and print what the map would show.
#[derive(Parser)]
#[command(name = "fieldmap-app")]
#[command(about = "Load field records for a viewport and print what the map would show")]
struct Cli {
    /// Base URL of the record API, e.g. `http://localhost:8080`.
    #[arg(long)]
    api: Option<String>,

    /// Initial URL fragment, e.g. `north=36.2&south=36.0&east=-117.9&west=-118.1`.
    #[arg(long, default_value = "")]
    fragment: String,

    /// JSON client configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Pan to this fragment after loading and refresh again.
    #[arg(long)]
    pan: Option<String>,

    /// Show the detail panel for a marker, as `<category>:<index>`.
    #[arg(long)]
    show: Option<String>,
}

fn parse_binding(spec: &str) -> anyhow::Result<MarkerBinding> {
    let Some((category, index)) = spec.rsplit_once(':') else {
        bail!("expected <category>:<index>, got {spec:?}");
    };
    let index = index
        .parse()
        .with_context(|| format!("invalid marker index {index:?}"))?;
    Ok(MarkerBinding::new(category, index, None))
}

fn print_report(client: &MapClient, document: &MemoryDocument, report: &RefreshReport) {
    for category in client.synchronizer().categories() {
        let shown = document
            .content(&category.count_element_id())
            .unwrap_or_else(|| "-".to_string());
        match report.outcomes.iter().find(|o| o.category == category.id) {
            Some(outcome) => match &outcome.result {
                Ok(_) => println!("{:<16} {}", category.id, shown),
                Err(e) => println!("{:<16} {} (stale: {})", category.id, shown, e),
            },
            None => println!("{:<16} {}", category.id, shown),
        }
    }
}

fn print_layers(client: &MapClient) -> anyhow::Result<()> {
    let total = client.with_layers(|layers| {
        layers.for_each_layer(|layer| match layer.bounds() {
            Some(b) => println!(
                "{:<16} {:>4} markers within {:.4},{:.4} .. {:.4},{:.4}",
                layer.name(),
                layer.len(),
                b.south(),
                b.west(),
                b.north(),
                b.east()
            ),
            None => println!("{:<16} {:>4} markers", layer.name(), layer.len()),
        });
        layers.marker_count()
    })?;
    println!("{total} markers in total");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fieldmap::init_logging();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ClientConfig::from_json_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => ClientConfig::default(),
    };
    if let Some(api) = cli.api {
        config = config.with_api_base_url(api);
    }
    if config.api_base_url.is_empty() {
        bail!("no API base URL; pass --api or set api_base_url in the config");
    }

    let source = Arc::new(HttpRecordSource::from_config(&config)?);
    let widget = HeadlessWidget::new();
    let location = MemoryLocation::new(cli.fragment);
    let document = Arc::new(MemoryDocument::new());

    let mut client = MapClient::new(
        config,
        source,
        Box::new(widget.clone()),
        Box::new(location),
        document.clone(),
    )?;

    let report = client.load().await?;
    print_report(&client, &document, &report);

    if let Some(pan) = &cli.pan {
        let target = Viewport::from_fragment(pan).context("invalid --pan fragment")?;
        widget.move_to(target.bounds())?;
        let report = client.on_viewport_changed().await?;
        println!();
        print_report(&client, &document, &report);
    }

    println!();
    print_layers(&client)?;

    println!("\n#{}", client.viewport().to_fragment());

    if let Some(show) = &cli.show {
        let binding = parse_binding(show)?;
        let view = client.activate(&binding)?;
        println!("\n{}", view.to_text());
        log::debug!(
            "detail html: {}",
            document
                .content(&client.config().detail_element_id)
                .unwrap_or_default()
        );
    }

    Ok(())
}
