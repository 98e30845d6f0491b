use color_eyre::Result;
use overlay_core::legend::{Legend, Swatch};
use overlay_core::state::LoadStatus;
use overlay_core::{catalog, DatasetId, MapState};
use overlay_tui::config::Config;
use overlay_tui::loader::{load_event, Loader};
use serde::Serialize;
use tokio::task::JoinSet;

/// Loads the datasets without a UI and prints what each one holds.
pub async fn run_headless(
    loader: &Loader,
    config: &Config,
    only: Option<DatasetId>,
    json: bool,
) -> Result<()> {
    let descriptors: Vec<_> = catalog(&config.data_base_url)
        .into_iter()
        .filter(|descriptor| only.map_or(true, |id| id == descriptor.id))
        .collect();
    let ids: Vec<DatasetId> = descriptors.iter().map(|descriptor| descriptor.id).collect();

    let mut state = MapState::new();
    let mut tasks = JoinSet::new();
    for descriptor in descriptors {
        state.begin_load(descriptor.id);
        let loader = loader.clone();
        tasks.spawn(async move {
            let result = loader.fetch_layer(&descriptor).await;
            load_event(descriptor.id, result)
        });
    }
    while let Some(completed) = tasks.join_next().await {
        state.handle(completed?);
    }

    let summary = build_headless_summary(&state, &config.data_base_url, &ids);
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        render_headless_summary(&summary);
    }

    Ok(())
}

fn render_headless_summary(summary: &HeadlessSummary) {
    println!("\nOverlay Datasets");
    println!("================");
    println!("Source: {}", summary.data_base_url);

    for dataset in &summary.datasets {
        println!();
        match &dataset.error {
            Some(error) => println!("{} ({}): failed - {error}", dataset.label, dataset.shape),
            None => println!(
                "{} ({}): {} features, {} categories",
                dataset.label,
                dataset.shape,
                dataset.features,
                dataset.legend.len()
            ),
        }
        for row in &dataset.legend {
            println!("  {} {:<20} {}", row.glyph, row.color, row.category);
        }
    }
}

fn build_headless_summary(state: &MapState, data_base_url: &str, ids: &[DatasetId]) -> HeadlessSummary {
    let datasets = ids
        .iter()
        .map(|&id| {
            let (status, error) = match state.load_status(id) {
                Some(LoadStatus::Loaded) => ("loaded", None),
                Some(LoadStatus::Failed(reason)) => ("failed", Some(reason.clone())),
                Some(LoadStatus::Loading) | None => ("loading", None),
            };
            let layer = state.layer(id);
            let legend = layer
                .map(|layer| {
                    Legend::for_layer(layer)
                        .rows
                        .into_iter()
                        .map(|row| HeadlessLegendRow {
                            swatch: row.swatch,
                            glyph: row.swatch.glyph(),
                            color: row.color.css(),
                            category: row.label().to_string(),
                        })
                        .collect()
                })
                .unwrap_or_default();

            HeadlessDataset {
                key: id.as_str(),
                label: id.label(),
                shape: id.shape().as_str(),
                status,
                error,
                features: layer.map_or(0, |layer| layer.features.len()),
                legend,
            }
        })
        .collect();

    HeadlessSummary {
        data_base_url: data_base_url.to_string(),
        datasets,
    }
}

#[derive(Debug, Serialize)]
struct HeadlessSummary {
    data_base_url: String,
    datasets: Vec<HeadlessDataset>,
}

#[derive(Debug, Serialize)]
struct HeadlessDataset {
    key: &'static str,
    label: &'static str,
    shape: &'static str,
    status: &'static str,
    error: Option<String>,
    features: usize,
    legend: Vec<HeadlessLegendRow>,
}

#[derive(Debug, Serialize)]
struct HeadlessLegendRow {
    swatch: Swatch,
    #[serde(skip)]
    glyph: &'static str,
    color: String,
    category: String,
}
