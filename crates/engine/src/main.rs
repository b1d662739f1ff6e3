//! Outfitter Engine - demo entry point.
//!
//! Renders the sample Fighter and Acolyte, takes every default choice and
//! prints the resulting picks as JSON.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use outfitter_engine::infrastructure::app_settings::EngineConfig;
use outfitter_engine::infrastructure::sample_content::{self, background_uuid, class_uuid};
use outfitter_engine::use_cases::equipment::{
    CollectOptions, SelectedSource, SelectedSources, SelectionState, SourceFilter,
};
use outfitter_engine::App;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from repo root (the binary may run from `crates/engine`).
    load_dotenv_from_repo_root();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "outfitter_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = EngineConfig::from_env()?;
    tracing::info!(ruleset = %config.ruleset, "Starting Outfitter Engine");

    let library = Arc::new(sample_content::library(&config.settings_namespace));
    let app = App::in_memory(config, library);

    let selected = SelectedSources::new(
        Some(SelectedSource::new(class_uuid("fighter"))),
        Some(SelectedSource::new(background_uuid("acolyte"))),
    );
    let Some(tree) = app
        .equipment()
        .render(&selected, SourceFilter::All)
        .await
        .into_tree()
    else {
        anyhow::bail!("Render was superseded");
    };

    let state = SelectionState::new();
    let picks = app
        .equipment()
        .collect(&tree, &state, CollectOptions::default())
        .await;
    let wealth = app.equipment().collect_wealth(&tree, &state);

    let output = serde_json::json!({
        "controls": tree,
        "picks": picks,
        "wealth": wealth,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
