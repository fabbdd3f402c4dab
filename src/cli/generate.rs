use anyhow::Context;
use chrono::Datelike;

use newsmill::config::Config;
use newsmill::data::InMemoryStore;
use newsmill::resources::standard_registry;
use newsmill::service::{GenerationRequest, NewsService};

use super::GenerateArgs;

pub fn execute(args: GenerateArgs) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => Config::default(),
    };
    config.validate()?;

    let store = load_store(args.data.as_deref(), &config)?;

    let registry = standard_registry()?;
    let service = NewsService::new(registry, config);

    let request = GenerationRequest {
        language: args.language,
        location: args.location,
        location_type: args.location_type,
        planner: args.planner,
        seed: args.seed,
    };
    let article = service.run_pipeline(&store, &request);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&article)?);
    } else {
        println!("{}", article.headline);
        println!();
        println!("{}", article.body);
    }
    Ok(())
}

pub(super) fn load_store(
    data: Option<&std::path::Path>,
    config: &Config,
) -> anyhow::Result<InMemoryStore> {
    match data {
        Some(path) => InMemoryStore::from_json_file(path)
            .with_context(|| format!("loading data from {}", path.display())),
        None => {
            let year = config
                .scoring
                .reference_year
                .unwrap_or_else(|| chrono::Utc::now().year());
            Ok(InMemoryStore::sample(year))
        }
    }
}
