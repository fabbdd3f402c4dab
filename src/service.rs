//! Pipeline assembly and the outermost generation boundary. Callers always
//! get a `(headline, body)` pair: internal stages raise freely, and this
//! boundary converts failures into degraded output.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::aggregator::aggregate;
use crate::config::{Config, PlannerKind};
use crate::data::DataStore;
use crate::error::{DataError, NewsmillError};
use crate::extract::MessageExtractor;
use crate::model::Message;
use crate::planner;
use crate::realizer::{
    realize_slots, DateRealizer, EntityNameResolver, MorphologicalRealizer, OrdinalRealizer,
    SurfaceFormat, SurfaceRealizer,
};
use crate::registry::{ConjunctionTable, ErrorStrings, Registry};
use crate::scorer::ImportanceScorer;
use crate::selector::select_templates;

#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub language: String,
    pub location: String,
    pub location_type: String,
    pub planner: PlannerKind,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Article {
    pub headline: String,
    pub body: String,
}

pub struct NewsService {
    registry: Registry,
    config: Config,
}

impl NewsService {
    pub fn new(registry: Registry, config: Config) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Generate headline and body independently. A headline failure falls
    /// back to the raw location identifier; a body failure falls back to
    /// the language's canned error string.
    pub fn run_pipeline(&self, store: &dyn DataStore, request: &GenerationRequest) -> Article {
        let seed = request.seed.unwrap_or_else(rand::random);
        info!(
            "Running pipeline: language={}, location={}, planner={}, seed={}",
            request.language, request.location, request.planner, seed
        );

        let headline = match self.generate(store, request, seed, true) {
            Ok(text) => text,
            Err(e) => {
                error!("Headline generation failed: {}", e);
                request.location.clone()
            }
        };

        let errors = self
            .registry
            .errors_for(&request.language)
            .cloned()
            .unwrap_or_else(ErrorStrings::fallback);
        let body = match self.generate(store, request, seed, false) {
            Ok(text) => text,
            Err(NewsmillError::Data(DataError::NoCandidateMessages { .. })) => {
                error!("Selection produced no messages");
                errors.no_messages_for_selection
            }
            Err(e) => {
                error!("Body generation failed: {}", e);
                errors.general_error
            }
        };

        Article { headline, body }
    }

    fn generate(
        &self,
        store: &dyn DataStore,
        request: &GenerationRequest,
        seed: u64,
        headline: bool,
    ) -> Result<String, NewsmillError> {
        // Headline and body each get a generator seeded identically, so
        // the two runs stay independent and reproducible.
        let mut rng = StdRng::seed_from_u64(seed);
        let language = request
            .language
            .split('-')
            .next()
            .unwrap_or(&request.language)
            .to_string();

        let scorer = match self.config.scoring.reference_year {
            Some(year) => ImportanceScorer::with_reference_year(year),
            None => ImportanceScorer::new(),
        };
        let extractor = MessageExtractor::new(scorer.reference_year());

        let (mut core, mut expanded) = extractor.extract(store, &request.location)?;
        scorer.score(&mut core);
        scorer.score(&mut expanded);

        let all_messages: Vec<Message> = core.iter().chain(expanded.iter()).cloned().collect();

        let (strategy, planner_config) =
            planner::strategy_for(request.planner, &self.config.planner);
        let mut plan = if headline {
            planner::headline_plan(strategy.as_ref(), &planner_config, core, &mut rng)?
        } else {
            planner::body_plan(strategy.as_ref(), &planner_config, core, expanded, &mut rng)?
        };

        let template_key = if headline {
            format!("{}-head", language)
        } else {
            language.clone()
        };
        let templates = self
            .registry
            .templates_for(&template_key)
            .ok_or_else(|| crate::error::SelectError::NoTemplatesForLanguage(template_key))?;
        select_templates(&mut plan, templates, &all_messages, &mut rng)?;

        let conjunctions = self
            .registry
            .conjunctions_for(&language)
            .cloned()
            .unwrap_or_else(|| {
                warn!("No conjunction table for language '{}'", language);
                ConjunctionTable::missing()
            });
        let mut plan = aggregate(plan, &conjunctions);

        realize_slots(
            &mut plan,
            &language,
            self.registry.slot_realizers(),
            &mut rng,
        );

        if let Some(vocab) = self.registry.date_vocab_for(&language) {
            DateRealizer::new()?.realize(&mut plan, vocab, &mut rng);
        } else {
            warn!("No date vocabulary for language '{}'", language);
        }

        EntityNameResolver::new()?.realize(&mut plan, &self.registry, &language, &mut rng);

        OrdinalRealizer.realize(&mut plan, self.registry.ordinals_for(&language));

        MorphologicalRealizer.realize(&mut plan, &language, self.registry.morphology_for(&language));

        let format = if headline {
            SurfaceFormat::headline()
        } else {
            SurfaceFormat::body_html()
        };
        let text = SurfaceRealizer::new()?.realize(&plan, &format)?;
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::InMemoryStore;
    use crate::resources::standard_registry;

    fn service() -> NewsService {
        let mut config = Config::default();
        config.scoring.reference_year = Some(2020);
        NewsService::new(standard_registry().unwrap(), config)
    }

    fn request(location: &str) -> GenerationRequest {
        GenerationRequest {
            language: "en".to_string(),
            location: location.to_string(),
            location_type: "C".to_string(),
            planner: PlannerKind::Full,
            seed: Some(42),
        }
    }

    #[test]
    fn test_pipeline_produces_headline_and_body() {
        let service = service();
        let store = InMemoryStore::sample(2020);
        let article = service.run_pipeline(&store, &request("FI"));

        assert!(!article.headline.is_empty());
        assert!(article.body.starts_with("<p>"));
        assert!(article.body.contains("</p>"));
    }

    #[test]
    fn test_unknown_location_degrades_gracefully() {
        let service = service();
        let store = InMemoryStore::sample(2020);
        let article = service.run_pipeline(&store, &request("XX"));

        // Headline falls back to the raw location, body to the canned
        // "nothing to say" string.
        assert_eq!(article.headline, "XX");
        assert!(article.body.contains("unable to write"));
    }

    #[test]
    fn test_unknown_language_degrades_to_fallback_error() {
        let service = service();
        let store = InMemoryStore::sample(2020);
        let mut req = request("FI");
        req.language = "xx".to_string();
        let article = service.run_pipeline(&store, &req);

        assert_eq!(article.headline, "FI");
        assert!(article.body.contains("Something went wrong"));
    }

    #[test]
    fn test_fixed_seed_is_deterministic() {
        let service = service();
        let store = InMemoryStore::sample(2020);
        let first = service.run_pipeline(&store, &request("FI"));
        let second = service.run_pipeline(&store, &request("FI"));

        assert_eq!(first.headline, second.headline);
        assert_eq!(first.body, second.body);
    }
}
