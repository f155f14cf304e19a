//! Recipe and recipe type queries.

use std::sync::Arc;

use crate::config::{DeckConfig, PollIntervals};
use crate::models::{Recipe, RecipeDetails, RecipeType, ResultPage};
use crate::poll::{PollPolicy, PollerFactory};
use crate::resource::{RecipesParams, ResourceDescriptor};
use crate::traits::FetchError;
use crate::transform;

use super::ServiceSubscription;

/// Queries over `recipes/` and `recipe-types/`.
#[derive(Clone)]
pub struct RecipesService {
    factory: PollerFactory,
    config: Arc<DeckConfig>,
    policy: PollPolicy,
}

impl RecipesService {
    pub fn new(factory: PollerFactory, config: Arc<DeckConfig>) -> Self {
        Self {
            factory,
            config,
            policy: PollPolicy::StopOnError,
        }
    }

    /// Use `policy` for the polls this service starts.
    pub fn with_policy(mut self, policy: PollPolicy) -> Self {
        self.policy = policy;
        self
    }

    fn recipes_resource(&self, params: &RecipesParams) -> ResourceDescriptor {
        ResourceDescriptor::new(self.config.url("recipes/")).with_params(params.to_query())
    }

    /// Poll the recipes grid.
    pub fn recipes(&self, params: &RecipesParams) -> ServiceSubscription<ResultPage<Recipe>> {
        let sub = self.factory.poll_with_policy(
            &self.recipes_resource(params),
            PollIntervals::duration(self.config.poll_intervals.recipes),
            self.policy,
        );
        ServiceSubscription::new(sub, |value| ResultPage::from_value(Some(value)))
    }

    /// Fetch one page of the recipes grid.
    pub async fn recipes_once(
        &self,
        params: &RecipesParams,
    ) -> Result<ResultPage<Recipe>, FetchError> {
        let value = self.factory.fetch_once(&self.recipes_resource(params)).await?;
        Ok(ResultPage::from_value(Some(value)))
    }

    /// Fetch one recipe with its constituent jobs.
    pub async fn recipe_details_once(&self, id: i64) -> Result<RecipeDetails, FetchError> {
        let resource = ResourceDescriptor::new(self.config.url(&format!("recipes/{}/", id)));
        let value = self.factory.fetch_once(&resource).await?;
        Ok(transform::build(Some(value)))
    }

    /// Fetch the recipe type catalog.
    pub async fn recipe_types_once(&self) -> Result<ResultPage<RecipeType>, FetchError> {
        let resource = ResourceDescriptor::new(self.config.url("recipe-types/"));
        let value = self.factory.fetch_once(&resource).await?;
        Ok(ResultPage::from_value(Some(value)))
    }

    /// Fetch one recipe type with its definition.
    pub async fn recipe_type_details_once(&self, id: i64) -> Result<RecipeType, FetchError> {
        let resource = ResourceDescriptor::new(self.config.url(&format!("recipe-types/{}/", id)));
        let value = self.factory.fetch_once(&resource).await?;
        Ok(transform::build(Some(value)))
    }
}
