//! Application state and dependency injection.

use suite_core::RetryPolicy;
use suite_publish::{HttpPublisher, PublishService};
use suite_rig::{FlowContext, ToolRegistry};
use suite_scraper::Scraper;
use suite_store::{CatalogRepository, UserProjectRepository};

use crate::TRACING_TARGET_SERVICE;
use crate::service::{AuthKeys, Result, ServiceConfig};

/// Application state.
///
/// Used for the [`State`] extraction (dependency injection).
///
/// [`State`]: axum::extract::State
#[must_use = "state does nothing unless you use it"]
#[derive(Debug, Clone)]
pub struct ServiceState {
    registry: ToolRegistry,
    publisher: PublishService,
    scraper: Scraper,

    catalog: CatalogRepository,
    user_projects: UserProjectRepository,

    auth_keys: AuthKeys,
}

impl ServiceState {
    /// Initializes application state from configuration.
    ///
    /// Builds every collaborator once; the registry and its schemas are
    /// shared read-only for the lifetime of the process.
    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        let retry = RetryPolicy::from(&config.retry);
        let store = config.store.connect()?;

        let publisher = PublishService::new(HttpPublisher::new(config.publish.clone())?, retry);
        let completion = config.model.connect()?;
        let context = FlowContext::new(completion, publisher.clone(), retry);
        let registry = ToolRegistry::new(context)?;

        let catalog = CatalogRepository::new(store.clone());
        let scraper = Scraper::new(&config.scraper, catalog.clone(), retry)?;

        let service_state = Self {
            registry,
            publisher,
            scraper,
            catalog,
            user_projects: UserProjectRepository::new(store),
            auth_keys: AuthKeys::from_config(&config.auth)?,
        };

        tracing::info!(
            target: TRACING_TARGET_SERVICE,
            tools = service_state.registry.len(),
            "service state ready"
        );

        Ok(service_state)
    }

    /// Replaces the tool registry.
    #[cfg(test)]
    pub(crate) fn with_registry(mut self, registry: ToolRegistry) -> Self {
        self.registry = registry;
        self
    }
}

macro_rules! impl_di {
    ($($f:ident: $t:ty),+) => {$(
        impl axum::extract::FromRef<ServiceState> for $t {
            fn from_ref(state: &ServiceState) -> Self {
                state.$f.clone()
            }
        }
    )+};
}

impl_di!(registry: ToolRegistry);
impl_di!(publisher: PublishService);
impl_di!(scraper: Scraper);

impl_di!(catalog: CatalogRepository);
impl_di!(user_projects: UserProjectRepository);

impl_di!(auth_keys: AuthKeys);
