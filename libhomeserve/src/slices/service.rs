//! Service catalog and provider lookups
//!
//! Each fetch overwrites its field wholesale; a category fetch or a search
//! replaces whatever the previous catalog fetch stored in `services`.

use std::cmp::Ordering;

use super::lifecycle::{settle, Phase, RequestStatus, Tracked};
use crate::api::NearbyQuery;
use crate::error::ActionError;
use crate::store::Store;
use crate::types::{Provider, Service};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServiceState {
    pub services: Vec<Service>,
    pub nearby_providers: Vec<Provider>,
    pub selected_provider: Option<Provider>,
    pub selected_category: Option<String>,
    pub status: RequestStatus,
}

impl Tracked for ServiceState {
    fn status(&self) -> &RequestStatus {
        &self.status
    }
    fn status_mut(&mut self) -> &mut RequestStatus {
        &mut self.status
    }
}

impl ServiceState {
    /// Case-insensitive match on name, category or description
    pub fn filter_services(&self, text: &str) -> Vec<&Service> {
        let needle = text.trim().to_lowercase();
        if needle.is_empty() {
            return self.services.iter().collect();
        }
        self.services
            .iter()
            .filter(|service| {
                service.name.to_lowercase().contains(&needle)
                    || service.category.to_lowercase().contains(&needle)
                    || service.description.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Distinct categories in catalog order
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = Vec::new();
        for service in &self.services {
            if !categories.contains(&service.category.as_str()) {
                categories.push(&service.category);
            }
        }
        categories
    }

    /// Nearby providers, best rated first; ties broken by review count
    pub fn providers_by_rating(&self) -> Vec<&Provider> {
        let mut providers: Vec<&Provider> = self.nearby_providers.iter().collect();
        providers.sort_by(|a, b| {
            b.rating
                .partial_cmp(&a.rating)
                .unwrap_or(Ordering::Equal)
                .then_with(|| b.review_count.cmp(&a.review_count))
        });
        providers
    }

    pub fn available_providers(&self) -> Vec<&Provider> {
        self.nearby_providers
            .iter()
            .filter(|provider| provider.is_available)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ServiceAction {
    FetchAll(Phase<Vec<Service>>),
    FetchByCategory(Phase<Vec<Service>>),
    Search(Phase<Vec<Service>>),
    FetchNearbyProviders(Phase<Vec<Provider>>),
    FetchProviderById(Phase<Provider>),
    SelectCategory(Option<String>),
    ClearSelectedProvider,
    ClearError,
}

impl ServiceAction {
    pub fn name(&self) -> &'static str {
        match self {
            ServiceAction::FetchAll(_) => "service/fetchAll",
            ServiceAction::FetchByCategory(_) => "service/fetchByCategory",
            ServiceAction::Search(_) => "service/search",
            ServiceAction::FetchNearbyProviders(_) => "service/fetchNearbyProviders",
            ServiceAction::FetchProviderById(_) => "service/fetchProviderById",
            ServiceAction::SelectCategory(_) => "service/selectCategory",
            ServiceAction::ClearSelectedProvider => "service/clearSelectedProvider",
            ServiceAction::ClearError => "service/clearError",
        }
    }

    pub fn phase(&self) -> Option<&'static str> {
        match self {
            ServiceAction::FetchAll(p)
            | ServiceAction::FetchByCategory(p)
            | ServiceAction::Search(p) => Some(p.name()),
            ServiceAction::FetchNearbyProviders(p) => Some(p.name()),
            ServiceAction::FetchProviderById(p) => Some(p.name()),
            _ => None,
        }
    }
}

pub fn reduce(state: ServiceState, action: ServiceAction) -> ServiceState {
    match action {
        ServiceAction::FetchAll(phase)
        | ServiceAction::FetchByCategory(phase)
        | ServiceAction::Search(phase) => {
            settle(state, phase, |s, services| s.services = services)
        }
        ServiceAction::FetchNearbyProviders(phase) => {
            settle(state, phase, |s, providers| s.nearby_providers = providers)
        }
        ServiceAction::FetchProviderById(phase) => {
            settle(state, phase, |s, provider| s.selected_provider = Some(provider))
        }
        ServiceAction::SelectCategory(category) => ServiceState {
            selected_category: category,
            ..state
        },
        ServiceAction::ClearSelectedProvider => ServiceState {
            selected_provider: None,
            ..state
        },
        ServiceAction::ClearError => {
            let mut state = state;
            state.status.error = None;
            state
        }
    }
}

// === Async actions ===

impl Store {
    pub async fn fetch_services(&self) -> Result<Vec<Service>, ActionError> {
        self.run(ServiceAction::FetchAll, self.api().fetch_services())
            .await
    }

    pub async fn fetch_services_by_category(
        &self,
        category: &str,
    ) -> Result<Vec<Service>, ActionError> {
        self.run(
            ServiceAction::FetchByCategory,
            self.api().fetch_services_by_category(category),
        )
        .await
    }

    pub async fn search_services(&self, query: &str) -> Result<Vec<Service>, ActionError> {
        self.run(ServiceAction::Search, self.api().search_services(query))
            .await
    }

    pub async fn fetch_nearby_providers(
        &self,
        query: NearbyQuery,
    ) -> Result<Vec<Provider>, ActionError> {
        self.run(ServiceAction::FetchNearbyProviders, async {
            if !(query.radius_km > 0.0) {
                return Err(ActionError::Validation("radius must be positive".to_string()));
            }
            self.api().fetch_nearby_providers(&query).await
        })
        .await
    }

    pub async fn fetch_provider_by_id(&self, id: &str) -> Result<Provider, ActionError> {
        self.run(ServiceAction::FetchProviderById, self.api().fetch_provider(id))
            .await
    }
}
