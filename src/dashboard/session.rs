use chrono::{DateTime, Utc};
use std::collections::HashMap;

use super::filter;
use crate::models::{ClusterResponse, IngressResponse, ServiceResponse, ServiceType};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    /// No fetch has completed yet.
    Loading,
    Ready,
    /// The most recent fetch failed; the previous snapshot is kept.
    Error(String),
}

/// UI state of one cluster card, keyed by cluster id in the session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardState {
    pub expanded: bool,
    pub local_search: String,
    pub service_type: Option<ServiceType>,
    // last value of "global search active and this cluster matches"
    auto_expand_signal: bool,
}

/// Filtered, render-ready view of one cluster.
#[derive(Debug, Clone)]
pub struct ClusterView<'a> {
    pub cluster: &'a ClusterResponse,
    pub expanded: bool,
    pub matches_global: bool,
    pub search_term: &'a str,
    pub service_type: Option<ServiceType>,
    pub ingresses: Vec<&'a IngressResponse>,
    pub services: Vec<&'a ServiceResponse>,
}

#[derive(Debug, Clone)]
pub struct DashboardSession {
    status: SessionStatus,
    clusters: Vec<ClusterResponse>,
    global_search: String,
    cards: HashMap<i64, CardState>,
    last_success: Option<DateTime<Utc>>,
}

impl Default for DashboardSession {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardSession {
    pub fn new() -> Self {
        Self {
            status: SessionStatus::Loading,
            clusters: Vec::new(),
            global_search: String::new(),
            cards: HashMap::new(),
            last_success: None,
        }
    }

    pub fn status(&self) -> &SessionStatus {
        &self.status
    }

    pub fn clusters(&self) -> &[ClusterResponse] {
        &self.clusters
    }

    pub fn last_success(&self) -> Option<DateTime<Utc>> {
        self.last_success
    }

    pub fn global_search(&self) -> &str {
        &self.global_search
    }

    pub fn card(&self, cluster_id: i64) -> Option<&CardState> {
        self.cards.get(&cluster_id)
    }

    /// Replaces the whole snapshot. Cards of clusters that disappeared are
    /// dropped, new clusters get a collapsed card.
    pub fn apply_snapshot(&mut self, clusters: Vec<ClusterResponse>) {
        self.cards.retain(|id, _| clusters.iter().any(|c| c.id == *id));
        for cluster in &clusters {
            self.cards.entry(cluster.id).or_default();
        }
        self.clusters = clusters;
        self.status = SessionStatus::Ready;
        self.last_success = Some(Utc::now());
        self.refresh_auto_expand();
    }

    pub fn apply_failure(&mut self, message: impl Into<String>) {
        self.status = SessionStatus::Error(message.into());
    }

    pub fn set_global_search(&mut self, term: impl Into<String>) {
        self.global_search = term.into();
        self.refresh_auto_expand();
    }

    /// Flips a card open or closed. Returns the new state, or `None` for an
    /// unknown cluster.
    pub fn toggle_expanded(&mut self, cluster_id: i64) -> Option<bool> {
        let card = self.cards.get_mut(&cluster_id)?;
        card.expanded = !card.expanded;
        Some(card.expanded)
    }

    pub fn set_local_search(&mut self, cluster_id: i64, term: impl Into<String>) -> bool {
        match self.cards.get_mut(&cluster_id) {
            Some(card) => {
                card.local_search = term.into();
                true
            }
            None => false,
        }
    }

    pub fn set_service_type(&mut self, cluster_id: i64, service_type: Option<ServiceType>) -> bool {
        match self.cards.get_mut(&cluster_id) {
            Some(card) => {
                card.service_type = service_type;
                true
            }
            None => false,
        }
    }

    pub fn view(&self) -> Vec<ClusterView<'_>> {
        self.clusters
            .iter()
            .map(|cluster| {
                let card = self.cards.get(&cluster.id);
                let local = card.map(|c| c.local_search.as_str()).unwrap_or("");
                let service_type = card.and_then(|c| c.service_type);
                let term = filter::effective_term(local, &self.global_search);

                ClusterView {
                    cluster,
                    expanded: card.map(|c| c.expanded).unwrap_or(false),
                    matches_global: filter::cluster_has_match(cluster, &self.global_search),
                    search_term: term,
                    service_type,
                    ingresses: filter::filter_ingresses(&cluster.ingresses, term),
                    services: filter::filter_services(&cluster.services, term, service_type),
                }
            })
            .collect()
    }

    // Expands a card when its match signal turns on. A card the user closed
    // while the signal stays on remains closed.
    fn refresh_auto_expand(&mut self) {
        for cluster in &self.clusters {
            let signal = filter::cluster_has_match(cluster, &self.global_search);
            if let Some(card) = self.cards.get_mut(&cluster.id) {
                if signal && !card.auto_expand_signal {
                    card.expanded = true;
                }
                card.auto_expand_signal = signal;
            }
        }
    }
}
