//! Text and type filtering over snapshot records.
//!
//! Terms are trimmed and compared case-insensitively as substrings. Ports
//! are matched on their decimal rendering, so "44" matches 443.

use crate::models::{ClusterResponse, IngressResponse, ServiceResponse, ServiceType};

/// Fields of a child record that a search term can hit.
pub trait Searchable {
    fn namespace(&self) -> &str;
    fn name(&self) -> &str;
    fn hosts(&self) -> &[String] {
        &[]
    }
    fn external_ip(&self) -> Option<&str> {
        None
    }
    fn ports(&self) -> &[i32];
}

impl Searchable for IngressResponse {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn name(&self) -> &str {
        &self.ingress_name
    }

    fn hosts(&self) -> &[String] {
        &self.hosts
    }

    fn ports(&self) -> &[i32] {
        &self.ports
    }
}

impl Searchable for ServiceResponse {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn name(&self) -> &str {
        &self.service_name
    }

    fn external_ip(&self) -> Option<&str> {
        self.external_ip.as_deref()
    }

    fn ports(&self) -> &[i32] {
        &self.ports
    }
}

pub fn normalize_term(term: &str) -> String {
    term.trim().to_lowercase()
}

pub fn is_active(term: &str) -> bool {
    !term.trim().is_empty()
}

/// A blank term matches everything.
pub fn matches_term<T: Searchable + ?Sized>(item: &T, term: &str) -> bool {
    let term = normalize_term(term);
    if term.is_empty() {
        return true;
    }
    matches_normalized(item, &term)
}

fn matches_normalized<T: Searchable + ?Sized>(item: &T, term: &str) -> bool {
    item.namespace().to_lowercase().contains(term)
        || item.name().to_lowercase().contains(term)
        || item.hosts().iter().any(|h| h.to_lowercase().contains(term))
        || item
            .external_ip()
            .map(|ip| ip.to_lowercase().contains(term))
            .unwrap_or(false)
        || item.ports().iter().any(|p| p.to_string().contains(term))
}

/// Whether any ingress or service of the cluster matches an active term.
/// Always false for a blank term: nothing is being searched for.
pub fn cluster_has_match(cluster: &ClusterResponse, term: &str) -> bool {
    let term = normalize_term(term);
    if term.is_empty() {
        return false;
    }
    cluster.ingresses.iter().any(|i| matches_normalized(i, &term))
        || cluster.services.iter().any(|s| matches_normalized(s, &term))
}

/// A non-blank card-local term wins over the global one.
pub fn effective_term<'a>(local: &'a str, global: &'a str) -> &'a str {
    if is_active(local) {
        local
    } else {
        global
    }
}

pub fn filter_ingresses<'a>(ingresses: &'a [IngressResponse], term: &str) -> Vec<&'a IngressResponse> {
    ingresses.iter().filter(|i| matches_term(*i, term)).collect()
}

/// Text filter composed with an exact service-type match. Services without
/// a recorded type never match a selected type.
pub fn filter_services<'a>(
    services: &'a [ServiceResponse],
    term: &str,
    service_type: Option<ServiceType>,
) -> Vec<&'a ServiceResponse> {
    services
        .iter()
        .filter(|s| service_type.map_or(true, |wanted| s.service_type == Some(wanted)))
        .filter(|s| matches_term(*s, term))
        .collect()
}
