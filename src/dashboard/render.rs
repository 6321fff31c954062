use std::fmt::Write;

use super::session::{ClusterView, DashboardSession, SessionStatus};

/// Plain-text rendering of the session, one block per cluster.
pub fn render_text(session: &DashboardSession) -> String {
    let mut out = String::new();

    match session.status() {
        SessionStatus::Loading => {
            out.push_str("Loading clusters...\n");
            return out;
        }
        SessionStatus::Error(message) => {
            let _ = writeln!(out, "Error: {}", message);
            return out;
        }
        SessionStatus::Ready => {}
    }

    let views = session.view();
    if views.is_empty() {
        out.push_str("No clusters found\n");
        return out;
    }

    for view in &views {
        render_cluster(&mut out, view);
    }
    out
}

fn render_cluster(out: &mut String, view: &ClusterView<'_>) {
    let cluster = view.cluster;
    let marker = if view.expanded { "v" } else { ">" };
    let _ = writeln!(
        out,
        "{} {}  (API {})",
        marker, cluster.cluster_name, cluster.apiserver_version
    );
    let _ = writeln!(out, "    Kubelet Versions: {}", cluster.kubelet_versions.join(", "));
    let _ = writeln!(out, "    Kernel Versions: {}", cluster.kernel_versions.join(", "));

    if !view.expanded {
        return;
    }

    let searching = !view.search_term.trim().is_empty();

    let _ = writeln!(out, "    Ingresses ({})", view.ingresses.len());
    for ingress in &view.ingresses {
        let _ = write!(out, "      {}/{}  hosts: {}", ingress.namespace, ingress.ingress_name, ingress.hosts.join(", "));
        if !ingress.ports.is_empty() {
            let _ = write!(out, "  ports: {}", join_ports(&ingress.ports));
        }
        out.push('\n');
    }
    if view.ingresses.is_empty() {
        let _ = writeln!(
            out,
            "      {}",
            if searching { "No matching ingresses found" } else { "No ingresses found" }
        );
    }

    let _ = writeln!(out, "    Services ({})", view.services.len());
    for service in &view.services {
        let _ = write!(out, "      {}/{}", service.namespace, service.service_name);
        if let Some(service_type) = service.service_type {
            let _ = write!(out, "  type: {}", service_type);
        }
        if let Some(ip) = &service.external_ip {
            let _ = write!(out, "  external ip: {}", ip);
        }
        let _ = writeln!(out, "  ports: {}", join_ports(&service.ports));
    }
    if view.services.is_empty() {
        let _ = writeln!(
            out,
            "      {}",
            if searching || view.service_type.is_some() {
                "No matching services found"
            } else {
                "No services found"
            }
        );
    }
}

fn join_ports(ports: &[i32]) -> String {
    ports
        .iter()
        .map(i32::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
