//! Connected components of the taxi route network

use super::{route_data, NetEdge, NetworkContext};
use crate::code::Code;
use crate::context::ValidationContext;
use crate::diagnostic::Findings;
use std::collections::{HashMap, VecDeque};
use tarmac_core::NodeId;
use tarmac_scene::entity::VehicleClass;

/// Group edges into components by shared endpoints, in order of each
/// component's first edge. Returns indices into `edges`.
fn components(edges: &[&NetEdge]) -> Vec<Vec<usize>> {
    let mut by_node: HashMap<NodeId, Vec<usize>> = HashMap::new();
    for (i, e) in edges.iter().enumerate() {
        by_node.entry(e.source).or_default().push(i);
        by_node.entry(e.target).or_default().push(i);
    }

    let mut seen = vec![false; edges.len()];
    let mut out = Vec::new();
    for first in 0..edges.len() {
        if seen[first] {
            continue;
        }
        seen[first] = true;
        let mut members = vec![first];
        let mut queue = VecDeque::from([first]);
        while let Some(i) = queue.pop_front() {
            for n in [edges[i].source, edges[i].target] {
                for &j in by_node.get(&n).into_iter().flatten() {
                    if !seen[j] {
                        seen[j] = true;
                        members.push(j);
                        queue.push_back(j);
                    }
                }
            }
        }
        members.sort_unstable();
        out.push(members);
    }
    out
}

fn vehicle_label(vehicle: VehicleClass) -> &'static str {
    match vehicle {
        VehicleClass::Aircraft => "taxi route",
        VehicleClass::GroundTruck => "ground truck route",
    }
}

/// Each vehicle class should have one connected network. The largest
/// component is taken as the main one; every other component is reported.
pub fn check_components(ctx: &ValidationContext, net: &NetworkContext, out: &mut Findings) {
    for vehicle in [VehicleClass::Aircraft, VehicleClass::GroundTruck] {
        let edges: Vec<&NetEdge> = net
            .routes
            .iter()
            .filter(|e| route_data(ctx, e).is_some_and(|r| r.vehicle == vehicle))
            .collect();
        let groups = components(&edges);
        if groups.len() < 2 {
            continue;
        }

        let main = groups
            .iter()
            .enumerate()
            .max_by(|(ia, a), (ib, b)| a.len().cmp(&b.len()).then(ib.cmp(ia)))
            .map(|(i, _)| i)
            .unwrap_or(0);

        let label = vehicle_label(vehicle);
        for (i, group) in groups.iter().enumerate() {
            if i == main {
                continue;
            }
            out.emit(
                Code::RouteNetworkDisconnected,
                format!(
                    "{} {} edge(s) are not connected to the main {} network of {} edge(s).",
                    group.len(),
                    label,
                    label,
                    groups[main].len()
                ),
                group.iter().map(|&j| edges[j].id),
            );
        }
    }
}
