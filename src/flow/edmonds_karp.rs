use crate::flow::residual::FlowNetwork;
use crate::graph::graph::Graph;
use crate::graph::node::NodeId;
use log::debug;

/// Outcome of a max-flow run. Edge flows are written into the graph itself.
#[derive(Debug, Clone, PartialEq)]
pub struct MaxFlow {
    value: u64,
    augmentations: usize,
    supplied: Vec<(NodeId, u32)>,
    served: Vec<(NodeId, u32)>,
}

impl MaxFlow {
    /// Total flow into the synthetic sink.
    pub fn value(&self) -> u64 {
        self.value
    }

    pub fn augmentations(&self) -> usize {
        self.augmentations
    }

    /// Flow drawn from each reservoir, in graph order.
    pub fn supplied(&self) -> &[(NodeId, u32)] {
        &self.supplied
    }

    /// Flow delivered to each city, in graph order.
    pub fn served(&self) -> &[(NodeId, u32)] {
        &self.served
    }
}

/// Maximum flow from every reservoir to every city (Edmonds-Karp).
///
/// All flows are reset first. Reservoirs are fed by a synthetic source through
/// edges of capacity `max_delivery`; cities drain into a synthetic sink through
/// edges of capacity `demand` truncated to an integer. The synthetic vertices are
/// dropped before returning.
///
/// Augmenting paths are shortest by edge count and explored in graph insertion
/// order, so repeated runs on the same graph produce the same edge flows.
pub fn edmonds_karp(graph: &mut Graph) -> MaxFlow {
    let (node_count, edge_count) = (graph.node_count(), graph.edge_count());
    let mut network = FlowNetwork::new(graph);
    network.reset_flows();

    let mut value = 0u64;
    let mut augmentations = 0usize;
    while network.find_augmenting_path() {
        let f = network.min_residual_along_path();
        if f == 0 {
            break;
        }
        network.augment_along_path(f);
        value += f as u64;
        augmentations += 1;
    }

    let supplied = network.supply().iter().map(|s| (s.node, s.flow)).collect();
    let served = network.drain().iter().map(|d| (d.node, d.flow)).collect();
    debug!(
        "max flow {} after {} augmentations ({} nodes, {} edges)",
        value, augmentations, node_count, edge_count
    );

    MaxFlow {
        value,
        augmentations,
        supplied,
        served,
    }
}
