use crate::error::Result;
use crate::graph::edge::EdgeId;
use crate::graph::graph::{Detached, Graph};
use std::ops::{Deref, DerefMut};

/// A temporary removal from the network.
///
/// While the outage is alive the graph behaves as if the node or edge never
/// existed. Dropping it puts everything back with the same ids, adjacency order
/// and flows as before the outage started.
pub struct Outage<'g> {
    graph: &'g mut Graph,
    detached: Option<Detached>,
    flows: Vec<u32>,
}

impl<'g> Outage<'g> {
    /// Takes a node offline together with every edge entering or leaving it.
    pub fn node(graph: &'g mut Graph, code: &str) -> Result<Self> {
        let flows = graph.flows();
        let detached = graph.detach_node(code)?;
        Ok(Self {
            graph,
            detached: Some(detached),
            flows,
        })
    }

    pub fn edge(graph: &'g mut Graph, id: EdgeId) -> Result<Self> {
        let flows = graph.flows();
        let detached = graph.detach_edge(id)?;
        Ok(Self {
            graph,
            detached: Some(detached),
            flows,
        })
    }
}

impl Deref for Outage<'_> {
    type Target = Graph;

    fn deref(&self) -> &Graph {
        self.graph
    }
}

impl DerefMut for Outage<'_> {
    fn deref_mut(&mut self) -> &mut Graph {
        self.graph
    }
}

impl Drop for Outage<'_> {
    fn drop(&mut self) {
        if let Some(detached) = self.detached.take() {
            self.graph.reattach(detached);
        }
        self.graph.restore_flows(&self.flows);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NetworkError;
    use crate::flow::edmonds_karp::edmonds_karp;
    use crate::graph::node::Node;

    fn network() -> Graph {
        let mut graph = Graph::new();
        graph.add_node(Node::reservoir(1, "R_1", "Alto", "Lisboa", 10)).unwrap();
        graph.add_node(Node::station(1, "PS_1")).unwrap();
        graph.add_node(Node::city(1, "C_1", "Sintra", 10.0, 100)).unwrap();
        graph.add_edge("R_1", "PS_1", 10, false).unwrap();
        graph.add_edge("PS_1", "C_1", 8, true).unwrap();
        graph
    }

    fn state(graph: &Graph) -> Vec<(EdgeId, String, String, u32, u32)> {
        graph
            .edges()
            .map(|(id, e)| {
                (id, e.origin().to_string(), e.dest().to_string(), e.capacity(), e.flow())
            })
            .collect()
    }

    #[test]
    fn test_node_outage_is_undone_on_drop() {
        let mut graph = network();
        edmonds_karp(&mut graph);
        let before = state(&graph);
        {
            let mut outage = Outage::node(&mut graph, "PS_1").unwrap();
            assert!(!outage.contains("PS_1"));
            assert_eq!(0, outage.edge_count());
            assert_eq!(0, edmonds_karp(&mut outage).value());
        }
        assert!(graph.contains("PS_1"));
        assert_eq!(before, state(&graph));
    }

    #[test]
    fn test_edge_outage_is_undone_on_drop() {
        let mut graph = network();
        edmonds_karp(&mut graph);
        let before = state(&graph);
        let (id, _) = graph.edges().last().unwrap();
        {
            let mut outage = Outage::edge(&mut graph, id).unwrap();
            assert_eq!(2, outage.edge_count());
            assert_eq!(0, edmonds_karp(&mut outage).value());
        }
        assert_eq!(before, state(&graph));
    }

    #[test]
    fn test_unknown_node_leaves_graph_untouched() {
        let mut graph = network();
        let before = state(&graph);
        assert!(matches!(
            Outage::node(&mut graph, "PS_7"),
            Err(NetworkError::NodeNotFound(_))
        ));
        assert_eq!(before, state(&graph));
    }
}
