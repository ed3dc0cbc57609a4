use crate::error::Result;
use crate::graph::graph::Graph;
use crate::graph::node::Node;
use crate::scenario::scenario::NetworkSource;

/// Small built-in network used when no dataset is given.
pub struct BasicNetwork;

impl NetworkSource for BasicNetwork {
    fn name(&self) -> String {
        "demo".to_string()
    }

    fn build(&self) -> Result<Graph> {
        let mut graph = Graph::new();

        let nodes = vec![
            Node::reservoir(1, "R_1", "Ribeiro do Lajeado", "Santa Cruz", 140),
            Node::reservoir(2, "R_2", "Ribeira da Tabua", "Ribeira Brava", 80),
            Node::station(1, "PS_1"),
            Node::station(2, "PS_2"),
            Node::station(3, "PS_3"),
            Node::city(1, "C_1", "Funchal", 95.0, 105_795),
            Node::city(2, "C_2", "Camara de Lobos", 38.0, 35_666),
            Node::city(3, "C_3", "Santa Cruz", 42.5, 43_005),
            Node::city(4, "C_4", "Ribeira Brava", 21.0, 12_494),
        ];
        for node in nodes {
            let _ = graph.add_node(node);
        }

        let pipes = [
            ("R_1", "PS_1", 120, true),
            ("R_2", "PS_2", 80, true),
            ("PS_1", "PS_2", 30, false),
            ("PS_1", "C_1", 70, true),
            ("PS_1", "C_3", 40, true),
            ("PS_2", "PS_3", 60, true),
            ("PS_2", "C_4", 25, true),
            ("PS_3", "C_1", 30, true),
            ("PS_3", "C_2", 35, true),
            ("C_1", "C_2", 10, false),
        ];
        for (origin, dest, capacity, directed) in pipes {
            let _ = graph.add_edge(origin, dest, capacity, directed);
        }

        Ok(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::edmonds_karp::edmonds_karp;

    #[test]
    fn test_demo_network_is_complete() {
        let mut graph = BasicNetwork.build().unwrap();
        assert_eq!(9, graph.node_count());
        assert_eq!(12, graph.edge_count());

        let result = edmonds_karp(&mut graph);
        assert!(result.value() > 0);
        assert!(result.value() <= 220);
    }
}
