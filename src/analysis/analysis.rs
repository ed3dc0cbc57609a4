use crate::analysis::reports::{
    BalanceReport, CityFlow, CityShortfall, DeficitReport, EdgeMetrics, EdgeSpare, FlowAdjustment,
};
use crate::graph::graph::Graph;
use crate::graph::node::NodeKind;
use std::cmp::Ordering;

/// Unmet demand per city given the flows currently on the graph.
///
/// O(|V|·|E|): the inflow of every city is found by scanning all edges.
pub fn water_deficit(graph: &Graph) -> DeficitReport {
    let total_supply = graph
        .reservoirs()
        .filter_map(|(_, n)| n.max_delivery())
        .map(u64::from)
        .sum();

    let mut total_demand = 0.0;
    let mut shortfalls = Vec::new();
    for (id, node) in graph.cities() {
        let Some(demand) = node.demand() else {
            continue;
        };
        total_demand += demand;
        let inflow = graph.inflow(node.code()) as f64;
        if inflow < demand {
            shortfalls.push(CityShortfall::new(
                id,
                node.code().to_string(),
                node.name().to_string(),
                demand,
                demand - inflow,
            ));
        }
    }
    sort_shortfalls(&mut shortfalls);

    DeficitReport::new(shortfalls, total_supply, total_demand)
}

pub(crate) fn sort_shortfalls(shortfalls: &mut [CityShortfall]) {
    shortfalls.sort_by(|a, b| {
        b.deficit()
            .partial_cmp(&a.deficit())
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.code().cmp(b.code()))
    });
}

/// Spare capacity (capacity - flow) of every edge, with summary statistics.
pub fn compute_metrics(graph: &Graph) -> EdgeMetrics {
    let mut spares: Vec<EdgeSpare> = graph
        .edges()
        .map(|(id, e)| EdgeSpare {
            edge: id,
            capacity: e.capacity(),
            flow: e.flow(),
            spare: e.capacity() as i64 - e.flow() as i64,
        })
        .collect();
    spares.sort_by(|a, b| a.spare.cmp(&b.spare).then(a.capacity.cmp(&b.capacity)));

    if spares.is_empty() {
        return EdgeMetrics::new(spares, 0.0, 0.0, 0.0);
    }

    let count = spares.len() as f64;
    let max_spare = spares
        .iter()
        .map(|s| s.spare as f64)
        .fold(0.0, f64::max);
    let mean_spare = spares.iter().map(|s| s.spare as f64).sum::<f64>() / count;
    let variance = spares
        .iter()
        .map(|s| (s.spare as f64 - mean_spare).powi(2))
        .sum::<f64>()
        / count;

    EdgeMetrics::new(spares, max_spare, mean_spare, variance)
}

/// Pushes unmet demand onto edges with spare capacity, in proportion to each edge's
/// share of the total spare.
///
/// This is a heuristic: the result never exceeds any capacity but does not have to
/// conserve flow at every node.
pub fn balance_load(graph: &mut Graph, metrics: &EdgeMetrics) -> BalanceReport {
    let total_spare: f64 = metrics
        .spares()
        .iter()
        .filter(|s| s.spare > 0)
        .map(|s| s.spare as f64)
        .sum();
    let total_unmet = water_deficit(graph).total_deficit();

    let mut adjustments = Vec::new();
    if total_spare <= 0.0 {
        return BalanceReport::new(adjustments, total_spare, total_unmet);
    }

    for s in metrics.spares().iter().filter(|s| s.spare > 0) {
        let Some(edge) = graph.edge_mut(s.edge) else {
            continue;
        };
        let spare = edge.residual() as f64;
        let share = s.spare as f64 / total_spare * total_unmet;
        let increase = share.min(spare) as u32;
        if increase == 0 {
            continue;
        }
        let before = edge.flow();
        edge.set_flow(before + increase);
        adjustments.push(FlowAdjustment {
            edge: s.edge,
            before,
            after: before + increase,
        });
    }

    BalanceReport::new(adjustments, total_spare, total_unmet)
}

/// Inflow of every city, in graph order.
pub fn city_flows(graph: &Graph) -> Vec<CityFlow> {
    graph
        .cities()
        .filter_map(|(id, node)| match node.kind() {
            NodeKind::City {
                name,
                demand,
                population,
            } => Some(CityFlow {
                city: id,
                id: node.id(),
                code: node.code().to_string(),
                name: name.clone(),
                demand: *demand,
                population: *population,
                inflow: graph.inflow(node.code()),
            }),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::edmonds_karp::edmonds_karp;
    use crate::graph::node::Node;
    use approx::assert_relative_eq;

    fn split_network() -> Graph {
        let mut graph = Graph::new();
        graph.add_node(Node::reservoir(1, "R_1", "Alto", "Lisboa", 5)).unwrap();
        graph.add_node(Node::station(1, "PS_1")).unwrap();
        graph.add_node(Node::city(1, "C_1", "Sintra", 3.0, 100)).unwrap();
        graph.add_node(Node::city(2, "C_2", "Cascais", 4.0, 100)).unwrap();
        graph.add_edge("R_1", "PS_1", 5, true).unwrap();
        graph.add_edge("PS_1", "C_1", 3, true).unwrap();
        graph.add_edge("PS_1", "C_2", 4, true).unwrap();
        graph
    }

    #[test]
    fn test_deficit_of_partially_served_city() {
        let mut graph = Graph::new();
        graph.add_node(Node::reservoir(1, "R_1", "Alto", "Lisboa", 7)).unwrap();
        graph.add_node(Node::city(1, "C_1", "Sintra", 10.0, 100)).unwrap();
        graph.add_node(Node::city(2, "C_2", "Cascais", 2.0, 100)).unwrap();
        graph.add_node(Node::reservoir(2, "R_2", "Baixo", "Lisboa", 9)).unwrap();
        graph.add_edge("R_1", "C_1", 20, true).unwrap();
        graph.add_edge("R_2", "C_2", 20, true).unwrap();
        edmonds_karp(&mut graph);

        let report = water_deficit(&graph);
        assert_eq!(1, report.shortfalls().len());
        assert_eq!("C_1", report.shortfalls()[0].code());
        assert_relative_eq!(3.0, report.shortfalls()[0].deficit());
        assert_relative_eq!(0.0, report.deficit_of("C_2"));
        assert_eq!(16, report.total_supply());
        assert_relative_eq!(12.0, report.total_demand());
    }

    #[test]
    fn test_deficits_sorted_largest_first() {
        let mut graph = Graph::new();
        graph.add_node(Node::city(1, "C_1", "Sintra", 2.0, 1)).unwrap();
        graph.add_node(Node::city(2, "C_2", "Cascais", 9.0, 1)).unwrap();
        graph.add_node(Node::city(3, "C_3", "Mafra", 2.0, 1)).unwrap();
        graph.add_node(Node::city(4, "C_0", "Oeiras", 2.0, 1)).unwrap();

        let report = water_deficit(&graph);
        let codes: Vec<&str> = report.shortfalls().iter().map(|s| s.code()).collect();
        assert_eq!(vec!["C_2", "C_0", "C_1", "C_3"], codes);
        assert_relative_eq!(15.0, report.total_deficit());
    }

    #[test]
    fn test_fractional_demand_keeps_remainder_as_deficit() {
        let mut graph = Graph::new();
        graph.add_node(Node::reservoir(1, "R_1", "Alto", "Lisboa", 100)).unwrap();
        graph.add_node(Node::city(1, "C_1", "Sintra", 4.5, 100)).unwrap();
        graph.add_edge("R_1", "C_1", 100, true).unwrap();
        edmonds_karp(&mut graph);

        let report = water_deficit(&graph);
        assert_relative_eq!(0.5, report.deficit_of("C_1"));
    }

    #[test]
    fn test_metrics_order_and_statistics() {
        let mut graph = split_network();
        edmonds_karp(&mut graph);
        // spares: R_1→PS_1 0 (cap 5), PS_1→C_1 0 (cap 3), PS_1→C_2 2 (cap 4)
        let metrics = compute_metrics(&graph);
        let caps: Vec<u32> = metrics.spares().iter().map(|s| s.capacity).collect();
        assert_eq!(vec![3, 5, 4], caps);
        assert_relative_eq!(2.0, metrics.max_spare());
        assert_relative_eq!(2.0 / 3.0, metrics.mean_spare());
        let mean = 2.0 / 3.0;
        let expected = (2.0 * mean * mean + (2.0 - mean) * (2.0 - mean)) / 3.0;
        assert_relative_eq!(expected, metrics.variance());
    }

    #[test]
    fn test_metrics_on_empty_graph() {
        let metrics = compute_metrics(&Graph::new());
        assert!(metrics.spares().is_empty());
        assert_relative_eq!(0.0, metrics.mean_spare());
        assert_relative_eq!(0.0, metrics.variance());
    }

    #[test]
    fn test_balance_load_spreads_unmet_demand() {
        let mut graph = split_network();
        graph.add_node(Node::station(2, "PS_2")).unwrap();
        graph.add_edge("PS_2", "C_2", 6, true).unwrap();
        edmonds_karp(&mut graph);

        // spare: PS_1→C_2 2, PS_2→C_2 6; unmet 2
        let metrics = compute_metrics(&graph);
        let report = balance_load(&mut graph, &metrics);

        assert_relative_eq!(8.0, report.total_spare());
        assert_relative_eq!(2.0, report.total_unmet());
        // 2/8*2 = 0.5 truncates to nothing, 6/8*2 = 1.5 truncates to 1
        assert_eq!(1, report.adjustments().len());
        let adjustment = report.adjustments()[0];
        assert_eq!(0, adjustment.before);
        assert_eq!(1, adjustment.after);
        assert_eq!("PS_2", graph.edge(adjustment.edge).unwrap().origin());
        for (_, e) in graph.edges() {
            assert!(e.flow() <= e.capacity());
        }
    }

    #[test]
    fn test_balance_load_without_spare_capacity() {
        let mut graph = Graph::new();
        graph.add_node(Node::reservoir(1, "R_1", "Alto", "Lisboa", 10)).unwrap();
        graph.add_node(Node::city(1, "C_1", "Sintra", 10.0, 100)).unwrap();
        graph.add_edge("R_1", "C_1", 4, true).unwrap();
        edmonds_karp(&mut graph);

        let metrics = compute_metrics(&graph);
        let report = balance_load(&mut graph, &metrics);
        assert!(report.adjustments().is_empty());
        assert_relative_eq!(6.0, report.total_unmet());
    }

    #[test]
    fn test_city_flows_report_inflow() {
        let mut graph = split_network();
        edmonds_karp(&mut graph);
        let flows = city_flows(&graph);
        assert_eq!(2, flows.len());
        assert_eq!(("C_1", 3), (flows[0].code.as_str(), flows[0].inflow));
        assert_eq!(("C_2", 2), (flows[1].code.as_str(), flows[1].inflow));
        assert_eq!(100, flows[1].population);
    }
}
