use crate::analysis::analysis::city_flows;
use crate::error::Result;
use crate::graph::graph::Graph;
use csv::Writer;
use log::info;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

#[derive(Serialize)]
struct FlowRow<'a> {
    #[serde(rename = "Source")]
    source: &'a str,
    #[serde(rename = "Destination")]
    destination: &'a str,
    #[serde(rename = "Flow")]
    flow: u32,
}

#[derive(Serialize)]
struct MaxFlowRow<'a> {
    #[serde(rename = "City")]
    city: &'a str,
    #[serde(rename = "Code")]
    code: &'a str,
    #[serde(rename = "Demand")]
    demand: f64,
    #[serde(rename = "MaxFlow")]
    max_flow: u64,
}

/// One row per pipe with the flow it currently carries.
pub fn write_flow_graph<W: Write>(graph: &Graph, writer: W) -> Result<()> {
    let mut wtr = Writer::from_writer(writer);
    for (_, edge) in graph.edges() {
        wtr.serialize(FlowRow {
            source: edge.origin(),
            destination: edge.dest(),
            flow: edge.flow(),
        })?;
    }
    wtr.flush()?;
    Ok(())
}

/// One row per city with the water reaching it.
pub fn write_city_flows<W: Write>(graph: &Graph, writer: W) -> Result<()> {
    let mut wtr = Writer::from_writer(writer);
    for city in city_flows(graph) {
        wtr.serialize(MaxFlowRow {
            city: &city.name,
            code: &city.code,
            demand: city.demand,
            max_flow: city.inflow,
        })?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes `FlowGraph.csv` and `MaxFlow.csv` into `dir`.
pub fn export_dir(graph: &Graph, dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)?;
    write_flow_graph(graph, File::create(dir.join("FlowGraph.csv"))?)?;
    write_city_flows(graph, File::create(dir.join("MaxFlow.csv"))?)?;
    info!("exported flows to {}", dir.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::edmonds_karp::edmonds_karp;
    use crate::graph::node::Node;

    fn network() -> Graph {
        let mut graph = Graph::new();
        graph.add_node(Node::reservoir(1, "R_1", "Alto", "Lisboa", 5)).unwrap();
        graph.add_node(Node::city(1, "C_1", "Sintra", 3.0, 100)).unwrap();
        graph.add_node(Node::city(2, "C_2", "Cascais", 4.5, 100)).unwrap();
        graph.add_edge("R_1", "C_1", 3, true).unwrap();
        graph.add_edge("R_1", "C_2", 4, true).unwrap();
        edmonds_karp(&mut graph);
        graph
    }

    #[test]
    fn test_flow_graph_rows() {
        let mut out = Vec::new();
        write_flow_graph(&network(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!("Source,Destination,Flow", lines[0]);
        assert_eq!(3, lines.len());
        assert!(lines.contains(&"R_1,C_1,3"));
    }

    #[test]
    fn test_city_flow_rows() {
        let mut out = Vec::new();
        write_city_flows(&network(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!("City,Code,Demand,MaxFlow", lines[0]);
        assert_eq!("Sintra,C_1,3.0,3", lines[1]);
        assert_eq!("Cascais,C_2,4.5,2", lines[2]);
    }
}
