use crate::analysis::analysis::water_deficit;
use crate::analysis::reports::DeficitReport;
use crate::error::{NetworkError, Result};
use crate::flow::edmonds_karp::edmonds_karp;
use crate::graph::edge::{Edge, EdgeId};
use crate::graph::graph::Graph;
use crate::graph::node::NodeId;
use crate::simulation::outage::Outage;
use log::{debug, info};

const EPSILON: f64 = 1e-9;

/// Unmet demand of one city while part of the network is down.
#[derive(Debug, Clone, PartialEq)]
pub struct CityImpact {
    city: NodeId,
    code: String,
    name: String,
    demand: f64,
    baseline_deficit: f64,
    deficit: f64,
}

impl CityImpact {
    pub fn city(&self) -> NodeId {
        self.city
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn demand(&self) -> f64 {
        self.demand
    }

    /// Deficit on the intact network.
    pub fn baseline_deficit(&self) -> f64 {
        self.baseline_deficit
    }

    pub fn deficit(&self) -> f64 {
        self.deficit
    }

    /// Extra shortfall caused by the outage.
    pub fn increase(&self) -> f64 {
        (self.deficit - self.baseline_deficit).max(0.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineImpact {
    id: EdgeId,
    edge: Edge,
    affected: Vec<CityImpact>,
}

impl PipelineImpact {
    pub fn id(&self) -> EdgeId {
        self.id
    }

    /// Copy of the removed pipe, flow cleared.
    pub fn edge(&self) -> &Edge {
        &self.edge
    }

    /// Cities left short while the pipe is down, largest deficit first.
    pub fn affected(&self) -> &[CityImpact] {
        &self.affected
    }

    /// True when losing this pipe makes some city worse off than on the intact network.
    pub fn is_critical(&self) -> bool {
        self.affected.iter().any(|c| c.increase() > EPSILON)
    }
}

fn baseline(graph: &Graph) -> DeficitReport {
    let mut intact = graph.clone();
    edmonds_karp(&mut intact);
    water_deficit(&intact)
}

fn city_impacts(graph: &Graph, baseline: &DeficitReport) -> Vec<CityImpact> {
    water_deficit(graph)
        .shortfalls()
        .iter()
        .map(|s| CityImpact {
            city: s.city(),
            code: s.code().to_string(),
            name: s.name().to_string(),
            demand: s.demand(),
            baseline_deficit: baseline.deficit_of(s.code()),
            deficit: s.deficit(),
        })
        .collect()
}

fn node_impact(graph: &mut Graph, code: &str) -> Result<Vec<CityImpact>> {
    let baseline = baseline(graph);
    let mut outage = Outage::node(graph, code)?;
    let flow = edmonds_karp(&mut outage);
    let impacts = city_impacts(&outage, &baseline);
    info!(
        "without {}: max flow {}, {} cities short",
        code,
        flow.value(),
        impacts.len()
    );
    Ok(impacts)
}

/// Cities left short when the reservoir `code` is taken offline.
///
/// The reservoir is detached with every edge entering or leaving it and put back
/// afterwards. The graph, flows included, is unchanged when this returns.
pub fn reservoir_impact(graph: &mut Graph, code: &str) -> Result<Vec<CityImpact>> {
    if !graph.node_by_code(code)?.is_reservoir() {
        return Err(NetworkError::WrongKind {
            code: code.to_string(),
            expected: "reservoir",
        });
    }
    node_impact(graph, code)
}

/// Cities left short when the pumping station `code` is taken offline.
pub fn station_impact(graph: &mut Graph, code: &str) -> Result<Vec<CityImpact>> {
    if !graph.node_by_code(code)?.is_station() {
        return Err(NetworkError::WrongKind {
            code: code.to_string(),
            expected: "pumping station",
        });
    }
    node_impact(graph, code)
}

/// Removes every pipe in turn and records the cities left short.
///
/// Runs one full max-flow per edge, O(|V|·|E|³) overall.
pub fn pipeline_impact(graph: &mut Graph) -> Result<Vec<PipelineImpact>> {
    let baseline = baseline(graph);
    let pipes: Vec<(EdgeId, Edge)> = graph
        .edges()
        .map(|(id, e)| (id, e.detached_copy()))
        .collect();
    info!("scanning {} pipes", pipes.len());

    let mut impacts = Vec::with_capacity(pipes.len());
    for (id, edge) in pipes {
        let mut outage = Outage::edge(graph, id)?;
        edmonds_karp(&mut outage);
        let affected = city_impacts(&outage, &baseline);
        drop(outage);
        debug!(
            "without {} -> {}: {} cities short",
            edge.origin(),
            edge.dest(),
            affected.len()
        );
        impacts.push(PipelineImpact { id, edge, affected });
    }
    Ok(impacts)
}
