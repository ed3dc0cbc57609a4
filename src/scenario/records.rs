use crate::error::Ignored;
use crate::graph::graph::Graph;
use crate::graph::node::Node;
use log::warn;
use serde::{Deserialize, Deserializer};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReservoirRecord {
    pub name: String,
    pub municipality: String,
    pub id: u32,
    pub code: String,
    pub max_delivery: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StationRecord {
    pub id: u32,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CityRecord {
    pub name: String,
    pub id: u32,
    pub code: String,
    pub demand: f64,
    #[serde(deserialize_with = "digits")]
    pub population: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PipeRecord {
    pub origin: String,
    pub dest: String,
    pub capacity: u32,
    /// `1` for a one-way pipe, `0` for a two-way pipe
    #[serde(deserialize_with = "flag")]
    pub directed: bool,
}

// population columns come with thousands separators, e.g. "1,234,567"
fn digits<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let text = String::deserialize(deserializer)?;
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return Ok(0);
    }
    digits.parse().map_err(serde::de::Error::custom)
}

fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let value = u8::deserialize(deserializer)?;
    Ok(value != 0)
}

/// Builds a [`Graph`] from typed records, counting the ones the graph ignored.
#[derive(Default)]
pub struct NetworkBuilder {
    graph: Graph,
    ignored: usize,
}

impl NetworkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn node(&mut self, node: Node) {
        let code = node.code().to_string();
        if let Err(reason) = self.graph.add_node(node) {
            warn!("node {} ignored: {:?}", code, reason);
            self.ignored += 1;
        }
    }

    pub fn reservoir(&mut self, r: ReservoirRecord) -> &mut Self {
        self.node(Node::reservoir(
            r.id,
            r.code,
            r.name,
            r.municipality,
            r.max_delivery,
        ));
        self
    }

    pub fn station(&mut self, s: StationRecord) -> &mut Self {
        self.node(Node::station(s.id, s.code));
        self
    }

    pub fn city(&mut self, c: CityRecord) -> &mut Self {
        self.node(Node::city(c.id, c.code, c.name, c.demand, c.population));
        self
    }

    pub fn pipe(&mut self, p: PipeRecord) -> &mut Self {
        let result = self
            .graph
            .add_edge(&p.origin, &p.dest, p.capacity, p.directed);
        if let Err(reason) = result {
            match reason {
                Ignored::SelfLoop => warn!("pipe {} -> {} is a self loop", p.origin, p.dest),
                _ => warn!("pipe {} -> {} ignored: {:?}", p.origin, p.dest, reason),
            }
            self.ignored += 1;
        }
        self
    }

    pub fn ignored(&self) -> usize {
        self.ignored
    }

    pub fn finish(self) -> Graph {
        self.graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pipe(origin: &str, dest: &str, capacity: u32, directed: bool) -> PipeRecord {
        PipeRecord {
            origin: origin.to_string(),
            dest: dest.to_string(),
            capacity,
            directed,
        }
    }

    #[test]
    fn test_builder_counts_ignored_records() {
        let mut builder = NetworkBuilder::new();
        builder
            .station(StationRecord {
                id: 1,
                code: "PS_1".to_string(),
            })
            .station(StationRecord {
                id: 2,
                code: "PS_1".to_string(),
            })
            .station(StationRecord {
                id: 3,
                code: "PS_2".to_string(),
            })
            .pipe(pipe("PS_1", "PS_2", 10, false))
            .pipe(pipe("PS_1", "PS_1", 10, true))
            .pipe(pipe("PS_1", "PS_9", 10, true));

        assert_eq!(3, builder.ignored());
        let graph = builder.finish();
        assert_eq!(2, graph.node_count());
        assert_eq!(2, graph.edge_count());
    }
}
