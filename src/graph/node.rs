#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Reservoir {
        name: String,
        municipality: String,
        /// capacity of the synthetic supply edge
        max_delivery: u32,
    },
    PumpingStation,
    City {
        name: String,
        /// demand >= 0.0
        demand: f64,
        population: u64,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: u32,
    code: String,
    kind: NodeKind,
}

impl Node {
    pub fn reservoir(
        id: u32,
        code: impl Into<String>,
        name: impl Into<String>,
        municipality: impl Into<String>,
        max_delivery: u32,
    ) -> Self {
        Self {
            id,
            code: code.into(),
            kind: NodeKind::Reservoir {
                name: name.into(),
                municipality: municipality.into(),
                max_delivery,
            },
        }
    }

    pub fn station(id: u32, code: impl Into<String>) -> Self {
        Self {
            id,
            code: code.into(),
            kind: NodeKind::PumpingStation,
        }
    }

    pub fn city(
        id: u32,
        code: impl Into<String>,
        name: impl Into<String>,
        demand: f64,
        population: u64,
    ) -> Self {
        Self {
            id,
            code: code.into(),
            kind: NodeKind::City {
                name: name.into(),
                demand: demand.max(0.0),
                population,
            },
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Display name, falling back to the code for pumping stations.
    pub fn name(&self) -> &str {
        match &self.kind {
            NodeKind::Reservoir { name, .. } | NodeKind::City { name, .. } => name,
            NodeKind::PumpingStation => &self.code,
        }
    }

    pub fn is_reservoir(&self) -> bool {
        matches!(self.kind, NodeKind::Reservoir { .. })
    }

    pub fn is_station(&self) -> bool {
        matches!(self.kind, NodeKind::PumpingStation)
    }

    pub fn is_city(&self) -> bool {
        matches!(self.kind, NodeKind::City { .. })
    }

    pub fn max_delivery(&self) -> Option<u32> {
        match self.kind {
            NodeKind::Reservoir { max_delivery, .. } => Some(max_delivery),
            _ => None,
        }
    }

    pub fn demand(&self) -> Option<f64> {
        match self.kind {
            NodeKind::City { demand, .. } => Some(demand),
            _ => None,
        }
    }

    pub fn kind_label(&self) -> &'static str {
        match self.kind {
            NodeKind::Reservoir { .. } => "reservoir",
            NodeKind::PumpingStation => "pumping station",
            NodeKind::City { .. } => "city",
        }
    }
}
