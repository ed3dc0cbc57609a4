use crate::graph::edge::EdgeId;
use crate::graph::node::NodeId;

#[derive(Debug, Clone, PartialEq)]
pub struct CityShortfall {
    city: NodeId,
    code: String,
    name: String,
    demand: f64,
    deficit: f64,
}

impl CityShortfall {
    pub fn new(city: NodeId, code: String, name: String, demand: f64, deficit: f64) -> Self {
        Self {
            city,
            code,
            name,
            demand,
            deficit,
        }
    }

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

    pub fn deficit(&self) -> f64 {
        self.deficit
    }
}

pub struct DeficitReport {
    shortfalls: Vec<CityShortfall>,
    total_supply: u64,
    total_demand: f64,
}

impl DeficitReport {
    pub fn new(shortfalls: Vec<CityShortfall>, total_supply: u64, total_demand: f64) -> Self {
        Self {
            shortfalls,
            total_supply,
            total_demand,
        }
    }

    /// Cities with unmet demand, largest deficit first.
    pub fn shortfalls(&self) -> &[CityShortfall] {
        &self.shortfalls
    }

    /// Sum of every reservoir's maximum delivery.
    pub fn total_supply(&self) -> u64 {
        self.total_supply
    }

    pub fn total_demand(&self) -> f64 {
        self.total_demand
    }

    pub fn total_deficit(&self) -> f64 {
        self.shortfalls.iter().map(CityShortfall::deficit).sum()
    }

    pub fn deficit_of(&self, code: &str) -> f64 {
        self.shortfalls
            .iter()
            .find(|s| s.code() == code)
            .map(CityShortfall::deficit)
            .unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeSpare {
    pub edge: EdgeId,
    pub capacity: u32,
    pub flow: u32,
    /// capacity - flow
    pub spare: i64,
}

pub struct EdgeMetrics {
    spares: Vec<EdgeSpare>,
    max_spare: f64,
    mean_spare: f64,
    variance: f64,
}

impl EdgeMetrics {
    pub fn new(spares: Vec<EdgeSpare>, max_spare: f64, mean_spare: f64, variance: f64) -> Self {
        Self {
            spares,
            max_spare,
            mean_spare,
            variance,
        }
    }

    /// Every edge with its spare capacity, tightest first.
    pub fn spares(&self) -> &[EdgeSpare] {
        &self.spares
    }

    pub fn max_spare(&self) -> f64 {
        self.max_spare
    }

    pub fn mean_spare(&self) -> f64 {
        self.mean_spare
    }

    /// Population variance of the spare capacities.
    pub fn variance(&self) -> f64 {
        self.variance
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowAdjustment {
    pub edge: EdgeId,
    pub before: u32,
    pub after: u32,
}

pub struct BalanceReport {
    adjustments: Vec<FlowAdjustment>,
    total_spare: f64,
    total_unmet: f64,
}

impl BalanceReport {
    pub fn new(adjustments: Vec<FlowAdjustment>, total_spare: f64, total_unmet: f64) -> Self {
        Self {
            adjustments,
            total_spare,
            total_unmet,
        }
    }

    pub fn adjustments(&self) -> &[FlowAdjustment] {
        &self.adjustments
    }

    pub fn total_spare(&self) -> f64 {
        self.total_spare
    }

    pub fn total_unmet(&self) -> f64 {
        self.total_unmet
    }
}

/// Water reaching one city after a max-flow run.
#[derive(Debug, Clone, PartialEq)]
pub struct CityFlow {
    pub city: NodeId,
    pub id: u32,
    pub code: String,
    pub name: String,
    pub demand: f64,
    pub population: u64,
    pub inflow: u64,
}
