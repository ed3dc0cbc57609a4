use crossterm::event::KeyCode;
use log::error;
use waterflow::analysis::analysis::{balance_load, city_flows, compute_metrics, water_deficit};
use waterflow::analysis::reports::{BalanceReport, CityFlow, DeficitReport, EdgeMetrics};
use waterflow::flow::edmonds_karp::edmonds_karp;
use waterflow::graph::graph::Graph;
use waterflow::simulation::impact::{
    CityImpact, PipelineImpact, pipeline_impact, reservoir_impact, station_impact,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Cities,
    Deficits,
    Metrics,
    Resiliency,
}

impl View {
    pub const ALL: [View; 4] = [View::Cities, View::Deficits, View::Metrics, View::Resiliency];

    pub fn title(self) -> &'static str {
        match self {
            View::Cities => "Cities",
            View::Deficits => "Deficits",
            View::Metrics => "Metrics",
            View::Resiliency => "Resiliency",
        }
    }

    fn index(self) -> usize {
        View::ALL.iter().position(|v| *v == self).unwrap_or(0)
    }
}

pub enum Impact {
    Node { code: String, cities: Vec<CityImpact> },
    Pipelines(Vec<PipelineImpact>),
}

pub struct Balanced {
    pub report: BalanceReport,
    pub metrics: EdgeMetrics,
}

pub struct App {
    pub graph: Graph,
    pub source: String,
    pub max_flow: u64,
    pub view: View,
    pub selected: usize,
    pub cities: Vec<CityFlow>,
    pub deficits: DeficitReport,
    pub metrics: EdgeMetrics,
    pub balanced: Option<Balanced>,
    pub impact: Option<Impact>,
    pub status: String,
    pub running: bool,
}

impl App {
    pub fn new(mut graph: Graph, source: String) -> Self {
        let max_flow = edmonds_karp(&mut graph).value();
        let cities = city_flows(&graph);
        let deficits = water_deficit(&graph);
        let metrics = compute_metrics(&graph);
        Self {
            graph,
            source,
            max_flow,
            view: View::Cities,
            selected: 0,
            cities,
            deficits,
            metrics,
            balanced: None,
            impact: None,
            status: String::new(),
            running: true,
        }
    }

    /// Reservoirs then pumping stations, the nodes that can be taken offline.
    pub fn targets(&self) -> Vec<(&str, &'static str)> {
        self.graph
            .reservoirs()
            .chain(self.graph.stations())
            .map(|(_, n)| (n.code(), n.kind_label()))
            .collect()
    }

    pub fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Tab | KeyCode::Right => self.switch(1),
            KeyCode::BackTab | KeyCode::Left => self.switch(View::ALL.len() - 1),
            KeyCode::Char(c @ '1'..='4') => {
                self.view = View::ALL[c as usize - '1' as usize];
            }
            KeyCode::Up => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down => {
                if self.selected + 1 < self.targets().len() {
                    self.selected += 1;
                }
            }
            KeyCode::Enter if self.view == View::Resiliency => self.simulate_selected(),
            KeyCode::Char('p') if self.view == View::Resiliency => self.scan_pipelines(),
            KeyCode::Char('b') if self.view == View::Metrics => self.balance(),
            _ => {}
        }
    }

    fn switch(&mut self, step: usize) {
        self.view = View::ALL[(self.view.index() + step) % View::ALL.len()];
    }

    /// Balances a copy so the max-flow solution shown elsewhere stays intact.
    fn balance(&mut self) {
        let mut copy = self.graph.clone();
        let report = balance_load(&mut copy, &self.metrics);
        let metrics = compute_metrics(&copy);
        self.status = format!("{} edges adjusted", report.adjustments().len());
        self.balanced = Some(Balanced { report, metrics });
    }

    fn simulate_selected(&mut self) {
        let Some((code, kind)) = self
            .targets()
            .get(self.selected)
            .map(|(code, kind)| (code.to_string(), *kind))
        else {
            return;
        };
        let result = if kind == "reservoir" {
            reservoir_impact(&mut self.graph, &code)
        } else {
            station_impact(&mut self.graph, &code)
        };
        match result {
            Ok(cities) => {
                self.status = format!("without {}: {} cities short", code, cities.len());
                self.impact = Some(Impact::Node { code, cities });
            }
            Err(e) => {
                error!("{}", e);
                self.status = e.to_string();
            }
        }
    }

    fn scan_pipelines(&mut self) {
        match pipeline_impact(&mut self.graph) {
            Ok(pipes) => {
                let critical = pipes.iter().filter(|p| p.is_critical()).count();
                self.status = format!("{} of {} pipes critical", critical, pipes.len());
                self.impact = Some(Impact::Pipelines(pipes));
            }
            Err(e) => {
                error!("{}", e);
                self.status = e.to_string();
            }
        }
    }
}

impl Drop for App {
    fn drop(&mut self) {
        ratatui::restore();
    }
}
