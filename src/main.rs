use crate::tui::app::App;
use crate::tui::draw::draw_app;
use clap::Parser;
use crossterm::event::{Event, KeyEventKind};
use log::info;
use std::path::PathBuf;
use std::time::Duration;
use waterflow::error::Result;
use waterflow::export::export::export_dir;
use waterflow::flow::edmonds_karp::edmonds_karp;
use waterflow::scenario::basic::BasicNetwork;
use waterflow::scenario::dataset::CsvDataset;
use waterflow::scenario::random::RandomNetwork;
use waterflow::scenario::scenario::NetworkSource;

mod tui;

/// Maximum water flow and resiliency analysis of a supply network.
#[derive(Parser)]
#[command(name = "waterflow", version, about)]
struct Cli {
    /// Directory holding Reservoirs, Stations, Cities and Pipes CSV files
    #[arg(long)]
    data: Option<PathBuf>,

    /// Suffix appended to each table name, e.g. `_Madeira`
    #[arg(long, default_value = "")]
    suffix: String,

    /// Build a random network from this seed instead
    #[arg(long, conflicts_with = "data")]
    seed: Option<u64>,

    /// Write FlowGraph.csv and MaxFlow.csv into this directory and exit
    #[arg(long)]
    export: Option<PathBuf>,
}

impl Cli {
    fn source(&self) -> Box<dyn NetworkSource> {
        match (&self.data, self.seed) {
            (Some(dir), _) => Box::new(CsvDataset::new(dir.clone(), self.suffix.clone())),
            (None, Some(seed)) => Box::new(RandomNetwork::new(seed)),
            (None, None) => Box::new(BasicNetwork),
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("error")).init();
    let cli = Cli::parse();

    let source = cli.source();
    let mut graph = source.build()?;
    info!("network {} ready", source.name());

    if let Some(dir) = &cli.export {
        let flow = edmonds_karp(&mut graph);
        export_dir(&graph, dir)?;
        println!("max flow {} written to {}", flow.value(), dir.display());
        return Ok(());
    }

    let mut terminal = ratatui::init();
    let mut app = App::new(graph, source.name());

    while app.running {
        let _ = terminal.draw(|frame| draw_app(frame, &app));

        if crossterm::event::poll(Duration::from_millis(16))? {
            if let Event::Key(key) = crossterm::event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key.code);
                }
            }
        }
    }
    Ok(())
}
