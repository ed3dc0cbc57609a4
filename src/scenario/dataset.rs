use crate::error::Result;
use crate::graph::graph::Graph;
use crate::scenario::records::{
    CityRecord, NetworkBuilder, PipeRecord, ReservoirRecord, StationRecord,
};
use crate::scenario::scenario::NetworkSource;
use csv::{ReaderBuilder, StringRecord, Trim};
use log::info;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// The four CSV files of a dataset: `Reservoirs{suffix}.csv`, `Stations{suffix}.csv`,
/// `Cities{suffix}.csv` and `Pipes{suffix}.csv`, all under one directory.
pub struct CsvDataset {
    dir: PathBuf,
    suffix: String,
}

impl CsvDataset {
    pub fn new(dir: impl Into<PathBuf>, suffix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            suffix: suffix.into(),
        }
    }

    fn path(&self, table: &str) -> PathBuf {
        self.dir.join(format!("{}{}.csv", table, self.suffix))
    }
}

impl NetworkSource for CsvDataset {
    fn name(&self) -> String {
        format!("{}{}", self.dir.display(), self.suffix)
    }

    fn build(&self) -> Result<Graph> {
        let graph = load(
            open(&self.path("Reservoirs"))?,
            open(&self.path("Stations"))?,
            open(&self.path("Cities"))?,
            open(&self.path("Pipes"))?,
        )?;
        info!(
            "loaded {}: {} nodes, {} edges",
            self.name(),
            graph.node_count(),
            graph.edge_count()
        );
        Ok(graph)
    }
}

fn open(path: &Path) -> Result<File> {
    Ok(File::open(path)?)
}

/// Reads a full network from the four tables. Nodes are added before pipes.
pub fn load<R: Read>(reservoirs: R, stations: R, cities: R, pipes: R) -> Result<Graph> {
    let mut builder = NetworkBuilder::new();
    for mut r in read_records::<ReservoirRecord, _>(reservoirs, 5)? {
        r.name = strip_accents(&r.name);
        r.municipality = strip_accents(&r.municipality);
        builder.reservoir(r);
    }
    for s in read_records::<StationRecord, _>(stations, 2)? {
        builder.station(s);
    }
    for mut c in read_records::<CityRecord, _>(cities, 5)? {
        c.name = strip_accents(&c.name);
        builder.city(c);
    }
    for p in read_records::<PipeRecord, _>(pipes, 4)? {
        builder.pipe(p);
    }
    if builder.ignored() > 0 {
        info!("{} records ignored", builder.ignored());
    }
    Ok(builder.finish())
}

/// Deserializes every row by position, ignoring the header and any trailing columns.
fn read_records<T: DeserializeOwned, R: Read>(reader: R, fields: usize) -> Result<Vec<T>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for row in rdr.records() {
        let row = row?;
        if row.iter().all(str::is_empty) {
            continue;
        }
        let row: StringRecord = row.iter().take(fields).collect();
        records.push(row.deserialize(None)?);
    }
    Ok(records)
}

/// Folds Portuguese diacritics to their plain ASCII letter.
pub fn strip_accents(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            'ã' | 'á' | 'à' | 'â' => 'a',
            'ç' => 'c',
            'é' | 'è' | 'ê' => 'e',
            'í' | 'ì' | 'î' => 'i',
            'õ' | 'ó' | 'ò' | 'ô' => 'o',
            'ú' | 'ù' | 'û' => 'u',
            'Ã' | 'Á' | 'À' | 'Â' => 'A',
            'Ç' => 'C',
            'É' | 'È' | 'Ê' => 'E',
            'Í' | 'Ì' | 'Î' => 'I',
            'Õ' | 'Ó' | 'Ò' | 'Ô' => 'O',
            'Ú' | 'Ù' | 'Û' => 'U',
            c => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NetworkError;
    use crate::graph::node::NodeKind;
    use approx::assert_relative_eq;

    const RESERVOIRS: &str = "Reservoir,Municipality,Id,Code,Maximum Delivery (m3/sec),\r\n\
Ribeiro do Lajeado,Santa Cruz,1,R_1,140,\r\n\
Ribeira da Tabua,Ribeira Brava,2,R_2,350,\r\n";

    const STATIONS: &str = "Id,Code\r\n1,PS_1\r\n2,PS_2\r\n\r\n";

    const CITIES: &str = "City,Id,Code,Demand,Population\r\n\
Câmara de Lobos,1,C_1,18,\"35,666\"\r\n\
Funchal,2,C_2,44.5,\"105,795\"\r\n";

    const PIPES: &str = "Service_Point_A,Service_Point_B,Capacity,Direction\r\n\
R_1,PS_1,1000,1\r\n\
R_2,PS_2,1000,1\r\n\
PS_1,C_1,20,0\r\n\
PS_2,C_2,40,1\r\n\
PS_2,C_404,40,1\r\n";

    fn sample() -> Graph {
        load(
            RESERVOIRS.as_bytes(),
            STATIONS.as_bytes(),
            CITIES.as_bytes(),
            PIPES.as_bytes(),
        )
        .unwrap()
    }

    #[test]
    fn test_load_sample_tables() {
        let graph = sample();
        assert_eq!(6, graph.node_count());
        // PS_1 - C_1 is two-way, the pipe to C_404 is dropped
        assert_eq!(5, graph.edge_count());

        let reservoir = graph.node_by_code("R_2").unwrap();
        assert_eq!(Some(350), reservoir.max_delivery());
        assert_eq!("Ribeira da Tabua", reservoir.name());
    }

    #[test]
    fn test_city_columns() {
        let graph = sample();
        let city = graph.node_by_code("C_1").unwrap();
        assert_eq!("Camara de Lobos", city.name());
        match city.kind() {
            NodeKind::City {
                demand, population, ..
            } => {
                assert_relative_eq!(18.0, *demand);
                assert_eq!(35_666, *population);
            }
            _ => panic!("C_1 should be a city"),
        }
        assert_relative_eq!(44.5, graph.node_by_code("C_2").unwrap().demand().unwrap());
    }

    #[test]
    fn test_malformed_number_is_an_error() {
        let bad = "Id,Code\r\nseven,PS_1\r\n";
        let result = load(
            RESERVOIRS.as_bytes(),
            bad.as_bytes(),
            CITIES.as_bytes(),
            PIPES.as_bytes(),
        );
        assert!(matches!(result, Err(NetworkError::Csv(_))));
    }

    #[test]
    fn test_missing_dataset_is_an_io_error() {
        let dataset = CsvDataset::new("/nonexistent/waterflow", "_Madeira");
        assert!(matches!(dataset.build(), Err(NetworkError::Io(_))));
    }

    #[test]
    fn test_strip_accents() {
        assert_eq!("Sao Joao da Madeira", strip_accents("São João da Madeira"));
        assert_eq!("AGUEDA", strip_accents("ÁGUEDA"));
    }
}
