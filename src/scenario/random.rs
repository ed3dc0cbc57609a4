use crate::error::Result;
use crate::graph::graph::Graph;
use crate::scenario::records::{
    CityRecord, NetworkBuilder, PipeRecord, ReservoirRecord, StationRecord,
};
use crate::scenario::scenario::NetworkSource;
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Seeded random network: reservoirs feed a mesh of pumping stations which feed
/// the cities, plus a few extra pipes anywhere. Same seed, same network.
pub struct RandomNetwork {
    seed: u64,
    reservoirs: usize,
    stations: usize,
    cities: usize,
}

impl RandomNetwork {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            reservoirs: 3,
            stations: 6,
            cities: 8,
        }
    }

    pub fn with_size(mut self, reservoirs: usize, stations: usize, cities: usize) -> Self {
        self.reservoirs = reservoirs.max(1);
        self.stations = stations.max(1);
        self.cities = cities.max(1);
        self
    }
}

impl NetworkSource for RandomNetwork {
    fn name(&self) -> String {
        format!("random-{}", self.seed)
    }

    fn build(&self) -> Result<Graph> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut builder = NetworkBuilder::new();

        let reservoirs: Vec<String> = (1..=self.reservoirs).map(|i| format!("R_{}", i)).collect();
        let stations: Vec<String> = (1..=self.stations).map(|i| format!("PS_{}", i)).collect();
        let cities: Vec<String> = (1..=self.cities).map(|i| format!("C_{}", i)).collect();

        for (i, code) in reservoirs.iter().enumerate() {
            builder.reservoir(ReservoirRecord {
                name: format!("Reservoir {}", i + 1),
                municipality: format!("Municipality {}", i % 3 + 1),
                id: i as u32 + 1,
                code: code.clone(),
                max_delivery: rng.gen_range(5..=60),
            });
        }
        for (i, code) in stations.iter().enumerate() {
            builder.station(StationRecord {
                id: i as u32 + 1,
                code: code.clone(),
            });
        }
        for (i, code) in cities.iter().enumerate() {
            let halves: u32 = rng.gen_range(2..=80);
            builder.city(CityRecord {
                name: format!("City {}", i + 1),
                id: i as u32 + 1,
                code: code.clone(),
                demand: halves as f64 / 2.0,
                population: rng.gen_range(1_000..=500_000),
            });
        }

        let mut pipe = |rng: &mut StdRng, origin: &String, dest: &String| {
            builder.pipe(PipeRecord {
                origin: origin.clone(),
                dest: dest.clone(),
                capacity: rng.gen_range(1..=30),
                directed: rng.gen_bool(0.8),
            });
        };

        for r in &reservoirs {
            let s = &stations[rng.gen_range(0..stations.len())];
            pipe(&mut rng, r, s);
        }
        for pair in stations.windows(2) {
            pipe(&mut rng, &pair[0], &pair[1]);
        }
        for c in &cities {
            let s = &stations[rng.gen_range(0..stations.len())];
            pipe(&mut rng, s, c);
        }

        let everything: Vec<&String> = reservoirs.iter().chain(&stations).chain(&cities).collect();
        for _ in 0..everything.len() / 2 {
            let from = everything[rng.gen_range(0..everything.len())];
            let to = everything[rng.gen_range(0..everything.len())];
            pipe(&mut rng, from, to);
        }

        Ok(builder.finish())
    }
}
