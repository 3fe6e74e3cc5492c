use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// Reference transitions of the sampled chromophore: (strength, wavelength nm, jitter nm).
const TRANSITIONS: [(f64, f64, f64); 3] = [(2.32, 538.0, 3.5), (0.12, 352.0, 6.0), (0.45, 285.0, 4.0)];

const SNAPSHOTS: usize = 40;

fn main() -> Result<()> {
    env_logger::init();
    let mut rng = SimpleRng::new(42);

    // One row per snapshot, columns OSC_i, E_i per transition
    let mut columns: Vec<Vec<f64>> = vec![Vec::with_capacity(SNAPSHOTS); TRANSITIONS.len() * 2];
    for _ in 0..SNAPSHOTS {
        for (i, &(strength, wavelength, jitter)) in TRANSITIONS.iter().enumerate() {
            let f = rng.gauss(strength, 0.03 * strength).max(0.0);
            let e = rng.gauss(wavelength, jitter);
            columns[2 * i].push(f);
            columns[2 * i + 1].push(e);
        }
    }
    let names: Vec<String> = (1..=TRANSITIONS.len())
        .flat_map(|i| [format!("OSC_{i}"), format!("E_{i}")])
        .collect();

    // CSV
    let csv_path = "sample_excitations.csv";
    let mut writer = csv::Writer::from_path(csv_path).context("creating CSV")?;
    writer.write_record(&names)?;
    for row in 0..SNAPSHOTS {
        writer.write_record(columns.iter().map(|c| c[row].to_string()))?;
    }
    writer.flush()?;

    // Parquet
    let schema = Arc::new(Schema::new(
        names
            .iter()
            .map(|n| Field::new(n, DataType::Float64, false))
            .collect::<Vec<_>>(),
    ));
    let arrays: Vec<ArrayRef> = columns
        .into_iter()
        .map(|c| Arc::new(Float64Array::from(c)) as ArrayRef)
        .collect();
    let batch = RecordBatch::try_new(schema.clone(), arrays).context("building record batch")?;

    let parquet_path = "sample_excitations.parquet";
    let file = std::fs::File::create(parquet_path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;

    println!(
        "Wrote {SNAPSHOTS} snapshots ({} transitions each) to {csv_path} and {parquet_path}",
        TRANSITIONS.len()
    );
    Ok(())
}
