use std::fs::File;
use std::io::{BufWriter, Write};

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::{json, Value as JsonValue};

use customer_radius::data::writer::SpacedAsciiFormatter;

/// Small seeded PRNG (splitmix64); the sample only has to be reproducible.
struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    const GOLDEN_GAMMA: u64 = 0x9e37_79b9_7f4a_7c15;

    fn new(seed: u64) -> Self {
        SimpleRng { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(Self::GOLDEN_GAMMA);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform value in `[lo, hi)`.
    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }
}

const FIRST_NAMES: [&str; 8] = ["Ian", "Nora", "Seán", "Aoife", "Oliver", "Enid", "Theresa", "Alan"];
const LAST_NAMES: [&str; 8] = ["Kehoe", "Dempsey", "Ó Briain", "McArdle", "Ahearn", "Gallagher", "Kavanagh", "Byrne"];

/// Customers spread across Ireland; roughly half land within 100 km of Dublin.
fn customer(rng: &mut SimpleRng, user_id: u64) -> JsonValue {
    let first = FIRST_NAMES[(rng.next_u64() % FIRST_NAMES.len() as u64) as usize];
    let last = LAST_NAMES[(rng.next_u64() % LAST_NAMES.len() as u64) as usize];
    json!({
        "latitude": format!("{:.7}", rng.uniform(51.5, 55.3)),
        "user_id": user_id,
        "name": format!("{first} {last}"),
        "longitude": format!("{:.7}", rng.uniform(-10.2, -5.9)),
    })
}

fn main() -> Result<()> {
    let output_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "customers.txt".to_string());
    let mut rng = SimpleRng::new(42);

    let mut ids: Vec<u64> = (1..=32).collect();
    // Shuffle so the output has to be re-sorted.
    for i in (1..ids.len()).rev() {
        let j = (rng.next_u64() % (i as u64 + 1)) as usize;
        ids.swap(i, j);
    }

    let file = File::create(&output_path)
        .with_context(|| format!("creating {output_path}"))?;
    let mut out = BufWriter::new(file);

    let mut written = 0;
    for (n, &user_id) in ids.iter().enumerate() {
        let record = customer(&mut rng, user_id);
        let mut ser = serde_json::Serializer::with_formatter(&mut out, SpacedAsciiFormatter);
        record.serialize(&mut ser)?;
        out.write_all(b"\n")?;
        written += 1;

        // Sprinkle in the kinds of lines the selector has to skip.
        match n {
            7 => writeln!(out, "{{\"user_id\": 99, \"latitude\": \"53.1\", \"longitude\":")?,
            15 => writeln!(out, "{{\"user_id\": 98, \"latitude\": \"53.2\", \"longitude\": \"-6.2\"}}")?,
            23 => writeln!(out, "{{\"user_id\": null, \"latitude\": \"53.3\", \"longitude\": \"-6.3\", \"name\": \"Nobody\"}}")?,
            _ => continue,
        }
        written += 1;
    }
    out.flush()?;

    println!("Wrote {written} lines ({} customers) to {output_path}", ids.len());
    Ok(())
}
