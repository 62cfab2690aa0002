use std::path::PathBuf;

use anyhow::{Context, Result};

const CATEGORIES: &[(&str, &[&str])] = &[
    ("Coding", &["Python", "Rust", "Go", "SQL"]),
    ("Cloud", &["AWS", "Azure", "Kubernetes"]),
    ("Data", &["Pandas", "Spark", "Power BI"]),
    ("Soft Skills", &["Communication", "Leadership", "Mentoring"]),
];

const FIRST_NAMES: &[&str] = &[
    "Alice", "Bob", "Carol", "Dan", "Eve", "Farid", "Grace", "Hiro", "Ines", "Jon", "Kemi",
    "Lars", "Mia", "Noor", "Omar", "Priya",
];

const LAST_NAMES: &[&str] = &["Smith", "Okafor", "Tanaka", "Garcia", "Novak", "Ahmed"];

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

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }
}

/// One score cell: mostly whole numbers 0-5, some halves, a few gaps.
fn score_cell(rng: &mut SimpleRng) -> String {
    let roll = rng.next_f64();
    if roll < 0.03 {
        "N/A".to_string()
    } else if roll < 0.06 {
        String::new()
    } else if roll < 0.2 {
        format!("{:.1}", (rng.next_f64() * 10.0).floor() / 2.0)
    } else {
        ((rng.next_f64() * 6.0).floor() as u8).min(5).to_string()
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let out = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("sample_skills.csv"));
    let mut rng = SimpleRng::new(42);

    // Row 0: category, written once per group (merged-cell style).
    let mut top = vec!["Employee".to_string()];
    // Row 1: subcategory.
    let mut bottom = vec![String::new()];
    for (category, subs) in CATEGORIES {
        for (i, sub) in subs.iter().enumerate() {
            top.push(if i == 0 { category.to_string() } else { String::new() });
            bottom.push(sub.to_string());
        }
    }
    // A repeated column, to exercise de-duplication.
    top.push("Coding".to_string());
    bottom.push("Python".to_string());

    let mut wtr = csv::Writer::from_path(&out)
        .with_context(|| format!("creating {}", out.display()))?;
    wtr.write_record(&top)?;
    wtr.write_record(&bottom)?;

    let n_employees = 40;
    for i in 0..n_employees {
        let name = format!(
            "{} {} {}",
            rng.pick(FIRST_NAMES),
            rng.pick(LAST_NAMES),
            i + 1
        );
        let mut record = vec![name];
        for _ in 1..top.len() {
            record.push(score_cell(&mut rng));
        }
        wtr.write_record(&record)?;
    }
    wtr.flush()?;

    log::info!("Wrote {n_employees} employees to {}", out.display());
    println!("Wrote {} employees to {}", n_employees, out.display());
    Ok(())
}
