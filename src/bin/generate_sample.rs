use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

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

    /// Uniform in `[lo, hi)`.
    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }
}

const PRODUCTS: [(&str, &[&str]); 3] = [
    ("Cable", &["CB-100", "CB-250", "CB-400"]),
    ("Lamp", &["LM-10", "LM-20"]),
    ("Switch", &["SW-1", "SW-2", "SW-3"]),
];
const DEPOTS: [&str; 3] = ["North", "South", "West"];
const MONTHS: [&str; 12] = [
    "April", "May", "June", "July", "August", "September", "October", "November", "December",
    "January", "February", "March",
];

fn writer(dir: &Path, name: &str) -> Result<(csv::Writer<std::fs::File>, PathBuf)> {
    let path = dir.join(name);
    let w = csv::Writer::from_path(&path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    Ok((w, path))
}

/// Two years of history followed by six months of forecast.
fn write_forecast(dir: &Path, rng: &mut SimpleRng) -> Result<usize> {
    let (mut w, path) = writer(dir, "forecast.csv")?;
    w.write_record([
        "product", "SKU", "Depot", "Month", "Actual", "Fitted", "Forecast", "Accuracy",
    ])?;

    let mut rows = 0;
    for (product, skus) in PRODUCTS {
        for &sku in skus {
            let base = rng.range(200.0, 1500.0);
            for depot in DEPOTS.iter().take(1 + (rng.next_u64() % 3) as usize) {
                for step in 0..30u32 {
                    let year = 2023 + (step / 12) as i32;
                    let month = step % 12 + 1;
                    let date = format!("{month:02}-01-{year}");
                    let season = 1.0 + 0.2 * ((month as f64) * std::f64::consts::PI / 6.0).sin();
                    let level = base * season;

                    let record = if step < 24 {
                        let actual = (level * rng.range(0.85, 1.15)).round();
                        let fitted = (level * rng.range(0.9, 1.1)).round();
                        let accuracy = if fitted > 0.0 {
                            (100.0 - (actual - fitted).abs() / fitted * 100.0).max(0.0)
                        } else {
                            0.0
                        };
                        [
                            product.to_string(),
                            sku.to_string(),
                            depot.to_string(),
                            date,
                            actual.to_string(),
                            fitted.to_string(),
                            String::new(),
                            format!("{accuracy:.0}%"),
                        ]
                    } else {
                        [
                            product.to_string(),
                            sku.to_string(),
                            depot.to_string(),
                            date,
                            String::new(),
                            String::new(),
                            (level * rng.range(0.95, 1.05)).round().to_string(),
                            String::new(),
                        ]
                    };
                    w.write_record(&record)?;
                    rows += 1;
                }
            }
        }
    }
    w.flush()?;
    println!("Wrote {rows} forecast rows to {}", path.display());
    Ok(rows)
}

fn write_lifecycle(dir: &Path, rng: &mut SimpleRng) -> Result<usize> {
    let (mut w, path) = writer(dir, "lifecycle.csv")?;
    w.write_record(["Customer", "Financial Year", "Product", "Month", "Sales"])?;

    let customers = ["Acme Traders", "Bolt Electricals", "City Lights", "Delta Infra"];
    let mut rows = 0;
    for fy in ["FY2022-23", "FY2023-24", "FY2024-25"] {
        for customer in customers {
            for month in MONTHS {
                let product = rng.pick(&PRODUCTS).0;
                let sales = ((rng.range(5_000.0, 60_000.0) * 100.0).round() / 100.0).to_string();
                w.write_record([customer, fy, product, month, sales.as_str()])?;
                rows += 1;
            }
        }
    }
    w.flush()?;
    println!("Wrote {rows} lifecycle rows to {}", path.display());
    Ok(rows)
}

fn write_shortfall(dir: &Path, rng: &mut SimpleRng) -> Result<usize> {
    let (mut w, path) = writer(dir, "shortfall.csv")?;
    w.write_record([
        "FY",
        "CATEGORY",
        "Months",
        "Shortfall in Revenue",
        "Impactful Shortfall",
        "SHORTFALL (PEND. SO)",
        "CLOSING STOCK",
        "PER UNIT",
    ])?;

    let categories = ["Wires", "Lighting", "Switchgear", "Fans"];
    let mut rows = 0;
    for (fy, year) in [("FY24", 2023), ("FY25", 2024)] {
        for month in 1..=12u32 {
            for category in categories {
                let pending = rng.range(0.0, 400.0).round();
                let stock = rng.range(0.0, 300.0).round();
                let per_unit = rng.range(50.0, 2500.0).round();
                let impactful = if pending > stock { "1" } else { "0" };
                let revenue = ((pending - stock).max(0.0) * per_unit).round();
                w.write_record(&[
                    fy.to_string(),
                    category.to_string(),
                    format!("{month:02}-{year}"),
                    revenue.to_string(),
                    impactful.to_string(),
                    pending.to_string(),
                    stock.to_string(),
                    format!("Rs. {per_unit}"),
                ])?;
                rows += 1;
            }
        }
    }
    w.flush()?;
    println!("Wrote {rows} shortfall rows to {}", path.display());
    Ok(rows)
}

fn write_fulfillment(dir: &Path, rng: &mut SimpleRng) -> Result<usize> {
    let (mut w, path) = writer(dir, "fulfillment.csv")?;
    w.write_record([
        "Orders",
        "SKU",
        "Required Quantity",
        "Fullfilled Quantity",
        "Pending Quantity",
        "ShortSales",
        "Order fullfillment ratio",
    ])?;

    let skus: Vec<&str> = PRODUCTS.iter().flat_map(|(_, s)| s.iter().copied()).collect();
    let mut rows = 0;
    for n in 1..=40 {
        let order = format!("SO-{:05}", 10_000 + n);
        for _ in 0..1 + rng.next_u64() % 4 {
            let sku = *rng.pick(&skus);
            let required = rng.range(50.0, 500.0).round();
            let ratio = rng.range(84.0, 100.0);
            let fulfilled = (required * ratio / 100.0).floor();
            let pending = required - fulfilled;
            w.write_record(&[
                order.clone(),
                sku.to_string(),
                required.to_string(),
                fulfilled.to_string(),
                pending.to_string(),
                pending.to_string(),
                format!("{ratio:.2}%"),
            ])?;
            rows += 1;
        }
    }
    w.flush()?;
    println!("Wrote {rows} fulfillment rows to {}", path.display());
    Ok(rows)
}

fn main() -> Result<()> {
    let dir = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data"));
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;

    let mut rng = SimpleRng::new(42);
    write_forecast(&dir, &mut rng)?;
    write_lifecycle(&dir, &mut rng)?;
    write_shortfall(&dir, &mut rng)?;
    write_fulfillment(&dir, &mut rng)?;
    Ok(())
}
