use anyhow::{Context, Result};

/// splitmix64: enough randomness for plausible training noise.
struct SimpleRng(u64);

impl SimpleRng {
    fn next_f64(&mut self) -> f64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        ((z ^ (z >> 31)) >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller, one sample per call.
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        mean + std_dev * (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
    }
}

/// Saturating learning curve: accuracy climbs towards `ceiling` percent.
fn accuracy_curve(epochs: usize, ceiling: f64, rate: f64, rng: &mut SimpleRng) -> Vec<f64> {
    (0..epochs)
        .map(|e| {
            let clean = ceiling * (1.0 - (-rate * e as f64).exp());
            (clean + rng.gauss(0.0, 2.0)).clamp(0.1, 100.0)
        })
        .collect()
}

/// Decaying loss starting at `start`.
fn loss_curve(epochs: usize, start: f64, rate: f64, rng: &mut SimpleRng) -> Vec<f64> {
    (0..epochs)
        .map(|e| {
            let clean = start * (-rate * e as f64).exp() + 0.05;
            (clean + rng.gauss(0.0, 0.08)).max(0.01)
        })
        .collect()
}

fn main() -> Result<()> {
    let output_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "sample_metrics.csv".to_string());
    let epochs = 200;
    let mut rng = SimpleRng(42);

    let runs = [("adam", 92.0, 0.04, 2.3), ("sgd", 85.0, 0.02, 2.4), ("rmsprop", 89.0, 0.03, 2.2)];

    let mut rows: Vec<(String, Vec<f64>)> = Vec::new();
    for &(name, ceiling, rate, start_loss) in &runs {
        rows.push((
            format!("{name}_accuracy"),
            accuracy_curve(epochs, ceiling, rate, &mut rng),
        ));
        rows.push((
            format!("{name}_loss"),
            loss_curve(epochs, start_loss, rate * 1.5, &mut rng),
        ));
    }

    // One record per series: name first, then one sample per epoch.
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(&output_path)
        .with_context(|| format!("creating {output_path}"))?;
    for (name, values) in &rows {
        let record = std::iter::once(name.clone()).chain(values.iter().map(|v| format!("{v:.4}")));
        writer.write_record(record).context("writing record")?;
    }
    writer.flush().context("flushing output")?;

    println!(
        "Wrote {} series ({epochs} epochs each) to {output_path}",
        rows.len()
    );
    Ok(())
}
