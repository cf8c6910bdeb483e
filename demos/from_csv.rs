//! Train on `x1,x2,y` rows read from a CSV file.
//!
//! Usage: cargo run --example from_csv -- data.csv [epochs] [learning_rate]

use std::env;

use anyhow::{Context, Result};
use sigmanet::{
    report::{LossCurve, ParameterTable},
    Dataset, Trainer, TrainingConfig,
};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = env::args().collect::<Vec<_>>();
    let path = args.get(1).context("usage: from_csv <file.csv> [epochs] [learning_rate]")?;
    let mut config = TrainingConfig::default();
    if let Some(epochs) = args.get(2) {
        config.epochs = epochs.parse().context("epochs must be an integer")?;
    }
    if let Some(lr) = args.get(3) {
        config.learning_rate = lr.parse().context("learning rate must be a number")?;
    }

    let dataset = Dataset::from_path(path, true)
        .with_context(|| format!("failed to load dataset from {}", path))?;
    log::info!("loaded {} samples from {}", dataset.len(), path);

    let mut trainer = Trainer::new(config);
    let report = trainer.fit(&dataset);

    println!("{}", ParameterTable(trainer.network().parameters()));
    println!("loss: {}", LossCurve::new(trainer.network().loss_history()));
    println!(
        "{} epochs: {:.6} -> {:.6}",
        report.epochs, report.first_loss, report.last_loss
    );
    Ok(())
}
