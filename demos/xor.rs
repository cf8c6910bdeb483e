//! Train the 2-3-1 network on XOR and print what it learned.
//!
//! Usage: cargo run --example xor -- --epochs 5000 --lr 0.5 --seed 42

use std::env;

use anyhow::{bail, Context, Result};
use sigmanet::{
    metrics::{accuracy, threshold},
    report::{LossCurve, ParameterTable, StepTable},
    Dataset, Init, Trainer, TrainingConfig,
};

fn parse_args() -> Result<TrainingConfig> {
    let mut config = TrainingConfig::default().with_epochs(5000).with_log_every(500);
    let mut args = env::args().skip(1);
    while let Some(flag) = args.next() {
        let mut value = || args.next().with_context(|| format!("{} needs a value", flag));
        match flag.as_str() {
            "--epochs" | "-e" => config.epochs = value()?.parse()?,
            "--lr" => config.learning_rate = value()?.parse()?,
            "--hidden" => config.hidden_size = value()?.parse()?,
            "--seed" => config.init = Init::Seeded(value()?.parse()?),
            "--constant" => config.init = Init::Constant(value()?.parse()?),
            other => bail!("unknown argument `{}`", other),
        }
    }
    Ok(config)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = parse_args()?;
    let dataset = Dataset::xor();
    let mut trainer = Trainer::new(config);

    println!("initial parameters:\n{}", ParameterTable(trainer.network().parameters()));
    let report = trainer.fit(&dataset);

    println!("last step:\n{}", StepTable(trainer.history()));
    println!("loss: {}", LossCurve::new(trainer.network().loss_history()));

    let predictions = trainer.network().predict(dataset.features());
    let y_pred = threshold(predictions.view(), 0.5);
    let y_true = threshold(dataset.labels(), 0.5);
    println!("predictions: {}", predictions.t());
    println!(
        "accuracy after {} epochs: {:.2}",
        report.epochs,
        accuracy(&y_true, &y_pred)
    );
    Ok(())
}
