use log::{debug, info};

use crate::data::Dataset;
use crate::history::{LossLog, LossRecord, ParameterHistory};
use crate::network::{
    Init, TrainableNetwork, DEFAULT_HIDDEN_SIZE, DEFAULT_LEARNING_RATE,
};

/// Settings for a training session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainingConfig {
    pub epochs: usize,
    pub learning_rate: f64,
    pub hidden_size: usize,
    pub init: Init,
    /// Log progress every this many epochs. 0 disables progress logs.
    pub log_every: usize,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            epochs: 100,
            learning_rate: DEFAULT_LEARNING_RATE,
            hidden_size: DEFAULT_HIDDEN_SIZE,
            init: Init::Random,
            log_every: 10,
        }
    }
}

impl TrainingConfig {
    pub fn with_epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_hidden_size(mut self, hidden_size: usize) -> Self {
        self.hidden_size = hidden_size;
        self
    }

    pub fn with_init(mut self, init: Init) -> Self {
        self.init = init;
        self
    }

    pub fn with_log_every(mut self, log_every: usize) -> Self {
        self.log_every = log_every;
        self
    }
}

/// Summary of one call to `Trainer::fit`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainingReport {
    pub epochs: usize,
    /// Loss before the first update of this run.
    pub first_loss: f64,
    /// Loss after the last update of this run.
    pub last_loss: f64,
}

/// Owns one network and everything recorded while training it.
/// A trainer is meant to serve a single session.
pub struct Trainer {
    config: TrainingConfig,
    network: TrainableNetwork,
    loss_log: LossLog,
    history: ParameterHistory,
}

impl Trainer {
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            network: TrainableNetwork::with_hidden_size(config.hidden_size, config.init),
            config,
            loss_log: LossLog::new(),
            history: ParameterHistory::NotYetRecorded,
        }
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    pub fn network(&self) -> &TrainableNetwork {
        &self.network
    }

    pub fn loss_log(&self) -> &LossLog {
        &self.loss_log
    }

    pub fn history(&self) -> &ParameterHistory {
        &self.history
    }

    /// Run one full-batch epoch.
    pub fn step(&mut self, dataset: &Dataset) -> LossRecord {
        let step = self.network.train_step(
            dataset.features(),
            dataset.labels(),
            self.config.learning_rate,
        );
        self.history.record(&step, self.network.parameters());
        let record = self.loss_log.push(&step);

        debug!(
            "epoch {}: initial loss {}, final loss {}",
            record.epoch, record.initial, record.final_loss
        );
        if self.config.log_every > 0 && record.epoch % self.config.log_every == 0 {
            info!("epoch {}: loss = {:.6}", record.epoch, record.final_loss);
        }
        record
    }

    /// Run `config.epochs` epochs. Epoch numbers continue from earlier runs
    /// until `reset` is called.
    pub fn fit(&mut self, dataset: &Dataset) -> TrainingReport {
        info!(
            "training on {} samples for {} epochs (learning rate {})",
            dataset.len(),
            self.config.epochs,
            self.config.learning_rate
        );

        let mut first_loss = None;
        let mut last_loss = f64::NAN;
        for _ in 0..self.config.epochs {
            let record = self.step(dataset);
            first_loss.get_or_insert(record.initial);
            last_loss = record.final_loss;
        }

        let first_loss = first_loss.unwrap_or(f64::NAN);
        info!("finished: loss {:.6} -> {:.6}", first_loss, last_loss);
        TrainingReport {
            epochs: self.config.epochs,
            first_loss,
            last_loss,
        }
    }

    /// Forget all recorded losses and the last step. Parameters are kept.
    pub fn reset(&mut self) {
        self.network.reset();
        self.loss_log.clear();
        self.history.clear();
    }

    /// Replace the network with a freshly initialized one and reset.
    pub fn reinitialize(&mut self) {
        self.network = TrainableNetwork::with_hidden_size(self.config.hidden_size, self.config.init);
        self.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_network_defaults() {
        let config = TrainingConfig::default();
        assert_eq!(100, config.epochs);
        assert_eq!(0.1, config.learning_rate);
        assert_eq!(3, config.hidden_size);
        assert_eq!(Init::Random, config.init);
    }

    #[test]
    fn fit_records_every_epoch() {
        let config = TrainingConfig::default()
            .with_epochs(20)
            .with_init(Init::Seeded(21));
        let mut trainer = Trainer::new(config);
        let report = trainer.fit(&Dataset::xor());

        assert_eq!(20, report.epochs);
        assert_eq!(20, trainer.loss_log().len());
        assert_eq!(20, trainer.network().loss_history().len());
        assert_eq!(Some(report.last_loss), trainer.loss_log().last().map(|r| r.final_loss));
        assert_eq!(report.first_loss, trainer.loss_log().records()[0].initial);
        assert!(trainer.history().is_recorded());
    }

    #[test]
    fn epochs_continue_across_fits() {
        let config = TrainingConfig::default()
            .with_epochs(3)
            .with_init(Init::Constant(0.1));
        let mut trainer = Trainer::new(config);
        trainer.fit(&Dataset::xor());
        trainer.fit(&Dataset::xor());

        let epochs = trainer
            .loss_log()
            .records()
            .iter()
            .map(|r| r.epoch)
            .collect::<Vec<_>>();
        assert_eq!(vec![1, 2, 3, 4, 5, 6], epochs);
    }

    #[test]
    fn zero_epochs_report_nan() {
        let mut trainer = Trainer::new(TrainingConfig::default().with_epochs(0));
        let report = trainer.fit(&Dataset::xor());
        assert!(report.first_loss.is_nan());
        assert!(report.last_loss.is_nan());
        assert!(!trainer.history().is_recorded());
    }

    #[test]
    fn reset_keeps_parameters_and_reinitialize_replaces_them() {
        let config = TrainingConfig::default()
            .with_epochs(5)
            .with_init(Init::Constant(0.2));
        let mut trainer = Trainer::new(config);
        trainer.fit(&Dataset::xor());
        let trained = trainer.network().parameters().clone();

        trainer.reset();
        assert!(trainer.loss_log().is_empty());
        assert!(trainer.network().loss_history().is_empty());
        assert!(!trainer.history().is_recorded());
        assert_eq!(&trained, trainer.network().parameters());

        trainer.step(&Dataset::xor());
        assert_eq!(1, trainer.loss_log().records()[0].epoch);

        trainer.reinitialize();
        let fresh = TrainableNetwork::new(Init::Constant(0.2));
        assert_eq!(fresh.parameters(), trainer.network().parameters());
        assert!(trainer.loss_log().is_empty());
    }
}
