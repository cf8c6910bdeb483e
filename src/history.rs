use ndarray::Array2;

use crate::network::{BackwardStep, Parameters};

/// The last training step as seen from outside the network: parameters
/// before and after the update, the raw gradients and the output error.
#[derive(Debug, Clone, Default)]
pub enum ParameterHistory {
    #[default]
    NotYetRecorded,
    Recorded {
        previous: Parameters,
        current: Parameters,
        gradients: Parameters,
        error: Array2<f64>,
    },
}

impl ParameterHistory {
    /// Overwrite the history with `step`. `current` is the network's
    /// parameters right after that step.
    pub fn record(&mut self, step: &BackwardStep, current: &Parameters) {
        *self = ParameterHistory::Recorded {
            previous: step.previous.clone(),
            current: current.clone(),
            gradients: step.gradients.clone(),
            error: step.error.clone(),
        };
    }

    pub fn is_recorded(&self) -> bool {
        matches!(self, ParameterHistory::Recorded { .. })
    }

    /// `current - previous` of the recorded step.
    pub fn deltas(&self) -> Option<Parameters> {
        match self {
            ParameterHistory::NotYetRecorded => None,
            ParameterHistory::Recorded {
                previous, current, ..
            } => Some(current.delta(previous)),
        }
    }

    pub fn gradients(&self) -> Option<&Parameters> {
        match self {
            ParameterHistory::NotYetRecorded => None,
            ParameterHistory::Recorded { gradients, .. } => Some(gradients),
        }
    }

    pub fn clear(&mut self) {
        *self = ParameterHistory::NotYetRecorded;
    }
}

/// Losses of one epoch, measured before and after its update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LossRecord {
    /// 1-based.
    pub epoch: usize,
    pub initial: f64,
    pub final_loss: f64,
}

/// Append-only log of `LossRecord`s.
#[derive(Debug, Clone, Default)]
pub struct LossLog {
    records: Vec<LossRecord>,
}

impl LossLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the losses of `step` as the next epoch and return the record.
    pub fn push(&mut self, step: &BackwardStep) -> LossRecord {
        let record = LossRecord {
            epoch: self.records.len() + 1,
            initial: step.initial_loss,
            final_loss: step.final_loss,
        };
        self.records.push(record);
        record
    }

    pub fn records(&self) -> &[LossRecord] {
        &self.records
    }

    pub fn initial_losses(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.initial).collect()
    }

    pub fn final_losses(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.final_loss).collect()
    }

    pub fn last(&self) -> Option<&LossRecord> {
        self.records.last()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}

#[cfg(test)]
mod tests {
    use crate::assert_rel_eq_arr2;
    use crate::network::{Init, TrainableNetwork};

    use super::*;
    use approx::assert_relative_eq;
    use ndarray::arr2;

    fn train_once(network: &mut TrainableNetwork) -> BackwardStep {
        let input = arr2(&[[0.0, 0.0], [0.0, 1.0], [1.0, 0.0], [1.0, 1.0]]);
        let target = arr2(&[[0.0], [2.0], [3.0], [5.0]]);
        network.train_step(input.view(), target.view(), 0.1)
    }

    #[test]
    fn nothing_recorded_yields_no_deltas() {
        let history = ParameterHistory::default();
        assert!(!history.is_recorded());
        assert!(history.deltas().is_none());
        assert!(history.gradients().is_none());
    }

    #[test]
    fn deltas_are_learning_rate_times_gradients() {
        let mut network = TrainableNetwork::new(Init::Constant(0.0));
        let step = train_once(&mut network);

        let mut history = ParameterHistory::default();
        history.record(&step, network.parameters());
        let deltas = history.deltas().unwrap();
        let gradients = history.gradients().unwrap();

        assert_rel_eq_arr2!(
            deltas.weights_hidden_output,
            &gradients.weights_hidden_output * 0.1,
            1e-12
        );
        assert_relative_eq!(
            deltas.bias_output[0],
            gradients.bias_output[0] * 0.1,
            epsilon = 1e-12
        );
    }

    #[test]
    fn record_overwrites_previous_step() {
        let mut network = TrainableNetwork::new(Init::Seeded(9));
        let mut history = ParameterHistory::default();

        let first = train_once(&mut network);
        history.record(&first, network.parameters());
        let second = train_once(&mut network);
        history.record(&second, network.parameters());

        match &history {
            ParameterHistory::Recorded { previous, .. } => assert_eq!(previous, &second.previous),
            ParameterHistory::NotYetRecorded => panic!("history should be recorded"),
        }

        history.clear();
        assert!(!history.is_recorded());
    }

    #[test]
    fn loss_log_numbers_epochs_from_one() {
        let mut network = TrainableNetwork::new(Init::Constant(0.0));
        let mut log = LossLog::new();

        for _ in 0..3 {
            let step = train_once(&mut network);
            log.push(&step);
        }

        let epochs = log.records().iter().map(|r| r.epoch).collect::<Vec<_>>();
        assert_eq!(vec![1, 2, 3], epochs);
        assert_eq!(network.loss_history(), log.final_losses().as_slice());
        assert_eq!(7.25, log.initial_losses()[0]);

        log.clear();
        assert!(log.is_empty());
        assert!(log.last().is_none());
    }
}
