//! Plain-text views of a network's state, for terminals and logs.
//!
//! Each view is a small wrapper implementing `Display`, so callers decide
//! where the text goes.

use std::fmt;

use ndarray::{Array1, Array2};

use crate::history::ParameterHistory;
use crate::network::Parameters;

const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

fn edge_names(weights: &Array2<f64>, from: &str, to: &str) -> Vec<String> {
    weights
        .indexed_iter()
        .map(|((i, j), _)| {
            if weights.ncols() == 1 {
                format!("{}{} -> {}", from, i + 1, to)
            } else {
                format!("{}{} -> {}{}", from, i + 1, to, j + 1)
            }
        })
        .collect()
}

fn unit_names(bias: &Array1<f64>, unit: &str) -> Vec<String> {
    if bias.len() == 1 {
        vec![unit.to_string()]
    } else {
        (1..=bias.len()).map(|n| format!("{}{}", unit, n)).collect()
    }
}

/// Every parameter tensor in a fixed order, each with one name per element.
fn sections(params: &Parameters) -> [(&'static str, Vec<String>, Vec<f64>); 4] {
    [
        (
            "input -> hidden weights",
            edge_names(&params.weights_input_hidden, "in", "h"),
            params.weights_input_hidden.iter().copied().collect(),
        ),
        (
            "hidden biases",
            unit_names(&params.bias_hidden, "h"),
            params.bias_hidden.to_vec(),
        ),
        (
            "hidden -> output weights",
            edge_names(&params.weights_hidden_output, "h", "out"),
            params.weights_hidden_output.iter().copied().collect(),
        ),
        (
            "output bias",
            unit_names(&params.bias_output, "out"),
            params.bias_output.to_vec(),
        ),
    ]
}

/// Lists every weight and bias of a network.
pub struct ParameterTable<'a>(pub &'a Parameters);

impl fmt::Display for ParameterTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (title, names, values) in sections(self.0) {
            writeln!(f, "{}", title)?;
            for (name, value) in names.iter().zip(values) {
                writeln!(f, "  {:<12} {:>9.4}", name, value)?;
            }
        }
        Ok(())
    }
}

/// Current value, gradient and change of every parameter in the last step,
/// followed by the output error per sample.
pub struct StepTable<'a>(pub &'a ParameterHistory);

impl fmt::Display for StepTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (previous, current, gradients, error) = match self.0 {
            ParameterHistory::NotYetRecorded => {
                return writeln!(f, "no training step recorded yet");
            }
            ParameterHistory::Recorded {
                previous,
                current,
                gradients,
                error,
            } => (previous, current, gradients, error),
        };
        let deltas = current.delta(previous);

        writeln!(f, "  {:<12} {:>9} {:>9} {:>9}", "", "value", "∇", "Δ")?;
        let rows = sections(current)
            .into_iter()
            .zip(sections(gradients))
            .zip(sections(&deltas));
        for (((title, names, values), (_, _, grads)), (_, _, changes)) in rows {
            writeln!(f, "{}", title)?;
            for (((name, value), grad), change) in names.iter().zip(values).zip(grads).zip(changes) {
                writeln!(f, "  {:<12} {:>9.4} {:>9.4} {:>9.4}", name, value, grad, change)?;
            }
        }

        writeln!(f, "error")?;
        for (sample, e) in error.iter().enumerate() {
            writeln!(f, "  sample {:<5} {:>9.4}", sample + 1, e)?;
        }
        Ok(())
    }
}

/// One-line sparkline of a loss sequence with its first and last value.
pub struct LossCurve<'a> {
    losses: &'a [f64],
    width: usize,
}

impl<'a> LossCurve<'a> {
    pub fn new(losses: &'a [f64]) -> Self {
        Self { losses, width: 60 }
    }

    /// At most `width` characters are drawn; longer sequences are sampled.
    pub fn with_width(self, width: usize) -> Self {
        Self {
            width: width.max(1),
            ..self
        }
    }

    fn sampled(&self) -> Vec<f64> {
        let n = self.losses.len();
        if n <= self.width {
            return self.losses.to_vec();
        }
        (0..self.width)
            .map(|i| self.losses[i * (n - 1) / (self.width - 1).max(1)])
            .collect()
    }
}

impl fmt::Display for LossCurve<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (first, last) = match (self.losses.first(), self.losses.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return write!(f, "no losses recorded"),
        };

        let points = self.sampled();
        let min = points.iter().copied().fold(f64::INFINITY, f64::min);
        let max = points.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let top = (SPARK_LEVELS.len() - 1) as f64;
        let line = points
            .iter()
            .map(|&v| {
                let level = if max > min {
                    ((v - min) / (max - min) * top).round() as usize
                } else {
                    0
                };
                SPARK_LEVELS[level.min(SPARK_LEVELS.len() - 1)]
            })
            .collect::<String>();

        write!(f, "{}  {:.4} -> {:.4}", line, first, last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::network::{Init, TrainableNetwork};
    use ndarray::arr2;

    #[test]
    fn parameter_table_lists_every_element() {
        let network = TrainableNetwork::new(Init::Constant(0.5));
        let text = ParameterTable(network.parameters()).to_string();

        assert!(text.contains("in1 -> h1"));
        assert!(text.contains("in2 -> h3"));
        assert!(text.contains("h3 -> out"));
        assert_eq!(6 + 3 + 3 + 1, text.matches("0.5000").count());
        assert_eq!(4 + 13, text.lines().count());
    }

    #[test]
    fn step_table_before_training() {
        let history = ParameterHistory::NotYetRecorded;
        assert_eq!(
            "no training step recorded yet\n",
            StepTable(&history).to_string()
        );
    }

    #[test]
    fn step_table_after_training() {
        let mut network = TrainableNetwork::new(Init::Constant(0.0));
        let input = arr2(&[[0.0, 0.0], [0.0, 1.0], [1.0, 0.0], [1.0, 1.0]]);
        let target = arr2(&[[0.0], [2.0], [3.0], [5.0]]);
        let step = network.train_step(input.view(), target.view(), 0.1);

        let mut history = ParameterHistory::NotYetRecorded;
        history.record(&step, network.parameters());
        let text = StepTable(&history).to_string();

        assert!(text.contains("∇"));
        assert!(text.contains("h2 -> out"));
        assert!(text.contains("sample 4"));
        // error of the first sample is 0 - 0.5
        assert!(text.contains("-0.5000"));
    }

    #[test]
    fn loss_curve_scales_between_extremes() {
        let losses = [4.0, 3.0, 2.0, 1.0];
        assert_eq!(
            "█▆▃▁  4.0000 -> 1.0000",
            LossCurve::new(&losses).to_string()
        );
    }

    #[test]
    fn loss_curve_samples_long_sequences() {
        let losses = (0..100).map(|i| 100.0 - i as f64).collect::<Vec<_>>();
        let text = LossCurve::new(&losses).with_width(10).to_string();
        let line = text.split_whitespace().next().unwrap();
        assert_eq!(10, line.chars().count());
        assert!(line.starts_with('█'));
        assert!(line.ends_with('▁'));
    }

    #[test]
    fn loss_curve_of_flat_and_empty_sequences() {
        assert_eq!(
            "▁▁▁  0.2500 -> 0.2500",
            LossCurve::new(&[0.25, 0.25, 0.25]).to_string()
        );
        assert_eq!("no losses recorded", LossCurve::new(&[]).to_string());
    }
}
