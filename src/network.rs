use log::debug;
use ndarray::{Array1, Array2, ArrayView2, Axis};
use ndarray_rand::rand::{rngs::StdRng, thread_rng, Rng, SeedableRng};
use ndarray_rand::rand_distr::StandardNormal;
use ndarray_rand::RandomExt;

use crate::activation::{sigmoid, sigmoid_derivative};
use crate::loss::mean_squared_error;

pub const INPUT_SIZE: usize = 2;
pub const OUTPUT_SIZE: usize = 1;
pub const DEFAULT_HIDDEN_SIZE: usize = 3;
pub const DEFAULT_LEARNING_RATE: f64 = 0.1;

/// How the initial parameters are filled.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Init {
    /// Every element drawn from a standard normal distribution.
    #[default]
    Random,
    /// Like `Random`, but from a generator seeded with the given value.
    Seeded(u64),
    /// Every element set to the given value.
    Constant(f64),
}

/// The four parameter tensors of the network.
///
/// The same shape is reused for gradients and for deltas between two
/// snapshots.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameters {
    /// (INPUT_SIZE, hidden_size)
    pub weights_input_hidden: Array2<f64>,
    /// (hidden_size, OUTPUT_SIZE)
    pub weights_hidden_output: Array2<f64>,
    /// (hidden_size,)
    pub bias_hidden: Array1<f64>,
    /// (OUTPUT_SIZE,)
    pub bias_output: Array1<f64>,
}

impl Parameters {
    pub fn new(hidden_size: usize, init: Init) -> Self {
        match init {
            Init::Random => Self::sample(hidden_size, &mut thread_rng()),
            Init::Seeded(seed) => Self::sample(hidden_size, &mut StdRng::seed_from_u64(seed)),
            Init::Constant(value) => Self {
                weights_input_hidden: Array2::from_elem((INPUT_SIZE, hidden_size), value),
                weights_hidden_output: Array2::from_elem((hidden_size, OUTPUT_SIZE), value),
                bias_hidden: Array1::from_elem(hidden_size, value),
                bias_output: Array1::from_elem(OUTPUT_SIZE, value),
            },
        }
    }

    fn sample<R: Rng + ?Sized>(hidden_size: usize, rng: &mut R) -> Self {
        Self {
            weights_input_hidden: Array2::random_using(
                (INPUT_SIZE, hidden_size),
                StandardNormal,
                rng,
            ),
            weights_hidden_output: Array2::random_using(
                (hidden_size, OUTPUT_SIZE),
                StandardNormal,
                rng,
            ),
            bias_hidden: Array1::random_using(hidden_size, StandardNormal, rng),
            bias_output: Array1::random_using(OUTPUT_SIZE, StandardNormal, rng),
        }
    }

    pub fn hidden_size(&self) -> usize {
        self.bias_hidden.len()
    }

    /// Element-wise `self - earlier`.
    pub fn delta(&self, earlier: &Parameters) -> Parameters {
        Parameters {
            weights_input_hidden: &self.weights_input_hidden - &earlier.weights_input_hidden,
            weights_hidden_output: &self.weights_hidden_output - &earlier.weights_hidden_output,
            bias_hidden: &self.bias_hidden - &earlier.bias_hidden,
            bias_output: &self.bias_output - &earlier.bias_output,
        }
    }

    fn scaled_add(&mut self, alpha: f64, other: &Parameters) {
        self.weights_input_hidden
            .scaled_add(alpha, &other.weights_input_hidden);
        self.weights_hidden_output
            .scaled_add(alpha, &other.weights_hidden_output);
        self.bias_hidden.scaled_add(alpha, &other.bias_hidden);
        self.bias_output.scaled_add(alpha, &other.bias_output);
    }
}

/// Activations produced by one forward pass. Only `TrainableNetwork::forward`
/// creates a trace, and `backward` consumes it.
#[derive(Debug, Clone, PartialEq)]
pub struct ForwardTrace {
    hidden: Array2<f64>,
    output: Array2<f64>,
}

impl ForwardTrace {
    /// (n_samples, hidden_size)
    pub fn hidden(&self) -> &Array2<f64> {
        &self.hidden
    }

    /// (n_samples, OUTPUT_SIZE)
    pub fn output(&self) -> &Array2<f64> {
        &self.output
    }

    pub fn into_output(self) -> Array2<f64> {
        self.output
    }
}

/// Everything one training step produced.
#[derive(Debug, Clone)]
pub struct BackwardStep {
    /// Loss of the trace passed in, before the update.
    pub initial_loss: f64,
    /// Loss after the update.
    pub final_loss: f64,
    /// `target - output` of the trace passed in.
    pub error: Array2<f64>,
    /// Parameters as they were before the update.
    pub previous: Parameters,
    pub gradients: Parameters,
    /// Forward pass with the updated parameters, reusable by the next step.
    pub trace: ForwardTrace,
}

pub struct TrainableNetwork {
    parameters: Parameters,
    loss_history: Vec<f64>,
}

impl TrainableNetwork {
    pub fn new(init: Init) -> Self {
        TrainableNetwork::with_hidden_size(DEFAULT_HIDDEN_SIZE, init)
    }

    pub fn with_hidden_size(hidden_size: usize, init: Init) -> Self {
        TrainableNetwork::with_parameters(Parameters::new(hidden_size, init))
    }

    /// Panics if the shapes of `parameters` do not describe a 2-H-1 network.
    pub fn with_parameters(parameters: Parameters) -> Self {
        let hidden_size = parameters.hidden_size();
        assert_eq!(
            parameters.weights_input_hidden.dim(),
            (INPUT_SIZE, hidden_size)
        );
        assert_eq!(
            parameters.weights_hidden_output.dim(),
            (hidden_size, OUTPUT_SIZE)
        );
        assert_eq!(parameters.bias_output.len(), OUTPUT_SIZE);

        Self {
            parameters,
            loss_history: Vec::new(),
        }
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub fn hidden_size(&self) -> usize {
        self.parameters.hidden_size()
    }

    /// Losses after each completed `backward`, oldest first.
    pub fn loss_history(&self) -> &[f64] {
        &self.loss_history
    }

    /// `input` is (n_samples, INPUT_SIZE).
    pub fn forward(&self, input: ArrayView2<f64>) -> ForwardTrace {
        assert_eq!(input.ncols(), INPUT_SIZE, "wrong number of input features");

        let params = &self.parameters;
        let hidden = sigmoid(&(input.dot(&params.weights_input_hidden) + &params.bias_hidden));
        let output = sigmoid(&(hidden.dot(&params.weights_hidden_output) + &params.bias_output));
        ForwardTrace { hidden, output }
    }

    pub fn predict(&self, input: ArrayView2<f64>) -> Array2<f64> {
        self.forward(input).into_output()
    }

    /// One step of backpropagation followed by a gradient update.
    /// `trace` must come from `forward(input)` with the current parameters.
    pub fn backward(
        &mut self,
        input: ArrayView2<f64>,
        target: ArrayView2<f64>,
        trace: ForwardTrace,
        learning_rate: f64,
    ) -> BackwardStep {
        assert_eq!(target.ncols(), OUTPUT_SIZE, "wrong number of target columns");
        assert_eq!(input.nrows(), target.nrows(), "input and target row counts differ");
        assert_eq!(
            trace.output.nrows(),
            input.nrows(),
            "trace was computed on a different batch"
        );

        let previous = self.parameters.clone();
        let initial_loss = mean_squared_error(target, trace.output.view());

        let error = &target - &trace.output;
        // Every gradient is computed before any parameter changes.
        let gradients = self.gradients(input, &error, &trace);
        self.parameters.scaled_add(learning_rate, &gradients);

        let trace = self.forward(input);
        let final_loss = mean_squared_error(target, trace.output.view());
        self.loss_history.push(final_loss);

        debug!(
            "step {}: loss {} -> {}",
            self.loss_history.len(),
            initial_loss,
            final_loss
        );

        BackwardStep {
            initial_loss,
            final_loss,
            error,
            previous,
            gradients,
            trace,
        }
    }

    /// Forward then backward over the full batch.
    pub fn train_step(
        &mut self,
        input: ArrayView2<f64>,
        target: ArrayView2<f64>,
        learning_rate: f64,
    ) -> BackwardStep {
        let trace = self.forward(input);
        self.backward(input, target, trace, learning_rate)
    }

    /// Clear the loss history. Parameters are left as they are.
    pub fn reset(&mut self) {
        self.loss_history.clear();
    }

    // The sign follows `error = target - output`, so the update adds.
    fn gradients(
        &self,
        input: ArrayView2<f64>,
        error: &Array2<f64>,
        trace: &ForwardTrace,
    ) -> Parameters {
        let delta_output = error * &sigmoid_derivative(&trace.output);
        let delta_hidden = delta_output.dot(&self.parameters.weights_hidden_output.t())
            * sigmoid_derivative(&trace.hidden);

        Parameters {
            weights_input_hidden: input.t().dot(&delta_hidden),
            weights_hidden_output: trace.hidden.t().dot(&delta_output),
            bias_hidden: delta_hidden.sum_axis(Axis(0)),
            bias_output: delta_output.sum_axis(Axis(0)),
        }
    }
}
