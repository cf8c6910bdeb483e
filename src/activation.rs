use ndarray::Array2;

fn compute_sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Apply the logistic function element-wise.
pub fn sigmoid(x: &Array2<f64>) -> Array2<f64> {
    x.map(|&v| compute_sigmoid(v))
}

/// Derivative of the sigmoid expressed through its output `a = sigmoid(x)`,
/// i.e. `a * (1 - a)`. Takes activations, not pre-activations.
pub fn sigmoid_derivative(activated: &Array2<f64>) -> Array2<f64> {
    activated.map(|&a| a * (1.0 - a))
}
