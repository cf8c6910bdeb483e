use ndarray::{ArrayView2, Zip};

/// Mean squared error over every element of the batch.
pub fn mean_squared_error(target: ArrayView2<f64>, prediction: ArrayView2<f64>) -> f64 {
    assert_eq!(target.shape(), prediction.shape());

    let n = target.len();
    Zip::from(&target)
        .and(&prediction)
        .fold(0.0, |loss, &target, &prediction| {
            loss + (target - prediction).powi(2)
        })
        / n as f64
}
