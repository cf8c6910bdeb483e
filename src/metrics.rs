use ndarray::ArrayView2;

/// Turn network outputs into 0/1 labels; values at or above `cutoff` become 1.
pub fn threshold(predictions: ArrayView2<f64>, cutoff: f64) -> Vec<u8> {
    predictions
        .iter()
        .map(|&p| if p >= cutoff { 1 } else { 0 })
        .collect()
}

/// Compute accuracy of the predicted labels `y_pred` to the correct labels `y_true`.
pub fn accuracy<Label>(y_true: &[Label], y_pred: &[Label]) -> f64
where
    Label: Eq,
{
    assert_eq!(y_true.len(), y_pred.len());

    let n_corrects = y_true
        .iter()
        .zip(y_pred.iter())
        .filter(|(t, p)| t == p)
        .count();
    n_corrects as f64 / y_true.len() as f64
}
