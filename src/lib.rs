//! A 2-H-1 sigmoid feed-forward network trained by full-batch backpropagation,
//! together with the thin layers around it: dataset parsing, a training loop
//! and text rendering of parameters, gradients and deltas.

pub mod activation;
pub mod data;
pub mod history;
pub mod loss;
pub mod metrics;
pub mod network;
pub mod report;
pub mod trainer;

pub use data::{DataError, Dataset};
pub use history::{LossLog, LossRecord, ParameterHistory};
pub use network::{BackwardStep, ForwardTrace, Init, Parameters, TrainableNetwork};
pub use trainer::{Trainer, TrainingConfig, TrainingReport};

#[macro_export]
macro_rules! assert_rel_eq_arr1 {
    ($actual:expr, $expected:expr) => {
        assert_eq!($actual.shape(), $expected.shape());
        ndarray::Zip::from(&$actual)
            .and(&$expected)
            .for_each(|v, w| {
                assert_relative_eq!(v, w);
            });
    };
    ($actual:expr, $expected:expr, $epsilon:expr) => {
        assert_eq!($actual.shape(), $expected.shape());
        ndarray::Zip::from(&$actual)
            .and(&$expected)
            .for_each(|v, w| {
                assert_relative_eq!(v, w, epsilon = $epsilon);
            });
    };
}

#[macro_export]
macro_rules! assert_rel_eq_arr2 {
    ($actual:expr, $expected:expr) => {
        assert_eq!($actual.shape(), $expected.shape());
        ndarray::Zip::from(&$actual)
            .and(&$expected)
            .for_each(|v, w| {
                assert_relative_eq!(v, w);
            });
    };
    ($actual:expr, $expected:expr, $epsilon:expr) => {
        assert_eq!($actual.shape(), $expected.shape());
        ndarray::Zip::from(&$actual)
            .and(&$expected)
            .for_each(|v, w| {
                assert_relative_eq!(v, w, epsilon = $epsilon);
            });
    };
}
