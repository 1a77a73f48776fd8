//! Feed-forward network evaluation.
//!
//! The classifiers are small fully connected networks with a single sigmoid
//! output unit. Weights are stored as plain JSON and evaluated row by row;
//! evaluation only reads the weights, so one network can serve concurrent
//! requests without locking.

use serde::{Deserialize, Serialize};

use crate::error::{Result, RiskError};
use crate::model::Classifier;

const DEFAULT_EPSILON: f64 = 1e-3;

/// Element-wise activation function
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    #[default]
    Linear,
    Relu,
    Sigmoid,
    Tanh,
}

impl Activation {
    fn apply(self, x: f64) -> f64 {
        match self {
            Self::Linear => x,
            Self::Relu => x.max(0.0),
            Self::Sigmoid => 1.0 / (1.0 + (-x).exp()),
            Self::Tanh => x.tanh(),
        }
    }
}

fn default_epsilon() -> f64 {
    DEFAULT_EPSILON
}

/// One network layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Layer {
    /// Fully connected layer; `weights` is indexed `[input][output]`
    Dense {
        weights: Vec<Vec<f64>>,
        bias: Vec<f64>,
        #[serde(default)]
        activation: Activation,
    },
    /// Inference-mode batch normalization
    BatchNormalization {
        gamma: Vec<f64>,
        beta: Vec<f64>,
        moving_mean: Vec<f64>,
        moving_variance: Vec<f64>,
        #[serde(default = "default_epsilon")]
        epsilon: f64,
    },
    /// Standalone activation
    Activation { activation: Activation },
}

impl Layer {
    /// Output width given the input width, or why the layer cannot accept it
    fn output_width(&self, input: Option<usize>) -> std::result::Result<usize, String> {
        match self {
            Self::Dense { weights, bias, .. } => {
                let rows = weights.len();
                if rows == 0 {
                    return Err("dense layer has no weights".to_string());
                }
                if let Some(input) = input.filter(|input| *input != rows) {
                    return Err(format!("dense layer expects {rows} inputs, got {input}"));
                }
                let units = bias.len();
                if units == 0 || weights.iter().any(|row| row.len() != units) {
                    return Err(format!("dense layer weights do not match {units} units"));
                }
                Ok(units)
            }
            Self::BatchNormalization {
                gamma,
                beta,
                moving_mean,
                moving_variance,
                epsilon,
            } => {
                let width = input.unwrap_or(gamma.len());
                let consistent = [beta.len(), moving_mean.len(), moving_variance.len()]
                    .iter()
                    .chain(std::iter::once(&gamma.len()))
                    .all(|len| *len == width);
                if width == 0 || !consistent {
                    return Err(format!("batch normalization does not match width {width}"));
                }
                if moving_variance.iter().any(|v| *v + *epsilon <= 0.0) {
                    return Err("batch normalization variance must be positive".to_string());
                }
                Ok(width)
            }
            Self::Activation { .. } => {
                input.ok_or_else(|| "network cannot start with an activation".to_string())
            }
        }
    }

    fn forward(&self, input: Vec<f64>) -> Vec<f64> {
        match self {
            Self::Dense {
                weights,
                bias,
                activation,
            } => {
                let mut out = bias.clone();
                for (x, row) in input.iter().zip(weights) {
                    for (acc, w) in out.iter_mut().zip(row) {
                        *acc += x * w;
                    }
                }
                out.into_iter().map(|v| activation.apply(v)).collect()
            }
            Self::BatchNormalization {
                gamma,
                beta,
                moving_mean,
                moving_variance,
                epsilon,
            } => input
                .into_iter()
                .enumerate()
                .map(|(i, x)| {
                    gamma[i] * (x - moving_mean[i]) / (moving_variance[i] + epsilon).sqrt()
                        + beta[i]
                })
                .collect(),
            Self::Activation { activation } => {
                input.into_iter().map(|v| activation.apply(v)).collect()
            }
        }
    }
}

/// Serialized form of a trained classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSpec {
    pub layers: Vec<Layer>,
}

/// A validated network with a single probability output
#[derive(Debug, Clone)]
pub struct DenseNetwork {
    layers: Vec<Layer>,
    input_width: usize,
}

impl DenseNetwork {
    /// Validate layer shapes end to end
    ///
    /// The network must contain a dense layer, consecutive widths must agree
    /// and the final width must be 1.
    pub fn new(spec: NetworkSpec) -> std::result::Result<Self, String> {
        if !spec.layers.iter().any(|layer| matches!(layer, Layer::Dense { .. })) {
            return Err("network has no dense layer".to_string());
        }

        let mut input_width = None;
        let mut width = None;
        for (index, layer) in spec.layers.iter().enumerate() {
            let out = layer
                .output_width(width)
                .map_err(|reason| format!("layer {index}: {reason}"))?;
            if input_width.is_none() {
                input_width = Some(match layer {
                    Layer::Dense { weights, .. } => weights.len(),
                    _ => out,
                });
            }
            width = Some(out);
        }

        match (input_width, width) {
            (Some(input_width), Some(1)) => Ok(Self {
                layers: spec.layers,
                input_width,
            }),
            (_, width) => Err(format!(
                "network must end in a single unit, ends in {}",
                width.unwrap_or(0)
            )),
        }
    }

    /// Number of features the first layer consumes
    #[must_use]
    pub fn input_width(&self) -> usize {
        self.input_width
    }

    fn forward(&self, row: &[f64]) -> Result<f64> {
        if row.len() != self.input_width {
            return Err(RiskError::ShapeMismatch {
                expected: self.input_width,
                actual: row.len(),
            });
        }
        let output = self
            .layers
            .iter()
            .fold(row.to_vec(), |values, layer| layer.forward(values));
        output
            .first()
            .copied()
            .ok_or_else(|| RiskError::inference("network produced no output"))
    }
}

impl Classifier for DenseNetwork {
    fn predict(&self, features: &[Vec<f64>]) -> Result<Vec<f64>> {
        features.iter().map(|row| self.forward(row)).collect()
    }
}
