use serde::{Deserialize, Serialize};
use crate::core::PredictionError;

/// A fitted binary classifier operating on one normalized feature row
pub trait Classifier: Send + Sync {
    /// Predict the class (0 or 1) for a normalized row
    fn predict(&self, row: &[f64]) -> Result<u8, PredictionError>;
}

/// Classifier variants the training pipeline can export
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Model {
    DecisionTree(DecisionTree),
    LogisticRegression(LogisticRegression),
}

impl Model {
    /// Short name used in logs and the health endpoint
    pub fn kind(&self) -> &'static str {
        match self {
            Model::DecisionTree(_) => "decision_tree",
            Model::LogisticRegression(_) => "logistic_regression",
        }
    }

    /// Depth of a tree model, `None` for other model types or a malformed tree
    pub fn depth(&self) -> Option<usize> {
        match self {
            Model::DecisionTree(tree) => tree.depth(),
            Model::LogisticRegression(_) => None,
        }
    }

    /// Check the fitted parameters against the expected input width
    pub fn check(&self, n_features: usize) -> Result<(), String> {
        match self {
            Model::DecisionTree(tree) => tree.check(n_features),
            Model::LogisticRegression(lr) => lr.check(n_features),
        }
    }
}

impl Classifier for Model {
    fn predict(&self, row: &[f64]) -> Result<u8, PredictionError> {
        match self {
            Model::DecisionTree(tree) => tree.predict(row),
            Model::LogisticRegression(lr) => lr.predict(row),
        }
    }
}

/// A node of a flattened decision tree
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum TreeNode {
    /// Samples with `row[feature] <= threshold` go left, the rest go right
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        class: u8,
    },
}

/// Decision tree stored as a flat node array, root at index 0
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawTree")]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

/// Node as written in the bundle, before its shape is known
#[derive(Deserialize)]
struct RawNode {
    feature: Option<usize>,
    threshold: Option<f64>,
    left: Option<usize>,
    right: Option<usize>,
    class: Option<u8>,
}

#[derive(Deserialize)]
struct RawTree {
    nodes: Vec<RawNode>,
}

impl TryFrom<RawTree> for DecisionTree {
    type Error = String;

    fn try_from(raw: RawTree) -> Result<Self, Self::Error> {
        let nodes = raw
            .nodes
            .into_iter()
            .enumerate()
            .map(|(idx, node)| match node {
                RawNode {
                    feature: Some(feature),
                    threshold: Some(threshold),
                    left: Some(left),
                    right: Some(right),
                    class: None,
                } => Ok(TreeNode::Split { feature, threshold, left, right }),
                RawNode {
                    feature: None,
                    threshold: None,
                    left: None,
                    right: None,
                    class: Some(class),
                } => Ok(TreeNode::Leaf { class }),
                _ => Err(format!(
                    "tree node {} must be either a split (feature, threshold, left, right) or a leaf (class)",
                    idx
                )),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { nodes })
    }
}

impl DecisionTree {
    pub fn new(nodes: Vec<TreeNode>) -> Self {
        Self { nodes }
    }

    /// Depth of the longest root-to-leaf path
    ///
    /// Returns `None` unless every child index points forward into the node
    /// array, so an unchecked tree can't loop.
    pub fn depth(&self) -> Option<usize> {
        let mut depths = vec![0usize; self.nodes.len()];

        // Children sit after their parent, so walking backwards sees them first
        for (idx, node) in self.nodes.iter().enumerate().rev() {
            if let TreeNode::Split { left, right, .. } = node {
                let mut deepest = 0;
                for child in [*left, *right] {
                    if child <= idx || child >= self.nodes.len() {
                        return None;
                    }
                    deepest = deepest.max(depths[child]);
                }
                depths[idx] = deepest + 1;
            }
        }

        depths.first().copied()
    }

    fn check(&self, n_features: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("decision tree has no nodes".to_string());
        }

        for (idx, node) in self.nodes.iter().enumerate() {
            match node {
                TreeNode::Split { feature, threshold, left, right } => {
                    if *feature >= n_features {
                        return Err(format!(
                            "node {} splits on feature {} but only {} features exist",
                            idx, feature, n_features
                        ));
                    }
                    if threshold.is_nan() {
                        return Err(format!("node {} has a NaN threshold", idx));
                    }
                    // Children must point forward, which also rules out cycles
                    for child in [left, right] {
                        if *child <= idx || *child >= self.nodes.len() {
                            return Err(format!(
                                "node {} has invalid child index {}",
                                idx, child
                            ));
                        }
                    }
                }
                TreeNode::Leaf { class } => {
                    if *class > 1 {
                        return Err(format!(
                            "leaf {} predicts class {}, expected 0 or 1",
                            idx, class
                        ));
                    }
                }
            }
        }

        Ok(())
    }
}

impl Classifier for DecisionTree {
    fn predict(&self, row: &[f64]) -> Result<u8, PredictionError> {
        let mut idx = 0;
        // A well-formed tree reaches a leaf in fewer steps than it has nodes
        for _ in 0..=self.nodes.len() {
            match self.nodes.get(idx) {
                Some(TreeNode::Leaf { class }) => return Ok(*class),
                Some(TreeNode::Split { feature, threshold, left, right }) => {
                    let value = row.get(*feature).ok_or(PredictionError::DimensionMismatch {
                        stage: "classifier",
                        expected: feature + 1,
                        actual: row.len(),
                    })?;
                    idx = if *value <= *threshold { *left } else { *right };
                }
                None => {
                    return Err(PredictionError::MalformedModel(format!(
                        "node index {} out of range",
                        idx
                    )))
                }
            }
        }

        Err(PredictionError::MalformedModel(
            "tree traversal did not reach a leaf".to_string(),
        ))
    }
}

/// Logistic regression: class 1 when sigmoid(w·x + b) >= threshold
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegression {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

fn default_threshold() -> f64 { 0.5 }

impl LogisticRegression {
    pub fn new(coefficients: Vec<f64>, intercept: f64) -> Self {
        Self {
            coefficients,
            intercept,
            threshold: default_threshold(),
        }
    }

    /// Probability of class 1
    pub fn predict_proba(&self, row: &[f64]) -> Result<f64, PredictionError> {
        if row.len() != self.coefficients.len() {
            return Err(PredictionError::DimensionMismatch {
                stage: "classifier",
                expected: self.coefficients.len(),
                actual: row.len(),
            });
        }

        let logit: f64 = self
            .coefficients
            .iter()
            .zip(row)
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.intercept;

        if !logit.is_finite() {
            return Err(PredictionError::NonFiniteScore);
        }

        Ok(1.0 / (1.0 + (-logit).exp()))
    }

    fn check(&self, n_features: usize) -> Result<(), String> {
        if self.coefficients.len() != n_features {
            return Err(format!(
                "logistic regression has {} coefficients, expected {}",
                self.coefficients.len(),
                n_features
            ));
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|w| !w.is_finite()) {
            return Err("logistic regression parameters must be finite".to_string());
        }
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(format!(
                "logistic regression threshold {} is outside [0, 1]",
                self.threshold
            ));
        }
        Ok(())
    }
}

impl Classifier for LogisticRegression {
    fn predict(&self, row: &[f64]) -> Result<u8, PredictionError> {
        let p = self.predict_proba(row)?;
        Ok(if p >= self.threshold { 1 } else { 0 })
    }
}
