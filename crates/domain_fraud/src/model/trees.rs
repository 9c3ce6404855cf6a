//! Gradient boosted tree ensemble
//!
//! Trees are read from the XGBoost JSON dump layout (`dump_model(...,
//! with_stats=True, dump_format="json")`):
//!
//! ```json
//! { "nodeid": 0, "split": "insured_age", "split_condition": 30.5,
//!   "yes": 1, "no": 2, "missing": 1, "cover": 120.0,
//!   "children": [ { "nodeid": 1, "leaf": -0.2, "cover": 80.0 },
//!                 { "nodeid": 2, "leaf": 0.4,  "cover": 40.0 } ] }
//! ```
//!
//! A row goes to `yes` when `value < split_condition` and to `missing` when
//! the value is NaN. `base_score` is a probability; the ensemble margin is
//! `logit(base_score)` plus the sum of the reached leaves.
//!
//! At load time split names are resolved to column indices and each tree is
//! flattened into an arena with its root at index 0 and every child stored
//! after its parent.
//!
//! Contributions are exact SHAP values computed with the path-dependent
//! TreeSHAP algorithm (Lundberg et al., 2018), the same quantity
//! `shap.TreeExplainer` reports for an XGBoost model.

use std::collections::HashMap;

use serde::Deserialize;

use super::{feature_positions, logit};
use crate::error::FraudError;

#[derive(Debug, Deserialize)]
pub(crate) struct TreeEnsembleArtifact {
    base_score: f64,
    feature_names: Vec<String>,
    trees: Vec<DumpNode>,
}

#[derive(Debug, Deserialize)]
struct DumpNode {
    nodeid: u32,
    split: Option<String>,
    split_condition: Option<f64>,
    yes: Option<u32>,
    no: Option<u32>,
    missing: Option<u32>,
    leaf: Option<f64>,
    cover: f64,
    #[serde(default)]
    children: Vec<DumpNode>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        yes: usize,
        no: usize,
        missing: usize,
    },
    Leaf {
        value: f64,
    },
}

/// One regression tree
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Node>,
    /// Training rows that reached each node
    covers: Vec<f64>,
    /// Cover-weighted mean leaf value below each node
    expected: Vec<f64>,
}

/// One feature on the path tracked by TreeSHAP
#[derive(Debug, Clone, Copy)]
struct PathElement {
    feature: Option<usize>,
    /// Share of training rows that would follow this path with the feature unknown
    zero_fraction: f64,
    /// 1 when the row itself follows this path, 0 otherwise
    one_fraction: f64,
    /// Permutation weight for subsets of the current size
    weight: f64,
}

impl Tree {
    fn compile(
        root: &DumpNode,
        positions: &HashMap<&str, usize>,
        tree_index: usize,
    ) -> Result<Self, FraudError> {
        let invalid = |reason: String| {
            FraudError::ModelUnavailable(format!("tree {}: {}", tree_index, reason))
        };

        let mut specs: Vec<&DumpNode> = Vec::new();
        let mut index_of: HashMap<u32, usize> = HashMap::new();
        let mut stack = vec![root];
        while let Some(spec) = stack.pop() {
            if index_of.insert(spec.nodeid, specs.len()).is_some() {
                return Err(invalid(format!("duplicate nodeid {}", spec.nodeid)));
            }
            specs.push(spec);
            stack.extend(spec.children.iter().rev());
        }

        let mut nodes = Vec::with_capacity(specs.len());
        let mut covers = Vec::with_capacity(specs.len());
        for spec in &specs {
            if !spec.cover.is_finite() || spec.cover < 0.0 {
                return Err(invalid(format!("node {} has invalid cover", spec.nodeid)));
            }
            covers.push(spec.cover);

            if let Some(value) = spec.leaf {
                if !spec.children.is_empty() {
                    return Err(invalid(format!("leaf {} has children", spec.nodeid)));
                }
                if !value.is_finite() {
                    return Err(invalid(format!("leaf {} is not finite", spec.nodeid)));
                }
                nodes.push(Node::Leaf { value });
                continue;
            }

            let name = spec
                .split
                .as_deref()
                .ok_or_else(|| invalid(format!("node {} has neither split nor leaf", spec.nodeid)))?;
            let feature = *positions
                .get(name)
                .ok_or_else(|| invalid(format!("split on undeclared feature '{}'", name)))?;
            let threshold = spec
                .split_condition
                .filter(|t| t.is_finite())
                .ok_or_else(|| invalid(format!("node {} has no usable split_condition", spec.nodeid)))?;

            let child = |id: Option<u32>, branch: &str| -> Result<usize, FraudError> {
                let id = id.ok_or_else(|| invalid(format!("node {} has no '{}' branch", spec.nodeid, branch)))?;
                match index_of.get(&id) {
                    Some(&index) if spec.children.iter().any(|c| c.nodeid == id) => Ok(index),
                    _ => Err(invalid(format!(
                        "node {} '{}' branch {} is not one of its children",
                        spec.nodeid, branch, id
                    ))),
                }
            };

            let yes = child(spec.yes, "yes")?;
            let no = child(spec.no, "no")?;
            let missing = match spec.missing {
                Some(_) => child(spec.missing, "missing")?,
                None => yes,
            };
            if missing != yes && missing != no {
                return Err(invalid(format!(
                    "node {} 'missing' branch must be its 'yes' or 'no' branch",
                    spec.nodeid
                )));
            }

            nodes.push(Node::Split { feature, threshold, yes, no, missing });
        }

        // Children always sit after their parent, so a reverse sweep sees
        // both children of a split before the split itself.
        let mut expected = vec![0.0; nodes.len()];
        for i in (0..nodes.len()).rev() {
            expected[i] = match nodes[i] {
                Node::Leaf { value } => value,
                Node::Split { yes, no, .. } => {
                    let total = covers[yes] + covers[no];
                    if total > 0.0 {
                        (covers[yes] * expected[yes] + covers[no] * expected[no]) / total
                    } else {
                        (expected[yes] + expected[no]) / 2.0
                    }
                }
            };
        }

        Ok(Self { nodes, covers, expected })
    }

    fn next(&self, node: usize, values: &[f64]) -> Option<usize> {
        match self.nodes[node] {
            Node::Leaf { .. } => None,
            Node::Split { feature, threshold, yes, no, missing } => {
                let x = values[feature];
                Some(if x.is_nan() {
                    missing
                } else if x < threshold {
                    yes
                } else {
                    no
                })
            }
        }
    }

    /// Leaf value reached by a row
    pub fn predict(&self, values: &[f64]) -> f64 {
        let mut node = 0;
        while let Some(child) = self.next(node, values) {
            node = child;
        }
        self.expected[node]
    }

    /// Expected output over the training distribution
    pub fn expected_value(&self) -> f64 {
        self.expected[0]
    }

    /// Share of the training rows at `node` that went to `child`
    fn cover_ratio(&self, node: usize, child: usize) -> f64 {
        let Node::Split { yes, no, .. } = self.nodes[node] else {
            return 1.0;
        };
        let total = self.covers[yes] + self.covers[no];
        if total > 0.0 {
            self.covers[child] / total
        } else {
            0.5
        }
    }

    /// Adds this tree's exact SHAP values for one row to `out`
    ///
    /// Polynomial-time path-dependent TreeSHAP: the expectation over unknown
    /// features follows the training covers, so the contributions sum to
    /// `predict(values) - expected_value()`.
    fn shap(&self, values: &[f64], out: &mut [f64]) {
        let root = PathElement {
            feature: None,
            zero_fraction: 1.0,
            one_fraction: 1.0,
            weight: 1.0,
        };
        self.shap_recurse(0, vec![root], values, out);
    }

    fn shap_recurse(&self, node: usize, path: Vec<PathElement>, values: &[f64], out: &mut [f64]) {
        match self.nodes[node] {
            Node::Leaf { value } => {
                for i in 1..path.len() {
                    let weight = unwound_path_sum(&path, i);
                    let element = path[i];
                    if let Some(feature) = element.feature {
                        out[feature] +=
                            weight * (element.one_fraction - element.zero_fraction) * value;
                    }
                }
            }
            Node::Split { feature, yes, no, .. } => {
                let hot = self.next(node, values).unwrap_or(yes);
                let cold = if hot == yes { no } else { yes };

                let mut path = path;
                let mut incoming_zero = 1.0;
                let mut incoming_one = 1.0;
                if let Some(k) = path.iter().position(|e| e.feature == Some(feature)) {
                    incoming_zero = path[k].zero_fraction;
                    incoming_one = path[k].one_fraction;
                    unwind_path(&mut path, k);
                }

                let hot_path = extend_path(
                    &path,
                    incoming_zero * self.cover_ratio(node, hot),
                    incoming_one,
                    feature,
                );
                self.shap_recurse(hot, hot_path, values, out);

                let cold_path =
                    extend_path(&path, incoming_zero * self.cover_ratio(node, cold), 0.0, feature);
                self.shap_recurse(cold, cold_path, values, out);
            }
        }
    }
}

fn extend_path(
    path: &[PathElement],
    zero_fraction: f64,
    one_fraction: f64,
    feature: usize,
) -> Vec<PathElement> {
    let depth = path.len();
    let mut extended = path.to_vec();
    extended.push(PathElement {
        feature: Some(feature),
        zero_fraction,
        one_fraction,
        weight: if depth == 0 { 1.0 } else { 0.0 },
    });
    let scale = (depth + 1) as f64;
    for i in (0..depth).rev() {
        extended[i + 1].weight += one_fraction * extended[i].weight * (i + 1) as f64 / scale;
        extended[i].weight = zero_fraction * extended[i].weight * (depth - i) as f64 / scale;
    }
    extended
}

/// Removes element `index` from the path, undoing its `extend_path`
fn unwind_path(path: &mut Vec<PathElement>, index: usize) {
    let depth = path.len() - 1;
    let one_fraction = path[index].one_fraction;
    let zero_fraction = path[index].zero_fraction;
    let scale = (depth + 1) as f64;
    let mut next = path[depth].weight;

    for j in (0..depth).rev() {
        if one_fraction != 0.0 {
            let previous = path[j].weight;
            path[j].weight = next * scale / ((j + 1) as f64 * one_fraction);
            next = previous - path[j].weight * zero_fraction * (depth - j) as f64 / scale;
        } else if zero_fraction != 0.0 {
            path[j].weight = path[j].weight * scale / (zero_fraction * (depth - j) as f64);
        }
    }

    for j in index..depth {
        path[j].feature = path[j + 1].feature;
        path[j].zero_fraction = path[j + 1].zero_fraction;
        path[j].one_fraction = path[j + 1].one_fraction;
    }
    path.truncate(depth);
}

/// Total weight the path would have with element `index` unwound
fn unwound_path_sum(path: &[PathElement], index: usize) -> f64 {
    let depth = path.len() - 1;
    let one_fraction = path[index].one_fraction;
    let zero_fraction = path[index].zero_fraction;
    let scale = (depth + 1) as f64;
    let mut next = path[depth].weight;
    let mut total = 0.0;

    for j in (0..depth).rev() {
        if one_fraction != 0.0 {
            let weight = next * scale / ((j + 1) as f64 * one_fraction);
            total += weight;
            next = path[j].weight - weight * zero_fraction * (depth - j) as f64 / scale;
        } else if zero_fraction != 0.0 {
            total += path[j].weight / zero_fraction / ((depth - j) as f64 / scale);
        }
    }
    total
}

/// Sum of regression trees over a logit base margin
#[derive(Debug, Clone)]
pub struct TreeEnsemble {
    base_score: f64,
    base_margin: f64,
    feature_names: Vec<String>,
    trees: Vec<Tree>,
}

impl TreeEnsemble {
    pub(crate) fn from_artifact(artifact: TreeEnsembleArtifact) -> Result<Self, FraudError> {
        if !(artifact.base_score > 0.0 && artifact.base_score < 1.0) {
            return Err(FraudError::ModelUnavailable(format!(
                "base_score {} must lie strictly between 0 and 1",
                artifact.base_score
            )));
        }

        let trees = {
            let positions = feature_positions(&artifact.feature_names)?;
            artifact
                .trees
                .iter()
                .enumerate()
                .map(|(i, root)| Tree::compile(root, &positions, i))
                .collect::<Result<Vec<_>, _>>()?
        };

        Ok(Self {
            base_score: artifact.base_score,
            base_margin: logit(artifact.base_score),
            feature_names: artifact.feature_names,
            trees,
        })
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn base_score(&self) -> f64 {
        self.base_score
    }

    pub fn trees(&self) -> &[Tree] {
        &self.trees
    }

    pub(crate) fn margin(&self, values: &[f64]) -> f64 {
        self.base_margin + self.trees.iter().map(|t| t.predict(values)).sum::<f64>()
    }

    pub(crate) fn contributions(&self, values: &[f64]) -> (f64, Vec<f64>) {
        let mut contributions = vec![0.0; self.feature_names.len()];
        let mut baseline = self.base_margin;
        for tree in &self.trees {
            baseline += tree.expected_value();
            tree.shap(values, &mut contributions);
        }
        (baseline, contributions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STUMP: &str = r#"{
        "base_score": 0.5,
        "feature_names": ["insured_age", "prior_claims_count"],
        "trees": [
            { "nodeid": 0, "split": "insured_age", "split_condition": 30.0,
              "yes": 1, "no": 2, "missing": 2, "cover": 100.0,
              "children": [
                { "nodeid": 1, "leaf": 0.8, "cover": 25.0 },
                { "nodeid": 2, "leaf": -0.4, "cover": 75.0 }
              ] }
        ]
    }"#;

    fn ensemble(json: &str) -> Result<TreeEnsemble, FraudError> {
        TreeEnsemble::from_artifact(serde_json::from_str(json).unwrap())
    }

    #[test]
    fn test_routing() {
        let model = ensemble(STUMP).unwrap();
        assert_eq!(model.margin(&[22.0, 0.0]), 0.8);
        assert_eq!(model.margin(&[30.0, 0.0]), -0.4);
        assert_eq!(model.margin(&[f64::NAN, 0.0]), -0.4);
    }

    #[test]
    fn test_expected_value_is_cover_weighted() {
        let model = ensemble(STUMP).unwrap();
        let expected = 0.25 * 0.8 + 0.75 * -0.4;
        assert!((model.trees()[0].expected_value() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_contributions_sum_to_margin() {
        let model = ensemble(STUMP).unwrap();
        let x = [22.0, 3.0];
        let (baseline, contributions) = model.contributions(&x);
        assert_eq!(contributions[1], 0.0);
        let total = baseline + contributions.iter().sum::<f64>();
        assert!((total - model.margin(&x)).abs() < 1e-12);
    }

    /// Splits on `insured_age` twice along one path and on
    /// `prior_claims_count` along another
    const NESTED: &str = r#"{
        "base_score": 0.3,
        "feature_names": ["insured_age", "prior_claims_count", "state_CA"],
        "trees": [
            { "nodeid": 0, "split": "insured_age", "split_condition": 30.0,
              "yes": 1, "no": 2, "missing": 1, "cover": 100.0,
              "children": [
                { "nodeid": 1, "split": "prior_claims_count", "split_condition": 2.0,
                  "yes": 3, "no": 4, "missing": 3, "cover": 40.0,
                  "children": [
                    { "nodeid": 3, "leaf": 0.5, "cover": 30.0 },
                    { "nodeid": 4, "leaf": 1.2, "cover": 10.0 }
                  ] },
                { "nodeid": 2, "split": "insured_age", "split_condition": 50.0,
                  "yes": 5, "no": 6, "missing": 6, "cover": 60.0,
                  "children": [
                    { "nodeid": 5, "leaf": -0.3, "cover": 35.0 },
                    { "nodeid": 6, "split": "prior_claims_count", "split_condition": 4.0,
                      "yes": 7, "no": 8, "missing": 7, "cover": 25.0,
                      "children": [
                        { "nodeid": 7, "leaf": 0.1, "cover": 20.0 },
                        { "nodeid": 8, "leaf": 0.9, "cover": 5.0 }
                      ] }
                  ] }
              ] }
        ]
    }"#;

    /// Expected leaf value when only the features in `known` are observed
    fn conditional_expectation(tree: &Tree, node: usize, values: &[f64], known: u32) -> f64 {
        match tree.nodes[node] {
            Node::Leaf { value } => value,
            Node::Split { feature, yes, no, .. } => {
                if known & (1 << feature) != 0 {
                    let child = tree.next(node, values).unwrap();
                    conditional_expectation(tree, child, values, known)
                } else {
                    tree.cover_ratio(node, yes) * conditional_expectation(tree, yes, values, known)
                        + tree.cover_ratio(node, no) * conditional_expectation(tree, no, values, known)
                }
            }
        }
    }

    /// Shapley values by enumerating every feature subset
    fn exhaustive_shapley(tree: &Tree, values: &[f64]) -> Vec<f64> {
        let n = values.len();
        let factorial = |k: usize| (1..=k).product::<usize>() as f64;
        let mut phi = vec![0.0; n];
        for (i, slot) in phi.iter_mut().enumerate() {
            for subset in 0u32..(1 << n) {
                if subset & (1 << i) != 0 {
                    continue;
                }
                let size = subset.count_ones() as usize;
                let weight = factorial(size) * factorial(n - size - 1) / factorial(n);
                let with = conditional_expectation(tree, 0, values, subset | (1 << i));
                let without = conditional_expectation(tree, 0, values, subset);
                *slot += weight * (with - without);
            }
        }
        phi
    }

    #[test]
    fn test_stump_contribution_is_output_minus_expectation() {
        let model = ensemble(STUMP).unwrap();
        let (_, contributions) = model.contributions(&[22.0, 3.0]);
        let expected = 0.8 - (0.25 * 0.8 + 0.75 * -0.4);
        assert!((contributions[0] - expected).abs() < 1e-12);
    }

    #[test]
    fn test_contributions_equal_exhaustive_shapley_values() {
        let model = ensemble(NESTED).unwrap();
        let tree = &model.trees()[0];
        let rows = [
            [22.0, 1.0, 1.0],
            [22.0, 3.0, 0.0],
            [41.0, 5.0, 1.0],
            [63.0, 5.0, 0.0],
            [63.0, 0.0, 1.0],
            [f64::NAN, 6.0, 0.0],
        ];

        for row in rows {
            let (baseline, contributions) = model.contributions(&row);
            let exact = exhaustive_shapley(tree, &row);
            for (feature, (got, want)) in contributions.iter().zip(&exact).enumerate() {
                assert!(
                    (got - want).abs() < 1e-12,
                    "row {:?} feature {}: {} != {}",
                    row,
                    feature,
                    got,
                    want
                );
            }
            assert_eq!(contributions[2], 0.0);

            let total = baseline + contributions.iter().sum::<f64>();
            assert!((total - model.margin(&row)).abs() < 1e-12);
        }
    }

    #[test]
    fn test_undeclared_split_feature_rejected() {
        let err = ensemble(&STUMP.replace("\"split\": \"insured_age\"", "\"split\": \"claim_amount\"")).unwrap_err();
        assert!(matches!(err, FraudError::ModelUnavailable(msg) if msg.contains("claim_amount")));
    }

    #[test]
    fn test_branch_outside_children_rejected() {
        let err = ensemble(&STUMP.replace("\"no\": 2", "\"no\": 7")).unwrap_err();
        assert!(matches!(err, FraudError::ModelUnavailable(_)));
    }

    #[test]
    fn test_base_score_bounds() {
        let err = ensemble(&STUMP.replace("\"base_score\": 0.5", "\"base_score\": 1.0")).unwrap_err();
        assert!(matches!(err, FraudError::ModelUnavailable(_)));
    }
}
