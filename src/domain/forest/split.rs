//! Gini impurity and best-threshold search

use rand::seq::SliceRandom;
use rand::Rng;

/// A chosen split of a node's samples
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct SplitCandidate {
    pub feature: usize,
    pub threshold: f64,
    /// `n * impurity(parent) - n_left * impurity(left) - n_right * impurity(right)`
    pub gain: f64,
}

/// Gini impurity of a class count vector
pub(super) fn gini(counts: &[usize]) -> f64 {
    let total: usize = counts.iter().sum();
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    1.0 - counts
        .iter()
        .map(|&c| {
            let p = c as f64 / total;
            p * p
        })
        .sum::<f64>()
}

pub(super) fn class_counts(labels: &[usize], indices: &[usize], n_classes: usize) -> Vec<usize> {
    let mut counts = vec![0usize; n_classes];
    for &i in indices {
        counts[labels[i]] += 1;
    }
    counts
}

/// Search for the split minimizing weighted child impurity.
///
/// Features are visited in random order until `max_features` non-constant
/// features have been examined, so a node whose first draws are all
/// constant still gets a chance to split.
pub(super) fn best_split<R: Rng + ?Sized>(
    features: &[Vec<f64>],
    labels: &[usize],
    indices: &[usize],
    n_classes: usize,
    max_features: usize,
    min_samples_leaf: usize,
    rng: &mut R,
) -> Option<SplitCandidate> {
    let n_features = features.first().map(Vec::len).unwrap_or(0);
    let mut order: Vec<usize> = (0..n_features).collect();
    order.shuffle(rng);

    let parent_counts = class_counts(labels, indices, n_classes);
    let parent_weighted = indices.len() as f64 * gini(&parent_counts);

    let mut best: Option<SplitCandidate> = None;
    let mut examined = 0usize;
    let mut column: Vec<(f64, usize)> = Vec::with_capacity(indices.len());

    for feature in order {
        if examined >= max_features {
            break;
        }

        column.clear();
        column.extend(indices.iter().map(|&i| (features[i][feature], labels[i])));
        column.sort_by(|a, b| a.0.total_cmp(&b.0));

        let first = column[0].0;
        let last = column[column.len() - 1].0;
        if first == last {
            continue;
        }
        examined += 1;

        let mut left = vec![0usize; n_classes];
        let mut right = parent_counts.clone();

        for position in 0..column.len() - 1 {
            let (value, label) = column[position];
            left[label] += 1;
            right[label] -= 1;

            let next = column[position + 1].0;
            if value == next {
                continue;
            }

            let n_left = position + 1;
            let n_right = column.len() - n_left;
            if n_left < min_samples_leaf || n_right < min_samples_leaf {
                continue;
            }

            let weighted = n_left as f64 * gini(&left) + n_right as f64 * gini(&right);
            let gain = parent_weighted - weighted;

            if best.is_none_or(|b| gain > b.gain) {
                let mut threshold = (value + next) / 2.0;
                // midpoint can round up to `next` for adjacent floats
                if threshold >= next {
                    threshold = value;
                }
                best = Some(SplitCandidate {
                    feature,
                    threshold,
                    gain,
                });
            }
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn test_gini() {
        assert_eq!(gini(&[5, 0]), 0.0);
        assert_eq!(gini(&[5, 5]), 0.5);
        assert_eq!(gini(&[0, 0]), 0.0);
    }

    #[test]
    fn test_best_split_separates_classes() {
        let features = vec![vec![1.0], vec![2.0], vec![3.0], vec![10.0], vec![11.0]];
        let labels = vec![0, 0, 0, 1, 1];
        let indices: Vec<usize> = (0..5).collect();
        let mut rng = StdRng::seed_from_u64(7);

        let split = best_split(&features, &labels, &indices, 2, 1, 1, &mut rng).unwrap();

        assert_eq!(split.feature, 0);
        assert_eq!(split.threshold, 6.5);
        // parent: 5 * (1 - (0.6^2 + 0.4^2)) = 2.4, children pure
        assert!((split.gain - 2.4).abs() < 1e-12);
    }

    #[test]
    fn test_best_split_skips_constant_features() {
        let features = vec![
            vec![1.0, 0.0],
            vec![1.0, 0.0],
            vec![1.0, 5.0],
            vec![1.0, 5.0],
        ];
        let labels = vec![0, 0, 1, 1];
        let indices: Vec<usize> = (0..4).collect();
        let mut rng = StdRng::seed_from_u64(1);

        let split = best_split(&features, &labels, &indices, 2, 1, 1, &mut rng).unwrap();
        assert_eq!(split.feature, 1);
    }

    #[test]
    fn test_best_split_none_when_all_constant() {
        let features = vec![vec![1.0], vec![1.0]];
        let labels = vec![0, 1];
        let mut rng = StdRng::seed_from_u64(1);

        assert!(best_split(&features, &labels, &[0, 1], 2, 1, 1, &mut rng).is_none());
    }

    #[test]
    fn test_best_split_respects_min_samples_leaf() {
        let features = vec![vec![1.0], vec![2.0], vec![3.0]];
        let labels = vec![1, 0, 0];
        let mut rng = StdRng::seed_from_u64(1);

        let split = best_split(&features, &labels, &[0, 1, 2], 2, 1, 2, &mut rng);
        assert!(split.is_none());
    }
}
