// ============================================================
// Layer 4 — Stratified Train/Test Splitter
// ============================================================
// Splits row indices into a training set and a held-out test
// set so that every class keeps (as nearly as integer counts
// allow) the same share in both partitions.
//
// How the split is computed:
//   1. test size = ceil(test_fraction * n)
//   2. each class gets floor(share) test rows, and the rows
//      left over go to the classes with the largest fractional
//      share (ties → bigger class, then lower class code)
//   3. a class always keeps at least one training row
//   4. within each class, a seeded Fisher-Yates shuffle picks
//      which rows are held out
//
// The RNG is seeded from the caller, so the same labels and the
// same seed always give the same partition.

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

/// Row indices of the two partitions, each in ascending order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    pub train: Vec<usize>,
    pub test:  Vec<usize>,
}

/// Stratified split of `labels` (class codes in `0..n_classes`).
pub fn stratified_split(
    labels:        &[usize],
    n_classes:     usize,
    test_fraction: f64,
    seed:          u64,
) -> Split {
    let total = labels.len();
    let mut rng = StdRng::seed_from_u64(seed);

    // Group row indices by class
    let mut by_class: Vec<Vec<usize>> = vec![Vec::new(); n_classes];
    for (row, &label) in labels.iter().enumerate() {
        by_class[label].push(row);
    }

    let quotas = test_quotas(&by_class, total, test_fraction);

    let mut train = Vec::with_capacity(total);
    let mut test  = Vec::new();

    for (rows, quota) in by_class.iter_mut().zip(quotas) {
        rows.shuffle(&mut rng);
        test.extend_from_slice(&rows[..quota]);
        train.extend_from_slice(&rows[quota..]);
    }

    train.sort_unstable();
    test.sort_unstable();

    tracing::debug!(
        "Stratified split: {} train, {} test (seed {})",
        train.len(),
        test.len(),
        seed
    );

    Split { train, test }
}

/// Number of held-out rows for each class.
fn test_quotas(by_class: &[Vec<usize>], total: usize, test_fraction: f64) -> Vec<usize> {
    if total == 0 || test_fraction <= 0.0 {
        return vec![0; by_class.len()];
    }

    let n_test = ((test_fraction * total as f64).ceil() as usize).min(total);

    // Largest-remainder allocation
    let exact: Vec<f64> = by_class
        .iter()
        .map(|rows| rows.len() as f64 * n_test as f64 / total as f64)
        .collect();
    let mut quotas: Vec<usize> = exact.iter().map(|e| e.floor() as usize).collect();

    let mut order: Vec<usize> = (0..by_class.len()).collect();
    order.sort_by(|&a, &b| {
        let frac_a = exact[a] - exact[a].floor();
        let frac_b = exact[b] - exact[b].floor();
        frac_b
            .total_cmp(&frac_a)
            .then(by_class[b].len().cmp(&by_class[a].len()))
            .then(a.cmp(&b))
    });

    let mut remaining = n_test.saturating_sub(quotas.iter().sum());
    for &class in order.iter().cycle().take(order.len() * 2) {
        if remaining == 0 {
            break;
        }
        if quotas[class] < by_class[class].len() {
            quotas[class] += 1;
            remaining -= 1;
        }
    }

    // Never hold out a class entirely
    for (quota, rows) in quotas.iter_mut().zip(by_class) {
        *quota = (*quota).min(rows.len().saturating_sub(1));
    }

    quotas
}
