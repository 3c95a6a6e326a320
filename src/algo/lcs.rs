//! Myers LCS for token and pseudo-item sequences.
//!
//! # Algorithm Choice: Why Myers?
//!
//! Consecutive frames of an animated sequence are near-identical: the
//! edit distance `d` between them is typically a handful of tokens, so
//! Myers' O((n+m)*d) beats the O(n*m) DP on every realistic input.
//!
//! The differ runs this on hash keys (structure pass, line pass) and on
//! `(hash, x, y)` keys (token pass); the edit script deliberately
//! contains only Keep/Insert/Delete: folding matching insert+delete
//! pairs into moves is the optimizer's contract, not the LCS's.
//!
//! # References
//!
//! - Myers, E.W. "An O(ND) Difference Algorithm and Its Variations" (1986)
//!
//! # Implementation Notes
//!
//! - Common prefix/suffix stripping before the core loop
//! - ≤8-element sequences take a simple DP fast path

// =============================================================================
// Public Types
// =============================================================================

/// Edit operation in a diff sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edit {
    /// Keep item at old_idx, corresponds to new_idx
    Keep { old_idx: usize, new_idx: usize },
    /// Insert new item at new_idx
    Insert { new_idx: usize },
    /// Delete item at old_idx
    Delete { old_idx: usize },
}

impl Edit {
    pub fn is_keep(&self) -> bool {
        matches!(self, Edit::Keep { .. })
    }
}

/// Result of an LCS run.
#[derive(Debug, Default)]
pub struct LcsResult {
    pub edits: Vec<Edit>,
}

impl LcsResult {
    /// Matched `(old_idx, new_idx)` pairs, in sequence order.
    pub fn keeps(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.edits.iter().filter_map(|e| match e {
            Edit::Keep { old_idx, new_idx } => Some((*old_idx, *new_idx)),
            _ => None,
        })
    }

    /// Unmatched old-side indices.
    pub fn deletes(&self) -> impl Iterator<Item = usize> + '_ {
        self.edits.iter().filter_map(|e| match e {
            Edit::Delete { old_idx } => Some(*old_idx),
            _ => None,
        })
    }

    /// Unmatched new-side indices.
    pub fn inserts(&self) -> impl Iterator<Item = usize> + '_ {
        self.edits.iter().filter_map(|e| match e {
            Edit::Insert { new_idx } => Some(*new_idx),
            _ => None,
        })
    }
}

// =============================================================================
// Main API
// =============================================================================

/// Compute the edit script between two key sequences.
///
/// Works over any `Copy + Eq` key: content hashes, `(hash, x, y)`
/// placement triples, pseudo-line hashes.
pub fn diff_sequences<K>(old: &[K], new: &[K]) -> LcsResult
where
    K: Copy + Eq,
{
    // Quick paths
    if old.is_empty() && new.is_empty() {
        return LcsResult::default();
    }

    if old.is_empty() {
        return LcsResult {
            edits: (0..new.len()).map(|i| Edit::Insert { new_idx: i }).collect(),
        };
    }

    if new.is_empty() {
        return LcsResult {
            edits: (0..old.len()).map(|i| Edit::Delete { old_idx: i }).collect(),
        };
    }

    let lcs = myers_lcs(old, new);
    extract_edits(old.len(), new.len(), &lcs)
}

// =============================================================================
// Myers Algorithm Core
// =============================================================================

/// Compute the LCS with prefix/suffix optimization.
fn myers_lcs<K: Copy + Eq>(old: &[K], new: &[K]) -> Vec<(usize, usize)> {
    let n = old.len();
    let m = new.len();

    // Optimization: strip common prefix
    let mut prefix_len = 0;
    while prefix_len < n && prefix_len < m && old[prefix_len] == new[prefix_len] {
        prefix_len += 1;
    }

    // Optimization: strip common suffix
    let mut suffix_len = 0;
    while suffix_len < (n - prefix_len)
        && suffix_len < (m - prefix_len)
        && old[n - 1 - suffix_len] == new[m - 1 - suffix_len]
    {
        suffix_len += 1;
    }

    let mut lcs: Vec<(usize, usize)> = (0..prefix_len).map(|i| (i, i)).collect();

    let old_mid = &old[prefix_len..n - suffix_len];
    let new_mid = &new[prefix_len..m - suffix_len];

    if !old_mid.is_empty() && !new_mid.is_empty() {
        let mid_lcs = myers_core(old_mid, new_mid);
        for (oi, ni) in mid_lcs {
            lcs.push((oi + prefix_len, ni + prefix_len));
        }
    }

    for i in 0..suffix_len {
        lcs.push((n - suffix_len + i, m - suffix_len + i));
    }

    lcs
}

/// Myers core: explore the edit graph by edit distance `d`, tracking
/// the furthest-reaching path on each diagonal `k = x - y`.
fn myers_core<K: Copy + Eq>(old: &[K], new: &[K]) -> Vec<(usize, usize)> {
    let n = old.len();
    let m = new.len();

    if n == 0 || m == 0 {
        return Vec::new();
    }

    // Small array optimization: DP beats Myers for n,m ≤ 8
    if n <= 8 && m <= 8 {
        return small_lcs_dp(old, new);
    }

    let max_d = n + m;
    let offset = max_d; // handles negative k indices

    // V[k + offset] = furthest x on diagonal k
    let mut v = vec![0usize; 2 * max_d + 1];
    let mut trace: Vec<Vec<usize>> = Vec::new();

    'outer: for d in 0..=max_d {
        trace.push(v.clone());

        for k in (-(d as isize)..=(d as isize)).step_by(2) {
            let kk = (k + offset as isize) as usize;

            // At k=-d must come from k+1 (insert); at k=d from k-1
            // (delete); otherwise whichever reaches further right.
            let mut x = if k == -(d as isize) || (k != d as isize && v[kk - 1] < v[kk + 1]) {
                v[kk + 1]
            } else {
                v[kk - 1] + 1
            };

            let mut y = (x as isize - k) as usize;

            // Extend snake: follow diagonal while elements match
            while x < n && y < m && old[x] == new[y] {
                x += 1;
                y += 1;
            }

            v[kk] = x;

            if x >= n && y >= m {
                break 'outer;
            }
        }
    }

    backtrack(&trace, old, new, n, m, offset)
}

/// Backtrack through the trace to extract LCS pairs.
fn backtrack<K: Copy + Eq>(
    trace: &[Vec<usize>],
    old: &[K],
    new: &[K],
    n: usize,
    m: usize,
    offset: usize,
) -> Vec<(usize, usize)> {
    let mut x = n;
    let mut y = m;
    let mut lcs = Vec::new();

    for (d, v) in trace.iter().enumerate().rev() {
        let k = x as isize - y as isize;
        let kk = (k + offset as isize) as usize;

        let prev_k = if d == 0 {
            0isize
        } else if k == -(d as isize) || (k != d as isize && v[kk - 1] < v[kk + 1]) {
            k + 1 // came from insert
        } else {
            k - 1 // came from delete
        };

        let prev_kk = (prev_k + offset as isize) as usize;
        let prev_x = if d == 0 { 0 } else { v[prev_kk] };
        let prev_y = (prev_x as isize - prev_k) as usize;

        // Collect matches along the snake
        while x > prev_x && y > prev_y {
            x -= 1;
            y -= 1;
            if old[x] == new[y] {
                lcs.push((x, y));
            }
        }

        if d > 0 {
            if prev_k < k {
                x = prev_x;
            } else {
                y = prev_y;
            }
        }

        if x == 0 && y == 0 {
            break;
        }
    }

    lcs.reverse();
    lcs
}

/// Simple O(n*m) DP for sequences of ≤8 elements.
fn small_lcs_dp<K: Copy + Eq>(old: &[K], new: &[K]) -> Vec<(usize, usize)> {
    let n = old.len();
    let m = new.len();

    let mut dp = [[0u8; 9]; 9];

    for i in 1..=n {
        for j in 1..=m {
            dp[i][j] = if old[i - 1] == new[j - 1] {
                dp[i - 1][j - 1] + 1
            } else {
                dp[i - 1][j].max(dp[i][j - 1])
            };
        }
    }

    let mut lcs = Vec::with_capacity(dp[n][m] as usize);
    let mut i = n;
    let mut j = m;

    while i > 0 && j > 0 {
        if old[i - 1] == new[j - 1] {
            lcs.push((i - 1, j - 1));
            i -= 1;
            j -= 1;
        } else if dp[i - 1][j] > dp[i][j - 1] {
            i -= 1;
        } else {
            j -= 1;
        }
    }

    lcs.reverse();
    lcs
}

/// Turn LCS pairs into an ordered edit script.
fn extract_edits(old_len: usize, new_len: usize, lcs: &[(usize, usize)]) -> LcsResult {
    use rustc_hash::FxHashSet;

    let lcs_old: FxHashSet<usize> = lcs.iter().map(|(o, _)| *o).collect();
    let lcs_new: FxHashSet<usize> = lcs.iter().map(|(_, n)| *n).collect();

    let mut edits = Vec::with_capacity(old_len + new_len - lcs.len());

    for &(old_idx, new_idx) in lcs {
        edits.push(Edit::Keep { old_idx, new_idx });
    }
    for old_idx in 0..old_len {
        if !lcs_old.contains(&old_idx) {
            edits.push(Edit::Delete { old_idx });
        }
    }
    for new_idx in 0..new_len {
        if !lcs_new.contains(&new_idx) {
            edits.push(Edit::Insert { new_idx });
        }
    }

    // Sort for consistent ordering
    edits.sort_by_key(|e| match e {
        Edit::Keep { new_idx, .. } => (*new_idx, 0),
        Edit::Insert { new_idx } => (*new_idx, 1),
        Edit::Delete { old_idx } => (*old_idx, 2),
    });

    LcsResult { edits }
}

// =============================================================================
// Tests
// =============================================================================
