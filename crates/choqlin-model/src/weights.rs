// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Rank weight vectors for ordered weighted averaging.

/// Generates the polynomial family of OWA rank weights.
///
/// For `n` criteria and sharpness `alpha >= 1`, rank `k` (applied to the
/// k-th smallest satisfaction) receives
/// `w[k] = ((n-k)/n)^alpha - ((n-k-1)/n)^alpha`.
///
/// The weights telescope to a total of exactly one, are non-increasing in
/// the rank, and collapse to the uniform vector at `alpha = 1`. Larger
/// `alpha` concentrates weight on the worst-off criteria, which is the
/// fairness-oriented regime of ordered weighted averaging.
///
/// # Panics
///
/// Panics if `num_criteria` is zero or `alpha` is below 1 or not finite.
///
/// # Examples
///
/// ```rust
/// use choqlin_model::weights::owa_weights;
///
/// let uniform = owa_weights(4, 1.0);
/// assert!(uniform.iter().all(|&w| (w - 0.25).abs() < 1e-12));
/// ```
pub fn owa_weights(num_criteria: usize, alpha: f64) -> Vec<f64> {
    assert!(
        num_criteria >= 1,
        "called `owa_weights` with zero criteria"
    );
    assert!(
        alpha >= 1.0 && alpha.is_finite(),
        "called `owa_weights` with alpha {} but alpha must be finite and at least 1",
        alpha
    );

    let n = num_criteria as f64;
    (0..num_criteria)
        .map(|k| {
            let upper = (n - k as f64) / n;
            let lower = (n - k as f64 - 1.0) / n;
            upper.powf(alpha) - lower.powf(alpha)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weights_sum_to_one() {
        for n in 1..=8 {
            for &alpha in &[1.0, 2.0, 3.5, 10.0] {
                let weights = owa_weights(n, alpha);
                assert_eq!(weights.len(), n);
                let total: f64 = weights.iter().sum();
                assert!(
                    (total - 1.0).abs() < 1e-12,
                    "weights for n={} alpha={} sum to {}",
                    n,
                    alpha,
                    total
                );
            }
        }
    }

    #[test]
    fn test_weights_are_non_increasing() {
        let weights = owa_weights(6, 2.0);
        for pair in weights.windows(2) {
            assert!(pair[0] >= pair[1] - 1e-12);
        }
    }

    #[test]
    fn test_alpha_one_is_uniform() {
        let weights = owa_weights(5, 1.0);
        assert!(weights.iter().all(|&w| (w - 0.2).abs() < 1e-12));
    }

    #[test]
    fn test_weights_are_non_negative() {
        let weights = owa_weights(7, 4.0);
        assert!(weights.iter().all(|&w| w >= 0.0));
    }

    #[test]
    #[should_panic(expected = "alpha must be finite and at least 1")]
    fn test_rejects_alpha_below_one() {
        let _ = owa_weights(3, 0.5);
    }
}
