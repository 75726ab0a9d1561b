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

//! Small numeric helpers shared across the workspace.

/// Computes the Lorenz vector of a satisfaction profile.
///
/// The k-th component is the sum of the k smallest values, so the vector is
/// the cumulative sum of the ascending sort. Comparing two Lorenz vectors
/// componentwise compares the equity of two profiles with equal totals.
///
/// NaN values order after every finite value (total order on `f64`).
///
/// # Examples
///
/// ```rust
/// use choqlin_core::math::lorenz_vector;
///
/// let lorenz = lorenz_vector(&[3.0, 1.0, 2.0]);
/// assert_eq!(lorenz, vec![1.0, 3.0, 6.0]);
/// ```
pub fn lorenz_vector(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mut running = 0.0;
    sorted
        .iter()
        .map(|value| {
            running += value;
            running
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lorenz_vector_is_cumulative_ascending_sort() {
        let lorenz = lorenz_vector(&[5.0, 0.0, 2.0, 1.0]);
        assert_eq!(lorenz, vec![0.0, 1.0, 3.0, 8.0]);
    }

    #[test]
    fn test_lorenz_vector_of_empty_profile_is_empty() {
        assert!(lorenz_vector(&[]).is_empty());
    }

    #[test]
    fn test_lorenz_vector_last_component_is_total() {
        let values = [4.0, 7.0, 1.0, 2.5];
        let lorenz = lorenz_vector(&values);
        let total: f64 = values.iter().sum();
        assert!((lorenz[lorenz.len() - 1] - total).abs() < 1e-12);
    }
}
