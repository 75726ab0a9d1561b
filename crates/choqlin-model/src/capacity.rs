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

//! Möbius mass functions over the subset lattice and random capacity
//! generation.
//!
//! A capacity on a criterion set is fully described by its Möbius masses:
//! one real per subset, zero on the empty set, summing to one. The masses
//! here are additionally non-negative, which makes the described capacity a
//! belief function. That is a deliberate modeling restriction: the
//! capacity-integral linearization drives each envelope variable to the
//! minimum satisfaction of its subset only when every mass is non-negative,
//! and non-negative masses imply monotonicity of the capacity, so enforcing
//! the sign at construction makes the encoding argument unconditional.
//!
//! Masses are stored densely in the canonical `SubsetLattice` order. The
//! generator and the linearizers share that order by construction, so a
//! mass vector generated here can be consumed directly by
//! `choqlin_linearize` without any re-indexing.

use choqlin_core::lattice::{Subset, SubsetIndex, SubsetLattice, MAX_CRITERIA};
use rand::Rng;
use rand_distr::{Dirichlet, Distribution};

/// Tolerance on the total mass of a capacity.
pub const MASS_TOLERANCE: f64 = 1e-9;

/// The error type for Möbius mass validation.
#[derive(Debug, Clone, PartialEq)]
pub enum CapacityError {
    /// The mass vector length is not a power of two.
    NotALatticeSize { len: usize },
    /// The mass vector spans more criteria than the lattice supports.
    TooManyCriteria { num_criteria: usize },
    /// The empty set carries non-zero mass.
    EmptySetMass { mass: f64 },
    /// A subset carries negative mass.
    NegativeMass { index: usize, mass: f64 },
    /// A mass is NaN or infinite.
    NonFiniteMass { index: usize },
    /// The masses do not sum to one within `MASS_TOLERANCE`.
    TotalMassOffUnity { total: f64 },
}

impl std::fmt::Display for CapacityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotALatticeSize { len } => write!(
                f,
                "Mass vector length {} is not a power of two, so it cannot index a subset lattice",
                len
            ),
            Self::TooManyCriteria { num_criteria } => write!(
                f,
                "Mass vector spans {} criteria but at most {} are supported",
                num_criteria, MAX_CRITERIA
            ),
            Self::EmptySetMass { mass } => {
                write!(f, "The empty set must carry zero mass, found {}", mass)
            }
            Self::NegativeMass { index, mass } => {
                write!(f, "Subset at lattice position {} carries negative mass {}", index, mass)
            }
            Self::NonFiniteMass { index } => {
                write!(f, "Subset at lattice position {} carries a non-finite mass", index)
            }
            Self::TotalMassOffUnity { total } => {
                write!(f, "Masses must sum to 1, found total {}", total)
            }
        }
    }
}

impl std::error::Error for CapacityError {}

/// A Möbius mass function describing a belief-function capacity.
///
/// Masses are indexed by canonical `SubsetLattice` position: entry 0 is the
/// empty set (always zero), the last entry is the full criterion set.
#[derive(Clone, Debug, PartialEq)]
pub struct MobiusMassFunction {
    num_criteria: usize,
    masses: Vec<f64>,
}

impl MobiusMassFunction {
    /// Validates a dense mass vector in lattice order and wraps it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use choqlin_model::capacity::MobiusMassFunction;
    ///
    /// let masses = MobiusMassFunction::from_masses(vec![0.0, 0.5, 0.5, 0.0]).unwrap();
    /// assert_eq!(masses.num_criteria(), 2);
    /// ```
    pub fn from_masses(masses: Vec<f64>) -> Result<Self, CapacityError> {
        let len = masses.len();
        if len == 0 || !len.is_power_of_two() {
            return Err(CapacityError::NotALatticeSize { len });
        }

        let num_criteria = len.trailing_zeros() as usize;
        if num_criteria > MAX_CRITERIA {
            return Err(CapacityError::TooManyCriteria { num_criteria });
        }

        if masses[0] != 0.0 {
            return Err(CapacityError::EmptySetMass { mass: masses[0] });
        }

        let mut total = 0.0;
        for (index, &mass) in masses.iter().enumerate() {
            if !mass.is_finite() {
                return Err(CapacityError::NonFiniteMass { index });
            }
            if mass < 0.0 {
                return Err(CapacityError::NegativeMass { index, mass });
            }
            total += mass;
        }
        if (total - 1.0).abs() > MASS_TOLERANCE {
            return Err(CapacityError::TotalMassOffUnity { total });
        }

        Ok(Self {
            num_criteria,
            masses,
        })
    }

    /// Builds the additive capacity concentrating all mass on singletons.
    ///
    /// The Choquet integral of an additive capacity degenerates to the plain
    /// weighted sum with the given per-criterion weights, which must
    /// therefore sum to one.
    pub fn additive(weights: &[f64]) -> Result<Self, CapacityError> {
        let n = weights.len();
        if n > MAX_CRITERIA {
            return Err(CapacityError::TooManyCriteria { num_criteria: n });
        }

        let mut masses = vec![0.0; 1usize << n];
        // Singleton subsets occupy lattice positions 1..=n.
        masses[1..=n].copy_from_slice(weights);
        Self::from_masses(masses)
    }

    /// Builds the unanimity capacity of the full criterion set.
    ///
    /// All mass sits on the full set, so the Choquet integral degenerates to
    /// the minimum satisfaction, i.e. the maximin objective.
    ///
    /// # Panics
    ///
    /// Panics if `num_criteria` is zero or exceeds `MAX_CRITERIA`.
    pub fn unanimity(num_criteria: usize) -> Self {
        assert!(
            num_criteria >= 1 && num_criteria <= MAX_CRITERIA,
            "called `MobiusMassFunction::unanimity` with {} criteria but between 1 and {} are supported",
            num_criteria,
            MAX_CRITERIA
        );

        let len = 1usize << num_criteria;
        let mut masses = vec![0.0; len];
        masses[len - 1] = 1.0;
        Self {
            num_criteria,
            masses,
        }
    }

    /// Returns the number of criteria the lattice spans.
    #[inline]
    pub fn num_criteria(&self) -> usize {
        self.num_criteria
    }

    /// Returns the lattice length, `2^num_criteria`.
    #[inline]
    pub fn lattice_len(&self) -> usize {
        self.masses.len()
    }

    /// Returns the mass at the given lattice position.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `index` is out of bounds.
    #[inline]
    pub fn mass(&self, index: SubsetIndex) -> f64 {
        debug_assert!(
            index.get() < self.masses.len(),
            "called `MobiusMassFunction::mass` with index out of bounds: the len is {} but the index is {}",
            self.masses.len(),
            index.get()
        );
        self.masses[index.get()]
    }

    /// Returns the dense mass vector in lattice order.
    #[inline]
    pub fn masses(&self) -> &[f64] {
        &self.masses
    }

    /// Returns the capacity of a subset: the cumulative mass of all its
    /// subsets.
    ///
    /// # Panics
    ///
    /// Panics if `subset` mentions criteria outside the lattice.
    pub fn capacity_of(&self, subset: Subset) -> f64 {
        let lattice = SubsetLattice::new(self.num_criteria);
        // index_of rejects foreign subsets before we scan.
        let _ = lattice.index_of(subset);

        lattice
            .subsets()
            .iter()
            .zip(&self.masses)
            .filter(|(candidate, _)| candidate.is_subset_of(subset))
            .map(|(_, &mass)| mass)
            .sum()
    }

    /// Evaluates the Choquet integral of a satisfaction profile directly,
    /// as the mass-weighted sum of subset minima.
    ///
    /// This is the combinatorial counterpart of what the linearized models
    /// compute at optimality; brute-force cross-checks rely on it.
    ///
    /// # Panics
    ///
    /// Panics if `values.len()` differs from the criterion count.
    pub fn choquet_integral(&self, values: &[f64]) -> f64 {
        assert_eq!(
            values.len(),
            self.num_criteria,
            "called `MobiusMassFunction::choquet_integral` with {} values over {} criteria",
            values.len(),
            self.num_criteria
        );

        let lattice = SubsetLattice::new(self.num_criteria);
        lattice
            .subsets()
            .iter()
            .zip(&self.masses)
            .skip(1)
            .map(|(subset, &mass)| {
                let min = subset
                    .members()
                    .map(|i| values[i])
                    .fold(f64::INFINITY, f64::min);
                mass * min
            })
            .sum()
    }
}

/// A generator of random belief-function capacities.
///
/// Masses for the non-empty subsets are drawn from a symmetric Dirichlet
/// distribution, so they are strictly positive and sum to exactly one; the
/// empty set is fixed at zero. The randomness source is always supplied by
/// the caller.
///
/// # Examples
///
/// ```rust
/// use choqlin_model::capacity::CapacityGenerator;
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
///
/// let mut rng = ChaCha8Rng::seed_from_u64(1);
/// let masses = CapacityGenerator::new().belief_function(3, &mut rng);
/// assert_eq!(masses.lattice_len(), 8);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapacityGenerator {
    concentration: f64,
}

impl Default for CapacityGenerator {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl CapacityGenerator {
    /// Creates a generator with the symmetric concentration 1 per non-empty
    /// subset (uniform over the mass simplex).
    #[inline]
    pub fn new() -> Self {
        Self {
            concentration: 1.0,
        }
    }

    /// Sets the Dirichlet concentration parameter.
    ///
    /// Values below 1 favor sparse, spiky mass vectors; values above 1
    /// favor near-uniform ones.
    ///
    /// # Panics
    ///
    /// Panics if `concentration` is not strictly positive and finite.
    #[inline]
    pub fn concentration(mut self, concentration: f64) -> Self {
        assert!(
            concentration > 0.0 && concentration.is_finite(),
            "called `CapacityGenerator::concentration` with non-positive or non-finite value {}",
            concentration
        );
        self.concentration = concentration;
        self
    }

    /// Draws one random belief-function capacity over `num_criteria`
    /// criteria.
    ///
    /// Every non-empty subset receives strictly positive mass and the total
    /// is exactly one up to floating-point rounding.
    ///
    /// # Panics
    ///
    /// Panics if `num_criteria` is zero or exceeds `MAX_CRITERIA`.
    pub fn belief_function<R: Rng + ?Sized>(
        &self,
        num_criteria: usize,
        rng: &mut R,
    ) -> MobiusMassFunction {
        assert!(
            num_criteria >= 1 && num_criteria <= MAX_CRITERIA,
            "called `CapacityGenerator::belief_function` with {} criteria but between 1 and {} are supported",
            num_criteria,
            MAX_CRITERIA
        );

        let num_masses = (1usize << num_criteria) - 1;
        let mut masses = Vec::with_capacity(num_masses + 1);
        masses.push(0.0);

        if num_masses == 1 {
            // A single criterion has one non-empty subset; the simplex is a point.
            masses.push(1.0);
        } else {
            let dirichlet = Dirichlet::new_with_size(self.concentration, num_masses)
                .expect("Dirichlet parameters are valid for two or more subsets");
            masses.extend(dirichlet.sample(rng));
        }

        debug_assert!(masses.iter().skip(1).all(|&mass| mass > 0.0));
        debug_assert!((masses.iter().sum::<f64>() - 1.0).abs() <= MASS_TOLERANCE);

        log::debug!(
            "generated belief function over {} criteria ({} non-empty subsets)",
            num_criteria,
            num_masses
        );

        MobiusMassFunction {
            num_criteria,
            masses,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_from_masses_accepts_valid_vector() {
        let masses = MobiusMassFunction::from_masses(vec![0.0, 0.25, 0.25, 0.5]).unwrap();
        assert_eq!(masses.num_criteria(), 2);
        assert_eq!(masses.lattice_len(), 4);
        assert_eq!(masses.mass(SubsetIndex::new(3)), 0.5);
    }

    #[test]
    fn test_from_masses_rejects_bad_shapes() {
        assert!(matches!(
            MobiusMassFunction::from_masses(vec![0.0, 0.5, 0.5]),
            Err(CapacityError::NotALatticeSize { len: 3 })
        ));
        assert!(matches!(
            MobiusMassFunction::from_masses(vec![]),
            Err(CapacityError::NotALatticeSize { len: 0 })
        ));
    }

    #[test]
    fn test_from_masses_rejects_bad_values() {
        assert!(matches!(
            MobiusMassFunction::from_masses(vec![0.1, 0.4, 0.25, 0.25]),
            Err(CapacityError::EmptySetMass { .. })
        ));
        assert!(matches!(
            MobiusMassFunction::from_masses(vec![0.0, -0.5, 0.75, 0.75]),
            Err(CapacityError::NegativeMass { index: 1, .. })
        ));
        assert!(matches!(
            MobiusMassFunction::from_masses(vec![0.0, f64::NAN, 0.5, 0.5]),
            Err(CapacityError::NonFiniteMass { index: 1 })
        ));
        assert!(matches!(
            MobiusMassFunction::from_masses(vec![0.0, 0.5, 0.5, 0.5]),
            Err(CapacityError::TotalMassOffUnity { .. })
        ));
    }

    #[test]
    fn test_belief_function_satisfies_invariants() {
        let generator = CapacityGenerator::new();
        for n in 1..=6 {
            let mut rng = ChaCha8Rng::seed_from_u64(n as u64);
            let masses = generator.belief_function(n, &mut rng);

            assert_eq!(masses.lattice_len(), 1usize << n);
            assert_eq!(masses.mass(SubsetIndex::new(0)), 0.0);
            assert!(masses.masses().iter().skip(1).all(|&m| m > 0.0));

            let total: f64 = masses.masses().iter().sum();
            assert!((total - 1.0).abs() <= MASS_TOLERANCE);
        }
    }

    #[test]
    fn test_belief_function_is_seed_deterministic() {
        let generator = CapacityGenerator::new();

        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let first = generator.belief_function(4, &mut rng);

        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let second = generator.belief_function(4, &mut rng);

        assert_eq!(first, second);
    }

    #[test]
    fn test_generated_capacity_is_monotone() {
        // Non-negative Möbius masses imply a monotone capacity; spot-check
        // the cumulative form on a generated instance.
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let masses = CapacityGenerator::new().belief_function(4, &mut rng);

        let lattice = SubsetLattice::new(4);
        for &small in lattice.subsets() {
            for &big in lattice.subsets() {
                if small.is_subset_of(big) {
                    assert!(masses.capacity_of(small) <= masses.capacity_of(big) + 1e-12);
                }
            }
        }
        assert!((masses.capacity_of(lattice.full_set()) - 1.0).abs() <= 1e-9);
    }

    #[test]
    fn test_additive_capacity_reduces_choquet_to_weighted_sum() {
        let weights = [0.2, 0.3, 0.5];
        let masses = MobiusMassFunction::additive(&weights).unwrap();

        let values = [4.0, 1.0, 7.0];
        let expected: f64 = weights.iter().zip(values).map(|(w, v)| w * v).sum();
        assert!((masses.choquet_integral(&values) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_unanimity_capacity_reduces_choquet_to_minimum() {
        let masses = MobiusMassFunction::unanimity(3);
        let values = [4.0, 1.0, 7.0];
        assert!((masses.choquet_integral(&values) - 1.0).abs() < 1e-12);
    }
}
