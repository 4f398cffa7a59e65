//! Two-dimensional (weight, volume) load arithmetic.

use std::ops::{Add, AddAssign, Sub, SubAssign};

use serde::{Deserialize, Serialize};

/// Relative tolerance applied to every capacity comparison.
///
/// Item volumes are products of three real dimensions, so sums of them drift
/// by a few ulps; a load is within capacity when it exceeds the ceiling by no
/// more than `CAPACITY_TOLERANCE * max(1, capacity)`.
pub const CAPACITY_TOLERANCE: f64 = 1e-9;

/// Returns true if `amount` does not exceed `capacity` beyond tolerance.
#[inline]
pub fn within_capacity(amount: f64, capacity: f64) -> bool {
    amount <= capacity + CAPACITY_TOLERANCE * capacity.abs().max(1.0)
}

/// Returns true if two quantities agree within the capacity tolerance.
#[inline]
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= CAPACITY_TOLERANCE * a.abs().max(b.abs()).max(1.0)
}

/// A weight/volume pair.
///
/// Used both for what a slot carries and for what it can still take.
///
/// # Examples
///
/// ```
/// use loadforge_core::Load;
///
/// let cap = Load::new(300.0, 30.0);
/// let packed = Load::new(200.0, 20.0) + Load::new(50.0, 5.0);
///
/// assert!(packed.fits_within(&cap));
/// assert_eq!((cap - packed).volume, 5.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Load {
    pub weight: f64,
    pub volume: f64,
}

impl Load {
    /// The empty load.
    pub const ZERO: Load = Load {
        weight: 0.0,
        volume: 0.0,
    };

    #[inline]
    pub const fn new(weight: f64, volume: f64) -> Self {
        Self { weight, volume }
    }

    /// Returns true if both dimensions are within `capacity`.
    #[inline]
    pub fn fits_within(&self, capacity: &Load) -> bool {
        within_capacity(self.weight, capacity.weight) && within_capacity(self.volume, capacity.volume)
    }

    /// Returns true if nothing is loaded.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.weight == 0.0 && self.volume == 0.0
    }
}

impl Add for Load {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Load::new(self.weight + other.weight, self.volume + other.volume)
    }
}

impl AddAssign for Load {
    fn add_assign(&mut self, other: Self) {
        self.weight += other.weight;
        self.volume += other.volume;
    }
}

impl Sub for Load {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Load::new(self.weight - other.weight, self.volume - other.volume)
    }
}

impl SubAssign for Load {
    fn sub_assign(&mut self, other: Self) {
        self.weight -= other.weight;
        self.volume -= other.volume;
    }
}
