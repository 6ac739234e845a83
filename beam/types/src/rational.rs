/*!
    Rational number type for time bases and aspect ratios.
*/

use std::fmt;

/**
    A rational number represented as a numerator and denominator.

    Used for time bases (e.g., 1/90000 for MPEG-TS), frame rates
    (e.g., 24000/1001 for 23.976 fps) and sample aspect ratios.

    Values arrive from the host side unchecked, so a zero denominator is
    representable; the native library treats `0/0` and `x/0` as "unset".
*/
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rational {
    pub num: i32,
    pub den: i32,
}

impl Rational {
    /// The value used when a rational is absent: `0/1`.
    pub const ZERO: Self = Self { num: 0, den: 1 };

    /**
        Create a new rational number.
    */
    #[inline]
    pub const fn new(num: i32, den: i32) -> Self {
        Self { num, den }
    }

    /**
        Returns the `[num, den]` pair used on the property bag side.
    */
    #[inline]
    pub const fn to_pair(self) -> [i32; 2] {
        [self.num, self.den]
    }
}

impl Default for Rational {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Debug for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rational() {
        let r = Rational::new(1, 1000);
        assert_eq!(r.num, 1);
        assert_eq!(r.den, 1000);
    }

    #[test]
    fn default_is_zero_over_one() {
        assert_eq!(Rational::default(), Rational::new(0, 1));
        assert_eq!(Rational::ZERO.to_pair(), [0, 1]);
    }

    #[test]
    fn debug_renders_as_fraction() {
        assert_eq!(format!("{:?}", Rational::new(1, 90000)), "1/90000");
    }
}
