/// Q32.32 fixed-point duration in microseconds.
///
/// Storage: `u64` with 32 integer bits + 32 fractional bits.
/// Base unit: microseconds (1 second = 1,000,000 us).
/// Range: 0 to ~4294 seconds with sub-microsecond precision.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Micros(u64);

impl Micros {
    const FRAC_BITS: u32 = 32;
    const MICROS_PER_SEC: u64 = 1_000_000;

    /// Create from whole seconds.
    pub const fn from_secs(secs: u32) -> Self {
        Self((secs as u64 * Self::MICROS_PER_SEC) << Self::FRAC_BITS)
    }

    /// Create from whole milliseconds.
    pub const fn from_millis(millis: u32) -> Self {
        Self((millis as u64 * 1_000) << Self::FRAC_BITS)
    }

    /// Convert to a tick count at the given tick rate.
    ///
    /// ticks = (micros * tick_hz) / MICROS_PER_SEC, computed with a 128-bit
    /// intermediate so the Q32.32 representation cannot overflow.
    pub const fn to_ticks(self, tick_hz: u32) -> u64 {
        let numer = self.0 as u128 * tick_hz as u128;
        let denom = Self::MICROS_PER_SEC << Self::FRAC_BITS;
        (numer / denom as u128) as u64
    }

    /// Duration of a single tick at the given tick rate.
    pub const fn per_tick(tick_hz: u32) -> Self {
        if tick_hz == 0 {
            return Self(0);
        }
        Self((Self::MICROS_PER_SEC << Self::FRAC_BITS) / tick_hz as u64)
    }

    /// Raw Q32.32 value.
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl core::ops::Add for Micros {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl core::ops::Sub for Micros {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

/// Q32.32 fixed-point speed in grid cells per second.
///
/// Separate type from [`Micros`] so a duration can never be mistaken for a
/// speed at a call site.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Speed(u64);

impl Speed {
    const FRAC_BITS: u32 = 32;

    /// Create from whole cells per second.
    pub const fn from_cells_per_sec(cps: u32) -> Self {
        Self((cps as u64) << Self::FRAC_BITS)
    }

    /// Create from a fractional cells per second (numer/denom).
    pub const fn from_cells_per_sec_frac(numer: u32, denom: u32) -> Self {
        Self(((numer as u64) << Self::FRAC_BITS) / denom as u64)
    }

    /// Fractional step, in cells, covered in one tick at the given rate.
    ///
    /// Used by games that interpolate continuous positions rather than hop
    /// whole cells.
    pub fn cells_per_tick(self, tick_hz: u32) -> f32 {
        if tick_hz == 0 {
            return 0.0;
        }
        (self.0 as f64 / (1u64 << Self::FRAC_BITS) as f64 / tick_hz as f64) as f32
    }

    /// Raw Q32.32 value.
    pub const fn raw(self) -> u64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn micros_from_secs() {
        let m = Micros::from_secs(1);
        assert_eq!(m.0, 1_000_000 << 32);
    }

    #[test]
    fn micros_from_millis() {
        let m = Micros::from_millis(500);
        assert_eq!(m.0, 500_000 << 32);
    }

    #[test]
    fn micros_to_ticks() {
        // 1 second at 60 Hz = 60 ticks
        assert_eq!(Micros::from_secs(1).to_ticks(60), 60);

        // 30 seconds at 60 Hz = 1800 ticks
        assert_eq!(Micros::from_secs(30).to_ticks(60), 1800);

        // 500 ms at 60 Hz = 30 ticks
        assert_eq!(Micros::from_millis(500).to_ticks(60), 30);
    }

    #[test]
    fn micros_per_tick_round_trips() {
        // 60 tick periods add back up to one second's worth of ticks.
        let period = Micros::per_tick(60);
        let mut total = Micros::from_secs(0);
        for _ in 0..60 {
            total = total + period;
        }
        assert_eq!(total.to_ticks(60), 60);
    }

    #[test]
    fn micros_arithmetic() {
        let a = Micros::from_secs(5);
        let b = Micros::from_secs(3);
        assert_eq!((a + b).to_ticks(60), 480); // 8 seconds
        assert_eq!((a - b).to_ticks(60), 120); // 2 seconds
    }

    #[test]
    fn speed_cells_per_tick() {
        // 2 cells/sec at 60 Hz = 1/30 cell per tick
        let step = Speed::from_cells_per_sec(2).cells_per_tick(60);
        assert!((step - 1.0 / 30.0).abs() < 1e-6);

        // 1.5 cells/sec at 60 Hz = 0.025 cells per tick
        let step = Speed::from_cells_per_sec_frac(3, 2).cells_per_tick(60);
        assert!((step - 0.025).abs() < 1e-6);
    }

    #[test]
    fn speed_zero() {
        assert_eq!(Speed::from_cells_per_sec(0).cells_per_tick(60), 0.0);
    }
}
