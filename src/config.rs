//! Sizing and load-factor configuration.
//!
//! Out-of-range values are replaced by defaults instead of being rejected,
//! so a zeroed `TableConfig` always yields a usable table.

/// Bucket count used when `initsize` is zero.
pub const DEFAULT_SIZE: usize = 101;
/// Load the table is rehashed down to when it grows.
pub const DEFAULT_MINLOAD: f32 = 0.5;
/// Load at which the table grows.
pub const DEFAULT_MAXLOAD: f32 = 0.8;

/// Creation parameters for a [`StrTable`](crate::StrTable).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TableConfig {
    /// Initial bucket count; zero selects [`DEFAULT_SIZE`].
    pub initsize: usize,
    /// Load targeted after growth.
    pub minload: f32,
    /// Load that triggers growth.
    pub maxload: f32,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            initsize: DEFAULT_SIZE,
            minload: DEFAULT_MINLOAD,
            maxload: DEFAULT_MAXLOAD,
        }
    }
}

impl TableConfig {
    pub fn with_initsize(mut self, initsize: usize) -> Self {
        self.initsize = initsize;
        self
    }

    pub fn with_loads(mut self, minload: f32, maxload: f32) -> Self {
        self.minload = minload;
        self.maxload = maxload;
        self
    }

    /// Apply the clamping rules:
    /// - `initsize` 0 becomes 101, and the size is always forced odd;
    /// - `maxload` outside `[0.5, 1.0)` becomes 0.8;
    /// - `minload` outside `(0.2, maxload)` becomes 0.5;
    /// - if `minload >= maxload` still holds, `minload = maxload / 2`.
    pub fn normalized(self) -> Self {
        let initsize = if self.initsize == 0 {
            DEFAULT_SIZE
        } else {
            self.initsize
        } | 1;
        let maxload = if (0.5..1.0).contains(&self.maxload) {
            self.maxload
        } else {
            DEFAULT_MAXLOAD
        };
        let mut minload = if self.minload > 0.2 && self.minload < maxload {
            self.minload
        } else {
            DEFAULT_MINLOAD
        };
        if minload >= maxload {
            minload = maxload / 2.0;
        }
        Self {
            initsize,
            minload,
            maxload,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zeroed_config_takes_defaults() {
        let c = TableConfig {
            initsize: 0,
            minload: 0.0,
            maxload: 0.0,
        }
        .normalized();
        assert_eq!(c, TableConfig::default());
    }

    #[test]
    fn size_is_forced_odd() {
        assert_eq!(TableConfig::default().with_initsize(10).normalized().initsize, 11);
        assert_eq!(TableConfig::default().with_initsize(11).normalized().initsize, 11);
        assert_eq!(TableConfig::default().with_initsize(1).normalized().initsize, 1);
    }

    #[test]
    fn out_of_range_loads_are_clamped() {
        // maxload bounds: [0.5, 1.0)
        let c = TableConfig::default().with_loads(0.3, 1.0).normalized();
        assert_eq!(c.maxload, DEFAULT_MAXLOAD);
        assert_eq!(c.minload, 0.3);
        let c = TableConfig::default().with_loads(0.3, 0.49).normalized();
        assert_eq!(c.maxload, DEFAULT_MAXLOAD);

        // minload must exceed 0.2 strictly
        let c = TableConfig::default().with_loads(0.2, 0.9).normalized();
        assert_eq!(c.minload, DEFAULT_MINLOAD);
        assert_eq!(c.maxload, 0.9);
    }

    #[test]
    fn minload_not_below_maxload_is_halved() {
        // 0.5 is a valid maxload, so the default minload collides with it.
        let c = TableConfig::default().with_loads(0.7, 0.5).normalized();
        assert_eq!(c.maxload, 0.5);
        assert_eq!(c.minload, 0.25);
    }

    #[test]
    fn nan_loads_fall_back_to_defaults() {
        let c = TableConfig::default()
            .with_loads(f32::NAN, f32::NAN)
            .normalized();
        assert_eq!(c.minload, DEFAULT_MINLOAD);
        assert_eq!(c.maxload, DEFAULT_MAXLOAD);
    }
}
