use std::cmp;


/// Largest array the format can address: counts and offsets are stored as 32 bit ints
pub const MAX_ARRAY_LENGTH: u64 = i32::max_value() as u64 - 16;


/// Limits applied while writing doc values
///
/// Both limits are capped at `MAX_ARRAY_LENGTH`.
#[derive(Debug, Clone, PartialEq)]
pub struct DocValuesSettings {
    max_values: u64,
    max_total_bytes: u64,
}


impl DocValuesSettings {
    pub fn new() -> DocValuesSettings {
        DocValuesSettings::default()
    }

    pub fn with_limits(max_values: u64, max_total_bytes: u64) -> DocValuesSettings {
        DocValuesSettings {
            max_values: cmp::min(max_values, MAX_ARRAY_LENGTH),
            max_total_bytes: cmp::min(max_total_bytes, MAX_ARRAY_LENGTH),
        }
    }

    /// A numeric column fails once it reaches this many values (documents,
    /// ordinals or addresses)
    #[inline]
    pub fn max_values(&self) -> u64 {
        self.max_values
    }

    /// A binary column fails once its payload exceeds this many bytes
    #[inline]
    pub fn max_total_bytes(&self) -> u64 {
        self.max_total_bytes
    }
}


impl Default for DocValuesSettings {
    fn default() -> DocValuesSettings {
        DocValuesSettings {
            max_values: MAX_ARRAY_LENGTH,
            max_total_bytes: MAX_ARRAY_LENGTH,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::{DocValuesSettings, MAX_ARRAY_LENGTH};

    #[test]
    fn test_limits_are_capped() {
        let settings = DocValuesSettings::with_limits(u64::max_value(), 1 << 40);

        assert_eq!(settings.max_values(), MAX_ARRAY_LENGTH);
        assert_eq!(settings.max_total_bytes(), MAX_ARRAY_LENGTH);
        assert_eq!(settings, DocValuesSettings::default());
    }

    #[test]
    fn test_limits_below_cap_are_kept() {
        let settings = DocValuesSettings::with_limits(10, 20);

        assert_eq!(settings.max_values(), 10);
        assert_eq!(settings.max_total_bytes(), 20);
    }
}
