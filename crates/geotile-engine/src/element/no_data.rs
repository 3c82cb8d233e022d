/// No-data value settings of an element list.
///
/// `all_bands` selects how a multi-band sample is judged: with `true` the sample is
/// no-data only when every band holds the value, with `false` one band is enough.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct NoDataConfig {
    pub value: f64,
    pub available: bool,
    pub all_bands: bool,
}

impl NoDataConfig {
    pub const fn new(value: f64, available: bool, all_bands: bool) -> Self {
        Self { value, available, all_bands }
    }

    /// True when `values` must be treated as missing data.
    pub fn is_no_data(&self, values: impl IntoIterator<Item = f64>) -> bool {
        if !self.available {
            return false;
        }
        let mut seen = false;
        for v in values {
            seen = true;
            let hit = v == self.value || (v.is_nan() && self.value.is_nan());
            if self.all_bands && !hit {
                return false;
            }
            if !self.all_bands && hit {
                return true;
            }
        }
        self.all_bands && seen
    }
}
