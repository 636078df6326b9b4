use std::fmt::{Debug, Display, Formatter};

use crate::quantity::{Quantity, cost::Pence};

/// Tax-inclusive unit price in minor currency units per kilowatt-hour.
pub type PencePerKilowattHour = Quantity<-1, -1, 1>;

impl PencePerKilowattHour {
    /// Major currency units per kilowatt-hour, rounded to 6 decimal places.
    #[must_use]
    pub fn to_pounds(self) -> f64 {
        (self.get() / Pence::PER_POUND * 1e6).round() / 1e6
    }
}

impl Display for PencePerKilowattHour {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2} p/kWh", self.0)
    }
}

impl Debug for PencePerKilowattHour {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}p/kWh", self.0)
    }
}
