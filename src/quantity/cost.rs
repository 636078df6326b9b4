use std::fmt::{Debug, Display, Formatter};

use crate::quantity::Quantity;

/// Cost in minor currency units (pence).
pub type Pence = Quantity<0, 0, 1>;

impl Pence {
    /// Minor units per major unit. The whole catalog is priced in a single currency.
    pub const PER_POUND: f64 = 100.0;

    #[must_use]
    pub fn to_pounds(self) -> f64 {
        self.get() / Self::PER_POUND
    }
}

impl Display for Pence {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "£{:.2}", self.to_pounds())
    }
}

impl Debug for Pence {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}p", self.0)
    }
}
