use std::{
    fmt::{Debug, Display, Formatter},
    ops::Mul,
};

use crate::quantity::{Quantity, cost::Pence, price::PencePerKilowattHour};

pub type KilowattHours = Quantity<1, 1, 0>;

impl KilowattHours {
    pub fn from_watt_hours(watt_hours: f64) -> Self {
        Self::new(watt_hours / 1000.0)
    }
}

impl Display for KilowattHours {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3} kWh", self.0)
    }
}

impl Debug for KilowattHours {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.0}Wh", self.get() * 1000.0)
    }
}

impl Mul<PencePerKilowattHour> for KilowattHours {
    type Output = Pence;

    fn mul(self, rhs: PencePerKilowattHour) -> Self::Output {
        Pence::from(self.0 * rhs.0)
    }
}
