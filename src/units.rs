use derive_more::{Add, AddAssign, Display, From, Into, Mul, MulAssign, Sub, SubAssign, Sum};

/// A length measured in device pixels on a drawing surface. Surfaces are sized
/// from the natural pixel size of their background image, so a `Px` is always
/// one pixel of the exported PNG.
#[derive(
    Debug,
    Default,
    Copy,
    Clone,
    PartialEq,
    PartialOrd,
    Add,
    AddAssign,
    Sub,
    SubAssign,
    Mul,
    MulAssign,
    Sum,
    From,
    Into,
    Display,
)]
#[display("{_0}px")]
pub struct Px(pub f32);

impl Px {
    pub fn max(self, other: Px) -> Px {
        Px(self.0.max(other.0))
    }
}

impl std::ops::Div<f32> for Px {
    type Output = Px;

    fn div(self, rhs: f32) -> Px {
        Px(self.0 / rhs)
    }
}

impl std::ops::Div<Px> for Px {
    type Output = f32;

    fn div(self, rhs: Px) -> f32 {
        self.0 / rhs.0
    }
}

impl From<u32> for Px {
    fn from(value: u32) -> Self {
        Px(value as f32)
    }
}
