use crate::store::Crv;
use num_complex::Complex64;

/// One side of an arithmetic rule: either a plain number or a network member.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operand {
    Scalar(Complex64),
    Variable(Crv),
}

impl Operand {
    pub fn is_random(&self) -> bool { matches!(self, Operand::Variable(_)) }
}

impl From<Crv> for Operand {
    fn from(rv: Crv) -> Self { Operand::Variable(rv) }
}

impl From<&Crv> for Operand {
    fn from(rv: &Crv) -> Self { Operand::Variable(*rv) }
}

impl From<Complex64> for Operand {
    fn from(a: Complex64) -> Self { Operand::Scalar(a) }
}

impl From<f64> for Operand {
    fn from(a: f64) -> Self { Operand::Scalar(Complex64::new(a, 0.0)) }
}

impl From<i32> for Operand {
    fn from(a: i32) -> Self { Operand::Scalar(Complex64::new(a as f64, 0.0)) }
}
