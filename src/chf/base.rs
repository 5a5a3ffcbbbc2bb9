use num_complex::Complex64;
use std::fmt;
use std::sync::Arc;

pub type ChfFn = dyn Fn(Complex64) -> Complex64 + Send + Sync;

/// Univariate characteristic function of an independent primitive variable.
#[derive(Clone)]
pub struct BaseChf {
    name: String,
    f: Arc<ChfFn>,
}

impl BaseChf {
    pub fn new<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(Complex64) -> Complex64 + Send + Sync + 'static,
    {
        Self { name: name.into(), f: Arc::new(f) }
    }

    pub fn name(&self) -> &str { &self.name }

    #[inline(always)]
    pub fn eval(&self, t: Complex64) -> Complex64 { (self.f)(t) }
}

impl fmt::Debug for BaseChf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BaseChf").field("name", &self.name).finish_non_exhaustive()
    }
}
