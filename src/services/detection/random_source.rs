// Random Source
// Injectable randomness for scoring, run-length selection and category cycling

use crate::error::{AnalysisError, EngineResult};
use rand::rngs::{StdRng, ThreadRng};
use rand::Rng;

/// Largest unit draw handed out; keeps `floor(uniform(0, n))` below `n`.
const MAX_UNIT: f64 = 1.0 - f64::EPSILON;

pub trait RandomSource {
    /// Next draw in `[0, 1)`.
    fn next_unit(&mut self) -> EngineResult<f64>;

    /// Draw in `[low, high)`
    fn uniform(&mut self, low: f64, high: f64) -> EngineResult<f64> {
        Ok(low + (high - low) * self.next_unit()?)
    }

    /// `floor(uniform(0, n))`, always below `n`.
    fn index(&mut self, n: usize) -> EngineResult<usize> {
        let idx = (self.next_unit()? * n as f64).floor() as usize;
        Ok(idx.min(n.saturating_sub(1)))
    }
}

impl RandomSource for StdRng {
    fn next_unit(&mut self) -> EngineResult<f64> {
        Ok(self.gen::<f64>())
    }
}

impl RandomSource for ThreadRng {
    fn next_unit(&mut self) -> EngineResult<f64> {
        Ok(self.gen::<f64>())
    }
}

/// Pre-recorded draws for tests. Finite scripts fail with
/// `RandomSourceExhausted` once consumed; cycling scripts wrap around.
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    values: Vec<f64>,
    cursor: usize,
    cycle: bool,
}

impl ScriptedSource {
    pub fn new(values: Vec<f64>) -> Self {
        Self {
            values,
            cursor: 0,
            cycle: false,
        }
    }

    pub fn cycling(values: Vec<f64>) -> Self {
        Self {
            values,
            cursor: 0,
            cycle: true,
        }
    }

    /// Every draw returns `value`
    pub fn constant(value: f64) -> Self {
        Self::cycling(vec![value])
    }

    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for ScriptedSource {
    fn next_unit(&mut self) -> EngineResult<f64> {
        if self.values.is_empty() || (!self.cycle && self.cursor >= self.values.len()) {
            return Err(AnalysisError::RandomSourceExhausted { draws: self.cursor });
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        Ok(value.clamp(0.0, MAX_UNIT))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_scripted_exhaustion() {
        let mut src = ScriptedSource::new(vec![0.1, 0.2]);
        assert_eq!(src.next_unit(), Ok(0.1));
        assert_eq!(src.next_unit(), Ok(0.2));
        assert_eq!(
            src.next_unit(),
            Err(AnalysisError::RandomSourceExhausted { draws: 2 })
        );
    }

    #[test]
    fn test_scripted_clamps_into_unit_interval() {
        let mut src = ScriptedSource::new(vec![1.0, -3.0]);
        assert!(src.next_unit().unwrap() < 1.0);
        assert_eq!(src.next_unit(), Ok(0.0));
    }

    #[test]
    fn test_index_stays_below_bound() {
        let mut src = ScriptedSource::constant(1.0);
        assert_eq!(src.index(4).unwrap(), 3);
        assert_eq!(src.index(10).unwrap(), 9);
    }

    #[test]
    fn test_uniform_range() {
        let mut src = ScriptedSource::cycling(vec![0.0, 0.5]);
        assert_eq!(src.uniform(0.6, 1.0).unwrap(), 0.6);
        assert!((src.uniform(-5.0, 5.0).unwrap()).abs() < 1e-12);
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let mut a = StdRng::seed_from_u64(7);
        let mut b = StdRng::seed_from_u64(7);
        for _ in 0..16 {
            let x = a.next_unit().unwrap();
            assert_eq!(x, b.next_unit().unwrap());
            assert!((0.0..1.0).contains(&x));
        }
    }
}
