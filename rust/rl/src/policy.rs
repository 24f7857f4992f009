use clap::ValueEnum;
use kerbal_gym::{Discrete, Observation};
use rand::prelude::*;

pub trait Policy {
    fn policy(&mut self, s: &Observation) -> Discrete;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PolicyKind {
    Random,
    Noop,
}

/// Uniform over the discrete action space.
pub struct RandomPolicy {
    rng: StdRng,
    n: Discrete,
}

impl RandomPolicy {
    pub fn new(n: Discrete, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng, n }
    }
}

impl Policy for RandomPolicy {
    fn policy(&mut self, _s: &Observation) -> Discrete {
        self.rng.gen_range(0..self.n)
    }
}

/// Always action 0: leave the controls alone and let the vessel fly.
pub struct NoopPolicy;

impl Policy for NoopPolicy {
    fn policy(&mut self, _s: &Observation) -> Discrete {
        0
    }
}

pub fn make(kind: PolicyKind, n: Discrete, seed: Option<u64>) -> Box<dyn Policy> {
    match kind {
        PolicyKind::Random => Box::new(RandomPolicy::new(n, seed)),
        PolicyKind::Noop => Box::new(NoopPolicy),
    }
}
