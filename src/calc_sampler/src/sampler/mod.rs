use ahash::AHashMap;
use log::{debug, trace};

use crate::individual::Individual;

mod error;
pub use error::SamplerError;

mod spec;
pub use spec::ComponentSpec;

/// Individuals drawn from a single population, on behalf of a component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopulationSample<'a> {
    pub component : String,
    pub population: String,
    pub members   : Vec<&'a Individual>,
}

impl<'a> PopulationSample<'a> {
    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Draws fixed-size random samples, without replacement, from each population of a reference set.
///
/// The random source is owned by the sampler and must be provided by the caller. Use
/// [`StratifiedSampler::with_seed`] to obtain reproducible samples.
#[derive(Debug, Clone)]
pub struct StratifiedSampler {
    rng: fastrand::Rng,
}

impl StratifiedSampler {
    pub fn new(rng: fastrand::Rng) -> Self {
        Self { rng }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::new(fastrand::Rng::with_seed(seed))
    }

    /// Randomly draw `k` distinct individuals whose ethnicity matches `population`.
    /// # Arguments:
    /// - `individuals`: candidate reference individuals.
    /// - `component`  : component on behalf of which the sample is drawn (reporting only).
    /// - `population` : population-id to sample from.
    /// - `k`          : requested sample size.
    ///
    /// # Errors
    /// `InsufficientPopulation` if less than `k` individuals belong to `population`.
    /// Samples are never truncated.
    pub fn sample<'a>(&mut self, individuals: &'a [Individual], component: &str, population: &str, k: usize) -> Result<PopulationSample<'a>, SamplerError> {
        let pool = individuals.iter()
            .filter(|ind| ind.ethnicity() == population)
            .collect::<Vec<&Individual>>();
        check_pool(pool.len(), component, population, k)?;
        Ok(self.draw(&pool, component, population, k))
    }

    /// Sample every `(component, population, size)` triplet of `spec`.
    ///
    /// Every pool is checked before any individual gets drawn: on error, no sample is produced.
    pub fn sample_spec<'a>(&mut self, individuals: &'a [Individual], spec: &ComponentSpec) -> Result<Vec<PopulationSample<'a>>, SamplerError> {
        // ---- Bucket individuals per population, in file order.
        let mut pools: AHashMap<&str, Vec<&'a Individual>> = AHashMap::new();
        for individual in individuals {
            pools.entry(individual.ethnicity()).or_default().push(individual);
        }

        // ---- Pre-flight
        for (component, population, k) in spec.iter() {
            let available = pools.get(population).map_or(0, Vec::len);
            check_pool(available, component, population, k)?;
        }

        let mut samples = Vec::with_capacity(spec.iter().count());
        for (component, population, k) in spec.iter() {
            let pool = pools.get(population).map_or(&[][..], Vec::as_slice);
            samples.push(self.draw(pool, component, population, k));
        }
        Ok(samples)
    }

    fn draw<'a>(&mut self, pool: &[&'a Individual], component: &str, population: &str, k: usize) -> PopulationSample<'a> {
        let members = self.rng.choose_multiple(pool.iter().copied(), k);
        debug!("Sampled {k}/{} individual(s) from {population} ({component})", pool.len());
        trace!("{population}: {:?}", members.iter().map(|ind| ind.id()).collect::<Vec<_>>());
        PopulationSample{component: component.to_string(), population: population.to_string(), members}
    }
}

fn check_pool(available: usize, component: &str, population: &str, k: usize) -> Result<(), SamplerError> {
    if available < k {
        return Err(SamplerError::InsufficientPopulation{
            component : component.to_string(),
            population: population.to_string(),
            requested : k,
            available,
        })
    }
    Ok(())
}
