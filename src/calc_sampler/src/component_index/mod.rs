use std::collections::BTreeMap;

use ahash::AHashMap;

use crate::{
    individual::Individual,
    sampler::PopulationSample,
    projector::ComponentLookup,
};

mod error;
pub use error::ComponentIndexError;

/// Individual → component mapping of every sampled individual.
/// ### Fields:
/// - `individuals`            : K: individual id | V: sampled individual
/// - `population_to_component`: K: population-id | V: component name
///
/// Built once from the output of a `StratifiedSampler`, read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct ComponentIndex {
    individuals            : AHashMap<String, Individual>,
    population_to_component: BTreeMap<String, String>,
}

impl ComponentIndex {
    /// Merge per-population samples into a single index.
    ///
    /// # Errors
    /// - `DuplicateIndividual` if the same id was drawn twice.
    /// - `ConflictingComponent` if a population was sampled on behalf of two components.
    ///
    /// Both conditions are invariant violations: a validated `ComponentSpec` and an `.ind` file
    /// with unique ids cannot trigger them.
    pub fn build<'a, I>(samples: I) -> Result<Self, ComponentIndexError>
    where   I: IntoIterator<Item = PopulationSample<'a>>,
    {
        let mut index = Self::default();
        for sample in samples {
            index.insert_sample(sample)?;
        }
        Ok(index)
    }

    fn insert_sample(&mut self, sample: PopulationSample<'_>) -> Result<(), ComponentIndexError> {
        use ComponentIndexError::{DuplicateIndividual, ConflictingComponent};
        match self.population_to_component.get(&sample.population) {
            Some(first) if *first != sample.component => {
                return Err(ConflictingComponent{population: sample.population, first: first.clone(), second: sample.component})
            },
            Some(_) => {},
            None    => {
                self.population_to_component.insert(sample.population.clone(), sample.component.clone());
            }
        }

        for member in sample.members {
            if let Some(previous) = self.individuals.get(member.id()) {
                return Err(DuplicateIndividual{
                    id    : member.id().to_string(),
                    first : previous.ethnicity().to_string(),
                    second: member.ethnicity().to_string(),
                })
            }
            self.individuals.insert(member.id().to_string(), member.clone());
        }
        Ok(())
    }

    #[inline]
    pub fn get(&self, id: &str) -> Option<&Individual> {
        self.individuals.get(id)
    }

    #[inline]
    pub fn contains(&self, id: &str) -> bool {
        self.individuals.contains_key(id)
    }

    /// Component label of a sampled individual.
    pub fn label_of(&self, id: &str) -> Option<&str> {
        let individual = self.individuals.get(id)?;
        self.population_to_component.get(individual.ethnicity()).map(String::as_str)
    }

    #[inline]
    pub fn population_to_component(&self) -> &BTreeMap<String, String> {
        &self.population_to_component
    }

    /// Number of sampled individuals.
    #[inline]
    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// Sorted, de-duplicated component labels.
    pub fn components(&self) -> Vec<&str> {
        let mut components = self.population_to_component.values().map(String::as_str).collect::<Vec<_>>();
        components.sort_unstable();
        components.dedup();
        components
    }

    /// Number of sampled individuals per component.
    pub fn count_by_component(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        let components = self.individuals.values()
            .filter_map(|individual| self.population_to_component.get(individual.ethnicity()));
        for component in components {
            *counts.entry(component.as_str()).or_insert(0) += 1;
        }
        counts
    }

    /// Every sampled individual along with its component label, sorted by id.
    pub fn iter_sorted(&self) -> impl Iterator<Item = (&Individual, &str)> {
        let mut entries = self.individuals.values()
            .filter_map(|ind| Some((ind, self.population_to_component.get(ind.ethnicity())?.as_str())))
            .collect::<Vec<_>>();
        entries.sort_unstable_by(|a, b| a.0.id().cmp(b.0.id()));
        entries.into_iter()
    }
}

impl ComponentLookup for ComponentIndex {
    fn population_of(&self, id: &str) -> Option<String> {
        self.individuals.get(id).map(|ind| ind.ethnicity().to_string())
    }

    fn component_of(&self, population: &str) -> Option<String> {
        self.population_to_component.get(population).cloned()
    }
}
