use std::collections::BTreeMap;

use super::SamplerError;

/// Validated sampling plan: component name -> population name -> requested sample size.
///
/// # Invariants
/// - a population contributes to a single component.
/// - every sample size is strictly positive.
/// - every component defines at least one population.
///
/// Components and populations are iterated in lexicographic order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ComponentSpec {
    components: BTreeMap<String, BTreeMap<String, usize>>,
}

impl ComponentSpec {
    /// # Errors
    /// - `DuplicatePopulationAssignment` if two components claim the same population.
    /// - `InvalidSampleSize` if any requested sample size is zero.
    /// - `EmptyComponent` if a component has no population.
    pub fn new(components: BTreeMap<String, BTreeMap<String, usize>>) -> Result<Self, SamplerError> {
        let mut owners: BTreeMap<&str, &str> = BTreeMap::new();
        for (component, populations) in &components {
            if populations.is_empty() {
                return Err(SamplerError::EmptyComponent(component.clone()))
            }
            for (population, &size) in populations {
                if size == 0 {
                    return Err(SamplerError::InvalidSampleSize{component: component.clone(), population: population.clone()})
                }
                if let Some(first) = owners.insert(population, component) {
                    return Err(SamplerError::DuplicatePopulationAssignment{
                        population: population.clone(),
                        first     : first.to_string(),
                        second    : component.clone(),
                    })
                }
            }
        }
        Ok(Self{components})
    }

    /// Iterate over every `(component, population, sample_size)` triplet.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, usize)> {
        self.components.iter().flat_map(|(component, populations)| {
            populations.iter().map(move |(population, size)| (component.as_str(), population.as_str(), *size))
        })
    }

    /// Sorted component names.
    pub fn components(&self) -> impl Iterator<Item = &str> {
        self.components.keys().map(String::as_str)
    }

    /// Number of components.
    #[inline]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Total number of individuals requested across all populations.
    pub fn total_requested(&self) -> usize {
        self.iter().map(|(_, _, size)| size).sum()
    }
}

impl TryFrom<BTreeMap<String, BTreeMap<String, usize>>> for ComponentSpec {
    type Error = SamplerError;

    fn try_from(components: BTreeMap<String, BTreeMap<String, usize>>) -> Result<Self, Self::Error> {
        Self::new(components)
    }
}

#[cfg(test)]
/// Build a spec from `(component, population, size)` triplets.
pub(crate) fn spec_from(raw: &[(&str, &str, usize)]) -> Result<ComponentSpec, SamplerError> {
    let mut components: BTreeMap<String, BTreeMap<String, usize>> = BTreeMap::new();
    for (component, population, size) in raw {
        components.entry(component.to_string()).or_default().insert(population.to_string(), *size);
    }
    ComponentSpec::new(components)
}
