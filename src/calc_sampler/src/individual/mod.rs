use std::fmt::{self, Display, Formatter};

mod sex;
pub use sex::Sex;

/// A single reference individual, as described by one line of an `.ind` file.
/// ### Fields:
/// - `id`       : sample identifier. Expected to be unique within a dataset.
/// - `sex`      : sex marker of the sample.
/// - `ethnicity`: name of the source population of the sample.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Individual {
    id       : String,
    sex      : Sex,
    ethnicity: String,
}

impl Individual {
    pub fn new(id: impl Into<String>, sex: Sex, ethnicity: impl Into<String>) -> Self {
        Self { id: id.into(), sex, ethnicity: ethnicity.into() }
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    pub fn sex(&self) -> Sex {
        self.sex
    }

    /// Name of the source population this individual belongs to.
    #[inline]
    pub fn ethnicity(&self) -> &str {
        &self.ethnicity
    }
}

impl Display for Individual {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.id, self.sex, self.ethnicity)
    }
}
