use std::{fmt::{self, Formatter, Display}, str::FromStr, convert::Infallible};

/// Sex marker of an individual, as found in the second column of an `.ind` file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Sex {
    Male,
    Female,
    Unknown
}

impl Sex {
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    /// Single letter code used by EIGENSTRAT `.ind` files.
    #[must_use]
    pub fn code(&self) -> char {
        match self {
            Self::Male    => 'M',
            Self::Female  => 'F',
            Self::Unknown => 'U',
        }
    }
}

/// Never fails: unrecognized markers (`U`, `0`, `-9`, ...) are parsed as `Sex::Unknown`
impl FromStr for Sex {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "m" | "male"   | "1" => Self::Male,
            "f" | "female" | "2" => Self::Female,
            _                    => Self::Unknown,
        })
    }
}

impl Display for Sex {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", match self {
            Self::Female  => "female",
            Self::Male    => "male",
            Self::Unknown => "unknown"
        })
    }
}
