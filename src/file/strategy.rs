use crate::E;
use std::ops::Range;

/// Defines how the content of a file is delivered to the hasher.
#[derive(Debug, Clone, Default)]
pub enum ReadingStrategy {
    /// The file is read in chunks of a fixed size. Memory usage doesn't depend on the size of file.
    #[default]
    Buffer,
    /// The file is read into memory in one go and absorbed by the hasher at once.
    Complete,
    /// The file is mapped into memory. Requires a `Reader` which supports mapping.
    MemoryMapped,
    /// The strategy is chosen by the size of file. Ranges are checked in the given order; the
    /// first one containing the size wins.
    Scenario(Vec<(Range<u64>, Box<ReadingStrategy>)>),
}

impl ReadingStrategy {
    /// Checks that a scenario doesn't include other scenarios.
    pub fn validate(&self) -> Result<(), E> {
        if let Self::Scenario(scenario) = self {
            if scenario
                .iter()
                .any(|(_, strategy)| matches!(**strategy, Self::Scenario(..)))
            {
                return Err(E::NestedScenarioStrategy);
            }
        }
        Ok(())
    }

    /// Returns the strategy which has to be applied to a file of the given size.
    pub(crate) fn resolve(&self, size: u64) -> Result<&ReadingStrategy, E> {
        match self {
            Self::Scenario(scenario) => {
                let strategy = scenario
                    .iter()
                    .find_map(|(range, strategy)| range.contains(&size).then_some(strategy))
                    .ok_or(E::NoRangeForScenarioStrategy(size))?;
                if matches!(**strategy, Self::Scenario(..)) {
                    Err(E::NestedScenarioStrategy)
                } else {
                    Ok(strategy.as_ref())
                }
            }
            _ => Ok(self),
        }
    }

    /// `true` if at least for some files the content will be mapped into memory.
    pub(crate) fn maps(&self) -> bool {
        match self {
            Self::MemoryMapped => true,
            Self::Scenario(scenario) => scenario.iter().any(|(_, strategy)| strategy.maps()),
            Self::Buffer | Self::Complete => false,
        }
    }
}
