//! Ordered registry of strategy definitions, keyed by unique string.

use super::{earnings_momentum, sma_crossover, Category, StrategyDefinition};
use crate::domain::error::SignalbenchError;

pub struct StrategyRegistry {
    entries: Vec<StrategyDefinition>,
}

impl StrategyRegistry {
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// The built-in strategies, in display order.
    pub fn builtin() -> Self {
        Self {
            entries: vec![sma_crossover::definition(), earnings_momentum::definition()],
        }
    }

    /// Append a definition. Keys must stay unique.
    pub fn register(&mut self, definition: StrategyDefinition) -> Result<(), SignalbenchError> {
        if self.lookup(&definition.key).is_some() {
            return Err(SignalbenchError::DuplicateStrategy {
                key: definition.key,
            });
        }
        self.entries.push(definition);
        Ok(())
    }

    /// Exact-match lookup. `None` is distinct from a strategy that produces
    /// no signals.
    pub fn lookup(&self, key: &str) -> Option<&StrategyDefinition> {
        self.entries.iter().find(|d| d.key == key)
    }

    pub fn get(&self, key: &str) -> Result<&StrategyDefinition, SignalbenchError> {
        self.lookup(key)
            .ok_or_else(|| SignalbenchError::UnknownStrategy {
                key: key.to_string(),
            })
    }

    pub fn entries(&self) -> &[StrategyDefinition] {
        &self.entries
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|d| d.key.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in `category` (any when `None`) whose name contains `query`,
    /// case-insensitively. Registry order is preserved.
    pub fn filter(&self, category: Option<Category>, query: &str) -> Vec<&StrategyDefinition> {
        let needle = query.trim().to_lowercase();
        self.entries
            .iter()
            .filter(|d| category.is_none_or(|c| d.category == c))
            .filter(|d| d.name.to_lowercase().contains(&needle))
            .collect()
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
