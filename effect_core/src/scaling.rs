//! ScalableValue - Fixed base plus per-stat scaling
//!
//! Both runtime evaluation and the description breakdown go through
//! [`ScalableValue::terms`], so the formula a player reads is the one the
//! engine applies.

use crate::stat_block::StatBlock;
use crate::types::StatId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Anything an effect can read stats from
pub trait StatLookup {
    /// Stat value used for scaling; characters answer with their computed
    /// (post-equipment, post-aura) value
    fn effective_stat(&self, stat: &str) -> i64;

    /// Whether the source has any measurable stats yet
    fn has_stats(&self) -> bool {
        true
    }
}

impl StatLookup for StatBlock {
    fn effective_stat(&self, stat: &str) -> i64 {
        self.get(stat)
    }

    fn has_stats(&self) -> bool {
        !self.is_empty()
    }
}

/// Amount/stacks description: `floor(base + Σ stat × multiplier)`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawScalable")]
pub struct ScalableValue {
    pub base: f64,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub scaling: BTreeMap<StatId, f64>,
}

/// Content may write a bare number instead of a table
#[derive(Deserialize)]
#[serde(untagged)]
enum RawScalable {
    Flat(f64),
    Table {
        #[serde(default)]
        base: f64,
        #[serde(default)]
        scaling: BTreeMap<StatId, f64>,
    },
}

impl From<RawScalable> for ScalableValue {
    fn from(raw: RawScalable) -> Self {
        match raw {
            RawScalable::Flat(base) => ScalableValue::flat(base),
            RawScalable::Table { base, scaling } => ScalableValue { base, scaling },
        }
    }
}

/// One stat's contribution to a scalable value
#[derive(Debug, Clone, PartialEq)]
pub struct ScalingTerm {
    pub stat: StatId,
    pub multiplier: f64,
    /// Resolved contribution, or `None` when the source has no stats to read
    pub contribution: Option<f64>,
}

impl ScalableValue {
    /// A value with no scaling
    pub fn flat(base: f64) -> Self {
        ScalableValue {
            base,
            scaling: BTreeMap::new(),
        }
    }

    /// Add a scaling factor
    pub fn with_scaling(mut self, stat: impl Into<StatId>, multiplier: f64) -> Self {
        self.scaling.insert(stat.into(), multiplier);
        self
    }

    /// Per-stat contributions against `source`
    pub fn terms(&self, source: Option<&dyn StatLookup>) -> Vec<ScalingTerm> {
        let measurable = source.filter(|s| s.has_stats());
        self.scaling
            .iter()
            .map(|(stat, multiplier)| ScalingTerm {
                stat: stat.clone(),
                multiplier: *multiplier,
                contribution: measurable
                    .map(|s| s.effective_stat(stat.as_str()) as f64 * multiplier),
            })
            .collect()
    }

    /// Concrete value; scaling contributes nothing without a source
    pub fn evaluate(&self, source: Option<&dyn StatLookup>) -> i64 {
        let scaled: f64 = self
            .terms(source)
            .iter()
            .filter_map(|t| t.contribution)
            .sum();
        (self.base + scaled).floor() as i64
    }

    /// Human-readable breakdown built from the same terms as [`evaluate`](Self::evaluate)
    pub fn describe(&self, source: Option<&dyn StatLookup>) -> ScalingBreakdown {
        let terms = self.terms(source);
        let total = if terms.iter().all(|t| t.contribution.is_some()) {
            Some(self.evaluate(source))
        } else {
            None
        };
        ScalingBreakdown {
            base: self.base,
            terms,
            total,
        }
    }

    pub fn is_scaling(&self) -> bool {
        !self.scaling.is_empty()
    }
}

/// Display form of a scalable value
#[derive(Debug, Clone, PartialEq)]
pub struct ScalingBreakdown {
    pub base: f64,
    pub terms: Vec<ScalingTerm>,
    /// Final value when every term resolved
    pub total: Option<i64>,
}

impl fmt::Display for ScalingBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.terms.is_empty() {
            return write!(f, "{}", self.base.floor());
        }
        write!(f, "{}", self.base)?;
        for term in &self.terms {
            match term.contribution {
                Some(value) => write!(f, " + {} ({})", value, term.stat)?,
                None => write!(f, " + {} × {}", term.multiplier, term.stat)?,
            }
        }
        if let Some(total) = self.total {
            write!(f, " = {}", total)?;
        }
        Ok(())
    }
}
