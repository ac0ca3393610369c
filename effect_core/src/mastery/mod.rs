//! Mastery - Level-gated milestone effects per category

mod action;
mod category;
mod registry;

pub use action::{MasteryAction, MasteryEffectCache};
pub use category::{MasteryCategory, Milestone, MilestoneEffect, UNLOCK_DIFFICULTY};
pub use registry::MasteryRegistry;
