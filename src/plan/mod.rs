//! Study-plan relay: request validation, prompt composition and
//! unwrapping of the provider's answer.

mod credential;
mod prompt;
mod relay;
mod types;

pub use credential::resolve as resolve_credential;
pub use relay::PlanRelay;
pub use types::{GeneratedPlan, StudyPlanRequest, Subjects};

#[cfg(test)]
mod tests;
