pub mod sphere;
pub mod transition;

pub use transition::{TransitionDriver, TransitionKind};
