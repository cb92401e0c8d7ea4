//! Renewal projection: baseline, increase resolution and the calculator

mod baseline;
mod increase;
mod engine;

pub use baseline::{average_scheduled_charge, BaselineIndex};
pub use increase::{percent_to_rate, resolve_increase};
pub use engine::{
    apply_proposed_increase_edit, batch_recompute_projections, project, ProjectionEngine,
};
