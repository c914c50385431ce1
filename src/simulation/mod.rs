pub mod action_execute;
pub mod action_select;
pub mod behavior;
pub mod housing;
pub mod perception;
pub mod population;
pub mod predation;
pub mod resources;
pub mod status;
pub mod tick;

pub use action_execute::{execute_action, ActionOutcome};
pub use action_select::select_action;
pub use behavior::{update_agent, AgentOutcome, Surroundings};
pub use housing::{settle_build, Settlement};
pub use resources::{ResourceField, ResourceKind};
pub use status::StatusReport;
pub use tick::{run_simulation_tick, run_simulation_tick_at, SimulationEvent};
