//! Panel state management
//!
//! The view snapshot, the single-flight guards and the collaborators the
//! commands work with. State is mutated only through the commands.

mod panel;
mod single_flight;

pub use panel::{
    EngagementSnapshot, EngagementView, HistorySnapshot, IntakeSnapshot, IntakeView, Panel,
    PanelSnapshot, PanelView,
};
pub use single_flight::{FlightGuard, SingleFlight};
