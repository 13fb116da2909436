//! Equipment usage scheduling and analytics.
//!
//! Two pure engines over caller-supplied snapshots:
//! - **Interval disclosure**: which preventive-maintenance thresholds are
//!   currently visible for an equipment plan.
//! - **Consumption analytics**: per-entry fuel rates, weekly distance, and
//!   fuel totals from an unordered refuelling log.
//!
//! [`SchedulingFacade`] runs both per equipment and returns a read-only view.

pub mod algorithms;
pub mod engine;

pub use algorithms::consumption::{compute_consumption, DerivedConsumption};
pub use algorithms::disclosure::{compute_visible_offsets, disclose, Disclosure, DisclosurePolicy};
pub use algorithms::fuel_summary::{summarize_fuel, FuelSummary};
pub use algorithms::ordering::{canonical_order, group_canonical};
pub use algorithms::plan::{build_plan_view, ThresholdStatus, ThresholdView};
pub use algorithms::weekly_distance::{compute_weekly_distance, week_bounds, WeeklyDistance};
pub use engine::{
    compute_schedule, EquipmentPlan, EquipmentView, FacadeSettings, FleetInput, FleetSnapshot,
    ScheduleView, SchedulingFacade,
};
