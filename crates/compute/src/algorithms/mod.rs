pub mod consumption;
pub mod disclosure;
pub mod fuel_summary;
pub mod ordering;
pub mod plan;
pub mod weekly_distance;
