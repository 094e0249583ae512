pub mod tooltip;

pub use tooltip::{capital_for, RiskLevel, TooltipContent};
