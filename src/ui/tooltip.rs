use crate::core::constants::{TOOLTIP_FLIP_MARGIN, TOOLTIP_OFFSET, UNKNOWN_CAPITAL};
use crate::core::geo::Point;
use crate::input::events::HoverTarget;
use crate::prelude::HashMap;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

static CAPITALS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        ("United States of America", "Washington, D.C."),
        ("China", "Beijing"),
        ("India", "New Delhi"),
        ("United Kingdom", "London"),
        ("France", "Paris"),
        ("Germany", "Berlin"),
        ("Japan", "Tokyo"),
        ("Russia", "Moscow"),
        ("Brazil", "Brasilia"),
        ("Australia", "Canberra"),
        ("Canada", "Ottawa"),
        ("Italy", "Rome"),
        ("South Korea", "Seoul"),
        ("Mexico", "Mexico City"),
        ("Indonesia", "Jakarta"),
        ("Saudi Arabia", "Riyadh"),
        ("Turkey", "Ankara"),
        ("Switzerland", "Bern"),
        ("Argentina", "Buenos Aires"),
        ("South Africa", "Pretoria"),
        ("Nigeria", "Abuja"),
        ("Egypt", "Cairo"),
        ("Ukraine", "Kyiv"),
        ("Poland", "Warsaw"),
        ("Spain", "Madrid"),
        ("Netherlands", "Amsterdam"),
        ("Sweden", "Stockholm"),
        ("Norway", "Oslo"),
        ("Finland", "Helsinki"),
        ("Denmark", "Copenhagen"),
        ("Ireland", "Dublin"),
        ("Belgium", "Brussels"),
        ("Portugal", "Lisbon"),
        ("Greece", "Athens"),
        ("Israel", "Jerusalem"),
        ("Iran", "Tehran"),
        ("Iraq", "Baghdad"),
        ("Vietnam", "Hanoi"),
        ("Thailand", "Bangkok"),
        ("Singapore", "Singapore"),
        ("Malaysia", "Kuala Lumpur"),
        ("Philippines", "Manila"),
        ("Pakistan", "Islamabad"),
        ("Bangladesh", "Dhaka"),
        ("Colombia", "Bogotá"),
        ("Chile", "Santiago"),
        ("Peru", "Lima"),
        ("New Zealand", "Wellington"),
    ]
    .into_iter()
    .collect()
});

/// Capital city for a region name, if known
pub fn capital_for(name: &str) -> Option<&'static str> {
    CAPITALS.get(name).copied()
}

/// Risk badge shown on the tooltip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Deterministic badge from the region name: the sum of its UTF-16 code
    /// units modulo 3.
    pub fn from_name(name: &str) -> Self {
        let sum: u64 = name.encode_utf16().map(u64::from).sum();
        match sum % 3 {
            0 => RiskLevel::Low,
            1 => RiskLevel::Medium,
            _ => RiskLevel::High,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MED",
            RiskLevel::High => "HIGH",
        }
    }
}

/// Everything a host needs to draw the hover tooltip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TooltipContent {
    pub region_id: String,
    pub region_name: String,
    pub capital: String,
    pub risk: RiskLevel,
    /// Top-left anchor, offset from the cursor
    pub position: Point,
    /// Draw the tooltip to the left of `position` instead of the right
    pub flipped: bool,
    /// The debounced visibility flag; hosts fade the tooltip in and out
    pub visible: bool,
}

impl TooltipContent {
    pub fn new(target: &HoverTarget, cursor: Point, viewport_width: f64, visible: bool) -> Self {
        Self {
            region_id: target.id.clone(),
            region_name: target.name.clone(),
            capital: capital_for(&target.name).unwrap_or(UNKNOWN_CAPITAL).to_string(),
            risk: RiskLevel::from_name(&target.name),
            position: Point::new(cursor.x + TOOLTIP_OFFSET, cursor.y + TOOLTIP_OFFSET),
            flipped: cursor.x > viewport_width - TOOLTIP_FLIP_MARGIN,
            visible,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capital_lookup() {
        assert_eq!(capital_for("Norway"), Some("Oslo"));
        assert_eq!(capital_for("Colombia"), Some("Bogotá"));
        assert_eq!(capital_for("Atlantis"), None);
    }

    #[test]
    fn test_risk_level_from_name() {
        // 'A' = 65, 65 % 3 = 2
        assert_eq!(RiskLevel::from_name("A"), RiskLevel::High);
        // 'B' = 66
        assert_eq!(RiskLevel::from_name("B"), RiskLevel::Low);
        // 'C' = 67
        assert_eq!(RiskLevel::from_name("C"), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_name(""), RiskLevel::Low);
        assert_eq!(RiskLevel::Medium.label(), "MED");
    }

    #[test]
    fn test_tooltip_placement() {
        let target = HoverTarget::new("578", "Norway");
        let tooltip = TooltipContent::new(&target, Point::new(100.0, 50.0), 1000.0, true);
        assert_eq!(tooltip.position, Point::new(120.0, 70.0));
        assert!(!tooltip.flipped);
        assert_eq!(tooltip.capital, "Oslo");

        let near_edge = TooltipContent::new(&target, Point::new(800.0, 50.0), 1000.0, false);
        assert!(near_edge.flipped);
        assert!(!near_edge.visible);

        let unknown = TooltipContent::new(&HoverTarget::new("x", "Atlantis"), Point::default(), 1000.0, true);
        assert_eq!(unknown.capital, "ANALYZING...");
    }
}
