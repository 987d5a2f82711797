//! Status page data model: the JSON payload shapes and the status→color policy.
//!
//! The Statuspage v2 API reports health through three string enums (overall
//! indicator, per-component status, incident impact). Each is modeled as a
//! closed sum type with an explicit `Unknown` variant, so the fallback color
//! is a real, testable case instead of an implicit else-branch.
//!
//! ## Rust concepts
//! - `#[serde(other)]` to route unrecognized strings into one variant
//! - `#[serde(default)]` for optional JSON arrays
//! - exhaustive `match` for total enum→color mappings

use crate::Color;
use serde::Deserialize;

// ── Palette ──────────────────────────────────────────────────────────

/// Severity palette shared by all three status enums.
pub const RED: Color = Color::new(255, 0, 0);
pub const ORANGE: Color = Color::new(255, 79, 0);
pub const YELLOW: Color = Color::new(255, 255, 0);
pub const GREEN: Color = Color::new(0, 255, 0);

/// Fallback for statuses this build does not recognize.
pub const BLUE: Color = Color::new(0, 0, 255);

/// Divider lines between the grid regions.
pub const DIVIDER: Color = Color::new(51, 153, 255);

// ── Status enums ─────────────────────────────────────────────────────

/// Overall page health from `summary.json` / `status.json`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Indicator {
    None,
    Minor,
    Major,
    Critical,
    #[serde(other)]
    Unknown,
}

impl Indicator {
    /// Color of the overall-status band.
    pub fn color(self) -> Color {
        match self {
            Indicator::Critical => RED,
            Indicator::Major => ORANGE,
            Indicator::Minor => YELLOW,
            Indicator::None => GREEN,
            Indicator::Unknown => BLUE,
        }
    }
}

/// Per-component health from the summary's component list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentStatus {
    Operational,
    DegradedPerformance,
    PartialOutage,
    MajorOutage,
    #[serde(other)]
    Unknown,
}

impl ComponentStatus {
    /// Color of a component's today-status cell.
    pub fn color(self) -> Color {
        match self {
            ComponentStatus::MajorOutage => RED,
            ComponentStatus::PartialOutage => ORANGE,
            ComponentStatus::DegradedPerformance => YELLOW,
            ComponentStatus::Operational => GREEN,
            ComponentStatus::Unknown => BLUE,
        }
    }
}

/// Incident severity, reused for historical heat-strip cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Impact {
    None,
    Minor,
    Major,
    Critical,
    #[serde(other)]
    Unknown,
}

impl Impact {
    /// Color of a historical incident cell.
    pub fn color(self) -> Color {
        match self {
            Impact::Critical => RED,
            Impact::Major => ORANGE,
            Impact::Minor => YELLOW,
            Impact::None => GREEN,
            Impact::Unknown => BLUE,
        }
    }
}

// ── Payload shapes ───────────────────────────────────────────────────

/// `summary.json`: overall indicator plus the ordered component list.
#[derive(Clone, Debug, Deserialize)]
pub struct Summary {
    pub status: Overall,
    #[serde(default)]
    pub components: Vec<Component>,
}

/// `status.json`: the overall indicator alone, fetched live when the
/// cached summary has gone stale.
#[derive(Clone, Debug, Deserialize)]
pub struct LiveStatus {
    pub status: Overall,
}

/// The `{ "indicator": ... }` object both resources nest under `status`.
#[derive(Clone, Debug, Deserialize)]
pub struct Overall {
    pub indicator: Indicator,
}

/// One subsystem on the status page, in API-provided order.
///
/// `position` is 1-based but NOT guaranteed unique or contiguous.
#[derive(Clone, Debug, Deserialize)]
pub struct Component {
    pub position: i64,
    pub status: ComponentStatus,
    pub name: String,
}

/// `incidents.json`: the recent incident list.
#[derive(Clone, Debug, Deserialize)]
pub struct IncidentList {
    #[serde(default)]
    pub incidents: Vec<Incident>,
}

/// A single incident. `updated_at` is kept as the raw ISO-8601 string so
/// one malformed timestamp cannot fail the whole payload — it is parsed
/// (and possibly skipped) per incident during rendering.
#[derive(Clone, Debug, Deserialize)]
pub struct Incident {
    pub updated_at: String,
    pub impact: Impact,
    #[serde(default)]
    pub components: Vec<ComponentRef>,
}

/// Reference to a component affected by an incident.
#[derive(Clone, Debug, Deserialize)]
pub struct ComponentRef {
    pub position: i64,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    // ── Color policy: total and pure ───────────────────────────────

    #[rstest]
    #[case(Indicator::Critical, RED)]
    #[case(Indicator::Major, ORANGE)]
    #[case(Indicator::Minor, YELLOW)]
    #[case(Indicator::None, GREEN)]
    #[case(Indicator::Unknown, BLUE)]
    fn indicator_colors(#[case] indicator: Indicator, #[case] expected: Color) {
        assert_eq!(indicator.color(), expected);
    }

    #[rstest]
    #[case(ComponentStatus::MajorOutage, RED)]
    #[case(ComponentStatus::PartialOutage, ORANGE)]
    #[case(ComponentStatus::DegradedPerformance, YELLOW)]
    #[case(ComponentStatus::Operational, GREEN)]
    #[case(ComponentStatus::Unknown, BLUE)]
    fn component_status_colors(#[case] status: ComponentStatus, #[case] expected: Color) {
        assert_eq!(status.color(), expected);
    }

    #[rstest]
    #[case(Impact::Critical, RED)]
    #[case(Impact::Major, ORANGE)]
    #[case(Impact::Minor, YELLOW)]
    #[case(Impact::None, GREEN)]
    #[case(Impact::Unknown, BLUE)]
    fn impact_colors(#[case] impact: Impact, #[case] expected: Color) {
        assert_eq!(impact.color(), expected);
    }

    // ── Fallback routing ───────────────────────────────────────────

    #[rstest]
    #[case("\"under_maintenance\"")]
    #[case("\"\"")]
    #[case("\"CRITICAL\"")] // case-sensitive: not the lowercase wire form
    fn unrecognized_indicator_is_unknown(#[case] raw: &str) {
        let indicator: Indicator = serde_json::from_str(raw).unwrap();
        assert_eq!(indicator, Indicator::Unknown);
    }

    #[test]
    fn unrecognized_component_status_is_unknown() {
        let status: ComponentStatus = serde_json::from_str("\"under_maintenance\"").unwrap();
        assert_eq!(status, ComponentStatus::Unknown);
    }

    // ── Payload parsing ────────────────────────────────────────────

    #[test]
    fn summary_parses_wire_shape() {
        let summary: Summary = serde_json::from_value(json!({
            "page": { "id": "kctbh9vrtdwd", "name": "GitHub" },
            "status": { "indicator": "minor", "description": "Minor Service Outage" },
            "components": [
                { "position": 1, "status": "operational", "name": "API", "id": "8l4ygp009s5s" },
                { "position": 2, "status": "partial_outage", "name": "Webhooks" }
            ]
        }))
        .unwrap();

        assert_eq!(summary.status.indicator, Indicator::Minor);
        assert_eq!(summary.components.len(), 2);
        assert_eq!(summary.components[0].name, "API");
        assert_eq!(summary.components[1].status, ComponentStatus::PartialOutage);
    }

    #[test]
    fn summary_without_components_defaults_empty() {
        let summary: Summary =
            serde_json::from_value(json!({ "status": { "indicator": "none" } })).unwrap();
        assert!(summary.components.is_empty());
    }

    #[test]
    fn incident_list_parses_wire_shape() {
        let list: IncidentList = serde_json::from_value(json!({
            "incidents": [{
                "updated_at": "2024-03-01T08:30:00Z",
                "impact": "major",
                "status": "resolved",
                "components": [{ "position": 3, "name": "Git Operations" }]
            }]
        }))
        .unwrap();

        assert_eq!(list.incidents.len(), 1);
        assert_eq!(list.incidents[0].impact, Impact::Major);
        assert_eq!(list.incidents[0].components[0].position, 3);
    }

    #[test]
    fn empty_incident_payload_defaults_empty() {
        let list: IncidentList = serde_json::from_value(json!({})).unwrap();
        assert!(list.incidents.is_empty());
    }
}
