//! Display projector: computes the full 16×16 pixel assignment set from a
//! summary snapshot, an incident list, and an injected `now`.
//!
//! Pure functions over a [`Frame`] — no I/O, no clock reads, no incremental
//! redraw. Every cycle recomputes the whole grid from scratch and the sink
//! repaints it wholesale, so a render is idempotent for fixed inputs.
//!
//! Grid layout (x = column, y = row, both 0-based):
//!
//! ```text
//! rows 14..=15   overall status band, full width
//! row  13        divider row, full width
//! rows 0..=12    one row per component (API order):
//!                  columns 0..=13  14-day incident heat strip
//!                  column  14      divider
//!                  column  15      today's component status
//! ```

use chrono::{DateTime, Utc};

use crate::status::{Component, DIVIDER, GREEN, Incident, IncidentList, Indicator, Summary};
use crate::{Color, GRID_SIZE, MAX_COMPONENTS, MAX_DAYS};

// ── Frame ────────────────────────────────────────────────────────────

/// One full-grid pixel assignment set. Unpainted pixels stay off.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    // indexed [y][x]
    pixels: [[Color; GRID_SIZE]; GRID_SIZE],
}

impl Frame {
    pub fn new() -> Self {
        Self {
            pixels: [[Color::OFF; GRID_SIZE]; GRID_SIZE],
        }
    }

    pub fn set(&mut self, x: usize, y: usize, color: Color) {
        self.pixels[y][x] = color;
    }

    pub fn get(&self, x: usize, y: usize) -> Color {
        self.pixels[y][x]
    }

    /// Iterate all 256 cells as `(x, y, color)`, row-major.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, Color)> + '_ {
        self.pixels
            .iter()
            .enumerate()
            .flat_map(|(y, row)| row.iter().enumerate().map(move |(x, color)| (x, y, *color)))
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::new()
    }
}

// ── Projection ───────────────────────────────────────────────────────

/// Project a snapshot onto a fresh frame.
///
/// `live_indicator` is the freshly fetched `status.json` indicator the
/// driver supplies when the summary snapshot has gone stale; when `None`,
/// the cached summary's own indicator drives the overall band. Cached
/// component and incident data are used either way.
pub fn render(
    summary: &Summary,
    live_indicator: Option<Indicator>,
    incidents: &IncidentList,
    now: DateTime<Utc>,
) -> Frame {
    let mut frame = Frame::new();

    let indicator = live_indicator.unwrap_or(summary.status.indicator);
    paint_overall(&mut frame, indicator);
    paint_components(&mut frame, &summary.components);
    paint_history(&mut frame, &incidents.incidents, now);

    frame
}

/// Overall status band: rows 14–15 in the indicator color, row 13 as a
/// full-width divider.
pub fn paint_overall(frame: &mut Frame, indicator: Indicator) {
    let color = indicator.color();
    for x in 0..GRID_SIZE {
        frame.set(x, 15, color);
        frame.set(x, 14, color);
        frame.set(x, 13, DIVIDER);
    }
}

/// Today-status column (15) and divider column (14), one row per component
/// in API order. Also initializes the component's heat-strip row to green,
/// so days without incidents stay green.
///
/// Components beyond row 12 are silently ignored; the grid has no room.
pub fn paint_components(frame: &mut Frame, components: &[Component]) {
    for (row, component) in components.iter().take(MAX_COMPONENTS).enumerate() {
        frame.set(14, row, DIVIDER);
        frame.set(15, row, component.status.color());
        for x in 0..MAX_DAYS as usize {
            frame.set(x, row, GREEN);
        }
    }
}

/// Historical heat strip: one cell per (incident day, component).
///
/// Incidents are processed most-recent-first (descending `updated_at`,
/// compared as strings like the wire format sorts) so the diagnostic trace
/// is deterministic. When two incidents land on the same cell the
/// last-processed one wins — incidents are independent events and
/// `position` is not a stable component key, so the strip is a visual
/// approximation, not an audit log.
pub fn paint_history(frame: &mut Frame, incidents: &[Incident], now: DateTime<Utc>) {
    let mut ordered: Vec<&Incident> = incidents.iter().collect();
    ordered.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

    for incident in ordered {
        let Some(updated_at) = parse_updated_at(&incident.updated_at) else {
            tracing::warn!(updated_at = %incident.updated_at, "skipping incident with malformed timestamp");
            continue;
        };

        // same-day incidents land in the rightmost strip column
        let delta = (now - updated_at).num_days() + 1;
        if !(1..=MAX_DAYS).contains(&delta) || incident.components.is_empty() {
            continue;
        }

        let column = (MAX_DAYS - delta) as usize;
        for component in &incident.components {
            if component.position < 1 || component.position > MAX_COMPONENTS as i64 {
                continue;
            }
            let row = (component.position - 1) as usize;
            frame.set(column, row, incident.impact.color());
            tracing::debug!(
                updated_at = %incident.updated_at,
                days_ago = delta,
                column,
                row,
                "incident cell"
            );
        }
    }
}

/// Parse an incident timestamp. Statuspage emits ISO-8601 with either a
/// trailing `Z` or a numeric offset; RFC 3339 parsing covers both.
fn parse_updated_at(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
