use crate::config::EngineConfig;
use crate::engine::calendar::DAYS_PER_WEEK;

/// Dimension changes at or below this are treated as measurement noise and
/// ignored, so the measure/refine loop cannot oscillate on sub-unit jitter.
const REMEASURE_EPSILON: f32 = 1.0;

/// Where the grid geometry comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizerMode {
    /// Fit the live viewport; geometry follows container measurements.
    Live,
    /// Fixed capture canvas; live measurements are ignored entirely.
    Capture,
}

/// Measurements reported by the host layout, valid for one rendering session.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Measurements {
    pub container_width: Option<f32>,
    pub container_height: Option<f32>,
    pub header_height: Option<f32>,
}

/// Derived geometry for one grid pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridGeometry {
    pub cell_size: f32,
    pub cell_spacing: f32,
    pub row_width: f32,
}

/// Size of one calendar cell for the given container budget.
///
/// Pure; called once with `header_height = None` for the optimistic first
/// pass and again once the header has reported its own height. When the
/// header is still unknown the vertical candidate defaults to the horizontal
/// one, pending the header's layout pass. Degenerate candidates fall back to
/// the comfortable minimum, and the result never drops below the floor.
pub fn compute_cell_size(
    container_width: f32,
    container_height: f32,
    header_height: Option<f32>,
    rows: usize,
    config: &EngineConfig,
) -> f32 {
    let columns = DAYS_PER_WEEK as f32;
    let rows = rows.max(1) as f32;
    let spacing = config.cell_spacing;

    let horizontal = guard(
        ((container_width - config.horizontal_padding - spacing * (columns - 1.0)) / columns)
            .floor(),
        config,
    );

    let vertical = match header_height {
        Some(header) => guard(
            ((container_height
                - config.vertical_padding
                - header
                - config.vertical_buffer
                - spacing * (rows - 1.0))
                / rows)
                .floor(),
            config,
        ),
        None => horizontal,
    };

    horizontal.min(vertical).max(config.cell_floor)
}

fn guard(candidate: f32, config: &EngineConfig) -> f32 {
    if candidate.is_finite() && candidate > 0.0 {
        candidate
    } else {
        config.min_cell
    }
}

/// Width of one grid row, used to center the grid within its container.
pub fn row_width(cell_size: f32, spacing: f32) -> f32 {
    let columns = DAYS_PER_WEEK as f32;
    cell_size * columns + spacing * (columns - 1.0)
}

/// Orchestrates the two-phase measurement loop around [`compute_cell_size`].
///
/// The container is measured first, producing a provisional cell size with
/// the optimistic header assumption; the header then renders at that size and
/// reports its height, refining the vertical budget on a second pass. A
/// container change invalidates any previously measured header height so the
/// sizer cannot converge on a stale header dimension.
#[derive(Debug, Clone)]
pub struct GridSizer {
    mode: SizerMode,
    config: EngineConfig,
    capture_cell: f32,
    capture_gap: f32,
    measurements: Measurements,
    needs_remeasure: bool,
}

impl GridSizer {
    pub fn live(config: EngineConfig) -> Self {
        Self {
            mode: SizerMode::Live,
            config,
            capture_cell: 0.0,
            capture_gap: 0.0,
            measurements: Measurements::default(),
            needs_remeasure: true,
        }
    }

    pub fn capture(config: EngineConfig, capture_cell: f32, capture_gap: f32) -> Self {
        Self {
            mode: SizerMode::Capture,
            config,
            capture_cell,
            capture_gap,
            measurements: Measurements::default(),
            needs_remeasure: false,
        }
    }

    /// True while a refined pass is still pending.
    pub fn needs_remeasure(&self) -> bool {
        self.needs_remeasure
    }

    /// Record a container measurement from the host layout.
    ///
    /// Ignored in capture mode and for sub-epsilon changes.
    pub fn observe_container(&mut self, width: f32, height: f32) {
        if self.mode == SizerMode::Capture {
            return;
        }
        let changed = dimension_changed(self.measurements.container_width, width)
            || dimension_changed(self.measurements.container_height, height);
        if !changed {
            return;
        }
        self.measurements.container_width = Some(width);
        self.measurements.container_height = Some(height);
        // Stale header height would pin the vertical budget of the old
        // container, so it must be re-measured.
        self.measurements.header_height = None;
        self.needs_remeasure = true;
    }

    /// Record the header's own measured height, completing the refined pass.
    pub fn observe_header(&mut self, height: f32) {
        if self.mode == SizerMode::Capture {
            return;
        }
        if !dimension_changed(self.measurements.header_height, height) {
            self.needs_remeasure = false;
            return;
        }
        self.measurements.header_height = Some(height);
        self.needs_remeasure = false;
    }

    /// Current geometry for a grid with the given number of rows.
    pub fn geometry(&self, rows: usize) -> GridGeometry {
        let (cell_size, cell_spacing) = match self.mode {
            SizerMode::Capture => (self.capture_cell, self.capture_gap),
            SizerMode::Live => {
                let width = self.measurements.container_width;
                let height = self.measurements.container_height;
                let cell = match (width, height) {
                    (Some(w), Some(h)) => compute_cell_size(
                        w,
                        h,
                        self.measurements.header_height,
                        rows,
                        &self.config,
                    ),
                    // Nothing measured yet; fall back until the first pass.
                    _ => self.config.min_cell,
                };
                (cell, self.config.cell_spacing)
            }
        };
        GridGeometry {
            cell_size,
            cell_spacing,
            row_width: row_width(cell_size, cell_spacing),
        }
    }
}

fn dimension_changed(previous: Option<f32>, next: f32) -> bool {
    match previous {
        Some(value) => (value - next).abs() > REMEASURE_EPSILON,
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> EngineConfig {
        EngineConfig::default()
    }

    #[test]
    fn optimistic_pass_uses_horizontal_candidate() {
        // 60 wide: horizontal = floor((60 - 4 - 6) / 7) = 7.
        let cell = compute_cell_size(60.0, 200.0, None, 5, &config());
        assert_eq!(cell, 7.0);
    }

    #[test]
    fn refined_pass_shrinks_to_vertical_budget() {
        // 30 tall with a 4-unit header over 5 rows:
        // vertical = floor((30 - 2 - 4 - 2 - 4) / 5) = 3.
        let cell = compute_cell_size(60.0, 30.0, Some(4.0), 5, &config());
        assert_eq!(cell, 3.0);
    }

    #[test]
    fn degenerate_candidates_fall_back_to_min_cell() {
        let cfg = config();
        let cell = compute_cell_size(0.0, 0.0, Some(50.0), 5, &cfg);
        assert_eq!(cell, cfg.min_cell);
        let cell = compute_cell_size(f32::NAN, f32::INFINITY, None, 5, &cfg);
        assert_eq!(cell, cfg.min_cell);
    }

    #[test]
    fn cell_size_never_drops_below_floor() {
        let mut cfg = config();
        cfg.cell_floor = 2.0;
        cfg.min_cell = 0.5;
        let cell = compute_cell_size(10.0, 10.0, Some(5.0), 6, &cfg);
        assert!(cell >= cfg.cell_floor);
    }

    #[test]
    fn row_width_centers_the_grid() {
        assert_eq!(row_width(5.0, 1.0), 5.0 * 7.0 + 6.0);
    }

    #[test]
    fn capture_mode_ignores_live_measurements() {
        let mut sizer = GridSizer::capture(config(), 96.0, 12.0);
        let before = sizer.geometry(5);

        sizer.observe_container(31.0, 17.0);
        sizer.observe_container(500.0, 900.0);
        sizer.observe_header(12.0);

        assert_eq!(sizer.geometry(5), before);
        assert_eq!(before.cell_size, 96.0);
    }

    #[test]
    fn unchanged_measurements_are_idempotent() {
        let mut sizer = GridSizer::live(config());
        sizer.observe_container(80.0, 40.0);
        sizer.observe_header(4.0);
        let first = sizer.geometry(5);
        let second = sizer.geometry(5);
        assert_eq!(first, second);
    }

    #[test]
    fn container_change_invalidates_header() {
        let mut sizer = GridSizer::live(config());
        sizer.observe_container(80.0, 40.0);
        sizer.observe_header(4.0);
        assert!(!sizer.needs_remeasure());

        sizer.observe_container(120.0, 60.0);
        assert!(sizer.needs_remeasure());

        // Back on the optimistic pass until the header reports again.
        let optimistic = sizer.geometry(5);
        let expected = compute_cell_size(120.0, 60.0, None, 5, &config());
        assert_eq!(optimistic.cell_size, expected);
    }

    #[test]
    fn sub_unit_noise_does_not_trigger_remeasure() {
        let mut sizer = GridSizer::live(config());
        sizer.observe_container(80.0, 40.0);
        sizer.observe_header(4.0);
        let settled = sizer.geometry(5);

        sizer.observe_container(80.4, 39.7);
        assert!(!sizer.needs_remeasure());
        assert_eq!(sizer.geometry(5), settled);
    }

    #[test]
    fn two_phase_sequence_converges() {
        let mut sizer = GridSizer::live(config());

        // Phase one: container only, optimistic header assumption.
        sizer.observe_container(60.0, 30.0);
        assert!(sizer.needs_remeasure());
        assert_eq!(sizer.geometry(5).cell_size, 7.0);

        // Phase two: header rendered at the provisional size reports back.
        sizer.observe_header(4.0);
        assert!(!sizer.needs_remeasure());
        assert_eq!(sizer.geometry(5).cell_size, 3.0);
    }
}
