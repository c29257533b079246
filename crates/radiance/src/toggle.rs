//! Probe visibility toggle.
//!
//! [`VisibilityToggle`] mirrors a single boolean UI control ("show probes").
//! Every registered [`ProbeGrid`] has its markers' visibility written whenever
//! the control changes. Two states, `Visible` and `Hidden`; starts `Visible`.

use crate::probe::ProbeGrid;
use crate::scene::{NodeId, Scene};

/// Current toggle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleState {
    Visible,
    Hidden,
}

impl ToggleState {
    pub fn from_visible(visible: bool) -> Self {
        if visible { Self::Visible } else { Self::Hidden }
    }
}

/// A change reported by the UI control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleEvent {
    /// The control now reads `checked`.
    Changed(bool),
}

/// Binds one boolean flag to the markers of every registered probe grid.
#[derive(Debug, Clone)]
pub struct VisibilityToggle {
    state: ToggleState,
    markers: Vec<NodeId>,
    grids: usize,
}

impl VisibilityToggle {
    pub fn new() -> Self {
        Self {
            state: ToggleState::Visible,
            markers: Vec::new(),
            grids: 0,
        }
    }

    /// Register a grid. Its markers follow the flag from the next change on.
    pub fn register(&mut self, grid: &ProbeGrid) {
        self.markers.extend(grid.markers());
        self.grids += 1;
    }

    pub fn state(&self) -> ToggleState {
        self.state
    }

    pub fn is_visible(&self) -> bool {
        self.state == ToggleState::Visible
    }

    /// Number of registered grids.
    pub fn grid_count(&self) -> usize {
        self.grids
    }

    /// Store `visible` and write it to every registered marker.
    pub fn set(&mut self, scene: &mut Scene, visible: bool) {
        let next = ToggleState::from_visible(visible);
        if next != self.state {
            log::info!(
                "Probes {} ({} markers in {} grids)",
                if visible { "shown" } else { "hidden" },
                self.markers.len(),
                self.grids
            );
        }
        self.state = next;

        for &marker in &self.markers {
            scene.set_visible(marker, visible);
        }
    }

    /// Handle a UI event.
    pub fn apply(&mut self, scene: &mut Scene, event: ToggleEvent) {
        match event {
            ToggleEvent::Changed(checked) => self.set(scene, checked),
        }
    }
}

impl Default for VisibilityToggle {
    fn default() -> Self {
        Self::new()
    }
}
