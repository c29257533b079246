//! # Probe — Radiance Probe Grids
//!
//! A radiance probe is a sample point in space meant to store directional
//! lighting. Here probes are only laid out and drawn: each one carries a
//! zero-filled block of [`SH_COEFFICIENT_COUNT`] spherical-harmonic
//! coefficients that nothing computes or reads yet.
//!
//! ## Lattice Layout
//!
//! [`build_probe_grid`] places `grid_size³` probes on a cubic lattice centered
//! on the origin. Along each axis, index `i` maps to
//!
//! ```text
//! (i - (grid_size - 1) / 2) * spacing
//! ```
//!
//! so an odd grid has a probe exactly at 0 and an even grid straddles it:
//!
//! ```text
//! grid_size = 3, spacing = 1:   -1    0    1
//! grid_size = 4, spacing = 1:  -1.5 -0.5  0.5  1.5
//! ```
//!
//! Probes are emitted x-major: x is the outermost loop, z the innermost.
//!
//! ## Markers
//!
//! Every probe gets its own small magenta sphere, parented to one group node
//! per grid. The group handle is returned in [`ProbeGrid::group`] so the
//! caller can move or hide the whole grid without looking it up by name.

use crate::error::ProbeGridError;
use crate::math::{Color, Transform, Vec3};
use crate::scene::{Material, NodeId, Scene, Shape};

/// Number of spherical-harmonic coefficients stored per probe (L2 basis).
pub const SH_COEFFICIENT_COUNT: usize = 9;

/// Radius of a probe marker sphere.
pub const MARKER_RADIUS: f32 = 0.1;

/// Longitude/latitude subdivisions of a probe marker sphere.
pub const MARKER_SEGMENTS: u32 = 8;

/// Marker color.
pub const MARKER_COLOR: u32 = 0xff00ff;

/// One probe: where it is, its (unused) lighting coefficients, and the scene
/// node drawn for it.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeDescriptor {
    /// Lattice coordinate, local to the grid's group.
    pub position: Vec3,
    /// Reserved for irradiance shading. Always zero.
    pub coefficients: [f32; SH_COEFFICIENT_COUNT],
    /// The marker mesh for this probe.
    pub marker: NodeId,
}

/// A cubic grid of probes and the group node that owns their markers.
#[derive(Debug, Clone)]
pub struct ProbeGrid {
    pub name: String,
    pub grid_size: u32,
    pub spacing: f32,
    /// Container node; every marker is a direct child of it.
    pub group: NodeId,
    pub probes: Vec<ProbeDescriptor>,
}

impl ProbeGrid {
    pub fn len(&self) -> usize {
        self.probes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }

    /// Marker handles, in probe order.
    pub fn markers(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.probes.iter().map(|p| p.marker)
    }
}

fn validate(grid_size: u32, spacing: f32) -> Result<(), ProbeGridError> {
    if grid_size == 0 {
        return Err(ProbeGridError::InvalidGridSize(grid_size));
    }
    if !spacing.is_finite() || spacing <= 0.0 {
        return Err(ProbeGridError::InvalidSpacing(spacing));
    }
    Ok(())
}

/// Lattice coordinates for a grid, x-major, without touching any scene.
pub fn lattice_positions(grid_size: u32, spacing: f32) -> Result<Vec<Vec3>, ProbeGridError> {
    validate(grid_size, spacing)?;

    let half = (grid_size as f32 - 1.0) / 2.0;
    let coord = |i: u32| (i as f32 - half) * spacing;

    let n = grid_size as usize;
    let mut positions = Vec::with_capacity(n * n * n);
    for x in 0..grid_size {
        for y in 0..grid_size {
            for z in 0..grid_size {
                positions.push(Vec3::new(coord(x), coord(y), coord(z)));
            }
        }
    }
    Ok(positions)
}

/// Build a probe grid and attach its markers to a new group named `name`.
///
/// The group is added under the scene root. Arguments are validated before
/// the scene is touched, so an error leaves the scene unchanged.
pub fn build_probe_grid(
    scene: &mut Scene,
    name: &str,
    grid_size: u32,
    spacing: f32,
) -> Result<ProbeGrid, ProbeGridError> {
    let positions = lattice_positions(grid_size, spacing)?;

    let group = scene.add_group(scene.root(), name);
    let shape = Shape::Sphere {
        radius: MARKER_RADIUS,
        width_segments: MARKER_SEGMENTS,
        height_segments: MARKER_SEGMENTS,
    };

    let probes: Vec<ProbeDescriptor> = positions
        .into_iter()
        .map(|position| {
            let material = Material::color(Color::from_hex(MARKER_COLOR));
            let marker = scene.add_mesh(
                group,
                "probe",
                shape,
                material,
                Transform::from_translation(position),
            );
            ProbeDescriptor {
                position,
                coefficients: [0.0; SH_COEFFICIENT_COUNT],
                marker,
            }
        })
        .collect();

    log::debug!("Built probe grid {name:?}: {} probes ({grid_size}³, spacing {spacing})", probes.len());

    Ok(ProbeGrid {
        name: name.to_string(),
        grid_size,
        spacing,
        group,
        probes,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::scene::NodeKind;

    #[test]
    fn count_and_coefficients_for_several_sizes() {
        for &size in &[1u32, 2, 3, 5, 8] {
            for &spacing in &[0.5f32, 1.0, 4.0] {
                let mut scene = Scene::new();
                let grid = build_probe_grid(&mut scene, "grid", size, spacing).unwrap();
                assert_eq!(grid.len(), (size * size * size) as usize);
                for probe in &grid.probes {
                    assert_eq!(probe.coefficients.len(), 9);
                    assert!(probe.coefficients.iter().all(|&c| c == 0.0));
                }
            }
        }
    }

    #[test]
    fn single_probe_sits_at_origin() {
        for &spacing in &[0.1f32, 1.0, 123.0] {
            let positions = lattice_positions(1, spacing).unwrap();
            assert_eq!(positions, vec![Vec3::ZERO]);
        }
    }

    #[test]
    fn two_by_two_spacing_two_is_unit_corners() {
        let positions = lattice_positions(2, 2.0).unwrap();
        assert_eq!(positions.len(), 8);
        for sx in [-1.0f32, 1.0] {
            for sy in [-1.0f32, 1.0] {
                for sz in [-1.0f32, 1.0] {
                    assert!(positions.contains(&Vec3::new(sx, sy, sz)));
                }
            }
        }
    }

    #[test]
    fn each_axis_is_symmetric_about_zero() {
        for &(size, spacing) in &[(2u32, 0.5f32), (3, 1.0), (5, 4.0), (8, 0.5)] {
            let positions = lattice_positions(size, spacing).unwrap();
            for axis in 0..3 {
                let values: Vec<f32> = positions.iter().map(|p| p[axis]).collect();
                let min = values.iter().cloned().fold(f32::INFINITY, f32::min);
                let max = values.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
                assert!((min + max).abs() < 1e-5, "axis {axis}: {min} + {max}");
            }
        }
    }

    #[test]
    fn order_is_x_major_z_minor() {
        let positions = lattice_positions(3, 1.0).unwrap();
        assert_eq!(positions[0], Vec3::new(-1.0, -1.0, -1.0));
        assert_eq!(positions[1], Vec3::new(-1.0, -1.0, 0.0));
        assert_eq!(positions[3], Vec3::new(-1.0, 0.0, -1.0));
        assert_eq!(positions[9], Vec3::new(0.0, -1.0, -1.0));
        assert_eq!(positions[26], Vec3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn markers_are_children_of_group_at_probe_positions() {
        let mut scene = Scene::new();
        let grid = build_probe_grid(&mut scene, "global-probes", 3, 2.0).unwrap();

        let group = scene.node(grid.group).unwrap();
        assert_eq!(group.name, "global-probes");
        assert_eq!(group.parent(), Some(scene.root()));
        assert_eq!(group.children().len(), 27);

        for probe in &grid.probes {
            let marker = scene.node(probe.marker).unwrap();
            assert_eq!(marker.parent(), Some(grid.group));
            assert_eq!(marker.transform.translation, probe.position);
            match marker.kind {
                NodeKind::Mesh { shape, material } => {
                    assert_eq!(
                        shape,
                        Shape::Sphere {
                            radius: MARKER_RADIUS,
                            width_segments: 8,
                            height_segments: 8
                        }
                    );
                    assert_eq!(material.base_color, Color::from_hex(0xff00ff));
                }
                NodeKind::Group => panic!("marker should be a mesh"),
            }
        }
    }

    #[test]
    fn markers_are_distinct_nodes() {
        let mut scene = Scene::new();
        let grid = build_probe_grid(&mut scene, "grid", 2, 1.0).unwrap();
        let markers: HashSet<NodeId> = grid.markers().collect();
        assert_eq!(markers.len(), 8);
        assert!(!markers.contains(&grid.group));
    }

    #[test]
    fn zero_grid_size_is_rejected_without_side_effects() {
        let mut scene = Scene::new();
        let err = build_probe_grid(&mut scene, "bad", 0, 1.0).unwrap_err();
        assert_eq!(err, ProbeGridError::InvalidGridSize(0));
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn non_positive_spacing_is_rejected_without_side_effects() {
        let mut scene = Scene::new();
        for &spacing in &[0.0f32, -1.0, f32::NAN, f32::INFINITY] {
            let err = build_probe_grid(&mut scene, "bad", 3, spacing).unwrap_err();
            assert!(matches!(err, ProbeGridError::InvalidSpacing(_)));
        }
        assert_eq!(scene.len(), 1);
        assert!(lattice_positions(4, -0.5).is_err());
    }
}
