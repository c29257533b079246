//! # App Context — Scene Composition and Per-Frame Update
//!
//! [`AppContext`] owns everything the demo mutates: the scene, the camera and
//! its controls, the probe grids, and the visibility toggle. The window layer
//! ([`App`](crate::window::App)) holds one and feeds it input; nothing here
//! touches the GPU, so the whole frame update runs in tests.
//!
//! ## Frame Update
//!
//! ```text
//! update_frame()
//!   ├─ spinning cube: rotation.x += 0.01, rotation.y += 0.01
//!   ├─ follow-camera grids: group → (camera.x, 0, camera.z)
//!   └─ orbit controls: apply pending pointer input to the camera
//! ```
//!
//! Rotation advances per frame, not per second, so its speed follows the
//! display's refresh rate.

use winit::keyboard::KeyCode;

use crate::camera::PerspectiveCamera;
use crate::capture::CubeCamera;
use crate::config::AppConfig;
use crate::controls::{OrbitControls, PointerEvent};
use crate::error::AppError;
use crate::math::{Color, Transform, Vec3};
use crate::probe::{ProbeGrid, build_probe_grid};
use crate::render::{ClearColor, SceneView};
use crate::scene::{AmbientLight, DirectionalLight, Material, NodeId, Scene, Shape};
use crate::toggle::{ToggleEvent, VisibilityToggle};

/// Radians added to the cube's X and Y Euler angles every frame.
pub const CUBE_SPIN_PER_FRAME: f32 = 0.01;

pub struct AppContext {
    pub scene: Scene,
    pub camera: PerspectiveCamera,
    pub controls: OrbitControls,
    pub toggle: VisibilityToggle,
    pub grids: Vec<ProbeGrid>,
    /// Reflection capture point. `None` when reflections are disabled.
    pub capture: Option<CubeCamera>,
    pub clear_color: ClearColor,
    cube: NodeId,
    cube_angles: Vec3,
    followers: Vec<NodeId>,
    toggle_key: KeyCode,
}

impl AppContext {
    /// Build the demo scene described by `config`.
    pub fn compose(config: &AppConfig) -> Result<Self, AppError> {
        config.validate()?;
        let toggle_key = config.toggle_key()?;

        let mut scene = Scene::new();
        let root = scene.root();

        scene.ambient = AmbientLight {
            color: Color::from_hex(0x404040),
            intensity: 1.0,
        };
        scene.directional = Some(DirectionalLight::from_position(
            Vec3::new(5.0, 5.0, 5.0),
            Color::WHITE,
            1.0,
        ));

        scene.add_mesh(
            root,
            "plane",
            Shape::Plane {
                width: 10.0,
                height: 10.0,
            },
            Material::color(Color::from_hex(0xcccccc)),
            Transform::from_xyz(0.0, -2.5, 0.0).with_euler(-std::f32::consts::FRAC_PI_2, 0.0, 0.0),
        );
        scene.add_mesh(
            root,
            "wall",
            Shape::Box {
                width: 0.2,
                height: 5.0,
                depth: 10.0,
            },
            Material::color(Color::from_hex(0x999999)),
            Transform::from_xyz(-5.0, 0.0, 0.0),
        );
        let cube = scene.add_mesh(
            root,
            "cube",
            Shape::Box {
                width: 1.0,
                height: 1.0,
                depth: 1.0,
            },
            Material {
                base_color: Color::from_hex(0x00ff00),
                metallic: 0.9,
                roughness: 0.1,
                env_map: config.reflection.enabled,
            },
            Transform::from_xyz(-2.0, -0.5, 0.0),
        );

        let mut toggle = VisibilityToggle::new();
        let mut grids = Vec::with_capacity(config.probe_grids.len());
        let mut followers = Vec::new();
        for grid_config in &config.probe_grids {
            let grid = build_probe_grid(
                &mut scene,
                &grid_config.name,
                grid_config.grid_size,
                grid_config.spacing,
            )?;
            toggle.register(&grid);
            if grid_config.follow_camera {
                followers.push(grid.group);
            }
            grids.push(grid);
        }
        toggle.set(&mut scene, config.controls.probes_visible);

        let cam = &config.camera;
        let mut camera = PerspectiveCamera::new(
            cam.fov_y_degrees,
            config.window.width.max(1) as f32 / config.window.height.max(1) as f32,
            cam.near,
            cam.far,
        );
        camera.position = cam.position;
        camera.target = cam.target;

        let mut controls = OrbitControls::new(cam.target);
        controls.set_viewport_height(config.window.height);

        let capture = config.reflection.enabled.then(|| {
            CubeCamera::new(
                config.reflection.near,
                config.reflection.far,
                config.reflection.resolution,
            )
        });

        let probe_count: usize = grids.iter().map(ProbeGrid::len).sum();
        log::info!(
            "Scene composed: {} nodes, {} probes in {} grids, reflections {}",
            scene.len(),
            probe_count,
            grids.len(),
            if capture.is_some() { "on" } else { "off" }
        );

        Ok(Self {
            scene,
            camera,
            controls,
            toggle,
            grids,
            capture,
            clear_color: ClearColor(config.clear_color),
            cube,
            cube_angles: Vec3::ZERO,
            followers,
            toggle_key,
        })
    }

    /// Advance one frame.
    pub fn update_frame(&mut self) {
        self.cube_angles.x += CUBE_SPIN_PER_FRAME;
        self.cube_angles.y += CUBE_SPIN_PER_FRAME;
        if let Some(node) = self.scene.node_mut(self.cube) {
            node.transform = node
                .transform
                .with_euler(self.cube_angles.x, self.cube_angles.y, self.cube_angles.z);
        }

        let follow = Vec3::new(self.camera.position.x, 0.0, self.camera.position.z);
        for &group in &self.followers {
            self.scene.set_translation(group, follow);
        }

        self.controls.update(&mut self.camera);
    }

    /// Show or hide every probe marker.
    pub fn set_probes_visible(&mut self, visible: bool) {
        self.toggle.set(&mut self.scene, visible);
    }

    pub fn handle_toggle(&mut self, event: ToggleEvent) {
        self.toggle.apply(&mut self.scene, event);
    }

    pub fn probes_visible(&self) -> bool {
        self.toggle.is_visible()
    }

    /// Key bound to the probe toggle.
    pub fn toggle_key(&self) -> KeyCode {
        self.toggle_key
    }

    pub fn handle_pointer(&mut self, event: PointerEvent) {
        self.controls.handle(event);
    }

    /// Window resized to `width` × `height` pixels.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.set_viewport(width, height);
        self.controls.set_viewport_height(height);
    }

    /// The spinning, reflective cube.
    pub fn cube(&self) -> NodeId {
        self.cube
    }

    /// Grid groups that track the camera.
    pub fn followers(&self) -> &[NodeId] {
        &self.followers
    }

    pub fn scene_view(&self) -> SceneView<'_> {
        SceneView {
            scene: &self.scene,
            camera: &self.camera,
            capture: self.capture.as_ref(),
            clear_color: self.clear_color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProbeGridConfig;
    use crate::controls::PointerButton;
    use crate::error::{ConfigError, ProbeGridError};
    use crate::math::{EulerRot, Vec2};
    use crate::probe::SH_COEFFICIENT_COUNT;
    use crate::scene::NodeKind;

    fn demo() -> AppContext {
        AppContext::compose(&AppConfig::default()).unwrap()
    }

    #[test]
    fn default_scene_has_both_grids() {
        let app = demo();
        assert_eq!(app.grids.len(), 2);
        assert_eq!(app.grids[0].len(), 125);
        assert_eq!(app.grids[1].len(), 512);
        assert_eq!(app.toggle.grid_count(), 2);
        assert!(app.probes_visible());
        assert!(app.grids.iter().flat_map(|g| &g.probes).all(|p| p.coefficients == [0.0; SH_COEFFICIENT_COUNT]));

        // plane + wall + cube + every marker
        assert_eq!(app.scene.visible_meshes().len(), 3 + 125 + 512);
        assert_eq!(app.followers(), &[app.grids[1].group]);
    }

    #[test]
    fn cube_is_reflective_metal() {
        let app = demo();
        let node = app.scene.node(app.cube()).unwrap();
        let NodeKind::Mesh { material, .. } = node.kind else {
            panic!("cube is not a mesh");
        };
        assert!(material.env_map);
        assert_eq!((material.metallic, material.roughness), (0.9, 0.1));
        assert_eq!(node.transform.translation, Vec3::new(-2.0, -0.5, 0.0));
        assert!(app.capture.is_some());
    }

    #[test]
    fn camera_starts_where_configured() {
        let app = demo();
        assert_eq!(app.camera.position, Vec3::new(2.0, 2.0, 8.0));
        assert_eq!(app.camera.fov_y_degrees, 75.0);
        assert_eq!(app.toggle_key(), KeyCode::KeyP);
    }

    #[test]
    fn update_spins_cube_per_frame() {
        let mut app = demo();
        for _ in 0..3 {
            app.update_frame();
        }
        let rotation = app.scene.node(app.cube()).unwrap().transform.rotation;
        let (x, y, z) = rotation.to_euler(EulerRot::XYZ);
        assert!((x - 0.03).abs() < 1e-4);
        assert!((y - 0.03).abs() < 1e-4);
        assert!(z.abs() < 1e-4);
    }

    #[test]
    fn local_grid_follows_camera_on_xz() {
        let mut app = demo();
        app.update_frame();
        let local = app.grids[1].group;
        let global = app.grids[0].group;
        assert_eq!(app.scene.world_position(local), Some(Vec3::new(2.0, 0.0, 8.0)));
        assert_eq!(app.scene.world_position(global), Some(Vec3::ZERO));

        // Orbit the camera; the next frame picks up the new position.
        app.handle_pointer(PointerEvent::Moved(Vec2::ZERO));
        app.handle_pointer(PointerEvent::Pressed(PointerButton::Primary));
        app.handle_pointer(PointerEvent::Moved(Vec2::new(90.0, 0.0)));
        app.handle_pointer(PointerEvent::Released(PointerButton::Primary));
        app.update_frame();
        app.update_frame();

        let cam = app.camera.position;
        let group = app.scene.world_position(local).unwrap();
        assert!((group - Vec3::new(cam.x, 0.0, cam.z)).length() < 1e-3);
        assert_ne!(group, Vec3::new(2.0, 0.0, 8.0));
    }

    #[test]
    fn toggle_hides_and_restores_all_probes() {
        let mut app = demo();
        app.set_probes_visible(false);
        assert_eq!(app.scene.visible_meshes().len(), 3);

        app.handle_toggle(ToggleEvent::Changed(true));
        assert_eq!(app.scene.visible_meshes().len(), 3 + 125 + 512);
    }

    #[test]
    fn initial_visibility_comes_from_config() {
        let mut config = AppConfig::default();
        config.controls.probes_visible = false;
        let app = AppContext::compose(&config).unwrap();
        assert!(!app.probes_visible());
        assert_eq!(app.scene.visible_meshes().len(), 3);
    }

    #[test]
    fn disabled_reflections_drop_the_capture() {
        let mut config = AppConfig::default();
        config.reflection.enabled = false;
        let app = AppContext::compose(&config).unwrap();
        assert!(app.capture.is_none());
        assert!(app.scene_view().capture.is_none());
    }

    #[test]
    fn bad_grid_fails_composition() {
        let mut config = AppConfig::default();
        config.probe_grids.push(ProbeGridConfig {
            name: "broken".to_string(),
            grid_size: 0,
            spacing: 1.0,
            follow_camera: false,
        });
        let err = AppContext::compose(&config).err().unwrap();
        assert!(matches!(err, AppError::ProbeGrid(ProbeGridError::InvalidGridSize(0))));
    }

    #[test]
    fn missing_toggle_key_fails_composition() {
        let mut config = AppConfig::default();
        config.controls.probe_toggle = None;
        let err = AppContext::compose(&config).err().unwrap();
        assert!(matches!(err, AppError::Config(ConfigError::MissingToggleControl)));
    }

    #[test]
    fn resize_updates_aspect() {
        let mut app = demo();
        app.resize(1000, 500);
        assert_eq!(app.camera.aspect, 2.0);
    }
}
