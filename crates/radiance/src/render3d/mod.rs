//! # Render3d — Forward Mesh Renderer with a Reflection Cube
//!
//! Draws the [`Scene`](crate::scene::Scene) with one forward pass and, when a
//! [`CubeCamera`](crate::capture::CubeCamera) is active, six extra passes that
//! refresh the reflection cube first.
//!
//! ## Bind Group Strategy
//!
//! | Group | Content | Changes | Strategy |
//! |-------|---------|---------|----------|
//! | 0 | Camera VP + position | Per pass | Dynamic offset into 7 slots |
//! | 1 | Ambient + directional light | Once/frame | Single uniform buffer |
//! | 2 | Material params + env cube | Per material | Recreated per frame |
//! | 3 | Model + normal matrices | Per object | Dynamic uniform buffer |
//!
//! Shapes are uploaded lazily the first time a scene node uses them, keyed
//! by their exact dimensions (see `mesh` and `shapes`).

pub(crate) mod draw;
pub(crate) mod mesh;
pub(crate) mod pipeline;
pub(crate) mod shapes;
pub(crate) mod vertex;

pub use draw::SceneRenderer;
