use crate::assets::prepare::{ImageId, PreparedImage};
use crate::foundation::core::{Canvas, RestartSignal};
use crate::foundation::error::DepthloopResult;
use crate::motion::cycle::{MotionPhase, ORBIT_LIGHT_COUNT, compute_frame};
use crate::render::camera;
use crate::render::post;
use crate::render::raster::{FrameRGBA, PointLight, RasterTarget, draw_flat, draw_mesh, draw_points};
use crate::scene::backdrop::{Backdrop, PARTICLE_RGB, RING_RGB};
use crate::scene::parallax::{LIGHT_COLORS, ParallaxScene};
use crate::settings::SettingsHandle;
use glam::{Mat4, Vec3};

/// Linear-space clear color behind the backdrop.
const CLEAR_RGB: [f32; 3] = [0.013, 0.015, 0.022];
/// Side length of a particle splat, in pixels.
const PARTICLE_SIZE_PX: u32 = 2;

/// Handed to the surface-ready hook once the first scene is installed.
///
/// Capture opens its sink against these dimensions, which stay fixed for the
/// renderer's lifetime.
#[derive(Clone, Copy, Debug)]
pub struct SurfaceHandle {
    /// Dimensions of the render surface.
    pub canvas: Canvas,
}

type ReadyHook = Box<dyn FnOnce(SurfaceHandle) + Send>;

/// CPU scene renderer.
///
/// Owns the raster target and produces one finished frame per [`render_next`]
/// call by combining the motion phase, the live settings snapshot, the backdrop
/// and the installed parallax scene. Rendering itself is infallible; anything
/// that can fail (decoding, geometry setup) happens in [`install_scene`].
///
/// [`render_next`]: SceneRenderer::render_next
/// [`install_scene`]: SceneRenderer::install_scene
pub struct SceneRenderer {
    canvas: Canvas,
    target: RasterTarget,
    frame: FrameRGBA,
    scene: Option<ParallaxScene>,
    backdrop: Backdrop,
    phase: MotionPhase,
    settings: SettingsHandle,
    restart: RestartSignal,
    surface_ready: Option<ReadyHook>,
    subdivisions: u32,
}

impl SceneRenderer {
    /// Creates a renderer for a fixed canvas.
    ///
    /// `subdivisions` controls the plane mesh density used for every installed
    /// image.
    pub fn new(
        canvas: Canvas,
        settings: SettingsHandle,
        restart: RestartSignal,
        subdivisions: u32,
    ) -> Self {
        Self {
            canvas,
            target: RasterTarget::new(canvas),
            frame: FrameRGBA::new(canvas),
            scene: None,
            backdrop: Backdrop::new(),
            phase: MotionPhase::default(),
            settings,
            restart,
            surface_ready: None,
            subdivisions,
        }
    }

    /// Registers a hook that fires once, when the first scene is installed.
    ///
    /// Registering again after the hook has fired arms it for the next
    /// successful [`install_scene`](SceneRenderer::install_scene).
    pub fn on_surface_ready(&mut self, hook: impl FnOnce(SurfaceHandle) + Send + 'static) {
        self.surface_ready = Some(Box::new(hook));
    }

    /// Installs a prepared image as the active scene, replacing any previous one.
    ///
    /// Decodes both planes and builds the plane mesh; displaced geometry is
    /// produced lazily on the next rendered frame.
    #[tracing::instrument(skip(self, image), fields(image = image.id.0))]
    pub fn install_scene(&mut self, image: &PreparedImage) -> DepthloopResult<()> {
        let scene = ParallaxScene::from_prepared(image, self.subdivisions)?;
        tracing::debug!(
            aspect = scene.aspect,
            subdivisions = self.subdivisions,
            "scene installed"
        );
        self.scene = Some(scene);
        if let Some(hook) = self.surface_ready.take() {
            hook(SurfaceHandle {
                canvas: self.canvas,
            });
        }
        Ok(())
    }

    /// Removes the active scene; only the backdrop renders afterwards.
    pub fn clear_scene(&mut self) {
        self.scene = None;
    }

    /// Id of the image behind the active scene, if one is installed.
    pub fn scene_image(&self) -> Option<ImageId> {
        self.scene.as_ref().map(|s| s.image_id)
    }

    /// Advances time by `dt` seconds and renders the next frame.
    ///
    /// A pending restart is consumed before the advance, so the rendered frame
    /// is the first of the new loop. Rendering with no scene installed draws
    /// the backdrop alone.
    pub fn render_next(&mut self, dt: f64) {
        if self.phase.sync_restart(self.restart.value()) {
            tracing::debug!("loop restarted");
        }
        self.phase.advance(dt);
        self.backdrop.advance(dt);

        let settings = self.settings.get();
        let tf = compute_frame(self.phase.elapsed(), &settings);
        let cam = camera::camera_matrices(tf.camera_eye, tf.camera_target, self.canvas);

        self.target.clear(CLEAR_RGB);

        let ring_model = Mat4::from_rotation_z(self.backdrop.ring_angle() as f32);
        draw_flat(
            &mut self.target,
            &cam,
            ring_model,
            self.backdrop.ring_positions(),
            self.backdrop.ring_indices(),
            RING_RGB,
        );

        let field_model = Mat4::from_rotation_z(self.backdrop.particle_angle() as f32);
        draw_points(
            &mut self.target,
            &cam,
            field_model,
            self.backdrop.particles(),
            PARTICLE_RGB,
            PARTICLE_SIZE_PX,
        );

        if let Some(scene) = self.scene.as_mut() {
            scene.ensure_geometry(tf.displacement_scale);
            if let Some(geometry) = scene.geometry() {
                let lights: [PointLight; ORBIT_LIGHT_COUNT] = std::array::from_fn(|i| PointLight {
                    pos: tf.lights[i].as_vec3(),
                    rgb: LIGHT_COLORS[i],
                });
                let model = Mat4::from_translation(Vec3::new(0.0, 0.0, tf.mesh_lift as f32))
                    * Mat4::from_rotation_z(tf.mesh_roll as f32);
                draw_mesh(
                    &mut self.target,
                    &cam,
                    model,
                    &geometry.positions,
                    &geometry.normals,
                    &scene.mesh.uvs,
                    &scene.mesh.indices,
                    &scene.texture,
                    &lights,
                );
            }
        }

        post::resolve(&self.target, tf.exposure, settings.vignette, &mut self.frame);
    }

    /// The most recently rendered frame.
    ///
    /// All black until the first [`render_next`](SceneRenderer::render_next).
    pub fn frame(&self) -> &FrameRGBA {
        &self.frame
    }

    /// Render surface dimensions.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Seconds of animation time accumulated since creation or last restart.
    pub fn elapsed(&self) -> f64 {
        self.phase.elapsed()
    }
}
