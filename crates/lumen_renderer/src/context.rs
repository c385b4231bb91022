//! Long-lived render state driven one frame at a time.

use crate::renderer::{render_frame, RenderResult};
use crate::{Camera, FrameBuffer, RenderConfig};
use lumen_core::{ObjectId, Scene, SceneConfig};
use lumen_math::DVec3;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::path::Path;
use std::time::{Duration, Instant};

/// Input gathered between frames.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    /// Camera translation applied before the next frame
    pub camera_delta: DVec3,
    /// Change to the pixel block size
    pub resolution_delta: i32,
    /// Stop after this frame
    pub quit: bool,
}

/// Telemetry for one rendered frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStats {
    /// Time since the previous frame (or since setup for the first)
    pub frame_time: Duration,
    /// Instantaneous frames per second
    pub fps: f64,
    /// Pixel block size used for this frame
    pub resolution: u32,
    /// Whether the block size divides the buffer width evenly
    pub resolution_divides_width: bool,
    /// Number of primary rays shaded
    pub rays: usize,
}

impl FrameStats {
    /// Label used in frame logs.
    pub fn factor_label(&self) -> &'static str {
        if self.resolution_divides_width {
            "factor"
        } else {
            "non-factor"
        }
    }
}

/// Everything needed to render frames: scene, camera, settings, worker pool
/// and output buffer.
pub struct RenderContext {
    pub scene: Scene,
    pub camera: Camera,
    pub config: RenderConfig,
    buffer: FrameBuffer,
    pool: ThreadPool,
    last_frame: Instant,
}

impl RenderContext {
    /// Create a context rendering into a `width × height` buffer.
    pub fn new(scene: Scene, camera: Camera, config: RenderConfig, width: u32, height: u32) -> RenderResult<Self> {
        if config.workers == 0 {
            log::warn!("Worker count is 0, rendering with a single worker");
        }

        let threads = config.workers.max(1);
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("lumen-band-{}", i))
            .build()?;

        log::info!(
            "Render context: {}x{} buffer, {} workers, {} objects, {} triangles",
            width,
            height,
            threads,
            scene.object_count(),
            scene.total_triangle_count()
        );

        Ok(Self {
            scene,
            camera,
            config,
            buffer: FrameBuffer::new(width, height),
            pool,
            last_frame: Instant::now(),
        })
    }

    /// Build the scene, camera and settings from a scene description.
    ///
    /// Relative mesh paths resolve against `base_dir`.
    pub fn from_config(config: &SceneConfig, base_dir: &Path) -> RenderResult<Self> {
        let scene = config.build_scene(base_dir)?;
        let camera = Camera::from_config(&config.camera);
        let render_config = RenderConfig {
            background: config.background,
            workers: config.workers,
            ..RenderConfig::default()
        };

        Self::new(scene, camera, render_config, config.viewport.width, config.viewport.height)
    }

    /// Spin the animated object (object 0) about Y.
    pub fn animate(&mut self, angle: f64) -> bool {
        self.scene.transform_object(ObjectId(0), |transform| transform.rotation.y += angle)
    }

    /// Apply camera movement and resolution changes for the next frame.
    pub fn apply_input(&mut self, input: &FrameInput) {
        if input.camera_delta != DVec3::ZERO {
            self.camera.move_by(input.camera_delta);
            log::debug!("Camera moved to {:?}", self.camera.position);
        }

        if input.resolution_delta != 0 {
            self.camera.adjust_resolution(input.resolution_delta);
            log::debug!("Resolution now {}", self.camera.resolution());
        }
    }

    /// Generate rays, shade them in parallel and write the results.
    pub fn render_frame(&mut self) -> FrameStats {
        let half_width = self.buffer.width / 2;
        let half_height = self.buffer.height / 2;
        self.camera.generate_rays(half_width, half_height);

        let rays = render_frame(&self.camera, &self.scene, &self.config, &self.pool, &mut self.buffer);

        let now = Instant::now();
        let frame_time = now.duration_since(self.last_frame);
        self.last_frame = now;

        let seconds = frame_time.as_secs_f64();
        let resolution = self.camera.resolution();

        FrameStats {
            frame_time,
            fps: if seconds > 0.0 { 1.0 / seconds } else { f64::INFINITY },
            resolution,
            resolution_divides_width: self.buffer.width % resolution == 0,
            rays,
        }
    }

    /// The most recently rendered frame.
    pub fn buffer(&self) -> &FrameBuffer {
        &self.buffer
    }
}
