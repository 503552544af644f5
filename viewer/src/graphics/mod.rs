//! wgpu rendering for the viewer
//!
//! [`Graphics`] owns the window surface and the scene pipeline, and exposes
//! a [`WgpuContext`] for the core frame driver to draw into.

mod context;
mod init;
mod pipeline;

pub use context::WgpuContext;
pub use init::InitError;

use kennel_core::{FrameDriver, FrameStats};

use init::create_depth_view;

pub struct Graphics {
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    depth_view: wgpu::TextureView,
    pipeline: wgpu::RenderPipeline,
    context: WgpuContext,
}

/// Outcome of [`Graphics::render`]
#[derive(Debug)]
pub enum RenderOutcome {
    Presented(FrameStats),
    /// The surface was lost or outdated and has been reconfigured
    Reconfigured,
    /// The surface timed out; no frame this time
    Skipped,
}

impl Graphics {
    pub fn width(&self) -> u32 {
        self.surface_config.width
    }

    pub fn height(&self) -> u32 {
        self.surface_config.height
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width() as f32 / self.height().max(1) as f32
    }

    /// Resize the surface and depth buffer; zero sizes are ignored
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.surface_config.width = width;
        self.surface_config.height = height;
        self.surface.configure(self.context.device(), &self.surface_config);
        self.depth_view = create_depth_view(self.context.device(), width, height);
        tracing::debug!("Surface resized to {}x{}", width, height);
    }

    fn reconfigure(&mut self) {
        self.resize(self.surface_config.width, self.surface_config.height);
    }

    /// Run one frame of `driver` at `now` seconds and present it
    pub fn render(
        &mut self,
        driver: &mut FrameDriver,
        now: f64,
    ) -> Result<RenderOutcome, wgpu::SurfaceError> {
        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.reconfigure();
                return Ok(RenderOutcome::Reconfigured);
            }
            Err(wgpu::SurfaceError::Timeout) => {
                tracing::debug!("Surface timeout, skipping frame");
                return Ok(RenderOutcome::Skipped);
            }
            Err(e) => return Err(e),
        };

        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.context.begin_frame();
        let stats = driver.frame(now, self.aspect_ratio(), &mut self.context);
        tracing::trace!("Recorded {} draws", self.context.draw_count());
        self.context.submit(&view, &self.depth_view, &self.pipeline);
        frame.present();

        Ok(RenderOutcome::Presented(stats))
    }
}
