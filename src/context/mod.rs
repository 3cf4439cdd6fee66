//! GpuContext - Device and Queue wrapper
//!
//! Every GPU-facing type in this crate takes a [`GpuContext`]. The context is
//! cheap to clone; the effect keeps its own clone so per-frame uploads do not
//! need the caller to thread the device through.

use std::sync::Arc;

/// Core wgpu context containing device and queue.
#[derive(Clone)]
pub struct GpuContext {
    /// The wgpu device for creating GPU resources.
    pub device: Arc<wgpu::Device>,
    /// The wgpu queue for submitting commands.
    pub queue: Arc<wgpu::Queue>,
}

impl GpuContext {
    /// Create a context from an existing device and queue.
    pub fn new(device: wgpu::Device, queue: wgpu::Queue) -> Self {
        Self {
            device: Arc::new(device),
            queue: Arc::new(queue),
        }
    }

    /// Request an adapter and device asynchronously.
    ///
    /// Pass a surface when rendering to a window; `None` works for headless
    /// and offscreen use.
    pub async fn new_async(compatible_surface: Option<&wgpu::Surface<'_>>) -> anyhow::Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface,
                force_fallback_adapter: false,
            })
            .await?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("godray device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        Ok(Self::new(device, queue))
    }

    /// Request an adapter and device, blocking the calling thread.
    pub fn new_blocking(compatible_surface: Option<&wgpu::Surface<'_>>) -> anyhow::Result<Self> {
        pollster::block_on(Self::new_async(compatible_surface))
    }

    /// Create a command encoder.
    pub fn create_encoder(&self, label: Option<&str>) -> wgpu::CommandEncoder {
        self.device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label })
    }

    /// Submit command buffers to the queue.
    pub fn submit<I: IntoIterator<Item = wgpu::CommandBuffer>>(&self, command_buffers: I) {
        self.queue.submit(command_buffers);
    }
}

impl std::fmt::Debug for GpuContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GpuContext").finish()
    }
}
