//! GPU texture cache
//!
//! Owns every texture the renderer samples. Image textures are registered by
//! path and uploaded on first use; solid colours are 1x1 textures created on
//! demand. Everything is released when the cache drops.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::LoadError;
use crate::sim::TextureKey;

/// Decoded RGBA8 pixels
#[derive(Debug, Clone, PartialEq)]
pub struct Pixels {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl Pixels {
    pub fn solid(color: [u8; 4]) -> Self {
        Self {
            width: 1,
            height: 1,
            rgba: color.to_vec(),
        }
    }
}

/// Read and decode an image file (PNG, GIF, TGA)
pub fn decode_image(path: &Path) -> Result<Pixels, LoadError> {
    let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let format = image::ImageFormat::from_path(path).map_err(|e| LoadError::Image {
        path: path.to_path_buf(),
        details: e.to_string(),
    })?;
    let decoded =
        image::load_from_memory_with_format(&bytes, format).map_err(|e| LoadError::Image {
            path: path.to_path_buf(),
            details: e.to_string(),
        })?;
    let rgba = decoded.to_rgba8();
    log::debug!(
        "Decoded {} ({}x{})",
        path.display(),
        rgba.width(),
        rgba.height()
    );
    Ok(Pixels {
        width: rgba.width(),
        height: rgba.height(),
        rgba: rgba.into_raw(),
    })
}

struct GpuTexture {
    _texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
}

pub struct TextureCache {
    layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    sources: HashMap<TextureKey, PathBuf>,
    textures: HashMap<TextureKey, GpuTexture>,
}

impl TextureCache {
    pub fn new(device: &wgpu::Device) -> Self {
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("texture_bind_group_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        // Pixel art: no smoothing between texels
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("texture_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self {
            layout,
            sampler,
            sources: HashMap::new(),
            textures: HashMap::new(),
        }
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.layout
    }

    /// Associate an image file with a key; uploaded on first `ensure`
    pub fn register(&mut self, key: TextureKey, path: impl Into<PathBuf>) {
        self.sources.insert(key, path.into());
        self.textures.remove(&key);
    }

    /// Make sure `key` is resident on the GPU
    pub fn ensure(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        key: TextureKey,
    ) -> Result<(), LoadError> {
        if key == TextureKey::None || self.textures.contains_key(&key) {
            return Ok(());
        }

        let pixels = match key {
            TextureKey::Color(color) => Pixels::solid(color),
            _ => match self.sources.get(&key) {
                Some(path) => decode_image(path)?,
                None => {
                    log::warn!("No image registered for {:?}, drawing white", key);
                    Pixels::solid([255; 4])
                }
            },
        };

        let texture = self.upload(device, queue, &pixels);
        self.textures.insert(key, texture);
        Ok(())
    }

    pub fn bind_group(&self, key: TextureKey) -> Option<&wgpu::BindGroup> {
        self.textures.get(&key).map(|t| &t.bind_group)
    }

    fn upload(&self, device: &wgpu::Device, queue: &wgpu::Queue, pixels: &Pixels) -> GpuTexture {
        let size = wgpu::Extent3d {
            width: pixels.width,
            height: pixels.height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("sprite_texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &pixels.rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * pixels.width),
                rows_per_image: Some(pixels.height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("texture_bind_group"),
            layout: &self.layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });

        GpuTexture {
            _texture: texture,
            bind_group,
        }
    }
}
