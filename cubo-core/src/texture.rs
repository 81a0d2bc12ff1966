//! Structs and functions for handling textures.
//!
//! [`TextureLoader`] hands back a [`Texture`] that is bindable immediately: it holds a 1×1
//! blue placeholder while the real image is decoded on the rayon pool. The decoded pixels
//! travel back over a one-slot channel and are uploaded on the render thread by
//! [`Texture::poll`], so a draw only ever sees the placeholder or the complete image.

use std::{
    fmt,
    path::{Path, PathBuf},
    sync::{
        Arc,
        mpsc::{self, Receiver, TryRecvError},
    },
};

use image::RgbaImage;

use crate::{
    error::PipelineError,
    surface::{Surface, TextureFilter, TextureParameter, TextureWrap},
};

/// The RGBA pixel shown until the real image has been installed.
pub const PLACEHOLDER_PIXEL: [u8; 4] = [0, 0, 255, 255];

/// The checkerboard PNG drawn on the cube when no other image is configured.
pub const DEFAULT_TEXTURE_PNG: &[u8] = include_bytes!("../assets/cube-texture.png");

/// Upper bound on error flags cleared after an upload.
const MAX_PENDING_ERRORS: usize = 8;

/// Returns `true` if `n` has at most one bit set.
///
/// This is the `n & (n - 1) == 0` test, so `is_power_of_two(0)` is `true`. Callers never pass
/// a zero dimension: empty images are rejected before the sampling policy is chosen.
pub fn is_power_of_two(n: u32) -> bool {
    n & n.wrapping_sub(1) == 0
}

/// Why the backing image of a texture could not be installed. Only ever logged.
#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("image has no pixels ({width}x{height})")]
    Empty { width: u32, height: u32 },

    #[error("image decoder stopped without producing a result")]
    Abandoned,

    #[error("graphics driver rejected the {width}x{height} upload with error 0x{code:04X}")]
    Rejected { width: u32, height: u32, code: u32 },
}

/// How the installed image is sampled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sampling {
    /// Both dimensions are powers of two: full mipmap chain, trilinear filtering.
    Mipmapped,
    /// Clamp to edge on both axes, linear filtering, no mipmaps.
    Clamped,
}

/// What the texture currently holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextureStatus {
    /// Waiting for the decoder.
    Placeholder,
    /// The decoded image has been installed.
    Loaded {
        width: u32,
        height: u32,
        sampling: Sampling,
    },
    /// Decoding failed; the placeholder stays bound for good.
    Failed,
}

type DecodeResult = Result<RgbaImage, TextureError>;

/// A single 2D texture whose contents are replaced once, in place, when its image arrives.
pub struct Texture<S: Surface> {
    surface: Arc<S>,
    id: S::Texture,
    label: String,
    status: TextureStatus,
    pending: Option<Receiver<DecodeResult>>,
}

impl<S: Surface> Texture<S> {
    pub fn status(&self) -> TextureStatus {
        self.status
    }

    /// Returns `true` while the decoder has not reported back.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Installs the decoded image if it has arrived. Never blocks.
    ///
    /// Returns `true` on the call that replaced the placeholder.
    pub fn poll(&mut self) -> bool {
        let Some(receiver) = &self.pending else {
            return false;
        };

        let result = match receiver.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return false,
            Err(TryRecvError::Disconnected) => Err(TextureError::Abandoned),
        };
        self.pending = None;

        match result.and_then(non_empty).and_then(|image| self.install(&image)) {
            Ok(()) => true,
            Err(e) => {
                log::warn!(
                    "Could not load texture image {}: {e}; keeping placeholder",
                    self.label
                );
                self.status = TextureStatus::Failed;
                false
            }
        }
    }

    /// Binds the texture to the specified texture unit.
    pub fn bind(&self, unit: u32) {
        self.surface.active_texture(unit);
        self.surface.bind_texture(Some(self.id));
    }

    /// Uploads `image` over the placeholder. If the driver rejects the upload, the placeholder
    /// is uploaded again and the error flags are cleared so the next frame does not see them.
    fn install(&mut self, image: &RgbaImage) -> Result<(), TextureError> {
        let (width, height) = image.dimensions();

        self.surface.bind_texture(Some(self.id));
        self.surface.tex_image_rgba(width, height, image.as_raw());

        let sampling = if is_power_of_two(width) && is_power_of_two(height) {
            self.surface.generate_mipmap();
            self.surface
                .tex_parameter(TextureParameter::MinFilter(TextureFilter::LinearMipmapLinear));
            Sampling::Mipmapped
        } else {
            self.surface
                .tex_parameter(TextureParameter::WrapS(TextureWrap::ClampToEdge));
            self.surface
                .tex_parameter(TextureParameter::WrapT(TextureWrap::ClampToEdge));
            self.surface
                .tex_parameter(TextureParameter::MinFilter(TextureFilter::Linear));
            Sampling::Clamped
        };

        if let Some(code) = self.drain_errors() {
            self.surface.tex_image_rgba(1, 1, &PLACEHOLDER_PIXEL);
            self.drain_errors();
            return Err(TextureError::Rejected {
                width,
                height,
                code,
            });
        }

        log::info!(
            "Installed texture {} ({width}x{height}, {sampling:?})",
            self.label
        );
        self.status = TextureStatus::Loaded {
            width,
            height,
            sampling,
        };
        Ok(())
    }

    /// Clears the driver's error flags and returns the first one.
    fn drain_errors(&self) -> Option<u32> {
        let first = self.surface.take_error()?;
        for code in std::iter::from_fn(|| self.surface.take_error()).take(MAX_PENDING_ERRORS) {
            log::debug!("Discarding driver error 0x{code:04X} after texture upload");
        }
        Some(first)
    }
}

impl<S: Surface> Drop for Texture<S> {
    fn drop(&mut self) {
        self.surface.delete_texture(self.id);
    }
}

fn non_empty(image: RgbaImage) -> DecodeResult {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        Err(TextureError::Empty { width, height })
    } else {
        Ok(image)
    }
}

/// Decodes the image file at `path` into RGBA8 pixels.
pub fn decode_file(path: &Path) -> DecodeResult {
    Ok(image::open(path)?.to_rgba8())
}

/// Decodes an encoded image held in memory into RGBA8 pixels.
pub fn decode_bytes(bytes: &[u8]) -> DecodeResult {
    Ok(image::load_from_memory(bytes)?.to_rgba8())
}

/// Where a texture's image comes from.
#[derive(Clone, PartialEq)]
pub enum TextureSource {
    /// An image file read at load time.
    File(PathBuf),
    /// An encoded image compiled into the binary.
    Embedded(&'static [u8]),
}

impl Default for TextureSource {
    fn default() -> Self {
        TextureSource::Embedded(DEFAULT_TEXTURE_PNG)
    }
}

impl fmt::Debug for TextureSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextureSource::File(path) => f.debug_tuple("File").field(path).finish(),
            TextureSource::Embedded(bytes) => write!(f, "Embedded({} bytes)", bytes.len()),
        }
    }
}

/// Creates textures that start as a placeholder and fill in asynchronously.
pub struct TextureLoader;

impl TextureLoader {
    /// Returns a placeholder texture immediately and decodes `source` in the background.
    pub fn load<S: Surface>(
        surface: &Arc<S>,
        source: &TextureSource,
    ) -> Result<Texture<S>, PipelineError> {
        match source {
            TextureSource::File(path) => {
                let owned = path.clone();
                Self::load_with(surface, path.display().to_string(), move || {
                    decode_file(&owned)
                })
            }
            TextureSource::Embedded(bytes) => {
                let bytes: &'static [u8] = *bytes;
                Self::load_with(surface, "embedded image", move || decode_bytes(bytes))
            }
        }
    }

    /// Like [`TextureLoader::load`], with a caller supplied decoder. `label` is used in logs.
    pub fn load_with<S, F>(
        surface: &Arc<S>,
        label: impl Into<String>,
        decode: F,
    ) -> Result<Texture<S>, PipelineError>
    where
        S: Surface,
        F: FnOnce() -> DecodeResult + Send + 'static,
    {
        let id = surface
            .create_texture()
            .map_err(|e| PipelineError::allocation("texture", e))?;

        surface.bind_texture(Some(id));
        surface.tex_image_rgba(1, 1, &PLACEHOLDER_PIXEL);

        let label = label.into();
        log::debug!("Created placeholder texture for {label}");

        let (sender, receiver) = mpsc::sync_channel(1);
        rayon::spawn(move || {
            // The receiver is gone if the texture was dropped first.
            let _ = sender.send(decode());
        });

        Ok(Texture {
            surface: Arc::clone(surface),
            id,
            label,
            status: TextureStatus::Placeholder,
            pending: Some(receiver),
        })
    }
}
