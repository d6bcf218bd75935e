use crate::error::AssetError;
use crate::objects::texture::{SharedTexture, Texture};
use ab_glyph::FontArc;
use std::path::{Path, PathBuf};
use std::thread::JoinHandle;

/// Resolves a relative asset path against the working directory, then the
/// crate root.
pub fn asset_path(relative: &str) -> PathBuf {
    let local = PathBuf::from(relative);
    if local.exists() {
        return local;
    }
    Path::new(env!("CARGO_MANIFEST_DIR")).join(relative)
}

pub fn read_texture(path: &Path) -> Result<Texture, AssetError> {
    let bytes = std::fs::read(path).map_err(|source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let image = image::load_from_memory(&bytes).map_err(|source| AssetError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(image.to_rgba8())
}

/// Starts texture decodes on background threads.
///
/// Each load hands back a placeholder slot immediately; the decoded image is
/// swapped in when ready. Failed loads keep the placeholder.
#[derive(Default)]
pub struct TextureLoader {
    pending: Vec<JoinHandle<()>>,
}

impl TextureLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&mut self, path: impl Into<PathBuf>) -> SharedTexture {
        let path = path.into();
        let slot = SharedTexture::placeholder();
        let target = slot.clone();

        let spawned = std::thread::Builder::new()
            .name(format!("texture-loader:{}", path.display()))
            .spawn(move || match read_texture(&path) {
                Ok(texture) => {
                    tracing::info!(path = %path.display(), width = texture.width(), height = texture.height(), "texture loaded");
                    target.replace(texture);
                }
                Err(e) => tracing::warn!("{e}; keeping placeholder"),
            });

        match spawned {
            Ok(handle) => self.pending.push(handle),
            Err(e) => tracing::warn!("could not start texture loader thread: {e}"),
        }
        slot
    }

    /// Number of loads still running.
    pub fn in_flight(&mut self) -> usize {
        self.pending.retain(|h| !h.is_finished());
        self.pending.len()
    }

    /// Blocks until every started load has finished.
    pub fn wait(&mut self) {
        for handle in self.pending.drain(..) {
            if handle.join().is_err() {
                tracing::warn!("texture loader thread panicked");
            }
        }
    }
}

pub fn read_font(path: &Path) -> Result<FontArc, AssetError> {
    let bytes = std::fs::read(path).map_err(|source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    FontArc::try_from_vec(bytes).map_err(|source| AssetError::Font {
        path: path.to_path_buf(),
        source,
    })
}

/// Monospace font shipped with egui.
pub fn fallback_font() -> FontArc {
    FontArc::try_from_slice(epaint_default_fonts::HACK_REGULAR).expect("bundled font is valid")
}

/// Loads the clock font, falling back to the bundled monospace font.
pub fn load_font_or_fallback(path: &Path) -> FontArc {
    match read_font(path) {
        Ok(font) => font,
        Err(e) => {
            tracing::warn!("{e}; using bundled monospace font");
            fallback_font()
        }
    }
}
