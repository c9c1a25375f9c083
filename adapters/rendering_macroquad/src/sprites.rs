use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use glam::Vec2;
use macroquad::{
    math::Vec2 as MacroquadVec2,
    texture::{self, DrawTextureParams, Texture2D},
};
use snake_arcade_core::SpriteKind;
use snake_arcade_rendering::{Color, SpriteSource};

use crate::to_macroquad_color;

const SUPPORTED_MANIFEST_VERSION: u32 = 1;

/// Parameters describing how a sprite should be drawn on screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct DrawParams {
    /// Centre of the sprite in screen-space pixels.
    pub(crate) center: Vec2,
    /// Desired size in screen-space pixels.
    pub(crate) size: Vec2,
    /// Clockwise rotation around the centre, in radians.
    pub(crate) rotation_radians: f32,
    /// Tint applied to the sprite.
    pub(crate) tint: Color,
}

impl DrawParams {
    /// Creates draw parameters centred on `center` with the provided size.
    #[must_use]
    pub(crate) fn new(center: Vec2, size: Vec2) -> Self {
        Self {
            center,
            size,
            rotation_radians: 0.0,
            tint: Color::new(1.0, 1.0, 1.0, 1.0),
        }
    }

    /// Overrides the rotation applied when drawing the sprite.
    #[must_use]
    pub(crate) fn with_rotation(mut self, rotation_radians: f32) -> Self {
        self.rotation_radians = rotation_radians;
        self
    }

    /// Top-left corner of the destination rectangle.
    #[must_use]
    pub(crate) fn top_left(&self) -> Vec2 {
        self.center - self.size * 0.5
    }
}

/// Cache of textures loaded from the sprite manifest.
#[derive(Debug)]
pub(crate) struct SpriteAtlas {
    textures: HashMap<SpriteKind, Texture2D>,
}

impl SpriteAtlas {
    /// Loads sprites from the manifest located at the provided path.
    pub(crate) fn from_manifest_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_manifest_with_loader(path, default_loader)
    }

    /// Draws the requested sprite. Returns `false` when the atlas lacks it.
    pub(crate) fn draw(&self, kind: SpriteKind, params: DrawParams) -> bool {
        let Some(texture) = self.textures.get(&kind).copied() else {
            return false;
        };

        let top_left = params.top_left();
        let draw_params = DrawTextureParams {
            dest_size: Some(MacroquadVec2::new(params.size.x, params.size.y)),
            rotation: params.rotation_radians,
            pivot: Some(MacroquadVec2::new(params.center.x, params.center.y)),
            ..DrawTextureParams::default()
        };

        texture::draw_texture_ex(
            texture,
            top_left.x,
            top_left.y,
            to_macroquad_color(params.tint),
            draw_params,
        );
        true
    }

    /// Returns the number of textures stored in the atlas.
    #[must_use]
    pub(crate) fn texture_count(&self) -> usize {
        self.textures.len()
    }

    fn from_manifest_with_loader(
        path: impl AsRef<Path>,
        mut loader: impl FnMut(SpriteKind, &SpriteSource) -> Result<Texture2D>,
    ) -> Result<Self> {
        let manifest_path = path.as_ref();
        let contents = fs::read_to_string(manifest_path).with_context(|| {
            format!(
                "failed to read sprite manifest at {}",
                manifest_path.display()
            )
        })?;
        let base = manifest_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let entries = parse_manifest(&contents, &base)?;
        Self::from_entries(entries, &mut loader)
    }

    fn from_entries(
        entries: Vec<(SpriteKind, SpriteSource)>,
        loader: &mut impl FnMut(SpriteKind, &SpriteSource) -> Result<Texture2D>,
    ) -> Result<Self> {
        let textures = entries
            .into_iter()
            .map(|(kind, source)| {
                loader(kind, &source)
                    .map(|texture| (kind, texture))
                    .with_context(|| format!("cannot load {kind:?} sprite from {source:?}"))
            })
            .collect::<Result<HashMap<_, _>>>()?;
        Ok(Self { textures })
    }
}

fn default_loader(_kind: SpriteKind, source: &SpriteSource) -> Result<Texture2D> {
    let bytes = source
        .load()
        .with_context(|| format!("failed to read sprite asset {source:?}"))?;
    Ok(Texture2D::from_file_with_format(&bytes, None))
}

/// Manifest key naming each sprite kind.
const SPRITE_KEYS: [(SpriteKind, &str); 3] = [
    (SpriteKind::SnakeHead, "SnakeHead"),
    (SpriteKind::SnakeBody, "SnakeBody"),
    (SpriteKind::Food, "Food"),
];

/// On-disk sprite manifest: a version and one entry per sprite key.
#[derive(Debug, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct Manifest {
    version: u32,
    sprites: HashMap<String, ManifestEntry>,
}

#[derive(Debug, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct ManifestEntry {
    path: Option<PathBuf>,
}

impl Manifest {
    /// Resolves every image path against `base`, in [`SPRITE_KEYS`] order.
    fn resolve(mut self, base: &Path) -> Result<Vec<(SpriteKind, SpriteSource)>> {
        if self.version != SUPPORTED_MANIFEST_VERSION {
            bail!(
                "unsupported sprite manifest version {} (expected {SUPPORTED_MANIFEST_VERSION})",
                self.version
            );
        }

        let mut resolved = Vec::with_capacity(SPRITE_KEYS.len());
        let mut missing = Vec::new();
        for (kind, key) in SPRITE_KEYS {
            let Some(entry) = self.sprites.remove(key) else {
                missing.push(key);
                continue;
            };
            let source = SpriteSource::new(None, entry.path.map(|relative| base.join(relative)))
                .map_err(anyhow::Error::new)
                .with_context(|| format!("sprite `{key}` has no image"))?;
            resolved.push((kind, source));
        }

        if let Some(unknown) = self.sprites.keys().min() {
            bail!("unknown sprite key `{unknown}` in manifest");
        }
        if !missing.is_empty() {
            bail!("sprite manifest lacks {}", missing.join(", "));
        }
        Ok(resolved)
    }
}

fn parse_manifest(contents: &str, base_path: &Path) -> Result<Vec<(SpriteKind, SpriteSource)>> {
    let manifest: Manifest =
        toml::from_str(contents).context("sprite manifest is not valid toml")?;
    manifest.resolve(base_path)
}
