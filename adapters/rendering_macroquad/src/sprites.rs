use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use chess_with_guns_rendering::{AssetCatalog, AssetKey, Color};
use glam::Vec2;
use macroquad::{
    math::Vec2 as MacroquadVec2,
    texture::{self, DrawTextureParams, Texture2D},
};

use crate::to_macroquad_color;

const SUPPORTED_MANIFEST_VERSION: u32 = 1;

/// Parameters describing how a sprite should be drawn on screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct DrawParams {
    /// Position in screen-space pixels where the sprite's top-left corner is placed.
    pub(crate) position: Vec2,
    /// Desired size in screen-space pixels.
    pub(crate) scale: Vec2,
    /// Rotation applied around the computed pivot, in radians.
    pub(crate) rotation_radians: f32,
    /// Pivot expressed in normalised sprite coordinates (0.0..=1.0).
    pub(crate) pivot: Vec2,
    pub(crate) tint: Color,
}

impl DrawParams {
    pub(crate) fn new(position: Vec2, scale: Vec2) -> Self {
        Self {
            position,
            scale,
            rotation_radians: 0.0,
            pivot: Vec2::splat(0.5),
            tint: Color::new(1.0, 1.0, 1.0, 1.0),
        }
    }

    pub(crate) fn with_rotation(mut self, rotation_radians: f32) -> Self {
        self.rotation_radians = rotation_radians;
        self
    }

    pub(crate) fn with_pivot(mut self, pivot: Vec2) -> Self {
        self.pivot = pivot;
        self
    }
}

/// Cache of textures loaded from the sprite manifest.
#[derive(Debug)]
pub(crate) struct SpriteAtlas {
    textures: HashMap<AssetKey, Texture2D>,
}

impl SpriteAtlas {
    /// Loads sprites from the manifest located at the provided path.
    pub(crate) fn from_manifest_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_manifest_with_loader(path, default_loader)
    }

    /// Draws the requested sprite using the supplied parameters.
    pub(crate) fn draw(&self, key: AssetKey, params: DrawParams) -> Result<()> {
        let texture = *self
            .resolve(key)
            .with_context(|| format!("sprite {} missing from atlas", key.name()))?;

        let dest_size = MacroquadVec2::new(params.scale.x, params.scale.y);
        let pivot = MacroquadVec2::new(
            params.position.x + params.pivot.x * dest_size.x,
            params.position.y + params.pivot.y * dest_size.y,
        );

        let draw_params = DrawTextureParams {
            dest_size: Some(dest_size),
            rotation: params.rotation_radians,
            pivot: Some(pivot),
            ..DrawTextureParams::default()
        };

        texture::draw_texture_ex(
            texture,
            params.position.x,
            params.position.y,
            to_macroquad_color(params.tint),
            draw_params,
        );

        Ok(())
    }

    /// Returns the number of textures stored in the atlas.
    pub(crate) fn texture_count(&self) -> usize {
        self.textures.len()
    }

    fn from_manifest_with_loader(
        path: impl AsRef<Path>,
        mut loader: impl FnMut(AssetKey, &Path) -> Result<Texture2D>,
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
        entries: Vec<(AssetKey, PathBuf)>,
        loader: &mut impl FnMut(AssetKey, &Path) -> Result<Texture2D>,
    ) -> Result<Self> {
        let mut textures = HashMap::with_capacity(entries.len());
        for (key, path) in entries {
            let texture = loader(key, &path).with_context(|| {
                format!("failed to load sprite {} from {}", key.name(), path.display())
            })?;
            if textures.insert(key, texture).is_some() {
                bail!("duplicate sprite entry for {}", key.name());
            }
        }
        Ok(Self { textures })
    }
}

impl AssetCatalog for SpriteAtlas {
    type Asset = Texture2D;

    fn resolve(&self, key: AssetKey) -> Option<&Texture2D> {
        self.textures.get(&key)
    }
}

fn default_loader(_key: AssetKey, path: &Path) -> Result<Texture2D> {
    let bytes = fs::read(path)
        .with_context(|| format!("failed to read sprite asset at {}", path.display()))?;
    Ok(Texture2D::from_file_with_format(&bytes, None))
}

#[derive(Debug, serde::Deserialize)]
struct Manifest {
    version: u32,
    sprites: HashMap<String, String>,
}

/// Resolves manifest entries in [`AssetKey::all`] order.
///
/// Every known asset must be listed exactly once; unknown names are rejected.
fn parse_manifest(contents: &str, base_path: &Path) -> Result<Vec<(AssetKey, PathBuf)>> {
    let manifest: Manifest =
        toml::from_str(contents).context("failed to parse sprite manifest toml contents")?;
    if manifest.version != SUPPORTED_MANIFEST_VERSION {
        bail!(
            "unsupported sprite manifest version {}; expected {}",
            manifest.version,
            SUPPORTED_MANIFEST_VERSION
        );
    }

    let mut resolved = HashMap::new();
    for (name, relative_path) in manifest.sprites {
        let key = AssetKey::from_name(&name)
            .with_context(|| format!("unknown sprite key `{name}` in manifest"))?;
        let _ = resolved.insert(key, base_path.join(relative_path));
    }

    let mut ordered = Vec::with_capacity(resolved.len());
    for key in AssetKey::all() {
        let Some(path) = resolved.remove(&key) else {
            bail!("sprite manifest missing entry for {}", key.name());
        };
        ordered.push((key, path));
    }

    Ok(ordered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_with_guns_core::{PickupKind, PieceColor, PieceKind, PieceRole, WeaponKind};
    use std::{cell::RefCell, fmt::Write as _, path::Path};

    fn full_manifest() -> String {
        let mut manifest = String::from("version = 1\n\n[sprites]\n");
        for key in AssetKey::all() {
            let name = key.name();
            writeln!(manifest, "{name} = \"sprites/{name}.png\"").expect("write to string");
        }
        manifest
    }

    #[test]
    fn parse_manifest_requires_all_known_keys() {
        let manifest = r#"
            version = 1

            [sprites]
            WhitePawn = "WhitePawn.png"
            BlackPawn = "BlackPawn.png"
        "#;

        let result = parse_manifest(manifest, Path::new("assets"));
        assert!(result.is_err(), "manifest missing most sprites should fail");
    }

    #[test]
    fn manifest_rejects_unknown_keys() {
        let manifest = full_manifest() + "Extra = \"extra.png\"\n";

        let result = parse_manifest(&manifest, Path::new("assets"));
        assert!(result.is_err(), "unknown keys must be rejected");
    }

    #[test]
    fn manifest_rejects_other_versions() {
        let manifest = full_manifest().replace("version = 1", "version = 2");

        assert!(parse_manifest(&manifest, Path::new("assets")).is_err());
    }

    #[test]
    fn manifest_resolves_paths_relative_to_base_directory() {
        let parsed =
            parse_manifest(&full_manifest(), Path::new("root")).expect("manifest should parse");

        assert_eq!(parsed.len(), AssetKey::all().len());
        let knight = AssetKey::Piece(PieceKind::new(PieceColor::Black, PieceRole::Knight));
        assert!(parsed.contains(&(knight, PathBuf::from("root/sprites/BlackKnight.png"))));
        assert!(parsed.contains(&(
            AssetKey::Pickup(PickupKind::Health),
            PathBuf::from("root/sprites/HealthPickup.png")
        )));
        assert!(parsed.contains(&(
            AssetKey::Weapon(WeaponKind::ScienceGun),
            PathBuf::from("root/sprites/ScienceGun.png")
        )));
    }

    #[test]
    fn atlas_loads_textures_using_deterministic_order() {
        let entries = parse_manifest(&full_manifest(), Path::new("assets"))
            .expect("manifest should parse into canonical order");
        let load_order = RefCell::new(Vec::new());
        let atlas = SpriteAtlas::from_entries(entries, &mut |key, _| {
            load_order.borrow_mut().push(key);
            Ok(Texture2D::empty())
        })
        .expect("atlas should load using provided loader");

        assert_eq!(load_order.borrow().as_slice(), AssetKey::all().as_slice());
        assert_eq!(atlas.texture_count(), AssetKey::all().len());
        for key in AssetKey::all() {
            assert!(atlas.resolve(key).is_some());
        }
    }

    #[test]
    fn loader_failures_abort_loading() {
        let entries = vec![(AssetKey::Pickup(PickupKind::Ammo), PathBuf::from("ammo.png"))];
        let result = SpriteAtlas::from_entries(entries, &mut |_, _| bail!("missing file"));

        assert!(result.is_err());
    }
}
