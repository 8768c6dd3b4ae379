//! Image registry
//!
//! Holds decoded RGBA images keyed by [`ImageId`]. Every lookup succeeds: an
//! image that failed to load is replaced by a solid placeholder of its nominal
//! size, so the simulation and renderer never have to handle a missing sprite.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::AssetError;

pub const TURN_FRAMES: u8 = 5;
pub const COIN_FRAMES: u8 = 23;
pub const ENEMY_FRAMES: u8 = 45;
pub const EXPLOSION_FRAMES: u8 = 28;

/// Placeholder fill (magenta, fully opaque)
const PLACEHOLDER_RGBA: [u8; 4] = [255, 0, 255, 255];

/// Every image the game knows how to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageId {
    Helicopter,
    HelicopterLeft,
    Missile,
    CaveStart,
    CavePlay,
    Mist,
    AlienSpit,
    Ground,
    GroundIntro,
    GroundEaster,
    Logo,
    Turn(u8),
    Coin(u8),
    Enemy(u8),
    Explosion(u8),
}

impl ImageId {
    /// Every image in load order
    pub fn all() -> Vec<ImageId> {
        let mut ids = vec![
            ImageId::Helicopter,
            ImageId::HelicopterLeft,
            ImageId::Missile,
            ImageId::CaveStart,
            ImageId::CavePlay,
            ImageId::Mist,
            ImageId::AlienSpit,
            ImageId::Ground,
            ImageId::GroundIntro,
            ImageId::GroundEaster,
            ImageId::Logo,
        ];
        ids.extend((0..TURN_FRAMES).map(ImageId::Turn));
        ids.extend((0..ENEMY_FRAMES).map(ImageId::Enemy));
        ids.extend((0..EXPLOSION_FRAMES).map(ImageId::Explosion));
        ids.extend((0..COIN_FRAMES).map(ImageId::Coin));
        ids
    }

    /// Path relative to the asset root
    pub fn path(&self) -> String {
        match self {
            ImageId::Helicopter => "images/helicoptero_alpha.png".into(),
            ImageId::HelicopterLeft => "images/helicoptero_left_alpha.png".into(),
            ImageId::Missile => "images/missile_fixed.png".into(),
            ImageId::CaveStart => "images/cave_bg_v2.png".into(),
            ImageId::CavePlay => "images/cave_bg_huge.png".into(),
            ImageId::Mist => "images/mist_texture.png".into(),
            ImageId::AlienSpit => "images/alien-spit.png".into(),
            ImageId::Ground => "images/ground_v4.png".into(),
            ImageId::GroundIntro => "images/ground_intro.png".into(),
            ImageId::GroundEaster => "images/ground_easter.png".into(),
            ImageId::Logo => "images/logo_v5.png".into(),
            ImageId::Turn(i) => format!("images/turn/{:02}.png", i + 1),
            ImageId::Coin(i) => format!("images/coin/coin_{:06}.png", i),
            ImageId::Enemy(i) => format!("images/enemy01/{:06}.png", i),
            ImageId::Explosion(i) => format!("images/explosion-enemy01/{:04}.png", i + 1),
        }
    }

    /// Size used when the real image is unavailable
    pub fn nominal_size(&self) -> (u32, u32) {
        match self {
            ImageId::Helicopter | ImageId::HelicopterLeft => (600, 112),
            ImageId::Missile => (430, 425),
            ImageId::CaveStart => (960, 540),
            ImageId::CavePlay => (1024, 512),
            ImageId::Mist => (512, 256),
            ImageId::AlienSpit => (60, 30),
            ImageId::Ground | ImageId::GroundIntro => (512, 256),
            ImageId::GroundEaster => (400, 400),
            ImageId::Logo => (463, 160),
            ImageId::Turn(_) => (150, 112),
            ImageId::Coin(_) => (64, 64),
            ImageId::Enemy(_) => (166, 166),
            ImageId::Explosion(_) => (64, 64),
        }
    }
}

/// A decoded RGBA8 image
#[derive(Debug, Clone, PartialEq)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    /// Row-major RGBA8, `width * height * 4` bytes
    pub rgba: Vec<u8>,
}

impl ImageData {
    /// Wrap raw RGBA bytes. Short buffers are zero-padded (fully transparent).
    pub fn from_rgba(width: u32, height: u32, mut rgba: Vec<u8>) -> Self {
        rgba.resize((width * height * 4) as usize, 0);
        Self { width, height, rgba }
    }

    /// Solid single-color image
    pub fn solid(width: u32, height: u32, color: [u8; 4]) -> Self {
        let rgba = color
            .iter()
            .copied()
            .cycle()
            .take((width * height * 4) as usize)
            .collect();
        Self { width, height, rgba }
    }

    /// Build from a per-pixel alpha function (color is white)
    pub fn from_alpha_fn(width: u32, height: u32, alpha: impl Fn(u32, u32) -> u8) -> Self {
        let mut rgba = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                rgba.extend_from_slice(&[255, 255, 255, alpha(x, y)]);
            }
        }
        Self { width, height, rgba }
    }

    /// Decode PNG bytes
    pub fn decode(name: &str, bytes: &[u8]) -> Result<Self, AssetError> {
        let img = image::load_from_memory(bytes).map_err(|source| AssetError::Decode {
            name: name.to_string(),
            source,
        })?;
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(Self {
            width,
            height,
            rgba: rgba.into_raw(),
        })
    }

    /// Alpha at a pixel, 0 when out of range
    pub fn alpha(&self, x: u32, y: u32) -> u8 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        self.rgba[((y * self.width + x) * 4 + 3) as usize]
    }

    pub fn size(&self) -> (f32, f32) {
        (self.width as f32, self.height as f32)
    }
}

/// Loaded images plus bookkeeping about which ones are placeholders
#[derive(Debug, Clone, Default)]
pub struct Assets {
    images: HashMap<ImageId, ImageData>,
    placeholders: HashSet<ImageId>,
}

impl Assets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every image replaced by its placeholder (headless runs and tests)
    pub fn placeholders() -> Self {
        let mut assets = Self::new();
        for id in ImageId::all() {
            assets.insert_placeholder(id);
        }
        assets
    }

    pub fn insert(&mut self, id: ImageId, image: ImageData) {
        self.placeholders.remove(&id);
        self.images.insert(id, image);
    }

    /// Store a load result, substituting a placeholder on failure
    pub fn accept(&mut self, id: ImageId, result: Result<ImageData, AssetError>) {
        match result {
            Ok(image) => self.insert(id, image),
            Err(e) => {
                log::warn!("{e}; using placeholder");
                self.insert_placeholder(id);
            }
        }
    }

    fn insert_placeholder(&mut self, id: ImageId) {
        let (w, h) = id.nominal_size();
        self.images.insert(id, ImageData::solid(w, h, PLACEHOLDER_RGBA));
        self.placeholders.insert(id);
    }

    /// Look up an image. Unknown ids yield a 1x1 placeholder.
    pub fn image(&self, id: ImageId) -> std::borrow::Cow<'_, ImageData> {
        match self.images.get(&id) {
            Some(img) => std::borrow::Cow::Borrowed(img),
            None => {
                let (w, h) = id.nominal_size();
                std::borrow::Cow::Owned(ImageData::solid(w, h, PLACEHOLDER_RGBA))
            }
        }
    }

    /// Image dimensions without cloning pixel data
    pub fn size(&self, id: ImageId) -> (f32, f32) {
        match self.images.get(&id) {
            Some(img) => img.size(),
            None => {
                let (w, h) = id.nominal_size();
                (w as f32, h as f32)
            }
        }
    }

    pub fn is_placeholder(&self, id: ImageId) -> bool {
        self.placeholders.contains(&id) || !self.images.contains_key(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ImageId, &ImageData)> {
        self.images.iter()
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Load every image from a directory (native only)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_dir(root: &std::path::Path, on_progress: impl FnMut(u32)) -> Self {
        let mut loader = AssetLoader::new(on_progress);
        for id in ImageId::all() {
            let name = id.path();
            let result = std::fs::read(root.join(&name))
                .map_err(|e| AssetError::Io {
                    name: name.clone(),
                    message: e.to_string(),
                })
                .and_then(|bytes| ImageData::decode(&name, &bytes));
            loader.accept(id, result);
        }
        loader.finish()
    }
}

/// Tracks load progress across all images and reports whole percents
pub struct AssetLoader<F: FnMut(u32)> {
    assets: Assets,
    total: usize,
    loaded: usize,
    last_percent: Option<u32>,
    on_progress: F,
}

impl<F: FnMut(u32)> AssetLoader<F> {
    pub fn new(on_progress: F) -> Self {
        Self {
            assets: Assets::new(),
            total: ImageId::all().len(),
            loaded: 0,
            last_percent: None,
            on_progress,
        }
    }

    /// Record one finished load (success or failure both count)
    pub fn accept(&mut self, id: ImageId, result: Result<ImageData, AssetError>) {
        self.assets.accept(id, result);
        self.loaded = (self.loaded + 1).min(self.total);
        let percent = (self.loaded * 100 / self.total.max(1)) as u32;
        if self.last_percent != Some(percent) {
            self.last_percent = Some(percent);
            (self.on_progress)(percent);
        }
    }

    pub fn is_complete(&self) -> bool {
        self.loaded >= self.total
    }

    pub fn finish(self) -> Assets {
        let placeholders = self.assets.placeholders.len();
        log::info!(
            "Assets loaded: {} images ({} placeholders)",
            self.assets.len(),
            placeholders
        );
        self.assets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_ids_unique_paths() {
        let ids = ImageId::all();
        let paths: HashSet<String> = ids.iter().map(|id| id.path()).collect();
        assert_eq!(paths.len(), ids.len());
        assert_eq!(
            ids.len(),
            11 + (TURN_FRAMES + COIN_FRAMES + ENEMY_FRAMES + EXPLOSION_FRAMES) as usize
        );
    }

    #[test]
    fn test_paths_match_shipped_asset_layout() {
        assert_eq!(
            ImageId::Explosion(0).path(),
            "images/explosion-enemy01/0001.png"
        );
        assert_eq!(
            ImageId::Explosion(EXPLOSION_FRAMES - 1).path(),
            "images/explosion-enemy01/0028.png"
        );
        assert_eq!(ImageId::Enemy(44).path(), "images/enemy01/000044.png");
        assert_eq!(ImageId::Coin(0).path(), "images/coin/coin_000000.png");
        assert_eq!(ImageId::Turn(0).path(), "images/turn/01.png");
        assert_eq!(ImageId::Helicopter.path(), "images/helicoptero_alpha.png");
        assert_eq!(ImageId::AlienSpit.path(), "images/alien-spit.png");
    }

    #[test]
    fn test_failed_load_substitutes_placeholder() {
        let mut assets = Assets::new();
        assets.accept(ImageId::Logo, Err(AssetError::Missing("logo".into())));
        assert!(assets.is_placeholder(ImageId::Logo));
        assert_eq!(assets.size(ImageId::Logo), (463.0, 160.0));
        assert_eq!(assets.image(ImageId::Logo).alpha(0, 0), 255);
    }

    #[test]
    fn test_decode_garbage_is_error() {
        assert!(ImageData::decode("junk", &[1, 2, 3]).is_err());
    }

    #[test]
    fn test_alpha_out_of_range_is_zero() {
        let img = ImageData::solid(2, 2, [0, 0, 0, 255]);
        assert_eq!(img.alpha(1, 1), 255);
        assert_eq!(img.alpha(2, 0), 0);
        assert_eq!(img.alpha(0, 5), 0);
    }

    #[test]
    fn test_loader_progress_reaches_100() {
        let mut seen = Vec::new();
        let mut loader = AssetLoader::new(|p| seen.push(p));
        for id in ImageId::all() {
            loader.accept(id, Ok(ImageData::solid(1, 1, [0; 4])));
        }
        assert!(loader.is_complete());
        let assets = loader.finish();
        assert_eq!(assets.len(), ImageId::all().len());
        assert_eq!(seen.last(), Some(&100));
        assert!(seen.windows(2).all(|w| w[0] < w[1]));
    }
}
