use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::grid::GridSize;

pub use crate::error::{ConfigError, LoadError};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TerrainKind {
    #[default]
    Simple,
    Bipartite,
}

/// Everything needed to build a terrain besides the grid size.
///
/// Field dimensions are lattice extents and must be odd. The second field is
/// only read for [`TerrainKind::Bipartite`].
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TerrainConfig {
    pub kind: TerrainKind,

    // Macro (or only) field
    pub seed1: i32,
    pub width1: u32,
    pub height1: u32,

    // Micro field
    pub seed2: i32,
    pub width2: u32,
    pub height2: u32,

    /// Overall height scale.
    pub magnitude: f64,
    /// Macro share of the bipartite blend.
    pub prop: f64,
    /// Added to the noise before scaling; 1.5 keeps heights non-negative.
    pub lift: f64,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            kind: TerrainKind::Simple,
            seed1: 43,
            width1: 7,
            height1: 7,
            seed2: 97,
            width2: 27,
            height2: 27,
            magnitude: 1.0,
            prop: 0.89,
            lift: 0.0,
        }
    }
}

impl TerrainConfig {
    pub fn validate(&self, grid: GridSize) -> Result<(), ConfigError> {
        check_field("field 1", self.width1, self.height1)?;
        if self.kind == TerrainKind::Bipartite {
            check_field("field 2", self.width2, self.height2)?;
            check_prop(self.prop)?;
        }
        check_finite("magnitude", self.magnitude)?;
        check_finite("lift", self.lift)?;
        check_grid(grid)
    }
}

/// Field extents must be odd and at least 3.
pub fn check_field(field: &'static str, w: u32, h: u32) -> Result<(), ConfigError> {
    for (axis, value) in [("width", w), ("height", h)] {
        if value < 3 {
            return Err(ConfigError::FieldTooSmall { field, axis, value });
        }
        if value % 2 == 0 {
            return Err(ConfigError::EvenFieldDimension { field, axis, value });
        }
    }
    Ok(())
}

pub fn check_finite(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite { name, value })
    }
}

pub fn check_prop(prop: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&prop) {
        Ok(())
    } else {
        Err(ConfigError::ProportionOutOfRange(prop))
    }
}

/// At least 2x2, and every vertex addressable by a `u32` index.
pub fn check_grid(grid: GridSize) -> Result<(), ConfigError> {
    if grid.w < 2 || grid.h < 2 {
        return Err(ConfigError::GridTooSmall { w: grid.w, h: grid.h });
    }
    if grid.w as u64 * grid.h as u64 > u32::MAX as u64 {
        return Err(ConfigError::GridTooLarge { w: grid.w, h: grid.h });
    }
    Ok(())
}

/// Resolve a CLI map argument. A bare name with no extension is looked up
/// as `maps/<name>.json`; anything else is taken as a path.
pub fn map_path(arg: &str) -> PathBuf {
    let path = Path::new(arg);
    if path.extension().is_none() && path.parent().is_none_or(|p| p.as_os_str().is_empty()) {
        Path::new("maps").join(format!("{arg}.json"))
    } else {
        path.to_path_buf()
    }
}

/// On-disk map format (`maps/<name>.json`). `typ` 1 is a simple terrain,
/// 2 a bipartite one; absent keys take the [`TerrainConfig`] defaults.
#[derive(Clone, Debug, Deserialize)]
pub struct TerrainMap {
    pub typ: u8,
    pub gradient_width_b1: Option<u32>,
    pub gradient_height_b1: Option<u32>,
    pub gradient_width_b2: Option<u32>,
    pub gradient_height_b2: Option<u32>,
    pub seed1: Option<i32>,
    pub seed2: Option<i32>,
    pub m: Option<f64>,
    pub prop: Option<f64>,
    pub lift: Option<f64>,
}

impl TryFrom<TerrainMap> for TerrainConfig {
    type Error = ConfigError;

    fn try_from(map: TerrainMap) -> Result<Self, Self::Error> {
        let kind = match map.typ {
            1 => TerrainKind::Simple,
            2 => TerrainKind::Bipartite,
            other => return Err(ConfigError::UnknownKind(other)),
        };
        let d = TerrainConfig::default();
        Ok(TerrainConfig {
            kind,
            seed1: map.seed1.unwrap_or(d.seed1),
            width1: map.gradient_width_b1.unwrap_or(d.width1),
            height1: map.gradient_height_b1.unwrap_or(d.height1),
            seed2: map.seed2.unwrap_or(d.seed2),
            width2: map.gradient_width_b2.unwrap_or(d.width2),
            height2: map.gradient_height_b2.unwrap_or(d.height2),
            magnitude: map.m.unwrap_or(d.magnitude),
            prop: map.prop.unwrap_or(d.prop),
            lift: map.lift.unwrap_or(d.lift),
        })
    }
}

impl TerrainMap {
    pub fn from_json_str(s: &str) -> Result<TerrainConfig, LoadError> {
        let map: TerrainMap = serde_json::from_str(s)?;
        Ok(TerrainConfig::try_from(map)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<TerrainConfig, LoadError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}
