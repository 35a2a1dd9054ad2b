use thiserror::Error;

/// Rejected terrain configuration. Raised at construction, never mid-pan.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{field} dimension {axis}={value} must be odd so a lattice point sits on the origin")]
    EvenFieldDimension {
        field: &'static str,
        axis: &'static str,
        value: u32,
    },

    #[error("{field} dimension {axis}={value} is too small (minimum 3)")]
    FieldTooSmall {
        field: &'static str,
        axis: &'static str,
        value: u32,
    },

    #[error("grid {w}x{h} is too small (each side needs at least 2 vertices)")]
    GridTooSmall { w: u32, h: u32 },

    #[error("grid {w}x{h} has more vertices than a u32 index buffer can address")]
    GridTooLarge { w: u32, h: u32 },

    #[error("blend proportion {0} is outside [0, 1]")]
    ProportionOutOfRange(f64),

    #[error("{name} must be finite, got {value}")]
    NonFinite { name: &'static str, value: f64 },

    #[error("unknown terrain type {0} (expected 1 = simple, 2 = bipartite)")]
    UnknownKind(u8),
}

/// Failure loading a terrain map file.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("could not read map: {0}")]
    Io(#[from] std::io::Error),

    #[error("map is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid map: {0}")]
    Config(#[from] ConfigError),
}
