use tracing::info;

use crate::config::{
    ConfigError, TerrainConfig, TerrainKind, check_field, check_finite, check_grid,
};
use crate::gradient::GradientField;
use crate::grid::GridSize;
use crate::mesh::SurfaceMesh;
use crate::sampler::NoiseSampler;
use crate::scroll::{HeightSource, PanStats, ScrollController, ScrollState};

/// Noise scaled into vertex heights: `magnitude * (noise + lift)`.
#[derive(Clone, Copy, Debug)]
pub struct Heightfield {
    pub sampler: NoiseSampler,
    pub magnitude: f64,
    pub lift: f64,
}

impl HeightSource for Heightfield {
    #[inline]
    fn height_at(&self, gx: i64, gy: i64) -> f32 {
        (self.magnitude * (self.sampler.sample(gx, gy) + self.lift)) as f32
    }
}

/// A pannable terrain surface.
pub trait Terrain: Send {
    fn mesh(&self) -> &SurfaceMesh;

    /// Discard the current window and rebuild it at zero displacement.
    fn build_initial_mesh(&mut self);

    fn move_up(&mut self, amount: i32) -> PanStats;
    fn move_down(&mut self, amount: i32) -> PanStats;
    fn move_left(&mut self, amount: i32) -> PanStats;
    fn move_right(&mut self, amount: i32) -> PanStats;

    fn pan_to(&mut self, x_disp: i64, y_disp: i64) -> PanStats;
    fn recenter(&mut self, x_disp: i64, y_disp: i64) -> PanStats;
    fn displacement(&self) -> ScrollState;
}

macro_rules! impl_terrain {
    ($ty:ty) => {
        impl Terrain for $ty {
            fn mesh(&self) -> &SurfaceMesh {
                self.scroll.mesh()
            }

            fn build_initial_mesh(&mut self) {
                self.scroll = controller(*self.scroll.source(), self.scroll.mesh().size);
            }

            fn move_up(&mut self, amount: i32) -> PanStats {
                self.scroll.move_up(amount)
            }

            fn move_down(&mut self, amount: i32) -> PanStats {
                self.scroll.move_down(amount)
            }

            fn move_left(&mut self, amount: i32) -> PanStats {
                self.scroll.move_left(amount)
            }

            fn move_right(&mut self, amount: i32) -> PanStats {
                self.scroll.move_right(amount)
            }

            fn pan_to(&mut self, x_disp: i64, y_disp: i64) -> PanStats {
                self.scroll.pan_to(x_disp, y_disp)
            }

            fn recenter(&mut self, x_disp: i64, y_disp: i64) -> PanStats {
                self.scroll.recenter(x_disp, y_disp)
            }

            fn displacement(&self) -> ScrollState {
                self.scroll.state()
            }
        }
    };
}

/// Terrain from a single gradient field.
pub struct SimpleTerrain {
    scroll: ScrollController<Heightfield>,
}

fn check_common(
    field: &GradientField,
    grid: GridSize,
    magnitude: f64,
    lift: f64,
) -> Result<(), ConfigError> {
    check_field("field 1", field.width, field.height)?;
    check_finite("magnitude", magnitude)?;
    check_finite("lift", lift)?;
    check_grid(grid)
}

impl SimpleTerrain {
    pub fn new(
        field: GradientField,
        grid: GridSize,
        magnitude: f64,
        lift: f64,
    ) -> Result<Self, ConfigError> {
        check_common(&field, grid, magnitude, lift)?;
        let source = Heightfield {
            sampler: NoiseSampler::single(field, grid),
            magnitude,
            lift,
        };
        Ok(Self {
            scroll: controller(source, grid),
        })
    }

    pub fn scroll(&self) -> &ScrollController<Heightfield> {
        &self.scroll
    }
}

/// Terrain from a macro field blended with a micro field.
pub struct BipartiteTerrain {
    scroll: ScrollController<Heightfield>,
}

impl BipartiteTerrain {
    pub fn new(
        macro_field: GradientField,
        micro_field: GradientField,
        grid: GridSize,
        magnitude: f64,
        prop: f64,
        lift: f64,
    ) -> Result<Self, ConfigError> {
        check_common(&macro_field, grid, magnitude, lift)?;
        check_field("field 2", micro_field.width, micro_field.height)?;
        let source = Heightfield {
            sampler: NoiseSampler::bipartite(macro_field, micro_field, prop, grid)?,
            magnitude,
            lift,
        };
        Ok(Self {
            scroll: controller(source, grid),
        })
    }

    pub fn scroll(&self) -> &ScrollController<Heightfield> {
        &self.scroll
    }
}

impl_terrain!(SimpleTerrain);
impl_terrain!(BipartiteTerrain);

fn controller(source: Heightfield, grid: GridSize) -> ScrollController<Heightfield> {
    let sampler = source.sampler;
    let scroll = ScrollController::new(source, grid, |i, j| {
        let (x, y) = sampler.world(i as i64, j as i64);
        (x as f32, y as f32)
    });
    info!(
        w = grid.w,
        h = grid.h,
        vertices = scroll.mesh().vertex_count(),
        triangles = scroll.mesh().triangle_count(),
        "built surface mesh"
    );
    scroll
}

/// Validate `config` and build the terrain variant it names.
pub fn build(config: &TerrainConfig, grid: GridSize) -> Result<Box<dyn Terrain>, ConfigError> {
    config.validate(grid)?;
    let macro_field = GradientField::new(config.seed1, config.width1, config.height1);
    Ok(match config.kind {
        TerrainKind::Simple => Box::new(SimpleTerrain::new(
            macro_field,
            grid,
            config.magnitude,
            config.lift,
        )?),
        TerrainKind::Bipartite => Box::new(BipartiteTerrain::new(
            macro_field,
            GradientField::new(config.seed2, config.width2, config.height2),
            grid,
            config.magnitude,
            config.prop,
            config.lift,
        )?),
    })
}
