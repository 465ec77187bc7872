mod advection;
mod field;
mod fluid;
mod grid;
mod projection;
mod sample;

pub use advection::{advect_smoke, advect_velocity};
pub use field::CellField;
pub use fluid::{Fluid, DT, OVER_RELAXATION, PRESSURE_ITERS};
pub use grid::SimGrid;
pub use projection::{
    divergence_at, max_abs_divergence, mean_abs_divergence, solve_incompressibility,
};
pub use sample::FieldKind;
