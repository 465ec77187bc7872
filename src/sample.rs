use crate::field::CellField;
use crate::grid::SimGrid;

/// Selects which staggered field a world-space sample reads and, with it,
/// the stagger offset of that field's sample points.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    U,
    V,
    Smoke,
}

impl FieldKind {
    pub(crate) fn offset(self, h: f32) -> (f32, f32) {
        let half = 0.5 * h;
        match self {
            FieldKind::U => (0.0, half),
            FieldKind::V => (half, 0.0),
            FieldKind::Smoke => (half, half),
        }
    }
}

// The single interpolation primitive shared by both advection passes.
// Positions are clamped into the stored domain before the offset is
// removed, so a backtrace can never read outside the border cells.
pub(crate) fn sample_bilinear(
    grid: SimGrid,
    values: &CellField,
    kind: FieldKind,
    x: f32,
    y: f32,
) -> f32 {
    let h = grid.h();
    let inv_h = 1.0 / h;
    let x = x.min(grid.num_x() as f32 * h).max(h);
    let y = y.min(grid.num_y() as f32 * h).max(h);
    let (dx, dy) = kind.offset(h);

    let x0 = ((((x - dx) * inv_h).floor()) as usize).min(grid.num_x() - 1);
    let tx = ((x - dx) - x0 as f32 * h) * inv_h;
    let x1 = (x0 + 1).min(grid.num_x() - 1);

    let y0 = ((((y - dy) * inv_h).floor()) as usize).min(grid.num_y() - 1);
    let ty = ((y - dy) - y0 as f32 * h) * inv_h;
    let y1 = (y0 + 1).min(grid.num_y() - 1);

    let sx = 1.0 - tx;
    let sy = 1.0 - ty;

    sx * sy * values.get(x0, y0)
        + tx * sy * values.get(x1, y0)
        + tx * ty * values.get(x1, y1)
        + sx * ty * values.get(x0, y1)
}
