use crate::field::CellField;
use crate::fluid::Fluid;
use crate::sample::{sample_bilinear, FieldKind};

// Four-sample average of v around the u-face at (i, j). Cheaper than a
// full bilinear sample and uses a different stencil; not interchangeable.
fn avg_v(v: &CellField, i: usize, j: usize) -> f32 {
    0.25 * (v.get(i - 1, j) + v.get(i, j) + v.get(i - 1, j + 1) + v.get(i, j + 1))
}

fn avg_u(u: &CellField, i: usize, j: usize) -> f32 {
    0.25 * (u.get(i, j - 1) + u.get(i, j) + u.get(i + 1, j - 1) + u.get(i + 1, j))
}

/// Semi-Lagrangian transport of both velocity components through the
/// projected velocity field. Each face is backtraced by one step and
/// resampled from the pre-pass buffers; results land in the scratch
/// buffers, which become authoritative in a single swap at the end.
pub fn advect_velocity(fluid: &mut Fluid, dt: f32) {
    let Fluid {
        grid,
        u,
        v,
        s,
        new_u,
        new_v,
        ..
    } = fluid;
    let grid = *grid;
    let num_x = grid.num_x();
    let num_y = grid.num_y();
    let h = grid.h();
    let half = 0.5 * h;
    let (u_ref, v_ref, s_ref) = (&*u, &*v, &*s);

    new_u.fill_with_index(|i, j| {
        let value = u_ref.get(i, j);
        // note the u/v asymmetry at the far borders: u skips the top row,
        // v skips the right column; both reflect the face staggering
        if i < 1 || j < 1 || j >= num_y - 1 {
            return value;
        }
        if s_ref.get(i, j) == 0.0 || s_ref.get(i - 1, j) == 0.0 {
            return value;
        }
        let x = i as f32 * h;
        let y = j as f32 * h + half;
        let vel_u = value;
        let vel_v = avg_v(v_ref, i, j);
        sample_bilinear(grid, u_ref, FieldKind::U, x - dt * vel_u, y - dt * vel_v)
    });

    new_v.fill_with_index(|i, j| {
        let value = v_ref.get(i, j);
        if i < 1 || j < 1 || i >= num_x - 1 {
            return value;
        }
        if s_ref.get(i, j) == 0.0 || s_ref.get(i, j - 1) == 0.0 {
            return value;
        }
        let x = i as f32 * h + half;
        let y = j as f32 * h;
        let vel_u = avg_u(u_ref, i, j);
        let vel_v = value;
        sample_bilinear(grid, v_ref, FieldKind::V, x - dt * vel_u, y - dt * vel_v)
    });

    std::mem::swap(u, new_u);
    std::mem::swap(v, new_v);
}

/// Semi-Lagrangian transport of the smoke field through the advected
/// velocity. Solid and border cells keep their previous value.
pub fn advect_smoke(fluid: &mut Fluid, dt: f32) {
    let Fluid {
        grid,
        u,
        v,
        s,
        m,
        new_m,
        ..
    } = fluid;
    let grid = *grid;
    let num_x = grid.num_x();
    let num_y = grid.num_y();
    let h = grid.h();
    let half = 0.5 * h;
    let (u_ref, v_ref, s_ref, m_ref) = (&*u, &*v, &*s, &*m);

    new_m.fill_with_index(|i, j| {
        let value = m_ref.get(i, j);
        if i < 1 || j < 1 || i >= num_x - 1 || j >= num_y - 1 {
            return value;
        }
        if s_ref.get(i, j) == 0.0 {
            return value;
        }
        let vel_u = 0.5 * (u_ref.get(i, j) + u_ref.get(i + 1, j));
        let vel_v = 0.5 * (v_ref.get(i, j) + v_ref.get(i, j + 1));
        let x = i as f32 * h + half - dt * vel_u;
        let y = j as f32 * h + half - dt * vel_v;
        sample_bilinear(grid, m_ref, FieldKind::Smoke, x, y)
    });

    std::mem::swap(m, new_m);
}
