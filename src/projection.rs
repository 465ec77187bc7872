use crate::fluid::Fluid;

/// Drives the net outflow of every interior fluid cell toward zero with
/// successive over-relaxation, accumulating the matching pressure into `p`.
/// Velocity through faces whose neighbor is solid is never touched.
///
/// The sweep is in-place Gauss-Seidel: cells later in a sweep see values
/// already corrected earlier in the same sweep. Traversal order (ascending
/// `i`, then ascending `j`) is part of the numerical contract and must not
/// be reordered or parallelized.
pub fn solve_incompressibility(fluid: &mut Fluid, num_iters: usize, dt: f32, over_relaxation: f32) {
    let Fluid {
        grid, u, v, p, s, ..
    } = fluid;
    let num_x = grid.num_x();
    let num_y = grid.num_y();
    let scale = grid.density() * grid.h() / dt;

    for _ in 0..num_iters {
        for i in 1..num_x - 1 {
            for j in 1..num_y - 1 {
                if s.get(i, j) == 0.0 {
                    continue;
                }
                let sx0 = s.get(i - 1, j);
                let sx1 = s.get(i + 1, j);
                let sy0 = s.get(i, j - 1);
                let sy1 = s.get(i, j + 1);
                let s_sum = sx0 + sx1 + sy0 + sy1;
                if s_sum == 0.0 {
                    continue;
                }

                // outflow counts positive
                let div = u.get(i + 1, j) - u.get(i, j) + v.get(i, j + 1) - v.get(i, j);
                let corr = -div / s_sum * over_relaxation;
                p.set(i, j, p.get(i, j) + scale * corr);

                u.set(i, j, u.get(i, j) - sx0 * corr);
                u.set(i + 1, j, u.get(i + 1, j) + sx1 * corr);
                v.set(i, j, v.get(i, j) - sy0 * corr);
                v.set(i, j + 1, v.get(i, j + 1) + sy1 * corr);
            }
        }
    }
}

/// Net outflow of cell `(i, j)` in the projector's convention.
pub fn divergence_at(fluid: &Fluid, i: usize, j: usize) -> f32 {
    fluid.u.get(i + 1, j) - fluid.u.get(i, j) + fluid.v.get(i, j + 1) - fluid.v.get(i, j)
}

pub fn mean_abs_divergence(fluid: &Fluid) -> f32 {
    let num_x = fluid.grid.num_x();
    let num_y = fluid.grid.num_y();
    let mut sum = 0.0;
    let mut count = 0usize;
    for i in 1..num_x - 1 {
        for j in 1..num_y - 1 {
            if fluid.s.get(i, j) == 0.0 {
                continue;
            }
            sum += divergence_at(fluid, i, j).abs();
            count += 1;
        }
    }
    if count == 0 {
        0.0
    } else {
        sum / count as f32
    }
}

pub fn max_abs_divergence(fluid: &Fluid) -> f32 {
    let num_x = fluid.grid.num_x();
    let num_y = fluid.grid.num_y();
    let mut max = 0.0f32;
    for i in 1..num_x - 1 {
        for j in 1..num_y - 1 {
            if fluid.s.get(i, j) == 0.0 {
                continue;
            }
            max = max.max(divergence_at(fluid, i, j).abs());
        }
    }
    max
}
