use crate::grid::SimGrid;
use rayon::prelude::*;
use std::sync::OnceLock;

const PAR_THRESHOLD_DEFAULT: usize = 262_144;
const PAR_MIN_WORK_PER_THREAD: usize = 4096;

fn parallel_threshold() -> usize {
    static THRESHOLD: OnceLock<usize> = OnceLock::new();
    *THRESHOLD.get_or_init(|| {
        std::env::var("FLUID_PAR_THRESHOLD")
            .ok()
            .and_then(|value| value.parse::<usize>().ok())
            .filter(|value| *value > 0)
            .unwrap_or(PAR_THRESHOLD_DEFAULT)
    })
}

fn should_parallel(len: usize) -> bool {
    if len < parallel_threshold() {
        return false;
    }
    let threads = rayon::current_num_threads().max(1);
    len / threads >= PAR_MIN_WORK_PER_THREAD
}

#[derive(Clone, Debug, PartialEq)]
pub struct CellField {
    grid: SimGrid,
    data: Vec<f32>,
}

impl CellField {
    pub fn new(grid: SimGrid, fill: f32) -> Self {
        let data = vec![fill; grid.size()];
        Self { grid, data }
    }

    pub fn from_fn(grid: SimGrid, f: impl Fn(usize, usize) -> f32) -> Self {
        let num_y = grid.num_y();
        let data = (0..grid.size())
            .map(|idx| {
                let i = idx / num_y;
                let j = idx % num_y;
                f(i, j)
            })
            .collect();
        Self { grid, data }
    }

    pub fn grid(&self) -> SimGrid {
        self.grid
    }

    pub fn get(&self, i: usize, j: usize) -> f32 {
        self.data[self.grid.idx(i, j)]
    }

    pub fn set(&mut self, i: usize, j: usize, value: f32) {
        let idx = self.grid.idx(i, j);
        self.data[idx] = value;
    }

    pub fn fill(&mut self, value: f32) {
        self.data.fill(value);
    }

    pub fn fill_with_index(&mut self, f: impl Fn(usize, usize) -> f32 + Sync) {
        let num_y = self.grid.num_y();
        if should_parallel(self.data.len()) {
            self.data.par_iter_mut().enumerate().for_each(|(idx, value)| {
                let i = idx / num_y;
                let j = idx % num_y;
                *value = f(i, j);
            });
        } else {
            for (idx, value) in self.data.iter_mut().enumerate() {
                let i = idx / num_y;
                let j = idx % num_y;
                *value = f(i, j);
            }
        }
    }

    pub fn min_max(&self) -> (f32, f32) {
        let mut iter = self.data.iter().filter(|value| value.is_finite());
        let Some(first) = iter.next() else {
            return (0.0, 0.0);
        };
        let mut min_value = *first;
        let mut max_value = *first;
        for value in iter {
            if *value < min_value {
                min_value = *value;
            }
            if *value > max_value {
                max_value = *value;
            }
        }
        (min_value, max_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f32, b: f32, tol: f32) {
        assert!(
            (a - b).abs() <= tol,
            "expected {a} to be within {tol} of {b}"
        );
    }

    #[test]
    fn from_fn_maps_coords() {
        let grid = SimGrid::new(1.0, 2, 3, 1.0);
        let field = CellField::from_fn(grid, |i, j| (i * 10 + j) as f32);
        assert_close(field.get(3, 4), 34.0, 1e-6);
        assert_close(field.get(0, 0), 0.0, 1e-6);
    }

    #[test]
    fn fill_with_index_matches_from_fn() {
        let grid = SimGrid::new(1.0, 3, 2, 1.0);
        let expected = CellField::from_fn(grid, |i, j| (i + j * 7) as f32);
        let mut field = CellField::new(grid, 0.0);
        field.fill_with_index(|i, j| (i + j * 7) as f32);
        assert_eq!(field, expected);
    }

    #[test]
    fn min_max_reports_bounds() {
        let grid = SimGrid::new(1.0, 2, 2, 1.0);
        let field = CellField::from_fn(grid, |i, j| (i + j) as f32 - 1.0);
        let (min_value, max_value) = field.min_max();
        assert_close(min_value, -1.0, 1e-6);
        assert_close(max_value, 5.0, 1e-6);
    }
}
