#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimGrid {
    num_x: usize,
    num_y: usize,
    h: f32,
    density: f32,
}

impl SimGrid {
    pub fn new(density: f32, res_x: usize, res_y: usize, h: f32) -> Self {
        assert!(density > 0.0, "density must be > 0");
        assert!(res_x > 0, "res_x must be > 0");
        assert!(res_y > 0, "res_y must be > 0");
        assert!(h > 0.0, "h must be > 0");
        Self {
            // one solid border cell on every side
            num_x: res_x + 2,
            num_y: res_y + 2,
            h,
            density,
        }
    }

    pub fn num_x(&self) -> usize {
        self.num_x
    }

    pub fn num_y(&self) -> usize {
        self.num_y
    }

    pub fn h(&self) -> f32 {
        self.h
    }

    pub fn density(&self) -> f32 {
        self.density
    }

    pub fn size(&self) -> usize {
        self.num_x * self.num_y
    }

    // Stride runs along y: linear order is ascending i, then ascending j.
    // The Gauss-Seidel sweep relies on this being the traversal order.
    pub fn idx(&self, i: usize, j: usize) -> usize {
        debug_assert!(i < self.num_x && j < self.num_y);
        i * self.num_y + j
    }
}
