use anyhow::Result;
use euler_fluid_sim::{max_abs_divergence, Fluid};

const IN_VEL: f32 = 2.0;
const OBSTACLE_X: f32 = 0.7;
const OBSTACLE_Y: f32 = 0.5;
const OBSTACLE_RADIUS: f32 = 0.15;

// Wind-tunnel scene: solid walls on the left, bottom and top, a free right
// column for outflow, fixed inflow along the left interior column.
fn setup_scene(fluid: &mut Fluid) {
    let num_x = fluid.grid().num_x();
    let num_y = fluid.grid().num_y();
    for i in 0..num_x {
        for j in 0..num_y {
            let solid = i == 0 || j == 0 || j == num_y - 1;
            fluid.solid_mut().set(i, j, if solid { 0.0 } else { 1.0 });
            if i == 1 {
                fluid.u_mut().set(i, j, IN_VEL);
            }
        }
    }

    // smoke streak entering through a pipe section of the left wall
    let pipe_h = 0.1 * num_y as f32;
    let min_j = (0.5 * num_y as f32 - 0.5 * pipe_h) as usize;
    let max_j = (0.5 * num_y as f32 + 0.5 * pipe_h) as usize;
    for j in min_j..max_j {
        fluid.smoke_mut().set(0, j, 0.0);
    }

    set_obstacle(fluid, OBSTACLE_X, OBSTACLE_Y, OBSTACLE_RADIUS);
}

fn set_obstacle(fluid: &mut Fluid, x: f32, y: f32, radius: f32) {
    let num_x = fluid.grid().num_x();
    let num_y = fluid.grid().num_y();
    let h = fluid.grid().h();
    let r2 = radius * radius;
    for i in 1..num_x - 2 {
        for j in 1..num_y - 2 {
            let dx = (i as f32 + 0.5) * h - x;
            let dy = (j as f32 + 0.5) * h - y;
            if dx * dx + dy * dy < r2 {
                fluid.solid_mut().set(i, j, 0.0);
                fluid.smoke_mut().set(i, j, 1.0);
                fluid.u_mut().set(i, j, 0.0);
                fluid.u_mut().set(i + 1, j, 0.0);
                fluid.v_mut().set(i, j, 0.0);
                fluid.v_mut().set(i, j + 1, 0.0);
            }
        }
    }
}

fn print_frame(fluid: &Fluid, frame: usize) {
    // darker glyph = more smoke streak (low m)
    const RAMP: &[u8] = b"@%#*+=-:. ";
    let num_x = fluid.grid().num_x();
    let num_y = fluid.grid().num_y();
    println!("frame {frame}");
    for j in (0..num_y).rev() {
        let mut line = String::with_capacity(num_x);
        for i in 0..num_x {
            if fluid.solid().get(i, j) == 0.0 {
                line.push('#');
            } else {
                let m = fluid.smoke().get(i, j).clamp(0.0, 1.0);
                let idx = (m * (RAMP.len() - 1) as f32) as usize;
                line.push(RAMP[idx.min(RAMP.len() - 1)] as char);
            }
        }
        println!("{line}");
    }
    println!();
}

fn main() -> Result<()> {
    env_logger::init();

    let res_y = 40;
    let res_x = 100;
    let h = 1.0 / res_y as f32;
    let density = 1000.0;
    let mut fluid = Fluid::new(density, res_x, res_y, h);
    setup_scene(&mut fluid);
    log::info!(
        "wind tunnel {}x{} cells, h = {h}, inflow {IN_VEL} m/s",
        fluid.grid().num_x(),
        fluid.grid().num_y()
    );

    let total_steps = 240;
    let print_every = 24;
    for step in 0..total_steps {
        fluid.step();
        if (step + 1) % print_every == 0 {
            print_frame(&fluid, step + 1);
        }
    }
    log::info!(
        "done after {total_steps} steps, max interior |div| {:.3e}",
        max_abs_divergence(&fluid)
    );
    Ok(())
}
