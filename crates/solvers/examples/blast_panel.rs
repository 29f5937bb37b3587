//! Response of a ductile wall panel to a triangular blast pulse.
//!
//! Run with `cargo run -p ductile-solvers --example blast_panel`.

use std::error::Error;

use ductile_components::{SdofConfig, SdofParameters};
use ductile_solvers::transient::central_difference::{self, Status};

const PANEL: &str = r#"
total_time = 0.25
time_step = 2e-5
damping_ratio = 2.0

# Peak load of 400 kN decaying to zero over 12 ms.
load = [[0.0, 4.0e5], [0.012, 0.0], [0.3, 0.0]]

# Elastic response, then a hardening plateau, then a softening tail.
[[regions]]
mass = 850.0
stiffness = 2.4e7
inbound_limit = 0.012
rebound_limit = -0.012

[[regions]]
mass = 850.0
stiffness = 1.5e6
inbound_limit = 0.08
rebound_limit = -0.06

[[regions]]
mass = 700.0
stiffness = -4.0e5
inbound_limit = 0.2
rebound_limit = -0.15
"#;

fn main() -> Result<(), Box<dyn Error>> {
    let parameters: SdofParameters = SdofConfig::from_toml(PANEL)?.try_into()?;
    let solution = central_difference::solve_unobserved(&parameters)?;

    match solution.status {
        Status::Complete => println!("completed {} steps", solution.steps),
        Status::Failed(failure) => println!("{failure}"),
        Status::StoppedByObserver => println!("stopped after {} steps", solution.steps),
    }

    let yield_displacement = parameters.yield_displacement();
    println!("peak displacement:   {:.4} m", solution.peak_displacement());
    println!("peak resistance:     {:.1} N", solution.peak_resistance());
    println!(
        "ductility:           {:.2}",
        solution.ductility(yield_displacement)
    );
    println!("permanent set:       {:.4} m", solution.permanent_set);
    println!(
        "deepest regions:     {} / {}",
        solution.max_region_inbound, solution.max_region_rebound
    );

    Ok(())
}
