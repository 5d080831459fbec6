//! Demo showing basic gridkit usage.
//!
//! Builds a uniform grid holding a sphere signed distance field, converts it
//! to a rectilinear grid and saves both to the temp directory.

use gridkit::*;

fn main() -> Result<()> {
    init();

    // Create a 20x20x20 grid spanning [-1, 1]^3
    let n = 20;
    let step = 2.0 / f64::from(n - 1);
    let mut image =
        UniformGrid::from_specs(UVec3::splat(n), DVec3::splat(step), DVec3::splat(-1.0))?;

    // Add a scalar field (signed distance to a sphere of radius 0.5)
    let sdf: Vec<f64> = image.points().iter().map(|p| p.length() - 0.5).collect();
    image.add_point_array(DataArray::scalars("sdf", sdf))?;
    image.set_active_scalars("sdf")?;
    println!("{image}\n");

    // Convert to a rectilinear grid and stretch the z axis
    let mut rect = image.cast_to_rectilinear_grid()?;
    let stretched: Vec<f64> = rect.z().iter().map(|z| z * z * z.signum()).collect();
    rect.set_z(&stretched)?;
    println!("{rect}\n");

    let dir = std::env::temp_dir();
    image.save(dir.join("gridkit_demo_uniform.json"))?;
    rect.save(dir.join("gridkit_demo_rectilinear.json"))?;

    let loaded = read(dir.join("gridkit_demo_rectilinear.json"))?;
    println!("reloaded a {}", loaded.kind());
    Ok(())
}
