//! Integration tests for gridkit grids.

use gridkit::*;
use proptest::prelude::*;

fn arange(start: f64, stop: f64, step: f64) -> Vec<f64> {
    let n = ((stop - start) / step).ceil() as usize;
    (0..n).map(|i| start + i as f64 * step).collect()
}

#[test]
fn test_coordinate_arrays_round_trip_unique_sorted() {
    let x = vec![4.0, -1.0, 4.0, 0.5, -1.0];
    let y = vec![2.0, 2.0];
    let z = vec![3.0, 1.0, 2.0];
    let grid = RectilinearGrid::from_arrays(&x, &y, &z).unwrap();
    assert_eq!(grid.x(), &[-1.0, 0.5, 4.0]);
    assert_eq!(grid.y(), &[2.0]);
    assert_eq!(grid.z(), &[1.0, 2.0, 3.0]);
    assert_eq!(grid.dimensions(), UVec3::new(3, 1, 3));
    assert_eq!(grid.n_points(), 9);
}

#[test]
fn test_rectilinear_set_points_yields_cartesian_product() {
    let scattered = vec![
        DVec3::new(1.0, 10.0, 0.0),
        DVec3::new(0.0, 20.0, 0.0),
        DVec3::new(1.0, 10.0, 0.0),
        DVec3::new(2.0, 10.0, 5.0),
    ];
    let mut grid = RectilinearGrid::new();
    grid.set_points(&scattered).unwrap();

    assert_eq!(grid.x(), &[0.0, 1.0, 2.0]);
    assert_eq!(grid.y(), &[10.0, 20.0]);
    assert_eq!(grid.z(), &[0.0, 5.0]);

    let points = grid.points();
    assert_eq!(points.len(), 12);
    let mut expected = Vec::new();
    for z in [0.0, 5.0] {
        for y in [10.0, 20.0] {
            for x in [0.0, 1.0, 2.0] {
                expected.push(DVec3::new(x, y, z));
            }
        }
    }
    assert_eq!(points, expected);
}

#[test]
fn test_unit_uniform_grid_casts_to_unit_axes() {
    let image = UniformGrid::from_specs(UVec3::new(2, 2, 2), DVec3::ONE, DVec3::ZERO).unwrap();
    let rect = image.cast_to_rectilinear_grid().unwrap();
    assert_eq!(rect.x(), &[0.0, 1.0]);
    assert_eq!(rect.y(), &[0.0, 1.0]);
    assert_eq!(rect.z(), &[0.0, 1.0]);
    assert_eq!(rect.dimensions(), image.dimensions());
}

#[test]
fn test_cast_round_trip_keeps_data() {
    let x = arange(-10.0, 10.0, 2.0);
    let y = arange(-10.0, 10.0, 5.0);
    let z = arange(-10.0, 10.0, 1.0);
    let mut rect = RectilinearGrid::from_arrays(&x, &y, &z).unwrap();
    let n_points = rect.n_points();
    let n_cells = rect.n_cells();
    let elevation: Vec<f64> = rect.points().iter().map(|p| p.z).collect();
    rect.add_point_array(DataArray::scalars("elevation", elevation))
        .unwrap();
    rect.add_cell_array(DataArray::scalars("id", (0..n_cells).map(|i| i as f64).collect()))
        .unwrap();
    rect.set_active_scalars("elevation").unwrap();

    let image = rect.cast_to_uniform_grid().unwrap();
    assert_eq!(image.spacing(), DVec3::new(2.0, 5.0, 1.0));
    assert_eq!(image.origin(), DVec3::splat(-10.0));
    assert_eq!(image.n_points(), n_points);

    let back = image.cast_to_rectilinear_grid().unwrap();
    assert_eq!(back.x(), rect.x());
    assert_eq!(back.point_data(), rect.point_data());
    assert_eq!(back.cell_data(), rect.cell_data());
    assert_eq!(
        back.active_scalars_info(),
        Some(&ActiveScalars {
            association: Association::Point,
            name: "elevation".to_string(),
        })
    );
}

#[test]
fn test_structured_cast_through_trait_objects() {
    let image = UniformGrid::from_dimensions(UVec3::new(3, 3, 1)).unwrap();
    let grids: Vec<Box<dyn Grid>> = vec![
        Box::new(image.clone()),
        Box::new(image.cast_to_rectilinear_grid().unwrap()),
        Box::new(image.cast_to_structured_grid()),
    ];
    for grid in &grids {
        assert_eq!(grid.dimensions(), UVec3::new(3, 3, 1));
        assert_eq!(grid.n_cells(), 4);
        assert_eq!(grid.bounds(), Some((DVec3::ZERO, DVec3::new(2.0, 2.0, 0.0))));
        assert_eq!(grid.unflatten_point_index(4), Some(UVec3::new(1, 1, 0)));
        assert_eq!(grid.unflatten_point_index(9), None);
    }
}

#[test]
fn test_uniform_set_points_from_rectilinear() {
    let rect = RectilinearGrid::from_arrays(&arange(0.0, 1.0, 0.1), &[0.0, 2.0], &[0.0]).unwrap();
    let mut image = UniformGrid::new();
    image.set_points(&rect.points()).unwrap();
    assert_eq!(image.dimensions(), UVec3::new(10, 2, 1));
    assert!((image.spacing().x - 0.1).abs() < 1e-12);
    assert_eq!(image.spacing().y, 2.0);

    let uneven = RectilinearGrid::from_arrays(&[0.0, 1.0, 1.5], &[0.0], &[0.0]).unwrap();
    assert!(matches!(
        image.set_points(&uneven.points()),
        Err(GridError::NonUniformSpacing { axis: 0 })
    ));
}

#[test]
fn test_read_dispatches_on_file_contents() {
    let dir = std::env::temp_dir();
    let path = dir.join(format!("gridkit-read-{}.json", std::process::id()));

    let image = UniformGrid::from_specs(
        UVec3::new(4, 4, 4),
        DVec3::new(0.5, 0.5, 0.5),
        DVec3::new(1.0, 2.0, 3.0),
    )
    .unwrap();
    image.save(&path).unwrap();

    match read(&path).unwrap() {
        GridFile::UniformGrid(loaded) => assert_eq!(loaded, image),
        other => panic!("unexpected grid kind {}", other.kind()),
    }
    assert_eq!(read(&path).unwrap().as_dataset().n_points(), 64);
    assert!(matches!(
        read(dir.join("missing.vtk")),
        Err(GridError::UnsupportedFormat(_))
    ));
    std::fs::remove_file(&path).ok();
}

#[test]
fn test_summary_uses_global_options() {
    let image = UniformGrid::from_specs(UVec3::new(2, 2, 2), DVec3::splat(0.5), DVec3::ZERO).unwrap();

    set_options(Options {
        float_precision: 1,
        scientific: false,
    });
    let text = image.to_string();
    reset_options();

    assert!(text.contains("X Bounds:   0.0, 0.5"), "{text}");
    assert!(text.contains("Spacing:    0.5, 0.5, 0.5"), "{text}");
}

proptest! {
    #[test]
    fn rectilinear_axes_are_unique_and_sorted(
        x in prop::collection::vec(-1e3f64..1e3, 1..16),
        y in prop::collection::vec(-1e3f64..1e3, 1..16),
        z in prop::collection::vec(-1e3f64..1e3, 1..16),
    ) {
        let grid = RectilinearGrid::from_arrays(&x, &y, &z).unwrap();
        for (axis, input) in [grid.x(), grid.y(), grid.z()].into_iter().zip([&x, &y, &z]) {
            prop_assert!(axis.windows(2).all(|w| w[0] < w[1]));
            prop_assert!(input.iter().all(|v| axis.contains(v)));
        }
        let dims = grid.dimensions();
        prop_assert_eq!(grid.n_points(), (dims.x * dims.y * dims.z) as usize);
    }

    #[test]
    fn set_points_recovers_axes(
        x in prop::collection::vec(-1e3f64..1e3, 1..8),
        y in prop::collection::vec(-1e3f64..1e3, 1..8),
        z in prop::collection::vec(-1e3f64..1e3, 1..8),
    ) {
        let source = RectilinearGrid::from_arrays(&x, &y, &z).unwrap();
        let mut grid = RectilinearGrid::new();
        grid.set_points(&source.points()).unwrap();
        prop_assert_eq!(grid, source);
    }

    #[test]
    fn uniform_cast_preserves_points(
        nx in 1u32..6, ny in 1u32..6, nz in 1u32..6,
        spacing in (0.1f64..4.0, 0.1f64..4.0, 0.1f64..4.0),
        origin in (-50.0f64..50.0, -50.0f64..50.0, -50.0f64..50.0),
    ) {
        let image = UniformGrid::from_specs(
            UVec3::new(nx, ny, nz),
            DVec3::new(spacing.0, spacing.1, spacing.2),
            DVec3::new(origin.0, origin.1, origin.2),
        ).unwrap();
        let rect = image.cast_to_rectilinear_grid().unwrap();
        prop_assert_eq!(rect.dimensions(), image.dimensions());
        prop_assert_eq!(rect.points(), image.points());
    }
}
