//! Reading MPAS mesh files written by the test fixtures.

use netcdf_parser::{CellField, Dataset, MpasMesh, NetCdfError};
use plot_common::PlotError;
use test_utils::{assert_approx_eq, temp_test_dir, write_mesh_file, MeshFixture};

fn open_small_mesh() -> (tempfile::TempDir, Dataset) {
    let dir = temp_test_dir();
    let path = dir.path().join("mesh.nc");
    write_mesh_file(&path, &MeshFixture::SMALL).unwrap();
    let ds = Dataset::open(&path).unwrap();
    (dir, ds)
}

#[test]
fn test_mesh_geometry_in_degrees() {
    let (_dir, ds) = open_small_mesh();
    let mesh = MpasMesh::from_dataset(&ds).unwrap();
    let fx = MeshFixture::SMALL;

    assert_eq!(mesh.n_cells, fx.n_cells());
    assert_eq!(mesh.n_vertices, fx.n_vertices());
    assert_eq!(mesh.max_edges, 6);

    // First cell centre sits at (7.5°E, 82.5°S)
    assert_approx_eq!(mesh.lon_cell[0], 7.5, 1e-9);
    assert_approx_eq!(mesh.lat_cell[0], -82.5, 1e-9);

    let (lon, lat) = mesh.vertex_position(fx.n_lon);
    assert_approx_eq!(lon, 0.0, 1e-9);
    assert_approx_eq!(lat, -75.0, 1e-9);
}

#[test]
fn test_cell_vertices_are_zero_based() {
    let (_dir, ds) = open_small_mesh();
    let mesh = MpasMesh::from_dataset(&ds).unwrap();
    let n_lon = MeshFixture::SMALL.n_lon;

    assert_eq!(mesh.cell_vertices(0), vec![0, 1, n_lon + 1, n_lon]);

    // Last column wraps back to longitude 0
    let last = n_lon - 1;
    assert_eq!(
        mesh.cell_vertices(last),
        vec![last, 0, n_lon, n_lon + last]
    );
}

#[test]
fn test_cell_field_slices() {
    let (_dir, ds) = open_small_mesh();
    let field = CellField::read(&ds, "pressure").unwrap();

    assert_eq!(field.n_times, 1);
    assert_eq!(field.n_cells, MeshFixture::SMALL.n_cells());
    assert_eq!(field.n_levels, 5);
    assert_eq!(field.units.as_deref(), Some("Pa"));

    let surface = field.slice(0, 0).unwrap();
    let aloft = field.slice(0, 4).unwrap();
    assert_eq!(surface.len(), field.n_cells);
    for (lo, hi) in surface.iter().zip(&aloft) {
        assert_approx_eq!(*hi, *lo * 0.6, 1.0);
    }
}

#[test]
fn test_rank_two_field_has_one_level() {
    let (_dir, ds) = open_small_mesh();
    let theta = CellField::read(&ds, "theta").unwrap();
    assert_eq!(theta.n_levels, 1);
    assert!(theta.slice(0, 0).is_ok());

    let err = theta.slice(0, 1).unwrap_err();
    assert!(matches!(err, NetCdfError::IndexOutOfRange { len: 1, .. }));
    assert!(matches!(PlotError::from(err), PlotError::InvalidIndex { .. }));
}

#[test]
fn test_unknown_variable() {
    let (_dir, ds) = open_small_mesh();
    assert!(!ds.has_variable("qv"));

    let err = CellField::read(&ds, "qv").unwrap_err();
    assert!(matches!(
        PlotError::from(err),
        PlotError::VariableNotFound { ref variable, .. } if variable == "qv"
    ));
}

#[test]
fn test_variable_listing() {
    let (_dir, ds) = open_small_mesh();
    let names = ds.variable_names();
    for expected in ["latCell", "verticesOnCell", "pressure", "theta"] {
        assert!(names.iter().any(|n| n == expected), "missing {}", expected);
    }
    assert_eq!(ds.dimension_len("nVertLevels").unwrap(), 5);
    assert!(matches!(
        ds.dimension_len("nEdges"),
        Err(NetCdfError::MissingDimension(_))
    ));
}
