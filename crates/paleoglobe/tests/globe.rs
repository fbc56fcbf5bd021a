//! Load a grid and a catalog from disk and build one animation frame.

use glam::{DMat4, Vec3};
use paleoglobe::{
    Client, Config, ElevationService, GridDimensions, MemoryCache, RotationService, Source,
    SurfaceMesh,
};
use std::path::PathBuf;

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn temp_file(name: &str, contents: &[u8]) -> PathBuf {
    let path = std::env::temp_dir().join(format!("paleoglobe-globe-{}-{name}", std::process::id()));
    std::fs::write(&path, contents).unwrap();
    path
}

/// 8 x 5 grid: ocean in the southern rows, land rising toward the north.
fn grid_payload() -> Vec<u8> {
    let rows = [3000.0f32, 1500.0, 200.0, -1000.0, -4000.0];
    rows.iter()
        .flat_map(|&value| std::iter::repeat_n(value, 8))
        .flat_map(f32::to_le_bytes)
        .collect()
}

fn octahedron() -> SurfaceMesh {
    SurfaceMesh::new(
        vec![
            Vec3::X,
            Vec3::NEG_X,
            Vec3::Y,
            Vec3::NEG_Y,
            Vec3::Z,
            Vec3::NEG_Z,
        ],
        vec![
            0, 2, 4, 4, 2, 1, 1, 2, 5, 5, 2, 0, //
            4, 3, 0, 1, 3, 4, 5, 3, 1, 0, 3, 5,
        ],
    )
}

#[tokio::test]
async fn test_build_frame_from_files() {
    init_tracing();

    let grid_path = temp_file("grid.bin", &grid_payload());
    let catalog_path = temp_file(
        "catalog.rot",
        b"101 0.0 0.0 0.0 0.0 000 !present\n101 -100.0 10.0 20.0 30.0 000 !past\n",
    );

    let config = Config::default().with_grid(GridDimensions::new(8, 5));
    let client = Client::with_cache(MemoryCache::new());

    let elevation = ElevationService::new(&config);
    let stats = elevation
        .load(&client, &Source::File(grid_path.clone()))
        .await
        .unwrap();
    assert_eq!(stats.max, 3000.0);
    assert_eq!(stats.min, -4000.0);

    let rotations = RotationService::new();
    rotations
        .load(&client, &Source::File(catalog_path.clone()))
        .await
        .unwrap();
    assert_eq!(client.cache().len(), 2);

    let mut mesh = octahedron();
    elevation.displacer().displace(&mut mesh).unwrap();

    let base = config.displacement.base_radius;
    let north = mesh.positions[2].length();
    let south = mesh.positions[3].length();
    assert!(north > base, "north pole should sit above sea level");
    assert!(south < base, "south pole should sit below sea level");

    let colors = elevation
        .classifier()
        .colorize(&mesh, &elevation.sampler());
    assert_eq!(colors.len(), mesh.vertex_count());
    // Deep water at the south pole is blue-dominant.
    let [r, g, b] = colors[3];
    assert!(b > r && b > g);

    let transform = rotations.resolve(101, rotations.clamp_time(-50.0));
    let expected = paleoglobe::FiniteRotation::new(5.0, 10.0, 15.0).to_matrix();
    assert!(transform.abs_diff_eq(expected, 1e-12));
    assert_eq!(rotations.resolve(999, -50.0), DMat4::IDENTITY);

    std::fs::remove_file(grid_path).unwrap();
    std::fs::remove_file(catalog_path).unwrap();
}

#[tokio::test]
async fn test_retry_after_failed_load() {
    init_tracing();

    let config = Config::default().with_grid(GridDimensions::new(8, 5));
    let client = Client::new();
    let elevation = ElevationService::new(&config);
    let path = std::env::temp_dir().join(format!(
        "paleoglobe-globe-{}-late.bin",
        std::process::id()
    ));
    let source = Source::File(path.clone());

    assert!(elevation.load(&client, &source).await.is_err());
    assert!(!elevation.is_loaded());

    std::fs::write(&path, grid_payload()).unwrap();
    elevation.load(&client, &source).await.unwrap();
    assert!(elevation.is_loaded());

    std::fs::remove_file(path).unwrap();
}
