/// QM3D Terminal Viewer - Rotating solids and STL meshes
///
/// Usage: qm3d-terminal [tetrahedron|icosahedron|<file.stl>] [subdivisions]
///
/// Controls:
///   - WASD / Arrow Keys: Rotate the model
///   - E/R: Roll rotation
///   - Q/ESC: Quit
use std::fs;
use std::io;

use qm3d_core::{stl, TriangleGroup};
use qm3d_terminal::TerminalApp;

const DEFAULT_SUBDIVISIONS: usize = 1;

fn load_group(source: &str) -> io::Result<TriangleGroup> {
    match source {
        "tetrahedron" => Ok(TriangleGroup::tetrahedron()),
        "icosahedron" => Ok(TriangleGroup::icosahedron()),
        path => {
            let data = fs::read(path).map_err(|e| {
                io::Error::new(e.kind(), format!("Failed to read STL file {path}: {e}"))
            })?;
            stl::parse_stl(&data).map_err(|e| {
                io::Error::new(io::ErrorKind::InvalidData, format!("Failed to parse STL: {e}"))
            })
        }
    }
}

fn main() -> io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let mut args = std::env::args().skip(1);
    let source = args.next().unwrap_or_else(|| "icosahedron".to_string());
    let subdivisions = match args.next() {
        Some(text) => text.parse::<usize>().map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("subdivisions must be a non-negative integer, got '{text}': {e}"),
            )
        })?,
        None if source == "icosahedron" || source == "tetrahedron" => DEFAULT_SUBDIVISIONS,
        None => 0,
    };

    println!("QM3D Terminal Viewer - Loading {source}...");
    let mut group = load_group(&source)?;
    for _ in 0..subdivisions {
        group
            .spherical_subdivide()
            .map_err(|e| io::Error::other(format!("{e}")))?;
    }
    log::info!(
        "{source}: {} vertices, {} edges, {} faces",
        group.n_vertices(),
        group.n_edges(),
        group.n_faces()
    );
    if subdivisions > 0 {
        match group.max_spherical_deviation() {
            Ok(deviation) => println!("Maximum deviation from the unit sphere: {deviation:.6}"),
            Err(e) => log::warn!("no sphere deviation for {source}: {e}"),
        }
    }

    println!("Starting terminal renderer (press Q to quit)...");
    std::thread::sleep(std::time::Duration::from_secs(1));

    let mut app = TerminalApp::new(group)?;
    app.run()?;

    println!("Thank you for using QM3D Terminal Viewer!");
    Ok(())
}
