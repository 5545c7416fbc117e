/// Example: Load and render an STL file in the terminal
///
/// Usage: cargo run --example load_stl -- path/to/file.stl
///
/// Without an argument a subdivided icosahedron is written out as ASCII STL,
/// read back, and rendered.
use std::env;
use std::fs;
use std::io;

use qm3d_core::{stl, TriangleGroup};
use qm3d_terminal::TerminalApp;

fn math_error(e: qm3d_core::MathError) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, format!("{e}"))
}

fn main() -> io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = env::args().collect();

    let group = if args.len() < 2 {
        eprintln!("Usage: {} <stl-file>", args[0]);
        eprintln!("\nNo STL file provided, using a subdivided icosahedron...");
        let mut sphere = TriangleGroup::icosahedron();
        sphere.spherical_subdivide().map_err(math_error)?;
        let text = sphere.to_stl("sphere").map_err(math_error)?;
        stl::parse_ascii_stl(&text).map_err(math_error)?
    } else {
        let stl_path = &args[1];
        println!("Loading STL file: {}", stl_path);
        let data = fs::read(stl_path).map_err(|e| {
            io::Error::new(io::ErrorKind::NotFound, format!("Failed to read STL file: {}", e))
        })?;
        stl::parse_stl(&data).map_err(math_error)?
    };

    println!(
        "Loaded {} triangles ({} vertices, {} edges)",
        group.n_faces(),
        group.n_vertices(),
        group.n_edges()
    );
    println!("Starting terminal renderer (press Q to quit)...");
    std::thread::sleep(std::time::Duration::from_secs(1));

    let mut app = TerminalApp::new(group)?;
    app.run()?;

    println!("Thank you for using QM3D Terminal Viewer!");
    Ok(())
}
