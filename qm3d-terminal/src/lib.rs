/// Terminal-based ASCII viewer for qm3d triangle groups
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use qm3d_core::{CoordinateSys, Quaternion, TriangleGroup, Vector};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

pub mod renderer;

pub use renderer::AsciiRenderer;

/// Radians turned per key press
const KEY_STEP: f64 = 0.1;

/// Distance from the camera to the model centre
const CAMERA_DISTANCE: f64 = 3.0;

fn to_io_error(e: qm3d_core::MathError) -> io::Error {
    io::Error::other(format!("{e}"))
}

/// Translate and scale a group so it is centred on the origin and fits the
/// unit sphere.
pub fn fit_to_unit_sphere(group: &TriangleGroup) -> qm3d_core::Result<TriangleGroup> {
    if group.n_vertices() == 0 {
        return Ok(group.clone());
    }

    let mut center = Vector::from([0.0, 0.0, 0.0]);
    for vertex in group.vertices() {
        center = center.add(vertex)?;
    }
    center.scale(1.0 / group.n_vertices() as f64);

    let mut radius: f64 = 0.0;
    for vertex in group.vertices() {
        radius = radius.max(vertex.subtract(&center)?.norm());
    }
    let scale = if radius > 0.0 { 1.0 / radius } else { 1.0 };

    let mut fitted = TriangleGroup::new();
    for index in 0..group.n_faces() {
        let [a, b, c] = group.triangle_corners(index)?;
        let a = a.subtract(&center)?.scaled_copy(scale);
        let b = b.subtract(&center)?.scaled_copy(scale);
        let c = c.subtract(&center)?.scaled_copy(scale);
        fitted.add_triangle(&a, &b, &c)?;
    }
    Ok(fitted)
}

/// Turn `orientation` by `angle` radians about a world-frame `axis`
pub fn turn(orientation: &Quaternion, axis: [f64; 3], angle: f64) -> qm3d_core::Result<Quaternion> {
    let step = Quaternion::for_rotation(&axis, angle)?;
    let mut turned = &step * orientation;
    turned.normalize();
    Ok(turned)
}

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    group: TriangleGroup,
    orientation: Quaternion,
    camera: CoordinateSys,
    renderer: AsciiRenderer,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(group: TriangleGroup) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        let group = fit_to_unit_sphere(&group).map_err(to_io_error)?;
        let camera = CoordinateSys::new("camera")
            .with_origin(Vector::from([0.0, 0.0, -CAMERA_DISTANCE]))
            .map_err(to_io_error)?;
        let orientation = turn(&Quaternion::identity(), [1.0, 0.0, 0.0], 0.3)
            .and_then(|q| turn(&q, [0.0, 1.0, 0.0], 0.3))
            .map_err(to_io_error)?;

        log::info!(
            "viewing {} faces, {} vertices on a {}x{} terminal",
            group.n_faces(),
            group.n_vertices(),
            width,
            height
        );

        Ok(Self {
            group,
            orientation,
            camera,
            renderer: AsciiRenderer::new(width as usize, height as usize),
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target

        while self.running {
            let frame_start = Instant::now();

            if event::poll(Duration::from_millis(0))? {
                self.handle_input()?;
            }

            self.update()?;
            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    fn handle_input(&mut self) -> io::Result<()> {
        if let Event::Key(KeyEvent { code, .. }) = event::read()? {
            let (axis, angle) = match code {
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.running = false;
                    return Ok(());
                }
                KeyCode::Char('w') | KeyCode::Up => ([1.0, 0.0, 0.0], KEY_STEP),
                KeyCode::Char('s') | KeyCode::Down => ([1.0, 0.0, 0.0], -KEY_STEP),
                KeyCode::Char('a') | KeyCode::Left => ([0.0, 1.0, 0.0], -KEY_STEP),
                KeyCode::Char('d') | KeyCode::Right => ([0.0, 1.0, 0.0], KEY_STEP),
                KeyCode::Char('e') => ([0.0, 0.0, 1.0], KEY_STEP),
                KeyCode::Char('r') => ([0.0, 0.0, 1.0], -KEY_STEP),
                _ => return Ok(()),
            };
            self.orientation = turn(&self.orientation, axis, angle).map_err(to_io_error)?;
        }
        Ok(())
    }

    fn update(&mut self) -> io::Result<()> {
        // Continuous slow spin for demo effect
        self.orientation = turn(&self.orientation, [0.0, 1.0, 0.0], 0.015).map_err(to_io_error)?;
        Ok(())
    }

    fn render(&mut self) -> io::Result<()> {
        let rotation = self.orientation.to_rotation_matrix();

        self.renderer.clear();
        self.renderer
            .render_group(&self.group, &rotation, &self.camera)
            .map_err(to_io_error)?;

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;

        self.renderer.draw(&mut stdout)?;

        // Draw UI overlay
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "QM3D Terminal Viewer | FPS: {:.1} | q = {} | WASD/Arrows=Rotate E/R=Roll Q=Quit",
                self.fps,
                self.orientation.to_hamilton_string()
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}
