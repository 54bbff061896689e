/// Terminal-based heightmap viewer built on the ASCII rasterizer
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use hmview_core::controls::{self, DragMode, DragState};
use hmview_core::{compute_frame, CameraParams, Mesh, ProjectionMode};
use std::io::{self, stdout, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

pub mod loader;
pub mod logging;
pub mod renderer;

pub use loader::{LoadOutcome, MeshLoader};
pub use renderer::AsciiRenderer;

/// Terminal cells are roughly twice as tall as they are wide
pub const CELL_ASPECT: f32 = 2.0;
/// Approximate pixel size of a terminal cell, used to scale drag distances
pub const CELL_WIDTH_PX: f32 = 8.0;
pub const CELL_HEIGHT_PX: f32 = 16.0;
/// Rotation per arrow key press, in radians
pub const KEY_ROTATE_STEP: f32 = 0.1;
/// Pixels of simulated drag per pan key press
pub const KEY_PAN_PIXELS: f32 = 20.0;
/// Height slider change per key press
pub const KEY_HEIGHT_STEP: f32 = 5.0;
/// Rows reserved at the top of the screen for the status line
const STATUS_ROWS: u16 = 1;

/// Start-up settings for the viewer
#[derive(Debug, Clone)]
pub struct ViewerOptions {
    pub wireframe: bool,
    pub projection: ProjectionMode,
    pub height_scale: f32,
    pub fps: u32,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            wireframe: false,
            projection: ProjectionMode::Perspective,
            height_scale: 1.0,
            fps: 30,
        }
    }
}

/// Main application struct for terminal heightmap rendering
pub struct TerminalApp {
    mesh: Mesh,
    camera: CameraParams,
    wireframe: bool,
    drag: DragState,
    loader: Option<MeshLoader>,
    renderer: AsciiRenderer,
    status: String,
    target_frame_time: Duration,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(mesh: Mesh, options: &ViewerOptions) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(Self::with_size(mesh, options, width, height))
    }

    pub fn with_size(mesh: Mesh, options: &ViewerOptions, width: u16, height: u16) -> Self {
        let camera = CameraParams {
            projection: options.projection,
            height_scale: options.height_scale,
            ..CameraParams::new()
        };
        let render_rows = height.saturating_sub(STATUS_ROWS);

        Self {
            mesh,
            camera,
            wireframe: options.wireframe,
            drag: DragState::default(),
            loader: None,
            renderer: AsciiRenderer::new(width as usize, render_rows as usize),
            status: String::from("default box"),
            target_frame_time: Duration::from_millis(1000 / options.fps.max(1) as u64),
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        }
    }

    pub fn camera(&self) -> &CameraParams {
        &self.camera
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn wireframe(&self) -> bool {
        self.wireframe
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Start decoding a heightmap; the current mesh stays on screen until it is ready
    pub fn load_in_background(&mut self, path: PathBuf) -> io::Result<()> {
        tracing::info!("loading heightmap {}", path.display());
        self.status = format!("loading {}", path.display());
        self.loader = Some(MeshLoader::spawn(path)?);
        Ok(())
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide
        )?;

        let result = self.main_loop();

        // Cleanup
        execute!(
            stdout(),
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show
        )?;
        terminal::disable_raw_mode()?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        while self.running {
            let frame_start = Instant::now();

            // Handle input
            while event::poll(Duration::from_millis(0))? {
                let event = event::read()?;
                self.handle_event(event);
            }

            // Swap in a finished mesh before this frame reads it
            self.poll_loader();

            // Render
            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < self.target_frame_time {
                std::thread::sleep(self.target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    fn poll_loader(&mut self) {
        let Some(outcome) = self.loader.as_ref().and_then(MeshLoader::poll) else {
            return;
        };
        self.loader = None;
        self.apply_load(outcome);
    }

    /// Replace the mesh with a finished load, or keep the old one on failure
    pub fn apply_load(&mut self, outcome: LoadOutcome) {
        match outcome {
            LoadOutcome::Loaded {
                path,
                width,
                height,
                mesh,
            } => {
                tracing::info!(
                    "terrain ready: {} x {} samples, {} triangles",
                    width,
                    height,
                    mesh.triangle_count()
                );
                self.mesh = mesh;
                self.status = format!("{} ({} x {})", path.display(), width, height);
            }
            LoadOutcome::Failed { path, reason } => {
                tracing::error!("invalid image file {}: {}", path.display(), reason);
                self.status = loader::LOAD_FAILED_MESSAGE.to_string();
            }
        }
    }

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(width, height) => {
                self.renderer
                    .resize(width as usize, height.saturating_sub(STATUS_ROWS) as usize);
            }
            _ => {}
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running = false;
            }
            KeyCode::Left => self.camera.rotate(-KEY_ROTATE_STEP, 0.0),
            KeyCode::Right => self.camera.rotate(KEY_ROTATE_STEP, 0.0),
            KeyCode::Up => self.camera.rotate(0.0, -KEY_ROTATE_STEP),
            KeyCode::Down => self.camera.rotate(0.0, KEY_ROTATE_STEP),
            KeyCode::Char('w') => controls::drag_pan(&mut self.camera, 0.0, -KEY_PAN_PIXELS),
            KeyCode::Char('s') => controls::drag_pan(&mut self.camera, 0.0, KEY_PAN_PIXELS),
            KeyCode::Char('a') => controls::drag_pan(&mut self.camera, -KEY_PAN_PIXELS, 0.0),
            KeyCode::Char('d') => controls::drag_pan(&mut self.camera, KEY_PAN_PIXELS, 0.0),
            KeyCode::Char('+') | KeyCode::Char('=') => controls::wheel_zoom(&mut self.camera, -1.0),
            KeyCode::Char('-') => controls::wheel_zoom(&mut self.camera, 1.0),
            KeyCode::Char('h') => self.step_height(-KEY_HEIGHT_STEP),
            KeyCode::Char('H') => self.step_height(KEY_HEIGHT_STEP),
            KeyCode::Char('p') => self.camera.toggle_projection(),
            KeyCode::Char('f') => self.wireframe = !self.wireframe,
            KeyCode::Char('r') => {
                self.camera = CameraParams {
                    projection: self.camera.projection,
                    height_scale: self.camera.height_scale,
                    ..CameraParams::new()
                };
            }
            _ => {}
        }
    }

    fn step_height(&mut self, delta: f32) {
        let value = (controls::height_slider_value(&self.camera) + delta).clamp(0.0, 100.0);
        controls::set_height_slider(&mut self.camera, value);
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let x = mouse.column as f32 * CELL_WIDTH_PX;
        let y = mouse.row as f32 * CELL_HEIGHT_PX;

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => self.drag.begin(DragMode::Rotate, x, y),
            MouseEventKind::Down(MouseButton::Right) => self.drag.begin(DragMode::Pan, x, y),
            MouseEventKind::Drag(_) => self.drag.update(&mut self.camera, x, y),
            MouseEventKind::Up(_) => self.drag.end(),
            MouseEventKind::ScrollUp => controls::wheel_zoom(&mut self.camera, -1.0),
            MouseEventKind::ScrollDown => controls::wheel_zoom(&mut self.camera, 1.0),
            _ => {}
        }
    }

    fn aspect(&self) -> f32 {
        self.renderer.width().max(1) as f32 / (self.renderer.height().max(1) as f32 * CELL_ASPECT)
    }

    fn render(&mut self) -> io::Result<()> {
        let frame = compute_frame(&self.camera, self.aspect());

        // Clear renderer
        self.renderer.clear();

        // Render mesh
        self.renderer
            .render_mesh(&self.mesh, &frame, self.camera.height_scale, self.wireframe);

        // Output to terminal
        let mut stdout = stdout();
        self.renderer.draw(&mut stdout, STATUS_ROWS)?;

        // Draw UI overlay
        let status: String = self.status_line().chars().take(self.renderer.width()).collect();
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            terminal::Clear(ClearType::CurrentLine),
            SetForegroundColor(Color::Yellow),
            Print(status),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }

    fn status_line(&self) -> String {
        format!(
            "HMView | FPS: {:.1} | {} | {} | zoom {:.2} | height {:.2} | {} | drag L=rotate R=pan, wheel=zoom, f=wireframe p=projection h/H=height q=quit",
            self.fps,
            if self.wireframe { "wireframe" } else { "solid" },
            self.camera.projection.name(),
            self.camera.zoom,
            self.camera.height_scale,
            self.status,
        )
    }
}
