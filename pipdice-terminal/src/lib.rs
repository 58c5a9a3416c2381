/// Terminal dice roller: renders a die as ASCII and animates rolls into
/// the settle orientation of the rolled value
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use log::{debug, info};
use nalgebra::{Quaternion, Unit, UnitQuaternion, Vector3};
use pipdice_core::{
    build_die, Camera, Die, LabelBitmap, LabelCache, LabelStyle, OrientationTween,
    RasterLabelGenerator, Rgb, Transform,
};
use rand::Rng;
use std::f32::consts::TAU;
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

pub mod renderer;

pub use renderer::AsciiRenderer;

/// Side counts the `n` key cycles through
pub const DIE_CYCLE: [u32; 6] = [4, 6, 8, 10, 12, 20];
/// Body colors the `c` key cycles through
const PALETTE: [Rgb; 4] = [
    Rgb::WHITE,
    Rgb::new(220, 60, 60),
    Rgb::new(70, 140, 230),
    Rgb::new(90, 200, 120),
];
const ROLL_DURATION: Duration = Duration::from_millis(1200);
/// Edge length, in cells, of the label preview in the corner
const LABEL_PREVIEW: usize = 10;

/// Uniformly distributed random rotation
pub fn random_orientation<R: Rng + ?Sized>(rng: &mut R) -> UnitQuaternion<f32> {
    let (u1, u2, u3): (f32, f32, f32) = (rng.gen(), rng.gen(), rng.gen());
    let (a, b) = ((1.0 - u1).sqrt(), u1.sqrt());
    UnitQuaternion::from_quaternion(Quaternion::new(
        b * (TAU * u3).cos(),
        a * (TAU * u2).sin(),
        a * (TAU * u2).cos(),
        b * (TAU * u3).sin(),
    ))
}

/// A roll in flight
struct Roll {
    value: u32,
    tween: OrientationTween,
    started: Instant,
}

/// Main application struct for the terminal dice roller
pub struct TerminalApp {
    die: Die<LabelBitmap>,
    images: LabelCache<RasterLabelGenerator>,
    palette_index: usize,
    rotation: UnitQuaternion<f32>,
    roll: Option<Roll>,
    result: Option<u32>,
    camera: Camera,
    renderer: AsciiRenderer,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    /// Set up a roller for a `sides`-sided die; zero sides is rejected
    pub fn new(sides: u32) -> io::Result<Self> {
        if sides == 0 {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, "a die needs at least one side"));
        }
        let (width, height) = terminal::size()?;
        let mut images = LabelCache::new(RasterLabelGenerator::default());
        let die = build_die(sides, PALETTE[0], LabelStyle::Number, &mut images)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

        Ok(Self {
            die,
            images,
            palette_index: 0,
            rotation: UnitQuaternion::from_euler_angles(0.4, 0.6, 0.0),
            roll: None,
            result: None,
            camera: Camera::new(width as u32, height as u32),
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

            self.update();
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
            match code {
                KeyCode::Char('q') | KeyCode::Esc => self.running = false,
                KeyCode::Char(' ') | KeyCode::Enter => self.start_roll(),
                KeyCode::Char('n') => self.next_die()?,
                KeyCode::Char('t') => self.restyle(self.die.color(), toggled(self.die.style()))?,
                KeyCode::Char('c') => {
                    self.palette_index = (self.palette_index + 1) % PALETTE.len();
                    self.restyle(PALETTE[self.palette_index], self.die.style())?;
                }
                KeyCode::Char('w') | KeyCode::Up => self.nudge(Vector3::x(), -0.1),
                KeyCode::Char('s') | KeyCode::Down => self.nudge(Vector3::x(), 0.1),
                KeyCode::Char('a') | KeyCode::Left => self.nudge(Vector3::y(), -0.1),
                KeyCode::Char('d') | KeyCode::Right => self.nudge(Vector3::y(), 0.1),
                _ => {}
            }
        }
        Ok(())
    }

    /// Pick a result and animate towards it; unlabeled dice tumble to a random pose
    fn start_roll(&mut self) {
        let mut rng = rand::thread_rng();
        let value = rng.gen_range(1..=self.die.sides());
        let to = self
            .die
            .resolve_orientation(value)
            .unwrap_or_else(|| random_orientation(&mut rng));
        debug!("rolling d{} -> {value}", self.die.sides());

        self.result = None;
        self.roll = Some(Roll {
            value,
            tween: OrientationTween::new(self.rotation, to),
            started: Instant::now(),
        });
    }

    fn next_die(&mut self) -> io::Result<()> {
        let position = DIE_CYCLE.iter().position(|&s| s == self.die.sides());
        let sides = DIE_CYCLE[position.map_or(0, |i| (i + 1) % DIE_CYCLE.len())];
        self.die = build_die(sides, self.die.color(), self.die.style(), &mut self.images)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        self.roll = None;
        self.result = None;
        Ok(())
    }

    fn restyle(&mut self, color: Rgb, style: LabelStyle) -> io::Result<()> {
        self.die = self
            .die
            .rebuild_with(color, style, &mut self.images)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        Ok(())
    }

    fn nudge(&mut self, axis: Vector3<f32>, angle: f32) {
        if self.roll.is_none() {
            let turn = UnitQuaternion::from_axis_angle(&Unit::new_normalize(axis), angle);
            self.rotation = turn * self.rotation;
        }
    }

    fn update(&mut self) {
        let Some(roll) = &self.roll else { return };
        let progress = roll.started.elapsed().as_secs_f32() / ROLL_DURATION.as_secs_f32();
        self.rotation = roll.tween.sample(progress);
        if progress >= 1.0 {
            info!("d{} rolled {}", self.die.sides(), roll.value);
            self.result = Some(roll.value);
            self.roll = None;
        }
    }

    fn render(&mut self) -> io::Result<()> {
        let model = Transform::model_matrix(&self.rotation);

        self.renderer.clear();
        self.renderer
            .render_mesh(self.die.mesh(), &model, &self.camera, self.die.color());

        if let Some(value) = self.result {
            if let Some(label) = self.die.labels().iter().find(|l| l.value == value) {
                self.renderer
                    .draw_label(&label.image, 1, 2, LABEL_PREVIEW * 2, LABEL_PREVIEW);
            }
        }

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;
        self.renderer.draw(&mut stdout)?;

        let status = match (self.result, &self.roll) {
            (_, Some(_)) => "rolling...".to_string(),
            (Some(value), None) => format!("rolled {value}"),
            (None, None) => "press space to roll".to_string(),
        };
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "PipDice | d{} | {} | FPS: {:.1} | Space=Roll N=Next die T=Style C=Color Q=Quit",
                self.die.sides(),
                status,
                self.fps
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

fn toggled(style: LabelStyle) -> LabelStyle {
    match style {
        LabelStyle::Number => LabelStyle::Dots,
        LabelStyle::Dots => LabelStyle::Number,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_random_orientation_is_unit() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let q = random_orientation(&mut rng);
            assert!((q.quaternion().norm() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_zero_sides_rejected() {
        let err = TerminalApp::new(0).err().map(|e| e.kind());
        assert_eq!(err, Some(io::ErrorKind::InvalidInput));
    }

    #[test]
    fn test_style_toggle() {
        assert_eq!(toggled(LabelStyle::Number), LabelStyle::Dots);
        assert_eq!(toggled(toggled(LabelStyle::Number)), LabelStyle::Number);
    }
}
