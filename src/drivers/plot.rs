use std::io::Cursor;
use std::path::PathBuf;
use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};
use plotters::prelude::*;
use crate::drivers::error::ScopeError;
/// Display width in pixels.
pub const SCREEN_WIDTH: u32 = 240;
/// Display height in pixels.
pub const SCREEN_HEIGHT: u32 = 135;
/// Strip along the top edge reserved for labels and the status icon.
pub const LABEL_STRIP: u32 = 16;
/// Glyph cell height of the label font.
pub const FONT_HEIGHT: i32 = 16;
/// Rows available to traces.
pub const PLOT_HEIGHT: u32 = SCREEN_HEIGHT - LABEL_STRIP;
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TraceColor {
    Black,
    White,
    Yellow,
    Magenta,
    Red,
}
impl TraceColor {
    fn rgb(self) -> RGBColor {
        match self {
            TraceColor::Black => BLACK,
            TraceColor::White => WHITE,
            TraceColor::Yellow => YELLOW,
            TraceColor::Magenta => MAGENTA,
            TraceColor::Red => RED,
        }
    }
}
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Icon {
    Wifi,
}
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridSpec {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub x_divisions: u32,
    pub y_divisions: u32,
    /// Draw the zero line through the middle of the grid.
    pub center_axis: bool,
}
/// The small display the scope draws on. Coordinates start at the bottom-left
/// corner with y growing upward.
pub trait Screen {
    fn clear(&mut self) -> Result<(), ScopeError>;
    fn render_grid(&mut self, grid: GridSpec) -> Result<(), ScopeError>;
    fn render_series(&mut self, color: TraceColor, xs: &[i32], ys: &[i32]) -> Result<(), ScopeError>;
    fn render_text(&mut self, text: &str, x: i32, y: i32, color: TraceColor) -> Result<(), ScopeError>;
    fn render_icon(&mut self, icon: Icon, x: i32, y: i32) -> Result<(), ScopeError>;
    /// Push everything drawn since the last clear to the panel.
    fn present(&mut self) -> Result<(), ScopeError>;
}
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Grid(GridSpec),
    Series {
        color: TraceColor,
        points: Vec<(i32, i32)>,
    },
    Text {
        text: String,
        x: i32,
        y: i32,
        color: TraceColor,
    },
    Icon {
        icon: Icon,
        x: i32,
        y: i32,
    },
}
/// Screen that rasterizes each presented frame into a numbered PNG file.
pub struct PngScreen {
    output_dir: PathBuf,
    commands: Vec<DrawCommand>,
    frame_index: usize,
}
impl PngScreen {
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self, ScopeError> {
        let output_dir = output_dir.into();
        std::fs::create_dir_all(&output_dir)?;
        Ok(Self {
            output_dir,
            commands: Vec::new(),
            frame_index: 0,
        })
    }
    pub fn frames_written(&self) -> usize {
        self.frame_index
    }
}
impl Screen for PngScreen {
    fn clear(&mut self) -> Result<(), ScopeError> {
        self.commands.clear();
        Ok(())
    }
    fn render_grid(&mut self, grid: GridSpec) -> Result<(), ScopeError> {
        self.commands.push(DrawCommand::Grid(grid));
        Ok(())
    }
    fn render_series(&mut self, color: TraceColor, xs: &[i32], ys: &[i32]) -> Result<(), ScopeError> {
        let points = xs.iter().copied().zip(ys.iter().copied()).collect();
        self.commands.push(DrawCommand::Series { color, points });
        Ok(())
    }
    fn render_text(&mut self, text: &str, x: i32, y: i32, color: TraceColor) -> Result<(), ScopeError> {
        self.commands.push(DrawCommand::Text {
            text: text.to_owned(),
            x,
            y,
            color,
        });
        Ok(())
    }
    fn render_icon(&mut self, icon: Icon, x: i32, y: i32) -> Result<(), ScopeError> {
        self.commands.push(DrawCommand::Icon { icon, x, y });
        Ok(())
    }
    fn present(&mut self) -> Result<(), ScopeError> {
        let png = render_frame_png(&self.commands)?;
        let path = self
            .output_dir
            .join(format!("frame_{:04}.png", self.frame_index));
        std::fs::write(&path, png)?;
        log::debug!("wrote {}", path.display());
        self.frame_index += 1;
        Ok(())
    }
}
/// Flip from the panel's bottom-left origin to bitmap rows.
fn to_bitmap(x: i32, y: i32) -> (i32, i32) {
    (x, SCREEN_HEIGHT as i32 - 1 - y)
}
pub fn render_frame_png(commands: &[DrawCommand]) -> Result<Vec<u8>, ScopeError> {
    let mut buffer = vec![0u8; (SCREEN_WIDTH * SCREEN_HEIGHT * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (SCREEN_WIDTH, SCREEN_HEIGHT))
            .into_drawing_area();
        root.fill(&TraceColor::Black.rgb())?;
        for command in commands {
            match command {
                DrawCommand::Grid(grid) => draw_grid(&root, grid)?,
                DrawCommand::Series { color, points } => {
                    let series = points.iter().map(|&(x, y)| to_bitmap(x, y));
                    root.draw(&PathElement::new(series.collect::<Vec<_>>(), color.rgb()))?;
                }
                DrawCommand::Text { text, x, y, color } => {
                    // Anchor is the bottom-left corner of the text box.
                    let (bx, by) = to_bitmap(*x, *y + FONT_HEIGHT - 1);
                    let style = ("sans-serif", 16).into_font().color(&color.rgb());
                    root.draw(&Text::new(text.clone(), (bx, by), style))?;
                }
                DrawCommand::Icon { icon, x, y } => draw_icon(&root, *icon, *x, *y)?,
            }
        }
        root.present()?;
    }
    encode_png(&buffer, SCREEN_WIDTH, SCREEN_HEIGHT)
}
fn draw_grid<DB: DrawingBackend>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
    grid: &GridSpec,
) -> Result<(), ScopeError>
where
    DB::ErrorType: 'static,
{
    let line = WHITE.mix(0.25);
    let (left, bottom) = (grid.x, grid.y);
    let (right, top) = (
        grid.x + grid.width as i32 - 1,
        grid.y + grid.height as i32 - 1,
    );
    for i in 0..=grid.x_divisions {
        let x = left + (i * (grid.width - 1) / grid.x_divisions.max(1)) as i32;
        root.draw(&PathElement::new(
            vec![to_bitmap(x, bottom), to_bitmap(x, top)],
            line,
        ))?;
    }
    for j in 0..=grid.y_divisions {
        let y = bottom + (j * (grid.height - 1) / grid.y_divisions.max(1)) as i32;
        root.draw(&PathElement::new(
            vec![to_bitmap(left, y), to_bitmap(right, y)],
            line,
        ))?;
    }
    if grid.center_axis {
        let mid = bottom + grid.height as i32 / 2;
        root.draw(&PathElement::new(
            vec![to_bitmap(left, mid), to_bitmap(right, mid)],
            WHITE.mix(0.7),
        ))?;
    }
    Ok(())
}
fn draw_icon<DB: DrawingBackend>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
    icon: Icon,
    x: i32,
    y: i32,
) -> Result<(), ScopeError>
where
    DB::ErrorType: 'static,
{
    match icon {
        Icon::Wifi => {
            // Dot plus three arcs fanning upward inside a 16x16 cell.
            let center = (x + 8, y + 2);
            root.draw(&Circle::new(to_bitmap(center.0, center.1), 1, WHITE.filled()))?;
            for radius in [5.0f64, 9.0, 13.0] {
                let arc: Vec<(i32, i32)> = (0..=12)
                    .map(|step| {
                        let angle = std::f64::consts::PI * (0.25 + 0.5 * step as f64 / 12.0);
                        to_bitmap(
                            center.0 + (radius * angle.cos()).round() as i32,
                            center.1 + (radius * angle.sin()).round() as i32,
                        )
                    })
                    .collect();
                root.draw(&PathElement::new(arc, WHITE))?;
            }
        }
    }
    Ok(())
}
fn encode_png(buffer: &[u8], width: u32, height: u32) -> Result<Vec<u8>, ScopeError> {
    let image = ImageBuffer::<Rgb<u8>, _>::from_raw(width, height, buffer.to_vec())
        .ok_or_else(|| ScopeError::Render("failed to allocate image buffer".into()))?;
    let mut output = Vec::new();
    let dynamic = DynamicImage::ImageRgb8(image);
    dynamic.write_to(&mut Cursor::new(&mut output), ImageFormat::Png)?;
    Ok(output)
}
#[cfg(test)]
mod tests {
    use super::*;
    fn grid() -> GridSpec {
        GridSpec {
            x: 0,
            y: 0,
            width: SCREEN_WIDTH,
            height: PLOT_HEIGHT,
            x_divisions: 10,
            y_divisions: 6,
            center_axis: true,
        }
    }
    #[test]
    fn frame_renders_to_png() {
        let xs: Vec<i32> = (0..240).collect();
        let ys: Vec<i32> = xs.iter().map(|x| x % 119).collect();
        let commands = vec![
            DrawCommand::Grid(grid()),
            DrawCommand::Series {
                color: TraceColor::Yellow,
                points: xs.into_iter().zip(ys).collect(),
            },
            DrawCommand::Icon {
                icon: Icon::Wifi,
                x: 224,
                y: PLOT_HEIGHT as i32,
            },
        ];
        let png = render_frame_png(&commands).unwrap();
        assert_eq!(&png[1..4], b"PNG");
    }
    #[test]
    fn png_screen_writes_one_file_per_frame() {
        let dir = std::env::temp_dir().join(format!("uscope-frames-{}", std::process::id()));
        let mut screen = PngScreen::new(&dir).unwrap();
        screen.clear().unwrap();
        screen.render_grid(grid()).unwrap();
        screen.render_series(TraceColor::Magenta, &[0, 1, 2], &[0, 5, 0]).unwrap();
        screen.present().unwrap();
        screen.clear().unwrap();
        screen.present().unwrap();
        assert_eq!(screen.frames_written(), 2);
        assert!(dir.join("frame_0000.png").exists());
        assert!(dir.join("frame_0001.png").exists());
        std::fs::remove_dir_all(&dir).ok();
    }
}
