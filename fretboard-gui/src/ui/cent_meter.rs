//! # Cent Meter Widget
//!
//! Shows how far the played note is from the nearest semitone, from -50 to +50
//! cents, with a needle and an in-tune band around the centre.

use iced::widget::canvas::{self, Geometry, Path, Stroke};
use iced::widget::container;
use iced::{Color, Element, Point, Rectangle, Renderer, Size, Theme, mouse};

/// Half-width of the scale in cents.
const METER_RANGE: f32 = 50.0;

/// Deviations inside this band count as in tune.
const IN_TUNE_CENTS: i32 = 5;

pub struct CentMeter {
    cents: Option<i32>,
}

impl CentMeter {
    /// `None` draws the empty scale without a needle.
    pub fn new(cents: Option<i32>) -> Self {
        Self { cents }
    }

    pub fn view(self) -> Element<'static, crate::Message> {
        container(
            canvas::Canvas::new(self)
                .width(iced::Length::Fill)
                .height(iced::Length::Fixed(60.0)),
        )
        .into()
    }
}

fn x_for_cents(cents: f32, width: f32) -> f32 {
    (cents.clamp(-METER_RANGE, METER_RANGE) + METER_RANGE) / (2.0 * METER_RANGE) * width
}

fn needle_color(cents: i32) -> Color {
    match cents.abs() {
        c if c <= IN_TUNE_CENTS => Color::from_rgb8(0x34, 0xDB, 0x98),
        c if c < 20 => Color::from_rgb8(0xFF, 0xC3, 0x00),
        _ => Color::from_rgb8(0xFF, 0x33, 0x33),
    }
}

impl<Message> canvas::Program<Message> for CentMeter {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());
        let width = bounds.width;
        let height = bounds.height;

        frame.fill(
            &Path::rectangle(Point::ORIGIN, bounds.size()),
            Color::from_rgb8(0x40, 0x40, 0x40),
        );

        let band_left = x_for_cents(-IN_TUNE_CENTS as f32, width);
        let band_right = x_for_cents(IN_TUNE_CENTS as f32, width);
        frame.fill(
            &Path::rectangle(
                Point::new(band_left, 0.0),
                Size::new(band_right - band_left, height),
            ),
            Color::from_rgba8(0x34, 0xDB, 0x98, 0.25),
        );

        for tick in (-50..=50).step_by(10) {
            let x = x_for_cents(tick as f32, width);
            let (len, stroke_width) = if tick == 0 { (height, 2.0) } else { (height * 0.3, 1.0) };
            frame.stroke(
                &Path::line(Point::new(x, height - len), Point::new(x, height)),
                Stroke::default()
                    .with_width(stroke_width)
                    .with_color(Color::WHITE),
            );
        }

        if let Some(cents) = self.cents {
            let x = x_for_cents(cents as f32, width);
            let needle = Path::rectangle(Point::new(x - 2.0, 0.0), Size::new(4.0, height));
            frame.fill(&needle, needle_color(cents));
        }

        vec![frame.into_geometry()]
    }
}
