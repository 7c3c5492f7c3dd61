//! # Fretboard Widget
//!
//! A six-string, 24-fret neck drawn on a canvas. The first string is at the top,
//! as in tablature.
//!
//! ## Features
//! - Target string highlighted
//! - Detected fret on the target string (green once the answer is confirmed)
//! - Optional hint rings on every fret that sounds the target note
//! - Click a string to practice on it only

use fretboard_core::guitar::{MAX_FRET, STRING_COUNT};
use iced::widget::canvas::{self, Event, Geometry, Path, Stroke, event};
use iced::widget::container;
use iced::{Color, Element, Point, Rectangle, Renderer, Size, Theme, mouse};

use crate::StringChoice;

/// Fret 0 (open strings) plus frets 1 to 24.
const FRET_SLOTS: usize = MAX_FRET as usize + 1;

const SINGLE_INLAYS: [usize; 8] = [3, 5, 7, 9, 15, 17, 19, 21];
const DOUBLE_INLAYS: [usize; 2] = [12, 24];

const TARGET_COLOR: Color = Color {
    r: 1.0,
    g: 0.84,
    b: 0.0,
    a: 1.0,
};
const CORRECT_COLOR: Color = Color {
    r: 0.2,
    g: 0.86,
    b: 0.6,
    a: 1.0,
};
const WRONG_COLOR: Color = Color {
    r: 1.0,
    g: 0.2,
    b: 0.2,
    a: 1.0,
};

#[derive(Debug, Clone)]
pub struct Fretboard {
    target_string: usize,
    detected_fret: Option<u8>,
    correct: bool,
    hint_frets: Vec<u8>,
}

impl Fretboard {
    pub fn new(
        target_string: usize,
        detected_fret: Option<u8>,
        correct: bool,
        hint_frets: Vec<u8>,
    ) -> Self {
        Self {
            target_string,
            detected_fret,
            correct,
            hint_frets,
        }
    }

    pub fn view(self) -> Element<'static, crate::Message> {
        container(
            canvas::Canvas::new(self)
                .width(iced::Length::Fill)
                .height(iced::Length::Fixed(150.0)),
        )
        .into()
    }
}

fn slot_width(bounds: Size) -> f32 {
    bounds.width / FRET_SLOTS as f32
}

fn row_height(bounds: Size) -> f32 {
    bounds.height / STRING_COUNT as f32
}

/// Centre of the given fret slot on the given string.
fn note_position(bounds: Size, string: usize, fret: usize) -> Point {
    Point::new(
        (fret as f32 + 0.5) * slot_width(bounds),
        (string as f32 + 0.5) * row_height(bounds),
    )
}

fn string_at(bounds: Size, pos: Point) -> Option<usize> {
    if pos.y < 0.0 || pos.y >= bounds.height {
        return None;
    }
    let row = (pos.y / row_height(bounds)) as usize;
    (row < STRING_COUNT).then_some(row)
}

impl<Message> canvas::Program<Message> for Fretboard
where
    Message: From<crate::Message>,
{
    type State = ();

    fn update(
        &self,
        _state: &mut Self::State,
        event: Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> (event::Status, Option<Message>) {
        if let Some(position) = cursor.position_in(bounds) {
            if let Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) = event {
                if let Some(string) = string_at(bounds.size(), position) {
                    return (
                        event::Status::Captured,
                        Some(crate::Message::StringSelected(StringChoice::Only(string)).into()),
                    );
                }
            }
        }
        (event::Status::Ignored, None)
    }

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let size = bounds.size();
        let mut frame = canvas::Frame::new(renderer, size);
        let slot = slot_width(size);
        let row = row_height(size);

        frame.fill(
            &Path::rectangle(Point::ORIGIN, size),
            Color::from_rgb8(0x3B, 0x2A, 0x1E),
        );

        // Inlays sit between the 2nd and 5th strings
        let inlay_radius = (slot.min(row) * 0.2).max(2.0);
        let inlay_color = Color::from_rgb8(0xD8, 0xD0, 0xC0);
        for fret in SINGLE_INLAYS {
            let centre = Point::new((fret as f32 + 0.5) * slot, size.height / 2.0);
            frame.fill(&Path::circle(centre, inlay_radius), inlay_color);
        }
        for fret in DOUBLE_INLAYS {
            let x = (fret as f32 + 0.5) * slot;
            for y in [row * 2.0, row * 4.0] {
                frame.fill(&Path::circle(Point::new(x, y), inlay_radius), inlay_color);
            }
        }

        // Nut and fret wires
        for fret in 0..FRET_SLOTS {
            let x = (fret as f32 + 1.0) * slot;
            let width = if fret == 0 { 4.0 } else { 1.5 };
            frame.stroke(
                &Path::line(Point::new(x, 0.0), Point::new(x, size.height)),
                Stroke::default()
                    .with_width(width)
                    .with_color(Color::from_rgb8(0xB0, 0xB0, 0xB0)),
            );
        }

        for string in 0..STRING_COUNT {
            let y = (string as f32 + 0.5) * row;
            let is_target = string == self.target_string;
            // wound strings are thicker
            let width = 1.0 + string as f32 * 0.4 + if is_target { 1.5 } else { 0.0 };
            let color = if is_target { TARGET_COLOR } else { Color::WHITE };
            frame.stroke(
                &Path::line(Point::new(slot, y), Point::new(size.width, y)),
                Stroke::default().with_width(width).with_color(color),
            );
        }

        let marker_radius = (slot.min(row) * 0.38).max(3.0);

        for &fret in &self.hint_frets {
            let centre = note_position(size, self.target_string, fret as usize);
            frame.stroke(
                &Path::circle(centre, marker_radius),
                Stroke::default().with_width(2.0).with_color(TARGET_COLOR),
            );
        }

        if let Some(fret) = self.detected_fret {
            let centre = note_position(size, self.target_string, fret as usize);
            let color = if self.correct { CORRECT_COLOR } else { WRONG_COLOR };
            frame.fill(&Path::circle(centre, marker_radius), color);
        }

        vec![frame.into_geometry()]
    }
}
