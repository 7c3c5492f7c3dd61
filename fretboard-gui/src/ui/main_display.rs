//! # Main Display Module
//!
//! Layout of the trainer window: the question, the live note, the fretboard and
//! the settings sidebar.

use fretboard_core::scales::{ALL_NOTES, MAJOR, MINOR};
use iced::widget::{Space, button, column, container, horizontal_space, pick_list, row, text};
use iced::{Alignment, Color, Element, Length};

use super::{cent_meter, fretboard};
use crate::{AppDisplayData, Message, StringChoice};

/// Configuration for a single button in the settings sidebar
#[derive(Debug, Clone)]
struct ButtonConfig {
    label: &'static str,
    message: Message,
    button_type: ButtonType,
}

#[derive(Debug, Clone)]
enum ButtonType {
    Standard,
    /// Highlighted while the given state is on.
    Toggle(fn(&AppDisplayData) -> bool),
}

const SETTINGS_CONFIG: &[(&str, &[ButtonConfig])] = &[
    (
        "Practice",
        &[
            ButtonConfig {
                label: "Next Question",
                message: Message::NextQuestion,
                button_type: ButtonType::Standard,
            },
            ButtonConfig {
                label: "Show Hint",
                message: Message::ToggleHint,
                button_type: ButtonType::Toggle(|data| data.show_hint),
            },
            ButtonConfig {
                label: "Listening",
                message: Message::ToggleListening,
                button_type: ButtonType::Toggle(|data| data.listening),
            },
        ],
    ),
    (
        "Program",
        &[ButtonConfig {
            label: "Save Settings",
            message: Message::SaveSettings,
            button_type: ButtonType::Standard,
        }],
    ),
];

const CORRECT_COLOR: Color = Color {
    r: 0.2,
    g: 0.86,
    b: 0.6,
    a: 1.0,
};
const MUTED_COLOR: Color = Color {
    r: 0.6,
    g: 0.6,
    b: 0.6,
    a: 1.0,
};

pub fn create_main_view(data: &AppDisplayData) -> Element<'static, Message> {
    let title = text("Fretboard Trainer").size(28);

    let main_content = row![
        column![
            title,
            Space::with_height(20),
            row![
                create_question_panel(data),
                Space::with_width(10),
                create_note_panel(data),
            ]
            .align_y(Alignment::Start),
            Space::with_height(10),
            create_fretboard_panel(data),
        ]
        .width(Length::Fill)
        .spacing(10),
        Space::with_width(10),
        create_sidebar(data),
    ]
    .align_y(Alignment::Start)
    .padding(20);

    container(main_content)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

fn create_question_panel(data: &AppDisplayData) -> Element<'static, Message> {
    let question = data.question;
    let string_label = question.target_string().map_or("?", |s| s.label);

    let feedback: Element<'static, Message> = if data.feedback.correct {
        text("Correct!").size(22).color(CORRECT_COLOR).into()
    } else if !data.listening {
        text("Paused").size(22).color(MUTED_COLOR).into()
    } else {
        match data.feedback.detected_fret {
            Some(fret) => text(format!("You are on fret {fret}")).size(22).into(),
            None => text("Listening...").size(22).color(MUTED_COLOR).into(),
        }
    };

    let mut content = column![
        text("Find").size(14),
        row![
            text(question.target_note.to_string()).size(48),
            Space::with_width(15),
            text(format!("on the {string_label} string")).size(20),
        ]
        .align_y(Alignment::Center),
        Space::with_height(10),
        feedback,
    ]
    .spacing(5);

    if let Some(status) = &data.status {
        content = content.push(text(status.clone()).size(14).color(Color::from_rgb(0.9, 0.3, 0.3)));
    }

    container(
        column![text("Question").size(18), Space::with_height(10), content]
            .spacing(5)
            .padding(15),
    )
    .width(Length::Fill)
    .height(Length::Fixed(200.0))
    .into()
}

fn create_note_panel(data: &AppDisplayData) -> Element<'static, Message> {
    let note = data.current_note;
    let (note_text, freq_text, cents) = if note.is_empty() {
        ("--".to_string(), "0.00 Hz".to_string(), None)
    } else {
        (
            format!("{}{}", note.note_name(), note.octave()),
            format!("{:.2} Hz", note.frequency()),
            Some(note.cents_off()),
        )
    };
    let cents_text = cents.map_or_else(String::new, |c| format!("{c:+} ct"));

    let content = column![
        row![
            text(note_text).size(32),
            Space::with_width(10),
            text(freq_text).size(20),
            horizontal_space(),
            text(cents_text).size(16),
        ]
        .align_y(Alignment::Center),
        Space::with_height(10),
        cent_meter::CentMeter::new(cents).view(),
    ]
    .spacing(5);

    container(
        column![text("Detected Note").size(18), Space::with_height(10), content]
            .spacing(5)
            .padding(15),
    )
    .width(Length::Fill)
    .height(Length::Fixed(200.0))
    .into()
}

fn create_fretboard_panel(data: &AppDisplayData) -> Element<'static, Message> {
    let hint_frets = if data.show_hint {
        data.question.fret_positions()
    } else {
        Vec::new()
    };
    let board = fretboard::Fretboard::new(
        data.question.target_string_index,
        data.feedback.detected_fret,
        data.feedback.correct,
        hint_frets,
    );

    container(
        column![
            row![
                text("Fretboard").size(18),
                horizontal_space(),
                text(format!("Solved: {}", data.solved)).size(14),
            ],
            Space::with_height(10),
            board.view(),
        ]
        .spacing(5)
        .padding(15),
    )
    .width(Length::Fill)
    .height(Length::Fixed(220.0))
    .into()
}

fn scale_names() -> Vec<&'static str> {
    std::iter::once(ALL_NOTES.name)
        .chain(MAJOR.iter().map(|s| s.name))
        .chain(MINOR.iter().map(|s| s.name))
        .collect()
}

fn create_sidebar(data: &AppDisplayData) -> Element<'static, Message> {
    let mut sections = column![].spacing(10);

    for (title, buttons) in SETTINGS_CONFIG {
        sections = sections.push(make_settings_section(title, buttons, data));
    }

    sections = sections.push(
        column![
            text("Notes").size(18),
            Space::with_height(10),
            pick_list(scale_names(), Some(data.scale_name), Message::ScaleSelected)
                .width(Length::Fill),
            Space::with_height(10),
            text("String").size(18),
            Space::with_height(10),
            pick_list(StringChoice::ALL, Some(data.string_choice), Message::StringSelected)
                .width(Length::Fill),
        ]
        .spacing(5),
    );

    container(sections.padding(15))
        .width(Length::Fixed(250.0))
        .height(Length::Fill)
        .into()
}

fn make_button(config: &ButtonConfig, data: &AppDisplayData) -> Element<'static, Message> {
    let mut button = button(text(config.label).size(14).width(Length::Fill)).padding([6, 10]);

    if let ButtonType::Toggle(is_on) = config.button_type {
        if is_on(data) {
            button = button.style(|_theme, _status| {
                use iced::widget::button;
                button::Style {
                    background: Some(iced::Background::Color(Color::from_rgb(0.2, 0.6, 0.3))),
                    text_color: Color::WHITE,
                    ..button::Style::default()
                }
            });
        }
    }

    button.on_press(config.message.clone()).into()
}

fn make_settings_section(
    title: &'static str,
    buttons: &[ButtonConfig],
    data: &AppDisplayData,
) -> Element<'static, Message> {
    let items_widget = buttons
        .iter()
        .fold(column![].spacing(8), |col, config| col.push(make_button(config, data)));

    column![text(title).size(18), Space::with_height(10), items_widget]
        .spacing(5)
        .into()
}
