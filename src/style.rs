use iced::widget::{container, text, text_input};
use iced::{Border, Color, Theme};

// Main theme colors
pub const PRIMARY: Color = Color::from_rgb(0.0, 0.4, 0.8);
pub const BACKGROUND: Color = Color::from_rgb(0.05, 0.05, 0.1);
pub const TEXT: Color = Color::from_rgb(0.9, 0.9, 0.9);
pub const MUTED: Color = Color::from_rgb(0.6, 0.6, 0.6);
pub const ERROR: Color = Color::from_rgb(0.9, 0.2, 0.2);
pub const SUCCESS: Color = Color::from_rgb(0.0, 0.8, 0.3);
pub const WARNING: Color = Color::from_rgb(0.9, 0.6, 0.0);

pub fn custom_theme() -> Theme {
    let palette = iced::theme::Palette {
        background: BACKGROUND,
        text: TEXT,
        primary: PRIMARY,
        success: SUCCESS,
        danger: ERROR,
    };

    Theme::custom("usb-print-dark".to_string(), palette)
}

pub fn bordered_box(theme: &Theme) -> container::Style {
    let palette = theme.extended_palette();

    container::Style {
        background: Some(palette.background.weak.color.into()),
        border: Border {
            width: 1.0,
            radius: 5.0.into(),
            color: palette.background.strong.color,
        },
        ..container::Style::default()
    }
}

// Card for a device in the list
pub fn device_card_container(theme: &Theme) -> container::Style {
    let palette = theme.extended_palette();

    container::Style {
        background: Some(palette.background.base.color.into()),
        border: Border {
            width: 1.0,
            radius: 8.0.into(),
            color: palette.background.strong.color,
        },
        text_color: Some(TEXT),
        ..container::Style::default()
    }
}

// Card for the device currently stored as the target
pub fn selected_device_card_container(theme: &Theme) -> container::Style {
    let palette = theme.extended_palette();

    container::Style {
        background: Some(palette.primary.weak.color.into()),
        border: Border {
            width: 2.0,
            radius: 8.0.into(),
            color: palette.primary.base.color,
        },
        text_color: Some(palette.primary.weak.text),
        ..container::Style::default()
    }
}

pub fn default_text_input(theme: &Theme, _status: text_input::Status) -> text_input::Style {
    let palette = theme.extended_palette();

    text_input::Style {
        background: palette.background.weak.color.into(),
        border: Border {
            radius: 5.0.into(),
            width: 1.0,
            color: palette.background.strong.color,
        },
        icon: TEXT,
        placeholder: palette.background.strong.color,
        value: TEXT,
        selection: palette.primary.weak.color,
    }
}

pub fn warning_text(_theme: &Theme) -> text::Style {
    text::Style {
        color: Some(WARNING),
    }
}

pub fn muted_text(_theme: &Theme) -> text::Style {
    text::Style { color: Some(MUTED) }
}
