use crate::storage::{Storage, THEME_KEY};
use ratatui::style::{Color, Modifier, Style};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Reads the saved theme. Anything other than `"dark"` is light.
    pub fn load(storage: &dyn Storage) -> Self {
        match storage.get_item(THEME_KEY) {
            Ok(Some(value)) if value.trim() == "dark" => Theme::Dark,
            Ok(_) => Theme::Light,
            Err(err) => {
                warn!(error = %err, "failed to read theme");
                Theme::Light
            }
        }
    }

    pub fn save(self, storage: &dyn Storage) {
        if let Err(err) = storage.set_item(THEME_KEY, self.as_str()) {
            warn!(error = %err, "failed to save theme");
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            Theme::Light => Palette {
                base: Style::default().fg(Color::Black).bg(Color::White),
                border: Style::default().fg(Color::DarkGray),
                focus: Style::default().fg(Color::Blue),
                drop_target: Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
                selected: Style::default()
                    .bg(Color::Gray)
                    .add_modifier(Modifier::BOLD),
                dragging: Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
                muted: Style::default().fg(Color::DarkGray),
                toast: Style::default().fg(Color::White).bg(Color::Blue),
            },
            Theme::Dark => Palette {
                base: Style::default().fg(Color::White).bg(Color::Black),
                border: Style::default().fg(Color::Gray),
                focus: Style::default().fg(Color::Cyan),
                drop_target: Style::default()
                    .fg(Color::LightGreen)
                    .add_modifier(Modifier::BOLD),
                selected: Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
                dragging: Style::default()
                    .fg(Color::Gray)
                    .add_modifier(Modifier::ITALIC),
                muted: Style::default().fg(Color::Gray),
                toast: Style::default().fg(Color::Black).bg(Color::Cyan),
            },
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub base: Style,
    pub border: Style,
    pub focus: Style,
    pub drop_target: Style,
    pub selected: Style,
    pub dragging: Style,
    pub muted: Style,
    pub toast: Style,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn defaults_to_light_and_round_trips() {
        let storage = MemoryStorage::new();
        assert_eq!(Theme::load(&storage), Theme::Light);

        Theme::Light.toggled().save(&storage);
        assert_eq!(storage.get_item(THEME_KEY).unwrap().as_deref(), Some("dark"));
        assert_eq!(Theme::load(&storage), Theme::Dark);
    }

    #[test]
    fn unknown_value_falls_back_to_light() {
        let storage = MemoryStorage::new();
        storage.set_item(THEME_KEY, "solarized").unwrap();
        assert_eq!(Theme::load(&storage), Theme::Light);
    }
}
