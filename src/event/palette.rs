use std::fmt;

/// The closed set of colors an event can be tagged with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EventColor {
    #[default]
    Blue,
    Red,
    Green,
    Orange,
    Purple,
    Pink,
    Teal,
    Indigo,
}

impl EventColor {
    pub const ALL: [EventColor; 8] = [
        EventColor::Blue,
        EventColor::Red,
        EventColor::Green,
        EventColor::Orange,
        EventColor::Purple,
        EventColor::Pink,
        EventColor::Teal,
        EventColor::Indigo,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EventColor::Blue => "Blue",
            EventColor::Red => "Red",
            EventColor::Green => "Green",
            EventColor::Orange => "Orange",
            EventColor::Purple => "Purple",
            EventColor::Pink => "Pink",
            EventColor::Teal => "Teal",
            EventColor::Indigo => "Indigo",
        }
    }

    /// Exact, case-sensitive lookup by palette name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|color| color.name() == name)
    }

    /// Like [`EventColor::from_name`], but unknown names resolve to the default.
    pub fn resolve(name: &str) -> Self {
        Self::from_name(name).unwrap_or_default()
    }

    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            EventColor::Blue => (0, 122, 255),
            EventColor::Red => (255, 59, 48),
            EventColor::Green => (52, 199, 89),
            EventColor::Orange => (255, 149, 0),
            EventColor::Purple => (175, 82, 222),
            EventColor::Pink => (255, 45, 85),
            EventColor::Teal => (48, 176, 199),
            EventColor::Indigo => (88, 86, 214),
        }
    }
}

impl fmt::Display for EventColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub const DEFAULT_ICON: &str = "calendar";

/// Suggested icons. Events may carry any icon name; renderers fall back on
/// their own for names they don't know.
pub const AVAILABLE_ICONS: [&str; 16] = [
    "calendar",
    "birthday.cake",
    "airplane",
    "gift",
    "graduationcap",
    "heart",
    "party.popper",
    "bell",
    "gamecontroller",
    "film",
    "music.note",
    "book",
    "figure.run",
    "car",
    "house",
    "briefcase",
];
