use nu_ansi_term::{Color, Style};

use crate::render::Role;

pub mod catppuccin {
    use nu_ansi_term::Color;
    pub struct Mocha;
    impl Mocha {
        // Base colors
        pub const SURFACE2: Color = Color::Rgb(108, 112, 134); // Subtle dim
        pub const BASE: Color = Color::Rgb(30, 30, 46);

        // Accents
        pub const GREEN: Color = Color::Rgb(166, 227, 161);
        pub const BLUE: Color = Color::Rgb(137, 180, 250);
        pub const MAUVE: Color = Color::Rgb(203, 166, 247);
        pub const PEACH: Color = Color::Rgb(250, 179, 135);
    }
}

/// Named starting points for a [`Palette`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeName {
    Classic,
    Mocha,
}

impl ThemeName {
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "classic" | "default" => Some(ThemeName::Classic),
            "mocha" | "catppuccin" => Some(ThemeName::Mocha),
            _ => None,
        }
    }
}

/// Terminal styles for each frame [`Role`].
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    pub muted: Style,
    pub cursor: Style,
    pub printable: Style,
    pub border: Style,
    pub status: Style,
}

impl Default for Palette {
    fn default() -> Self {
        Self::classic()
    }
}

impl Palette {
    /// Gray dim text, blue cursor background, green printable characters.
    pub fn classic() -> Self {
        Self {
            muted: Style::new().fg(Color::DarkGray),
            cursor: Style::new().on(Color::Blue),
            printable: Style::new().fg(Color::Green),
            border: Style::new(),
            status: Style::new().fg(Color::DarkGray),
        }
    }

    pub fn mocha() -> Self {
        use catppuccin::Mocha;
        Self {
            muted: Style::new().fg(Mocha::SURFACE2),
            cursor: Style::new().fg(Mocha::BASE).on(Mocha::BLUE).bold(),
            printable: Style::new().fg(Mocha::GREEN),
            border: Style::new().fg(Mocha::MAUVE),
            status: Style::new().fg(Mocha::PEACH),
        }
    }

    pub fn named(name: ThemeName) -> Self {
        match name {
            ThemeName::Classic => Self::classic(),
            ThemeName::Mocha => Self::mocha(),
        }
    }

    pub fn style(&self, role: Role) -> Style {
        match role {
            Role::Plain => Style::new(),
            Role::Muted => self.muted,
            Role::Cursor => self.cursor,
            Role::Printable => self.printable,
            Role::Border => self.border,
            Role::Status => self.status,
        }
    }
}

/// Parse `"#RRGGBB"` or a color name.
pub fn parse_color(value: &str) -> Option<Color> {
    let s = value.trim();
    if let Some(hex) = s.strip_prefix('#') {
        if hex.len() == 6 && hex.is_ascii() {
            if let (Ok(r), Ok(g), Ok(b)) = (
                u8::from_str_radix(&hex[0..2], 16),
                u8::from_str_radix(&hex[2..4], 16),
                u8::from_str_radix(&hex[4..6], 16),
            ) {
                return Some(Color::Rgb(r, g, b));
            }
        }
        return None;
    }

    let name = s.to_ascii_lowercase();
    Some(match name.as_str() {
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" | "purple" => Color::Purple,
        "cyan" => Color::Cyan,
        "gray" | "grey" => Color::LightGray,
        "darkgray" | "dark_grey" | "darkgrey" | "dark_gray" => Color::DarkGray,
        "lightred" | "light_red" => Color::LightRed,
        "lightgreen" | "light_green" => Color::LightGreen,
        "lightyellow" | "light_yellow" => Color::LightYellow,
        "lightblue" | "light_blue" => Color::LightBlue,
        "lightmagenta" | "light_magenta" => Color::LightPurple,
        "lightcyan" | "light_cyan" => Color::LightCyan,
        "white" => Color::White,
        _ => return None,
    })
}
