pub use self::{generation_stats_display::*, scoreboard_display::*, sky_display::*};

mod generation_stats_display;
mod scoreboard_display;
mod sky_display;

pub mod color {
    use ratatui::style::Color;

    pub const SKY: Color = Color::Rgb(135, 206, 235);
    pub const PIPE: Color = Color::Rgb(34, 139, 34);
    pub const GROUND: Color = Color::Rgb(139, 90, 43);
    pub const YELLOW: Color = Color::Rgb(255, 255, 0);
    pub const ORANGE: Color = Color::Rgb(255, 127, 0);
    pub const RED: Color = Color::Rgb(255, 0, 0);
    pub const MAGENTA: Color = Color::Rgb(255, 0, 255);
    pub const BLUE: Color = Color::Rgb(0, 0, 255);
    pub const BLACK: Color = Color::Rgb(0, 0, 0);
    pub const WHITE: Color = Color::Rgb(255, 255, 255);
    pub const GRAY: Color = Color::Rgb(127, 127, 127);

    /// Bird colors of the AI opponents, cycled by index.
    pub const OPPONENTS: [Color; 3] = [RED, MAGENTA, BLUE];
}

pub mod style {
    use ratatui::style::{Color, Style};

    use crate::ui::widgets::color;

    const fn fg_bg(fg: Color, bg: Color) -> Style {
        Style::new().fg(fg).bg(bg)
    }

    const fn bg_only(color: Color) -> Style {
        Style::new().fg(color).bg(color)
    }

    pub const DEFAULT: Style = fg_bg(color::WHITE, color::BLACK);
    pub const DIM: Style = fg_bg(color::GRAY, color::BLACK);
    pub const SKY: Style = bg_only(color::SKY);
    pub const PIPE: Style = bg_only(color::PIPE);
    pub const GROUND: Style = bg_only(color::GROUND);

    pub const BIRD: Style = on_sky(color::ORANGE);
    pub const LEADER: Style = on_sky(color::RED);

    pub const fn on_sky(color: Color) -> Style {
        fg_bg(color, color::SKY)
    }
}
