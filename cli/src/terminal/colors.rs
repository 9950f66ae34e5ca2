use colored::Color;

pub const PRIMARY: Color = Color::TrueColor { r: 130, g: 200, b: 255 };
pub const ACCENT: Color = Color::TrueColor { r: 255, g: 190, b: 90 };
pub const SEPARATOR: Color = Color::BrightBlack;
pub const TEXT_DEFAULT: Color = Color::TrueColor { r: 220, g: 220, b: 220 };
pub const GROUP_ADDR: Color = Color::TrueColor { r: 120, g: 230, b: 160 };
pub const NEIGHBOR: Color = Color::TrueColor { r: 200, g: 160, b: 255 };
