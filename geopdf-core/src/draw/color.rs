//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

//! Colors and value gradients

use crate::core::config::ColorCfg;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };
pub const WHITE: Color = Color {
    r: 255,
    g: 255,
    b: 255,
};
pub const GRAY: Color = Color {
    r: 128,
    g: 128,
    b: 128,
};
pub const RED: Color = Color { r: 255, g: 0, b: 0 };

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Color {
        Color { r, g, b }
    }

    /// Parse `#rrggbb` or `rrggbb`
    pub fn from_hex(hex: &str) -> Result<Color, String> {
        let digits = hex.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(format!("Invalid color `{}` (expected #rrggbb)", hex));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|_| format!("Invalid color `{}` (expected #rrggbb)", hex))
        };
        Ok(Color::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn from_config(cfg: &ColorCfg) -> Result<Color, String> {
        match cfg {
            ColorCfg::Hex(hex) => Color::from_hex(hex),
            ColorCfg::Rgb([r, g, b]) => Ok(Color::rgb(*r, *g, *b)),
        }
    }

    /// Components in the range 0..1 as used by PDF color operators
    pub fn to_pdf(&self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Color channel a gradient runs on
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Channel {
    Red,
    Green,
    Blue,
}

/// Position of `act` within `[min, max]` scaled to 0..255
fn gradient_step(act: f64, min: f64, max: f64) -> i32 {
    let range = max - min;
    if range == 0.0 || !range.is_finite() {
        return 0;
    }
    (((act - min) / range * 255.0) as i32).abs()
}

fn clamp(v: i32) -> u8 {
    v.max(0).min(255) as u8
}

fn with_channel(channel: Channel, selected: u8, others: u8) -> Color {
    match channel {
        Channel::Red => Color::rgb(selected, others, others),
        Channel::Green => Color::rgb(others, selected, others),
        Channel::Blue => Color::rgb(others, others, selected),
    }
}

/// White at `min`, pure `channel` at `max`
pub fn gradient_white_to_channel(channel: Channel, act: f64, min: f64, max: f64) -> Color {
    let v = gradient_step(act, min, max);
    with_channel(channel, 255, clamp(255 - v))
}

/// Black at `min`, pure `channel` at `max`
pub fn gradient_black_to_channel(channel: Channel, act: f64, min: f64, max: f64) -> Color {
    let v = gradient_step(act, min, max);
    with_channel(channel, clamp(v), 0)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_white_to_red() {
        assert_eq!(gradient_white_to_channel(Channel::Red, 100.0, 100.0, 200.0), WHITE);
        assert_eq!(gradient_white_to_channel(Channel::Red, 200.0, 100.0, 200.0), RED);
        assert_eq!(
            gradient_white_to_channel(Channel::Red, 150.0, 100.0, 200.0),
            Color::rgb(255, 128, 128)
        );
        assert_eq!(
            gradient_white_to_channel(Channel::Blue, 200.0, 100.0, 200.0),
            Color::rgb(0, 0, 255)
        );
        // constant values
        assert_eq!(gradient_white_to_channel(Channel::Red, 5.0, 5.0, 5.0), WHITE);
    }

    #[test]
    fn test_black_to_green() {
        assert_eq!(gradient_black_to_channel(Channel::Green, 0.0, 0.0, 10.0), BLACK);
        assert_eq!(
            gradient_black_to_channel(Channel::Green, 10.0, 0.0, 10.0),
            Color::rgb(0, 255, 0)
        );
    }

    #[test]
    fn test_parse() {
        assert_eq!(Color::from_hex("#808080").unwrap(), GRAY);
        assert_eq!(Color::from_hex("ff0000").unwrap(), RED);
        assert!(Color::from_hex("#80808").is_err());
        assert!(Color::from_hex("#gg0000").is_err());
        assert_eq!(
            Color::from_config(&ColorCfg::Rgb([1, 2, 3])).unwrap(),
            Color::rgb(1, 2, 3)
        );
        assert_eq!(RED.to_hex(), "#ff0000");
        assert_eq!(WHITE.to_pdf(), [1.0, 1.0, 1.0]);
    }
}
