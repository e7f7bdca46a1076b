use serde::{Deserialize, Serialize};

/// A fill or stroke colour
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum Colour {
    /// DeviceRGB colour; r, g, b, range from 0.0 to 1.0
    RGB { r: f32, g: f32, b: f32 },
    /// DeviceGray colour; g ranges from 0.0 to 1.0
    Grey { g: f32 },
}

impl Colour {
    /// Create a new colour in the RGB space. r, g, and b range from 0 to 255
    pub fn from_rgb_bytes(r: u8, g: u8, b: u8) -> Colour {
        Colour::RGB {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }

    /// Create a new colour in the Gray space, g ranges from 0.0 to 1.0
    pub const fn grey(g: f32) -> Colour {
        Colour::Grey { g }
    }

    fn components(self) -> (f32, f32, f32) {
        match self {
            Colour::RGB { r, g, b } => (r, g, b),
            Colour::Grey { g } => (g, g, g),
        }
    }

    /// Linearly interpolate towards `target`; `t = 0` is `self`, `t = 1` is `target`
    pub fn mix(self, target: Colour, t: f32) -> Colour {
        let t = t.clamp(0.0, 1.0);
        let (r0, g0, b0) = self.components();
        let (r1, g1, b1) = target.components();
        Colour::RGB {
            r: r0 + (r1 - r0) * t,
            g: g0 + (g1 - g0) * t,
            b: b0 + (b1 - b0) * t,
        }
    }

    /// Move `t` of the way towards black
    pub fn darken(self, t: f32) -> Colour {
        self.mix(colours::BLACK, t)
    }

    /// Move `t` of the way towards white
    pub fn lighten(self, t: f32) -> Colour {
        self.mix(colours::WHITE, t)
    }
}

/// A list of pre-defined colour constants
pub mod colours {
    use super::*;

    pub const BLACK: Colour = Colour::Grey { g: 0.0 };
    pub const WHITE: Colour = Colour::Grey { g: 1.0 };
    pub const TEXT: Colour = Colour::Grey { g: 0.1 };
    pub const MUTED: Colour = Colour::Grey { g: 0.38 };
    pub const SIDEBAR: Colour = Colour::Grey { g: 0.93 };
}

/// The accent palette offered to users. Only the base colour of each entry is
/// stored; the darker bar colour and lighter border colour used by the card
/// layout are interpolated from it.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccentColour {
    #[default]
    Black,
    DarkBlue,
    DarkGray,
    Crimson,
    DarkGreen,
    TealCustom,
}

impl AccentColour {
    pub const ALL: [AccentColour; 6] = [
        AccentColour::Black,
        AccentColour::DarkBlue,
        AccentColour::DarkGray,
        AccentColour::Crimson,
        AccentColour::DarkGreen,
        AccentColour::TealCustom,
    ];

    pub fn base(self) -> Colour {
        match self {
            AccentColour::Black => colours::BLACK,
            AccentColour::DarkBlue => Colour::from_rgb_bytes(0x1f, 0x3a, 0x68),
            AccentColour::DarkGray => Colour::from_rgb_bytes(0x40, 0x40, 0x40),
            AccentColour::Crimson => Colour::from_rgb_bytes(0x9b, 0x1b, 0x30),
            AccentColour::DarkGreen => Colour::from_rgb_bytes(0x1e, 0x56, 0x31),
            AccentColour::TealCustom => Colour::from_rgb_bytes(0x0f, 0x76, 0x6e),
        }
    }

    /// Used for card top bars
    pub fn dark(self) -> Colour {
        self.base().darken(0.25)
    }

    /// Used for card and chip borders
    pub fn light(self) -> Colour {
        self.base().lighten(0.7)
    }

    /// Used for card backgrounds and chip fills
    pub fn wash(self) -> Colour {
        self.base().lighten(0.93)
    }

    pub fn name(self) -> &'static str {
        match self {
            AccentColour::Black => "black",
            AccentColour::DarkBlue => "dark-blue",
            AccentColour::DarkGray => "dark-gray",
            AccentColour::Crimson => "crimson",
            AccentColour::DarkGreen => "dark-green",
            AccentColour::TealCustom => "teal-custom",
        }
    }
}

impl std::str::FromStr for AccentColour {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AccentColour::ALL
            .into_iter()
            .find(|c| c.name() == s)
            .ok_or_else(|| format!("unknown accent colour `{s}`"))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn rgb(c: Colour) -> (f32, f32, f32) {
        c.components()
    }

    #[test]
    fn darken_and_lighten_interpolate_towards_extremes() {
        let base = Colour::RGB {
            r: 0.5,
            g: 0.2,
            b: 1.0,
        };
        let (r, g, b) = rgb(base.darken(0.5));
        assert!((r - 0.25).abs() < 1e-6 && (g - 0.1).abs() < 1e-6 && (b - 0.5).abs() < 1e-6);
        let (r, g, b) = rgb(base.lighten(1.0));
        assert!((r - 1.0).abs() < 1e-6 && (g - 1.0).abs() < 1e-6 && (b - 1.0).abs() < 1e-6);
    }

    #[test]
    fn accent_variants_bracket_the_base() {
        let accent = AccentColour::Crimson;
        let base = rgb(accent.base());
        let dark = rgb(accent.dark());
        let light = rgb(accent.light());
        assert!(dark.0 < base.0 && base.0 < light.0);
    }

    #[test]
    fn accent_names_parse() {
        for accent in AccentColour::ALL {
            assert_eq!(accent.name().parse::<AccentColour>(), Ok(accent));
        }
        assert!("mauve".parse::<AccentColour>().is_err());
    }
}
