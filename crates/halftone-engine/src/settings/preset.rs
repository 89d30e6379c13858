use std::fmt;
use std::str::FromStr;

/// Dot size presets for the halftone grid.
#[repr(u8)]
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum DotSizePreset {
    Fine = 0,
    #[default]
    Medium = 1,
    Coarse = 2,
}

impl DotSizePreset {
    pub const ALL: [DotSizePreset; 3] = [Self::Fine, Self::Medium, Self::Coarse];

    /// Dot grid pitch in pixels.
    pub fn dot_size(self) -> f32 {
        match self {
            Self::Fine => 4.0,
            Self::Medium => 8.0,
            Self::Coarse => 16.0,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Fine => "Fine",
            Self::Medium => "Medium",
            Self::Coarse => "Coarse",
        }
    }

    /// Stored integer form.
    #[inline]
    pub fn raw(self) -> u8 {
        self as u8
    }

    pub fn from_raw(raw: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.raw() == raw)
    }
}

impl fmt::Display for DotSizePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Error for preset names that are not `fine`, `medium` or `coarse`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsePresetError {
    pub input: String,
}

impl fmt::Display for ParsePresetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown dot size preset {:?} (expected fine, medium or coarse)", self.input)
    }
}

impl std::error::Error for ParsePresetError {}

impl FromStr for DotSizePreset {
    type Err = ParsePresetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.display_name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParsePresetError { input: s.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dot_sizes_double_per_step() {
        assert_eq!(DotSizePreset::Fine.dot_size(), 4.0);
        assert_eq!(DotSizePreset::Medium.dot_size(), 8.0);
        assert_eq!(DotSizePreset::Coarse.dot_size(), 16.0);
    }

    #[test]
    fn raw_values_are_stable() {
        assert_eq!(DotSizePreset::Fine.raw(), 0);
        assert_eq!(DotSizePreset::Medium.raw(), 1);
        assert_eq!(DotSizePreset::Coarse.raw(), 2);
        assert_eq!(DotSizePreset::from_raw(2), Some(DotSizePreset::Coarse));
        assert_eq!(DotSizePreset::from_raw(3), None);
    }

    #[test]
    fn default_is_medium() {
        assert_eq!(DotSizePreset::default(), DotSizePreset::Medium);
    }

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!("fine".parse::<DotSizePreset>(), Ok(DotSizePreset::Fine));
        assert_eq!(" COARSE ".parse::<DotSizePreset>(), Ok(DotSizePreset::Coarse));
        let err = "huge".parse::<DotSizePreset>().unwrap_err();
        assert_eq!(err.input, "huge");
        assert!(err.to_string().contains("huge"));
    }

    #[test]
    fn display_matches_menu_names() {
        let names: Vec<String> = DotSizePreset::ALL.iter().map(|p| p.to_string()).collect();
        assert_eq!(names, ["Fine", "Medium", "Coarse"]);
    }
}
