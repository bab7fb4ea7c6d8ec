// src/types.rs

/// Raw code reported by the button driver: tens digit is the button, units
/// digit the gesture (1 fast click, 2 long click, 3 double click).
pub type ButtonCode = u8;

/// What the user asked for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    ShowTimeView,
    Export,
    ShowStats,
    NextTimeScale,
    NextAmplitudeScale,
    ShowFrequencyView,
}

impl Action {
    pub fn from_button(code: ButtonCode) -> Option<Self> {
        match code {
            11 => Some(Action::ShowTimeView),
            12 => Some(Action::Export),
            13 => Some(Action::ShowStats),
            21 => Some(Action::NextTimeScale),
            22 => Some(Action::NextAmplitudeScale),
            23 => Some(Action::ShowFrequencyView),
            _ => None,
        }
    }
}

/// Trace view redrawn after a scale change.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ViewMode {
    #[default]
    Time,
    Frequency,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn button_codes_map_to_actions() {
        assert_eq!(Action::from_button(11), Some(Action::ShowTimeView));
        assert_eq!(Action::from_button(12), Some(Action::Export));
        assert_eq!(Action::from_button(13), Some(Action::ShowStats));
        assert_eq!(Action::from_button(21), Some(Action::NextTimeScale));
        assert_eq!(Action::from_button(22), Some(Action::NextAmplitudeScale));
        assert_eq!(Action::from_button(23), Some(Action::ShowFrequencyView));
        assert_eq!(Action::from_button(0), None);
        assert_eq!(Action::from_button(31), None);
    }
}
