use strum::EnumIter;

/// Playback speed setting, cycled from the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter, strum::Display)]
pub enum PlaybackRate {
    #[strum(serialize = "0.5X")]
    Half,
    #[strum(serialize = "0.75X")]
    ThreeQuarters,
    #[default]
    #[strum(serialize = "1.0X")]
    Normal,
    #[strum(serialize = "1.25X")]
    QuarterUp,
    #[strum(serialize = "1.5X")]
    HalfUp,
    #[strum(serialize = "2.0X")]
    Double,
}

impl PlaybackRate {
    /// Speed multiplier applied to the media port
    pub fn multiplier(self) -> f32 {
        match self {
            PlaybackRate::Half => 0.5,
            PlaybackRate::ThreeQuarters => 0.75,
            PlaybackRate::Normal => 1.0,
            PlaybackRate::QuarterUp => 1.25,
            PlaybackRate::HalfUp => 1.5,
            PlaybackRate::Double => 2.0,
        }
    }

    /// The next rate in the cycle, wrapping from the fastest back to the slowest
    pub fn next(self) -> Self {
        match self {
            PlaybackRate::Half => PlaybackRate::ThreeQuarters,
            PlaybackRate::ThreeQuarters => PlaybackRate::Normal,
            PlaybackRate::Normal => PlaybackRate::QuarterUp,
            PlaybackRate::QuarterUp => PlaybackRate::HalfUp,
            PlaybackRate::HalfUp => PlaybackRate::Double,
            PlaybackRate::Double => PlaybackRate::Half,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn cycle_visits_every_rate_and_closes() {
        let mut rate = PlaybackRate::Normal;
        let mut seen = Vec::new();
        for _ in 0..PlaybackRate::iter().count() {
            seen.push(rate);
            rate = rate.next();
        }
        assert_eq!(rate, PlaybackRate::Normal);
        for expected in PlaybackRate::iter() {
            assert!(seen.contains(&expected));
        }
    }

    #[test]
    fn cycle_order_matches_speed_list() {
        let mut rate = PlaybackRate::Half;
        let mut multipliers = Vec::new();
        for _ in 0..PlaybackRate::iter().count() {
            multipliers.push(rate.multiplier());
            rate = rate.next();
        }
        assert_eq!(multipliers, vec![0.5, 0.75, 1.0, 1.25, 1.5, 2.0]);
    }

    #[test]
    fn labels() {
        assert_eq!(PlaybackRate::Normal.to_string(), "1.0X");
        assert_eq!(PlaybackRate::Double.to_string(), "2.0X");
        assert_eq!(PlaybackRate::default(), PlaybackRate::Normal);
    }
}
