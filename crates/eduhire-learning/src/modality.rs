use crate::types::VideoStyle;

/// Fixed teaching-style rotation tried after a failed quiz.
pub const ROTATION: [VideoStyle; 3] = [
    VideoStyle::Visual,
    VideoStyle::Practical,
    VideoStyle::Theoretical,
];

/// Next style in the rotation after `current`.
///
/// An unknown or missing current style is treated as the first rotation slot,
/// so the learner is moved on to `Practical`.
pub fn next_style(current: Option<VideoStyle>) -> VideoStyle {
    let idx = current
        .and_then(|c| ROTATION.iter().position(|s| *s == c))
        .unwrap_or(0);
    ROTATION[(idx + 1) % ROTATION.len()]
}

/// Parse the style string a client reports, dropping anything unrecognised.
pub fn parse_current(raw: Option<&str>) -> Option<VideoStyle> {
    raw.and_then(|s| s.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advances_in_order() {
        assert_eq!(next_style(Some(VideoStyle::Visual)), VideoStyle::Practical);
        assert_eq!(
            next_style(Some(VideoStyle::Practical)),
            VideoStyle::Theoretical
        );
        assert_eq!(next_style(Some(VideoStyle::Theoretical)), VideoStyle::Visual);
    }

    #[test]
    fn three_steps_return_to_start() {
        for start in ROTATION {
            let mut s = start;
            for _ in 0..3 {
                s = next_style(Some(s));
            }
            assert_eq!(s, start);
        }
    }

    #[test]
    fn unknown_style_defaults_to_practical() {
        assert_eq!(next_style(None), VideoStyle::Practical);
        assert_eq!(
            next_style(parse_current(Some("interpretive-dance"))),
            VideoStyle::Practical
        );
        assert_eq!(
            next_style(parse_current(Some("theoretical"))),
            VideoStyle::Visual
        );
    }
}
