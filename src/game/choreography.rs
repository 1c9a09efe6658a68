use std::time::Duration;

pub const HIGHLIGHT_DURATION: Duration = Duration::from_millis(1000);
pub const SHUFFLE_START: Duration = Duration::from_millis(3900);
pub const SHUFFLE_INTERVAL: Duration = Duration::from_millis(400);
pub const SHUFFLE_COUNT: u32 = 23;
pub const INPUT_ENABLE_AT: Duration = Duration::from_millis(15_000);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cue {
    EndHighlight,
    /// 1-based shuffle step.
    Shuffle(u32),
    EnableInput,
}

pub fn shuffle_offset(step: u32) -> Duration {
    SHUFFLE_START + SHUFFLE_INTERVAL * step.saturating_sub(1)
}

/// Every cue of a round with its offset from the moment Start was pressed,
/// in firing order.
pub fn timeline() -> Vec<(Duration, Cue)> {
    let mut cues = Vec::with_capacity(SHUFFLE_COUNT as usize + 2);
    cues.push((HIGHLIGHT_DURATION, Cue::EndHighlight));
    for step in 1..=SHUFFLE_COUNT {
        cues.push((shuffle_offset(step), Cue::Shuffle(step)));
    }
    cues.push((INPUT_ENABLE_AT, Cue::EnableInput));
    cues.sort_by_key(|(offset, _)| *offset);
    cues
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeline_is_sorted_and_complete() {
        let cues = timeline();
        assert_eq!(cues.len(), 25);
        assert!(cues.windows(2).all(|pair| pair[0].0 <= pair[1].0));
        assert_eq!(cues.first(), Some(&(HIGHLIGHT_DURATION, Cue::EndHighlight)));
        assert_eq!(cues.last(), Some(&(INPUT_ENABLE_AT, Cue::EnableInput)));
    }

    #[test]
    fn shuffles_run_between_highlight_and_input() {
        assert_eq!(shuffle_offset(1), Duration::from_millis(3900));
        assert_eq!(shuffle_offset(2), Duration::from_millis(4300));
        assert_eq!(shuffle_offset(SHUFFLE_COUNT), Duration::from_millis(12_700));
        assert!(shuffle_offset(1) > HIGHLIGHT_DURATION);
        assert!(shuffle_offset(SHUFFLE_COUNT) < INPUT_ENABLE_AT);
    }
}
