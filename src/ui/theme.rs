use ratatui::style::Color;

use crate::preferences::Theme;

/// Colours for one theme. Passed to every render function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub text: Color,
    pub muted: Color,
    pub accent: Color,
    pub correct: Color,
    pub incorrect: Color,
    pub marked: Color,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                background: Color::Reset,
                text: Color::White,
                muted: Color::DarkGray,
                accent: Color::Cyan,
                correct: Color::Green,
                incorrect: Color::Red,
                marked: Color::Yellow,
            },
            Theme::Light => Self {
                background: Color::White,
                text: Color::Black,
                muted: Color::Gray,
                accent: Color::Blue,
                correct: Color::Green,
                incorrect: Color::Red,
                marked: Color::Magenta,
            },
        }
    }

    pub fn grade_color(&self, percentage: u32) -> Color {
        match percentage {
            90..=100 => self.correct,
            70..=89 => self.accent,
            50..=69 => self.marked,
            _ => self.incorrect,
        }
    }
}

/// Encouragement shown under the score.
pub fn score_feedback(percentage: u32) -> &'static str {
    match percentage {
        100.. => "太棒了，完美作答！ / Perfect Score!",
        80..=99 => "表現優異，繼續努力！ / Excellent work, keep it up!",
        60..=79 => "不錯的嘗試，再接再厲！ / Good try, keep practicing!",
        _ => "別氣餒，從錯誤中學習！ / Don't be discouraged, learn from your mistakes!",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_feedback_bands() {
        assert_eq!(score_feedback(100), "太棒了，完美作答！ / Perfect Score!");
        for score in [80, 99] {
            assert!(score_feedback(score).ends_with("Excellent work, keep it up!"));
        }
        for score in [60, 79] {
            assert!(score_feedback(score).ends_with("Good try, keep practicing!"));
        }
        for score in [0, 59] {
            assert!(score_feedback(score).starts_with("別氣餒"));
        }
    }
}
