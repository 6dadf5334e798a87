//! Follower summary rendering.
//!
//! Fields backing a fired signal are highlighted: red when color is on, a
//! trailing `(!)` otherwise.

use crossterm::style::Stylize;

use crate::domain::classifier::{friend_ratio, parse_created_at};
use crate::domain::{ClassificationSignals, FollowerProfile, Signal};

const FLAG_MARKER: &str = "(!)";

/// Everything the console needs to present one follower
#[derive(Debug, Clone, Copy)]
pub struct FollowerSummary<'a> {
    pub profile: &'a FollowerProfile,
    pub signals: ClassificationSignals,
}

impl<'a> FollowerSummary<'a> {
    pub fn new(profile: &'a FollowerProfile, signals: ClassificationSignals) -> Self {
        Self { profile, signals }
    }

    pub fn is_flagged(&self, signal: Signal) -> bool {
        self.signals.is_flagged(signal)
    }

    /// Literal `score/total` shown to the reviewer
    pub fn score_label(&self) -> String {
        format!(
            "{}/{}",
            self.signals.unwanted_score(),
            ClassificationSignals::TOTAL
        )
    }
}

fn paint(text: String, flagged: bool, color: bool) -> String {
    match (flagged, color) {
        (false, _) => text,
        (true, true) => text.red().bold().to_string(),
        (true, false) => format!("{} {}", text, FLAG_MARKER),
    }
}

fn dim(text: &str, color: bool) -> String {
    if color {
        text.dark_grey().to_string()
    } else {
        text.to_string()
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Render a summary as display lines
pub fn render_summary(summary: &FollowerSummary<'_>, color: bool) -> Vec<String> {
    let profile = summary.profile;
    let mut lines = Vec::new();

    // Header: name, markers, handle
    let mut header = if color {
        profile.display_name.clone().bold().to_string()
    } else {
        profile.display_name.clone()
    };
    if profile.verified {
        header.push(' ');
        header.push_str(&if color {
            "✔".blue().to_string()
        } else {
            "✔".to_string()
        });
    }
    if profile.protected {
        header.push(' ');
        header.push_str(&paint(
            "🔒".to_string(),
            summary.is_flagged(Signal::Protected),
            color,
        ));
    }
    header.push(' ');
    header.push_str(&paint(
        format!("@{}", profile.screen_name),
        summary.is_flagged(Signal::GeneratedScreenName),
        color,
    ));
    lines.push(header);

    if let Some(description) = non_empty(&profile.description) {
        lines.push(description.to_string());
    }
    if let Some(url) = non_empty(&profile.url) {
        lines.push(url.to_string());
    }

    lines.push(format!(
        "{} {}",
        dim("Friends/Followers:", color),
        paint(
            format!(
                "{}/{} ({:.1})",
                profile.friends_count,
                profile.followers_count,
                friend_ratio(profile)
            ),
            summary.is_flagged(Signal::TooManyFriends),
            color,
        )
    ));

    let joined = parse_created_at(&profile.created_at)
        .map(|created| created.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| profile.created_at.clone());
    lines.push(format!(
        "{} {}",
        dim("Joined:", color),
        paint(joined, summary.is_flagged(Signal::TooYoung), color)
    ));

    if let Some(location) = non_empty(&profile.location) {
        lines.push(format!("{} {}", dim("Location:", color), location));
    }

    lines.push(format!(
        "{} {}",
        dim("Tweets:", color),
        paint(
            profile.statuses_count.to_string(),
            summary.is_flagged(Signal::TooFewTweets),
            color,
        )
    ));

    lines.push(format!(
        "{} {}",
        dim("Score:", color),
        paint(
            summary.score_label(),
            summary.signals.is_likely_unwanted(),
            color,
        )
    ));

    lines
}
