//! Heuristics that flag followers as likely spam or bot accounts.
//!
//! Each signal is evaluated independently from the raw profile fields; a
//! follower is likely unwanted as soon as one of them fires.

use chrono::{DateTime, FixedOffset, Months, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use super::FollowerProfile;

/// Letters or underscores followed by at least eight digits, e.g. `John12345678`
static GENERATED_SCREEN_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_]+[0-9]{8,}$").unwrap());

/// Format of `created_at` in the platform's user objects
pub const CREATED_AT_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

/// Above this many followers the stricter ratio applies
const FOLLOWER_THRESHOLD: u64 = 10;
const RATIO_LIMIT_ESTABLISHED: f64 = 10.0;
const RATIO_LIMIT_SMALL: f64 = 100.0;
const MIN_STATUSES: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    GeneratedScreenName,
    Protected,
    TooManyFriends,
    TooFewTweets,
    TooYoung,
}

impl Signal {
    pub const ALL: [Signal; 5] = [
        Signal::GeneratedScreenName,
        Signal::Protected,
        Signal::TooManyFriends,
        Signal::TooFewTweets,
        Signal::TooYoung,
    ];
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassificationSignals {
    pub generated_screen_name: bool,
    pub is_protected: bool,
    pub has_too_many_friends: bool,
    pub has_too_few_tweets: bool,
    pub is_too_young: bool,
}

impl ClassificationSignals {
    /// Number of signals evaluated per follower
    pub const TOTAL: usize = Signal::ALL.len();

    pub fn is_flagged(&self, signal: Signal) -> bool {
        match signal {
            Signal::GeneratedScreenName => self.generated_screen_name,
            Signal::Protected => self.is_protected,
            Signal::TooManyFriends => self.has_too_many_friends,
            Signal::TooFewTweets => self.has_too_few_tweets,
            Signal::TooYoung => self.is_too_young,
        }
    }

    pub fn flagged(&self) -> Vec<Signal> {
        Signal::ALL
            .into_iter()
            .filter(|s| self.is_flagged(*s))
            .collect()
    }

    pub fn unwanted_score(&self) -> usize {
        Signal::ALL.iter().filter(|s| self.is_flagged(**s)).count()
    }

    pub fn is_likely_unwanted(&self) -> bool {
        self.unwanted_score() > 0
    }
}

/// Classify a follower relative to `now`
pub fn classify(profile: &FollowerProfile, now: DateTime<Utc>) -> ClassificationSignals {
    ClassificationSignals {
        generated_screen_name: is_generated_screen_name(&profile.screen_name),
        is_protected: profile.protected,
        has_too_many_friends: has_too_many_friends(profile),
        has_too_few_tweets: profile.statuses_count < MIN_STATUSES,
        is_too_young: is_too_young(&profile.created_at, now),
    }
}

pub fn is_generated_screen_name(screen_name: &str) -> bool {
    GENERATED_SCREEN_NAME.is_match(screen_name)
}

/// Friends per follower, counting zero followers as one
pub fn friend_ratio(profile: &FollowerProfile) -> f64 {
    profile.friends_count as f64 / profile.followers_count.max(1) as f64
}

fn has_too_many_friends(profile: &FollowerProfile) -> bool {
    let ratio = friend_ratio(profile);
    if profile.followers_count > FOLLOWER_THRESHOLD {
        ratio > RATIO_LIMIT_ESTABLISHED
    } else {
        // new accounts follow many people before anyone follows back
        ratio > RATIO_LIMIT_SMALL
    }
}

pub fn parse_created_at(created_at: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_str(created_at, CREATED_AT_FORMAT).ok()
}

/// Created less than one calendar month before `now`. Unparseable dates never flag.
fn is_too_young(created_at: &str, now: DateTime<Utc>) -> bool {
    parse_created_at(created_at)
        .map(|created| created.with_timezone(&Utc))
        .and_then(|created| created.checked_add_months(Months::new(1)))
        .map(|one_month_old| now < one_month_old)
        .unwrap_or(false)
}
