use chrono::NaiveDate;

use super::presence::DatePresenceSet;
use super::types::StreakResult;

/// Length of the most recent unbroken run of active days.
///
/// The run may end today or yesterday: the first comparison is against
/// `today`, so activity yesterday still counts as ongoing.
pub fn current_streak(presence: &DatePresenceSet, today: NaiveDate) -> u32 {
    let mut streak = 0u32;
    let mut cursor = today;

    for day in presence.days().rev() {
        let gap_days = (cursor - day).num_days();
        if gap_days > 1 {
            break;
        }
        streak += 1;
        cursor = day;
    }

    streak
}

/// Longest run of consecutive active days anywhere in the history
pub fn longest_streak(presence: &DatePresenceSet) -> u32 {
    let mut days = presence.days();
    let Some(mut prev) = days.next() else {
        return 0;
    };

    let mut running = 1u32;
    let mut longest = 1u32;

    for day in days {
        running = if (day - prev).num_days() == 1 {
            running + 1
        } else {
            1
        };
        longest = longest.max(running);
        prev = day;
    }

    longest
}

pub fn calculate_streaks(presence: &DatePresenceSet, today: NaiveDate) -> StreakResult {
    StreakResult {
        current_streak: current_streak(presence, today),
        longest_streak: longest_streak(presence),
    }
}
