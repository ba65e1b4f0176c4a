use chrono::NaiveDate;
use log::{info, warn};

use crate::application::dtos::ActivityOverviewDto;
use studyverse_domain::activity::{ActivityOverview, DatePresenceSet, DayBoundary};
use studyverse_domain::profile::UserProfileSource;
use studyverse_domain::shared::UserId;

pub(super) async fn get_overview(
    profile_source: &dyn UserProfileSource,
    user_id: &UserId,
    day_boundary: DayBoundary,
    today: NaiveDate,
) -> ActivityOverviewDto {
    let profile = match profile_source.fetch_profile(user_id).await {
        Ok(profile) => profile,
        Err(e) => {
            warn!(
                "[activity] profile of {} unavailable, showing empty overview: {}",
                user_id,
                e.format_with_code()
            );
            let overview = ActivityOverview::empty(today);
            return ActivityOverviewDto::from_overview(user_id.as_str(), &overview, false);
        }
    };

    let presence = DatePresenceSet::from_raw(&profile.login_dates, day_boundary);
    if presence.skipped_entries() > 0 {
        warn!(
            "[activity] user {}: skipped {} of {} login entries",
            user_id,
            presence.skipped_entries(),
            presence.recorded_entries()
        );
    }

    let overview = ActivityOverview::compute(&presence, today);
    info!(
        "[activity] user {}: current={} longest={} days_present={}",
        user_id,
        overview.streaks.current_streak,
        overview.streaks.longest_streak,
        overview.total_days_present
    );

    ActivityOverviewDto::from_overview(profile.id.as_str(), &overview, true)
}
