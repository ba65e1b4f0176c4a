#[cfg(test)]
mod tests {
    use super::super::*;
    use chrono::{Duration, NaiveDate};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn presence_of(dates: &[&str]) -> DatePresenceSet {
        let entries: Vec<RawLoginDate> = dates.iter().map(|d| RawLoginDate::text(*d)).collect();
        DatePresenceSet::from_raw(&entries, DayBoundary::Utc)
    }

    #[test]
    fn test_empty_history_has_no_streaks() {
        let result = calculate_streaks(&DatePresenceSet::empty(), day(2024, 6, 10));
        assert_eq!(result, StreakResult::default());
    }

    #[test]
    fn test_current_streak_counts_today() {
        let presence = presence_of(&["2024-06-08", "2024-06-09", "2024-06-10"]);
        assert_eq!(current_streak(&presence, day(2024, 6, 10)), 3);
    }

    #[test]
    fn test_current_streak_grace_period_for_yesterday() {
        let presence = presence_of(&["2024-06-09"]);
        assert_eq!(current_streak(&presence, day(2024, 6, 10)), 1);
    }

    #[test]
    fn test_current_streak_broken_after_two_day_gap() {
        let presence = presence_of(&["2024-06-08"]);
        assert_eq!(current_streak(&presence, day(2024, 6, 10)), 0);
    }

    #[test]
    fn test_current_streak_counts_day_after_today() {
        // Clock skew: tomorrow's entry sits inside the run
        let presence = presence_of(&["2024-06-11", "2024-06-10", "2024-06-09"]);
        assert_eq!(current_streak(&presence, day(2024, 6, 10)), 3);
        assert_eq!(longest_streak(&presence), 3);
    }

    #[test]
    fn test_lone_future_day_is_a_streak_of_one() {
        let presence = presence_of(&["2024-06-12"]);
        let result = calculate_streaks(&presence, day(2024, 6, 10));
        assert_eq!(result.current_streak, 1);
        assert_eq!(result.longest_streak, 1);
    }

    #[test]
    fn test_current_streak_stops_at_first_gap() {
        let presence = presence_of(&[
            "2024-06-01",
            "2024-06-02",
            "2024-06-03",
            "2024-06-07",
            "2024-06-08",
            "2024-06-09",
        ]);
        assert_eq!(current_streak(&presence, day(2024, 6, 10)), 3);
        assert_eq!(longest_streak(&presence), 3);
    }

    #[test]
    fn test_current_streak_ignores_time_of_day_and_duplicates() {
        let presence = presence_of(&[
            "2024-06-10T07:00:00Z",
            "2024-06-10T21:00:00Z",
            "2024-06-09T12:00:00Z",
        ]);
        assert_eq!(current_streak(&presence, day(2024, 6, 10)), 2);
    }

    #[test]
    fn test_longest_streak_basic_run() {
        let presence = presence_of(&["2024-01-01", "2024-01-02", "2024-01-03", "2024-01-10"]);
        assert_eq!(longest_streak(&presence), 3);
        assert_eq!(current_streak(&presence, day(2024, 6, 10)), 0);
    }

    #[test]
    fn test_longest_streak_deduplicates_same_day_entries() {
        // Repeated logins on one day must not reset the run
        let presence = presence_of(&["2024-01-01", "2024-01-01", "2024-01-02"]);
        assert_eq!(longest_streak(&presence), 2);
    }

    #[test]
    fn test_longest_streak_is_order_independent() {
        let presence = presence_of(&["2024-01-03", "2024-01-01", "2024-01-02"]);
        assert_eq!(longest_streak(&presence), 3);
    }

    #[test]
    fn test_longest_streak_looks_beyond_calendar_window() {
        let today = day(2024, 6, 10);
        let old_run: Vec<NaiveDate> = (0..10).map(|i| day(2020, 1, 1) + Duration::days(i)).collect();
        let presence = DatePresenceSet::from_dates(old_run.into_iter().chain([today]));

        let result = calculate_streaks(&presence, today);
        assert_eq!(result.longest_streak, 10);
        assert_eq!(result.current_streak, 1);
    }

    #[test]
    fn test_single_day_history() {
        let presence = presence_of(&["2024-06-10"]);
        let result = calculate_streaks(&presence, day(2024, 6, 10));
        assert_eq!(result.current_streak, 1);
        assert_eq!(result.longest_streak, 1);
    }

    #[test]
    fn test_streak_crosses_month_and_year_boundaries() {
        let presence = presence_of(&["2023-12-30", "2023-12-31", "2024-01-01", "2024-01-02"]);
        assert_eq!(longest_streak(&presence), 4);
        assert_eq!(current_streak(&presence, day(2024, 1, 3)), 4);
    }

    #[test]
    fn test_longest_never_below_current() {
        let today = day(2024, 6, 10);
        let histories: Vec<Vec<&str>> = vec![
            vec![],
            vec!["2024-06-10"],
            vec!["2024-06-09", "2024-06-10", "2024-06-12"],
            vec!["2024-06-11", "2024-06-10", "2024-06-09"],
            vec!["2024-06-01", "2024-06-03", "2024-06-05", "2024-06-07", "2024-06-09"],
            vec!["2024-05-01", "2024-05-02", "2024-06-09", "2024-06-10"],
            vec!["2024-06-10", "2024-06-10", "2024-06-10"],
        ];

        for history in histories {
            let presence = presence_of(&history);
            let result = calculate_streaks(&presence, today);
            assert!(
                result.longest_streak >= result.current_streak,
                "history {:?} gave {:?}",
                history,
                result
            );
        }
    }

    #[test]
    fn test_overview_counts_unique_days() {
        let entries = vec![
            RawLoginDate::text("2024-06-09T08:00:00Z"),
            RawLoginDate::text("2024-06-09T20:00:00Z"),
            RawLoginDate::text("2024-06-10"),
            RawLoginDate::text("garbage"),
        ];
        let presence = DatePresenceSet::from_raw(&entries, DayBoundary::Utc);
        let overview = ActivityOverview::compute(&presence, day(2024, 6, 10));

        assert_eq!(overview.total_days_present, 2);
        assert_eq!(overview.recorded_entries, 4);
        assert_eq!(overview.skipped_entries, 1);
        assert_eq!(overview.streaks.current_streak, 2);
        assert_eq!(overview.last_active_date, Some(day(2024, 6, 10)));
        assert_eq!(overview.calendar.present_days(), 2);
    }

    #[test]
    fn test_empty_overview() {
        let overview = ActivityOverview::empty(day(2024, 6, 10));

        assert_eq!(overview.calendar.days().len(), 365);
        assert_eq!(overview.streaks, StreakResult::default());
        assert_eq!(overview.total_days_present, 0);
        assert_eq!(overview.last_active_date, None);
    }
}
