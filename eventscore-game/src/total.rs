//! Aggregate totals across tracks.

/// Starting score plus every track's points, saturating at `u64::MAX`.
#[must_use]
pub fn total<I>(starting_score: u64, per_track_points: I) -> u64
where
    I: IntoIterator<Item = u64>,
{
    per_track_points
        .into_iter()
        .fold(starting_score, u64::saturating_add)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sums_starting_score_and_tracks() {
        assert_eq!(total(1000, [500, 0, 42_000]), 43_500);
    }

    #[test]
    fn empty_tracks_leave_starting_score() {
        assert_eq!(total(250, Vec::new()), 250);
    }

    #[test]
    fn overflow_saturates() {
        assert_eq!(total(u64::MAX, [1]), u64::MAX);
    }
}
