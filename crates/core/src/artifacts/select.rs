use crate::domain::artifact::{AsOf, StoredObject};
use chrono::NaiveDate;

/// An object that survived extension filtering, carrying the parts of its
/// sort key.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub object: StoredObject,
    pub date: Option<NaiveDate>,
    pub ext_rank: usize,
}

/// First `YYYY-MM-DD` shaped token embedded in an object name, validated as
/// a real calendar date. A token that is date-shaped but not a calendar date
/// (e.g. `2024-13-40`) leaves the object undated.
pub fn extract_date(name: &str) -> Option<NaiveDate> {
    let bytes = name.as_bytes();
    let start = bytes.windows(10).position(is_date_shaped)?;
    // The window is all ASCII, so byte offsets are char boundaries.
    let token = &name[start..start + 10];
    NaiveDate::parse_from_str(token, "%Y-%m-%d").ok()
}

fn is_date_shaped(window: &[u8]) -> bool {
    window.iter().enumerate().all(|(i, b)| match i {
        4 | 7 => *b == b'-',
        _ => b.is_ascii_digit(),
    })
}

fn extension_rank(name: &str, policy: &[&str]) -> Option<usize> {
    policy.iter().position(|ext| name.ends_with(ext))
}

/// Filters `objects` down to policy-permitted extensions and orders them:
/// newest embedded date first (undated last), then most preferred extension,
/// then most recently modified. The triple makes the choice deterministic
/// even when a correction re-upload shares a date with the original.
pub fn score_candidates(objects: Vec<StoredObject>, policy: &[&str]) -> Vec<Candidate> {
    let mut candidates: Vec<Candidate> = objects
        .into_iter()
        .filter_map(|object| {
            let ext_rank = extension_rank(&object.name, policy)?;
            let date = extract_date(&object.name);
            Some(Candidate {
                object,
                date,
                ext_rank,
            })
        })
        .collect();

    candidates.sort_by(|a, b| {
        b.date
            .cmp(&a.date)
            .then(a.ext_rank.cmp(&b.ext_rank))
            .then(b.object.updated.cmp(&a.object.updated))
    });
    candidates
}

/// Resolves the single best candidate for `as_of`, or `None` when nothing
/// survives filtering or no candidate carries the exact requested date.
pub fn select_best(objects: Vec<StoredObject>, policy: &[&str], as_of: AsOf) -> Option<Candidate> {
    let ranked = score_candidates(objects, policy);
    match as_of {
        AsOf::Latest => ranked.into_iter().next(),
        AsOf::Date(date) => ranked.into_iter().find(|c| c.date == Some(date)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn object(name: &str, updated_hour: u32) -> StoredObject {
        StoredObject {
            name: name.to_string(),
            updated: Utc.with_ymd_and_hms(2024, 5, 2, updated_hour, 0, 0).unwrap(),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn extracts_first_embedded_date() {
        assert_eq!(
            extract_date("recommendations/AAPL_2024-05-01.md"),
            Some(date(2024, 5, 1))
        );
        assert_eq!(extract_date("recommendations/AAPL.md"), None);
    }

    #[test]
    fn rejects_non_calendar_tokens() {
        assert_eq!(extract_date("technicals/AAPL_2024-13-40.json"), None);
    }

    #[test]
    fn latest_prefers_newest_date_then_extension() {
        let objects = vec![
            object("recommendations/AAPL_2024-05-01.md", 1),
            object("recommendations/AAPL_2024-05-01.json", 2),
            object("recommendations/AAPL_2024-04-01.md", 3),
        ];
        let best = select_best(objects, &[".md", ".json"], AsOf::Latest).unwrap();
        assert_eq!(best.object.name, "recommendations/AAPL_2024-05-01.md");
    }

    #[test]
    fn exact_date_matches_only_exactly() {
        let objects = vec![
            object("recommendations/AAPL_2024-05-01.md", 1),
            object("recommendations/AAPL_2024-05-01.json", 2),
            object("recommendations/AAPL_2024-04-01.md", 3),
        ];
        let best = select_best(
            objects.clone(),
            &[".md", ".json"],
            AsOf::Date(date(2024, 4, 1)),
        )
        .unwrap();
        assert_eq!(best.object.name, "recommendations/AAPL_2024-04-01.md");

        assert!(select_best(objects, &[".md", ".json"], AsOf::Date(date(2024, 6, 1))).is_none());
    }

    #[test]
    fn policy_filtering_is_exhaustive() {
        let objects = vec![object("technicals/AAPL_2024-05-01.csv", 1)];
        assert!(select_best(objects, &[".json"], AsOf::Latest).is_none());
    }

    #[test]
    fn updated_breaks_ties_within_same_date_and_extension() {
        let older = object("recommendations/AAPL_2024-05-01.md", 1);
        let newer = object("recommendations/AAPL_2024-05-01_v2.md", 9);
        let best = select_best(
            vec![older, newer.clone()],
            &[".md", ".json"],
            AsOf::Latest,
        )
        .unwrap();
        assert_eq!(best.object, newer);
    }

    #[test]
    fn undated_objects_sort_after_dated_peers() {
        let dated = object("recommendations/AAPL_2024-01-01.md", 1);
        let undated = object("recommendations/AAPL.md", 9);
        let ranked = score_candidates(vec![undated, dated], &[".md", ".json"]);
        assert_eq!(ranked[0].date, Some(date(2024, 1, 1)));
        assert_eq!(ranked[1].date, None);
    }
}
