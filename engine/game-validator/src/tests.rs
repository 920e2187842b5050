//! Batch-level properties of normalization and reconciliation

use crate::{
    GameResult, GameStatus, IssueKind, Normalizer, RawGameRecord, Reconciler, MAX_SCORE, MIN_SCORE,
};

fn sample_batch() -> Vec<RawGameRecord> {
    vec![
        RawGameRecord::new("2025-09-20", "kt", "LG").with_scores("4", "2").with_time("17:00"),
        RawGameRecord::new("2025-09-20", "두산", "기아").with_status("예정").with_time("18:30"),
        RawGameRecord::new("2025-09-20", "Nexen", "한화")
            .with_scores(0, 0)
            .with_result("1")
            .with_stadium("잠실"),
        RawGameRecord::new("2025-09-21", "SSG", "롯데").with_status("취소"),
        RawGameRecord::new("2024-08-31", "삼성", "LG").with_scores("1", "2"),
    ]
}

#[cfg(test)]
mod normalizer_properties {
    use super::*;

    #[test]
    fn test_normalization_is_idempotent() {
        let normalizer = Normalizer::default();
        for raw in sample_batch() {
            let first = normalizer.normalize(&raw);
            let record = first.record.clone().unwrap();

            let second = normalizer.normalize(&record.to_raw());
            assert_eq!(second.record.as_ref(), Some(&record));
            assert_eq!(second.valid, first.valid);
            assert!(second
                .issues
                .iter()
                .all(|i| i.kind == IssueKind::ReferenceOverride));
        }
    }

    #[test]
    fn test_self_match_always_reported() {
        let normalizer = Normalizer::default();
        for (home, away) in [("LG", "LG"), ("lg", "LG"), ("SK", "ssg"), ("Kiwoom", "Nexen"), ("기아", "KIA")] {
            let result = normalizer.normalize(&RawGameRecord::new("2025-09-20", home, away));
            assert!(
                result.issues.iter().any(|i| i.kind == IssueKind::SelfMatch),
                "{home} vs {away} not reported"
            );
            assert!(!result.valid);
        }
    }

    #[test]
    fn test_surviving_scores_determine_result_and_status() {
        let normalizer = Normalizer::default();
        for (home, away, claimed) in [(5, 3, "2"), (2, 7, "1"), (4, 4, "2"), (0, 1, "0")] {
            let raw = RawGameRecord::new("2025-09-20", "NC", "KT")
                .with_scores(home, away)
                .with_result(claimed)
                .with_status("연기");
            let record = normalizer.normalize(&raw).record.unwrap();

            let expected = match i32::cmp(&home, &away) {
                std::cmp::Ordering::Greater => GameResult::HomeWin,
                std::cmp::Ordering::Less => GameResult::AwayWin,
                std::cmp::Ordering::Equal => GameResult::Draw,
            };
            assert_eq!(record.result, Some(expected));
            assert_eq!(record.status, GameStatus::Finished);
        }
    }

    #[test]
    fn test_scores_nulled_only_outside_range() {
        let normalizer = Normalizer::default();
        for score in -5..=40 {
            let raw = RawGameRecord::new("2025-09-20", "NC", "KT").with_scores(score, 3);
            let result = normalizer.normalize(&raw);
            let record = result.record.unwrap();

            let in_range = (MIN_SCORE..=MAX_SCORE).contains(&score);
            assert_eq!(record.home_score.is_some(), in_range, "score {score}");
            assert_eq!(record.away_score, Some(3));
            assert_eq!(result.valid, in_range);
        }
    }

    #[test]
    fn test_scores_beyond_integer_width_are_out_of_range() {
        let normalizer = Normalizer::default();
        for score in ["3000000000", "-3000000000", "99999999999999999999999"] {
            let raw = RawGameRecord::new("2025-09-20", "NC", "KT").with_scores(score, "3");
            let result = normalizer.normalize(&raw);

            let kinds: Vec<IssueKind> = result.issues.iter().map(|i| i.kind).collect();
            assert_eq!(kinds, vec![IssueKind::ScoreOutOfRange], "score {score}");
            assert!(result.issues[0].message.contains(score));
            let record = result.record.unwrap();
            assert_eq!((record.home_score, record.away_score), (None, Some(3)));
            assert!(!result.valid);
        }
    }

    #[test]
    fn test_renormalizing_lone_surviving_score_clears_it() {
        let normalizer = Normalizer::default();
        let raw = RawGameRecord::new("2025-09-20", "NC", "KT").with_scores("31", "3");

        let first = normalizer.normalize(&raw);
        let kinds: Vec<IssueKind> = first.issues.iter().map(|i| i.kind).collect();
        assert_eq!(kinds, vec![IssueKind::ScoreOutOfRange]);
        let record = first.record.unwrap();
        assert_eq!((record.home_score, record.away_score), (None, Some(3)));

        let second = normalizer.normalize(&record.to_raw());
        let kinds: Vec<IssueKind> = second.issues.iter().map(|i| i.kind).collect();
        assert_eq!(kinds, vec![IssueKind::IncompleteScore]);
        let record = second.record.unwrap();
        assert_eq!((record.home_score, record.away_score), (None, None));
        assert!(!second.valid);

        let third = normalizer.normalize(&record.to_raw());
        assert_eq!(third.record.as_ref(), Some(&record));
        assert!(third.valid);
    }

    #[test]
    fn test_reference_override_both_orientations() {
        let normalizer = Normalizer::default();

        let matching = normalizer.normalize(&RawGameRecord::new("2024-08-31", "LG", "삼성"));
        assert!(matching.valid);
        let record = matching.record.unwrap();
        assert_eq!((record.home_score, record.away_score), (Some(5), Some(3)));
        assert_eq!(record.result, Some(GameResult::HomeWin));
        assert_eq!(matching.issues.len(), 1);
        assert_eq!(matching.issues[0].kind, IssueKind::ReferenceOverride);

        let reversed = normalizer.normalize(&RawGameRecord::new("2024-08-31", "삼성", "LG").with_scores(9, 9));
        assert!(reversed.valid);
        let record = reversed.record.unwrap();
        assert_eq!((record.home_score, record.away_score), (Some(3), Some(5)));
        assert_eq!(record.result, Some(GameResult::AwayWin));
        assert!(reversed.issues.iter().any(|i| i.kind == IssueKind::ReferenceOverride));
    }
}

#[cfg(test)]
mod reconciler_properties {
    use super::*;

    #[test]
    fn test_reversed_fixture_is_duplicate() {
        let reconciler = Reconciler::default();
        let report = reconciler.reconcile(&[
            RawGameRecord::new("2025-09-20", "KT", "LG"),
            RawGameRecord::new("2025-09-20", "LG", "KT"),
        ]);
        assert_eq!(report.duplicate_count, 1);
        assert_eq!(report.validated_games.len(), 1);
        assert_eq!(report.validated_games[0].home_team, "KT");

        let report = reconciler.reconcile(&[
            RawGameRecord::new("2025-09-20", "LG", "KT"),
            RawGameRecord::new("2025-09-20", "KT", "LG"),
        ]);
        assert_eq!(report.duplicate_count, 1);
        assert_eq!(report.validated_games[0].home_team, "LG");
    }

    #[test]
    fn test_success_rate_with_duplicate_and_rejected_record() {
        let mut rejected = RawGameRecord::new("2025-09-20", "NC", "SSG");
        rejected.home_team = Some(String::new());

        let raws = vec![
            RawGameRecord::new("2025-09-20", "KT", "LG").with_scores(4, 2),
            RawGameRecord::new("2025-09-20", "두산", "KIA"),
            RawGameRecord::new("2025-09-20", "KT", "LG").with_scores(4, 2),
            rejected,
            RawGameRecord::new("2025-09-20", "한화", "키움"),
        ];

        let report = Reconciler::default().reconcile(&raws);
        assert_eq!(report.original_count, 5);
        assert_eq!(report.validated_games.len(), 3);
        assert_eq!(report.duplicate_count, 1);
        assert_eq!(report.valid_count, 4);
        assert_eq!(report.rejected.len(), 1);
        assert_eq!(report.rejected[0].record, 4);
        assert!((report.success_rate - 60.0).abs() < 1e-9);

        let kinds: Vec<IssueKind> = report.issues.iter().map(|i| i.kind).collect();
        assert_eq!(kinds, vec![IssueKind::MissingField, IssueKind::Duplicate]);
        assert_eq!(report.issues[1].record, Some(3));
    }

    #[test]
    fn test_empty_batch() {
        let report = Reconciler::default().reconcile(&[]);
        assert_eq!(report.original_count, 0);
        assert_eq!(report.success_rate, 0.0);
        assert!(report.validated_games.is_empty());
        assert!(report.issues.is_empty());
    }

    #[test]
    fn test_batch_with_alternate_tables() {
        let tables = crate::ReferenceTables::from_json_str(
            r#"{"valid_teams": ["Arsenal", "Chelsea"], "team_aliases": {"CFC": "Chelsea"}}"#,
        )
        .unwrap();
        let reconciler = Reconciler::with_tables(tables);
        assert!(reconciler.normalizer().tables().is_valid_team("Arsenal"));
        assert!(!reconciler.normalizer().tables().is_valid_team("KT"));

        let report = reconciler.reconcile(&[
            RawGameRecord::new("2025-08-17", "CFC", "Arsenal").with_scores(1, 1),
            RawGameRecord::new("2025-08-17", "KT", "LG"),
        ]);
        assert_eq!(report.valid_count, 1);
        assert_eq!(report.validated_games[0].home_team, "Chelsea");
        assert_eq!(report.validated_games[0].result, Some(GameResult::Draw));
        assert_eq!(report.validated_games[0].stadium, None);
        assert_eq!(report.validated_games[1].home_team, "KT");
    }

    #[test]
    fn test_sample_batch_is_clean() {
        let report = Reconciler::default().reconcile(&sample_batch());
        assert_eq!(report.valid_count, 5);
        assert_eq!(report.duplicate_count, 0);
        assert_eq!(report.blocking_issues().count(), 0);
        assert_eq!(report.validated_games[2].stadium.as_deref(), Some("서울 고척스카이돔"));
        assert_eq!(report.validated_games[2].result, Some(GameResult::Draw));
    }
}
