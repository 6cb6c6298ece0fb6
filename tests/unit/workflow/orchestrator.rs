//! Tests for the bounded retry loop, selection policy and best-candidate tracking

#[cfg(test)]
mod tests {
    use crate::common::{
        ScriptedModel, first_names, photo_set, sample_details, small_compositor, solid_png,
    };
    use collagist::CollageError;
    use collagist::io::archive::PhotoAsset;
    use collagist::io::configuration::{MAX_CONTACT_SHEET_PHOTOS, SCORING_FALLBACK_TEXT};
    use collagist::io::error::ErrorKind;
    use collagist::workflow::{CollageRun, RunState};

    fn logo() -> Vec<u8> {
        solid_png(12, 6, [250, 250, 250])
    }

    fn scripted(selections: usize, scores: &[f64]) -> ScriptedModel {
        (0..selections)
            .fold(ScriptedModel::new(), |model, _| {
                model.with_selection(&first_names(4))
            })
            .with_scores(scores)
    }

    // Tests the best of three attempts is kept when the last one wins
    // Verified by always returning the final attempt
    #[test]
    fn test_keeps_highest_score() {
        let photos = photo_set(6);
        let details = sample_details(4);
        let model = scripted(3, &[8.0, 9.0, 9.4]);

        let best = CollageRun::new(&model, &photos, &logo(), &details)
            .unwrap()
            .with_compositor(small_compositor())
            .run()
            .unwrap();

        assert_eq!(best.attempt, 3);
        assert!((best.score - 9.4).abs() < 1e-9);
        assert_eq!(model.selection_calls(), 3);
        assert_eq!(model.scoring_calls(), 3);
        assert_eq!(model.scoring_images.lock().unwrap()[2], best.artifact.image_data);
    }

    // Tests a declining sequence keeps the first attempt
    // Verified by keeping the latest candidate
    #[test]
    fn test_keeps_earlier_better_attempt() {
        let photos = photo_set(6);
        let details = sample_details(4);
        let model = scripted(3, &[8.0, 7.0, 6.0]);

        let best = CollageRun::new(&model, &photos, &logo(), &details)
            .unwrap()
            .with_compositor(small_compositor())
            .run()
            .unwrap();

        assert_eq!(best.attempt, 1);
        assert!((best.score - 8.0).abs() < 1e-9);
        assert!(best.feedback.starts_with("Impact Score: 8/10"));
    }

    // Tests a score above the threshold stops immediately
    // Verified by always running every attempt
    #[test]
    fn test_stops_on_high_score() {
        let photos = photo_set(6);
        let details = sample_details(4);
        let model = scripted(3, &[9.5, 1.0, 1.0]);

        let mut run = CollageRun::new(&model, &photos, &logo(), &details)
            .unwrap()
            .with_compositor(small_compositor());

        assert_eq!(run.state(), RunState::Idle);
        assert!(!run.execute_attempt().unwrap());
        assert_eq!(run.state(), RunState::Done);
        assert_eq!(run.attempt(), 1);
        assert_eq!(run.last_score(), Some(9.5));

        // A finished run does nothing further
        assert!(!run.execute_attempt().unwrap());
        assert_eq!(model.total_calls(), 2);
    }

    // Tests a score of exactly nine is not a success and ties keep the earlier attempt
    // Verified by comparing with greater-or-equal
    #[test]
    fn test_threshold_is_strict_and_ties_keep_first() {
        let photos = photo_set(6);
        let details = sample_details(4);
        let model = scripted(3, &[9.0, 9.0, 9.0]);

        let mut run = CollageRun::new(&model, &photos, &logo(), &details)
            .unwrap()
            .with_compositor(small_compositor());

        assert!(run.execute_attempt().unwrap());
        assert_eq!(run.state(), RunState::Retry);
        assert!(run.execute_attempt().unwrap());
        assert!(!run.execute_attempt().unwrap());
        assert_eq!(run.state(), RunState::Done);

        let best = run.finish().unwrap();
        assert_eq!(best.attempt, 1);
        assert_eq!(model.scoring_calls(), 3);
    }

    // Tests the attempt budget can be lowered and never drops below one
    // Verified by ignoring the override
    #[test]
    fn test_max_attempts_override() {
        let photos = photo_set(6);
        let details = sample_details(4);
        let model = scripted(3, &[1.0, 2.0, 3.0]);

        let run = CollageRun::new(&model, &photos, &logo(), &details)
            .unwrap()
            .with_compositor(small_compositor())
            .with_max_attempts(0);
        assert_eq!(run.max_attempts(), 1);

        let best = run.run().unwrap();
        assert_eq!(best.attempt, 1);
        assert_eq!(model.scoring_calls(), 1);
    }

    // Tests too few photos is rejected before any model call
    // Verified by validating after the first selection
    #[test]
    fn test_too_few_photos_rejected() {
        let photos = photo_set(3);
        let details = sample_details(4);
        let model = scripted(1, &[9.5]);

        let error = CollageRun::new(&model, &photos, &logo(), &details)
            .err()
            .unwrap();
        assert_eq!(error.kind(), ErrorKind::Validation);
        assert_eq!(model.total_calls(), 0);

        let error = CollageRun::new(&model, &[], &logo(), &details).err().unwrap();
        assert!(error.to_string().contains("photos"));
    }

    // Tests a missing or unreadable logo is rejected up front
    // Verified by drawing the header without a logo
    #[test]
    fn test_logo_required() {
        let photos = photo_set(4);
        let details = sample_details(4);
        let model = ScriptedModel::new();

        let error = CollageRun::new(&model, &photos, &[], &details).err().unwrap();
        assert_eq!(error.kind(), ErrorKind::Validation);

        let error = CollageRun::new(&model, &photos, b"not an image", &details)
            .err()
            .unwrap();
        assert_eq!(error.kind(), ErrorKind::Composition);
        assert!(error.to_string().contains("logo"));
    }

    // Tests exactly enough photos skips selection and runs a single attempt
    // Verified by asking the model to choose anyway
    #[test]
    fn test_all_photos_used_without_selection() {
        let photos = photo_set(4);
        let details = sample_details(4);
        let model = ScriptedModel::new().with_scores(&[3.0, 9.9]);

        let run = CollageRun::new(&model, &photos, &logo(), &details)
            .unwrap()
            .with_compositor(small_compositor());
        assert!(run.uses_all_photos());

        let best = run.run().unwrap();
        assert_eq!(best.attempt, 1);
        assert!((best.score - 3.0).abs() < 1e-9);
        assert_eq!(model.selection_calls(), 0);
        assert_eq!(model.scoring_calls(), 1);

        let expected: Vec<String> = photos.iter().map(|p| p.name.clone()).collect();
        assert_eq!(best.artifact.source_names, expected);
    }

    // Tests too few valid names is a selection error that fails the run
    // Verified by composing with fewer photos
    #[test]
    fn test_short_selection_fails_run() {
        let photos = photo_set(6);
        let details = sample_details(4);
        let model = ScriptedModel::new()
            .with_selection("photo_01.png, photo_02.png, photo_01.png, bogus.png")
            .with_scores(&[9.5]);

        let mut run = CollageRun::new(&model, &photos, &logo(), &details)
            .unwrap()
            .with_compositor(small_compositor());
        let error = run.execute_attempt().unwrap_err();

        match &error {
            CollageError::Selection { attempt, reason } => {
                assert_eq!(*attempt, 1);
                assert!(reason.contains("only select 2 unique photos"));
            }
            other => unreachable!("expected selection error, got {other}"),
        }
        assert_eq!(run.state(), RunState::Failed);
        assert_eq!(model.scoring_calls(), 0);
        assert!(!run.execute_attempt().unwrap());
        assert!(run.finish().is_err());
    }

    // Tests a failed selection call aborts the run with the attempt recorded
    // Verified by retrying after a selection failure
    #[test]
    fn test_selection_call_failure_is_fatal() {
        let photos = photo_set(6);
        let details = sample_details(4);
        let model = ScriptedModel::new()
            .with_selection(&first_names(4))
            .with_selection_failure("service unavailable")
            .with_scores(&[5.0, 9.9]);

        let error = CollageRun::new(&model, &photos, &logo(), &details)
            .unwrap()
            .with_compositor(small_compositor())
            .run()
            .unwrap_err();

        assert!(matches!(error, CollageError::Selection { attempt: 2, .. }));
        assert!(error.to_string().contains("attempt 2"));
        assert_eq!(model.scoring_calls(), 1);
    }

    // Tests a failed scoring call yields a zero score and the fallback feedback
    // Verified by aborting on scoring failure
    #[test]
    fn test_scoring_failure_degrades() {
        let photos = photo_set(4);
        let details = sample_details(4);
        let model = ScriptedModel::new().with_score_failure("timeout");

        let best = CollageRun::new(&model, &photos, &logo(), &details)
            .unwrap()
            .with_compositor(small_compositor())
            .run()
            .unwrap();

        assert!(best.score.abs() < 1e-9);
        assert_eq!(best.feedback, SCORING_FALLBACK_TEXT);
        assert!(!best.artifact.image_data.is_empty());
    }

    // Tests chosen photos keep archive order and invented names are ignored
    // Verified by placing the model's first picks in reply order
    #[test]
    fn test_selection_keeps_archive_order() {
        let photos = photo_set(6);
        let details = sample_details(4);
        let model = ScriptedModel::new()
            .with_selection("photo_05.png, ghost.png, photo_02.png\nphoto_06.png, photo_01.png, photo_03.png")
            .with_scores(&[9.9]);

        let best = CollageRun::new(&model, &photos, &logo(), &details)
            .unwrap()
            .with_compositor(small_compositor())
            .run()
            .unwrap();

        assert_eq!(
            best.artifact.source_names,
            vec!["photo_01.png", "photo_02.png", "photo_03.png", "photo_05.png"]
        );

        let prompts = model.selection_prompts.lock().unwrap();
        for photo in &photos {
            assert!(prompts[0].contains(&photo.name));
        }
    }

    // Tests an archive too large for one contact sheet is rejected up front
    // Verified by letting the sheet overflow the JPEG height limit
    #[test]
    fn test_too_many_photos_rejected() {
        let bytes = solid_png(2, 2, [10, 20, 30]);
        let photos: Vec<PhotoAsset> = (0..=MAX_CONTACT_SHEET_PHOTOS)
            .map(|i| PhotoAsset::new(format!("p{i}.png"), bytes.clone()))
            .collect();
        let details = sample_details(4);
        let model = ScriptedModel::new();

        let error = CollageRun::new(&model, &photos, &logo(), &details)
            .err()
            .unwrap();
        assert_eq!(error.kind(), ErrorKind::Validation);
        assert!(error.to_string().contains("1020"));
        assert_eq!(model.total_calls(), 0);

        let fits = &photos[..MAX_CONTACT_SHEET_PHOTOS];
        assert!(CollageRun::new(&model, fits, &logo(), &details).is_ok());
    }

    // Tests the contact sheet is built once and reused by every attempt
    // Verified by rebuilding the sheet per attempt
    #[test]
    fn test_contact_sheet_reused() {
        let photos = photo_set(6);
        let details = sample_details(4);
        let model = scripted(2, &[1.0, 2.0]);

        let best = CollageRun::new(&model, &photos, &logo(), &details)
            .unwrap()
            .with_compositor(small_compositor())
            .with_max_attempts(2)
            .run()
            .unwrap();
        assert_eq!(best.attempt, 2);

        let sheets = model.selection_images.lock().unwrap();
        assert_eq!(sheets.len(), 2);
        assert_eq!(sheets[0], sheets[1]);
        assert_eq!(&sheets[0][..2], &[0xFF, 0xD8]);

        let decoded = image::load_from_memory(&sheets[0]).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (1024, 512));
    }

    // Tests finishing before any attempt reports that no collage exists
    // Verified by returning a blank collage
    #[test]
    fn test_finish_without_attempts() {
        let photos = photo_set(4);
        let details = sample_details(4);
        let model = ScriptedModel::new();

        let run = CollageRun::new(&model, &photos, &logo(), &details).unwrap();
        assert!(run.best().is_none());
        let error = run.finish().unwrap_err();
        assert!(error.to_string().contains("could not generate a collage"));
    }
}
