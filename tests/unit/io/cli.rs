//! Tests for argument parsing, output paths and the end-to-end processor

#[cfg(test)]
mod tests {
    use crate::common::{ScriptedModel, photo_set, solid_png, zip_bundle};
    use clap::Parser;
    use collagist::io::cli::{Cli, CollageProcessor, write_outputs};
    use collagist::io::error::ErrorKind;
    use collagist::io::logging::Verbosity;
    use collagist::workflow::{CollageArtifact, HeaderColor, ScoredCandidate};
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    fn parse(extra: &[&str]) -> Cli {
        let mut args = vec!["collagist", "photos.zip", "--logo", "logo.png", "--title", "Fair"];
        args.extend_from_slice(extra);
        Cli::try_parse_from(args).unwrap()
    }

    /// Write a zip of `count` photos and a logo, returning CLI args pointing at them
    fn fixture(dir: &Path, count: usize) -> Vec<String> {
        let photos = photo_set(count);
        let entries: Vec<(&str, &[u8])> = photos
            .iter()
            .map(|p| (p.name.as_str(), p.bytes.as_slice()))
            .collect();
        std::fs::write(dir.join("photos.zip"), zip_bundle(&entries)).unwrap();
        std::fs::write(dir.join("logo.png"), solid_png(40, 20, [255, 255, 255])).unwrap();

        vec![
            "collagist".to_string(),
            dir.join("photos.zip").display().to_string(),
            "--logo".to_string(),
            dir.join("logo.png").display().to_string(),
            "--title".to_string(),
            "GHS Dayalpura".to_string(),
            "--date".to_string(),
            "2024-03-05".to_string(),
            "--output".to_string(),
            dir.join("out/collage").display().to_string(),
            "--quiet".to_string(),
        ]
    }

    // Tests defaults when only the required arguments are given
    // Verified by changing default values
    #[test]
    fn test_cli_defaults() {
        let cli = parse(&[]);
        assert_eq!(cli.archive, PathBuf::from("photos.zip"));
        assert_eq!(cli.header_color, "#004646");
        assert_eq!(cli.photos, 4);
        assert_eq!(cli.max_attempts, 3);
        assert_eq!(cli.model, "gemini-2.5-flash");
        assert_eq!(cli.output, PathBuf::from("social_media_collage"));
        assert!(cli.skip_existing());
        assert!(cli.should_show_progress());
        assert_eq!(cli.verbosity(), Verbosity::Normal);
    }

    // Tests short flags map to their fields
    // Verified by swapping short flag letters
    #[test]
    fn test_cli_short_flags() {
        let cli = parse(&["-n", "6", "-c", "#abc", "-d", "2024-03-05", "-a", "5", "-m", "other", "-o", "x/y"]);
        assert_eq!(cli.photos, 6);
        assert_eq!(cli.header_color, "#abc");
        assert_eq!(cli.date.as_deref(), Some("2024-03-05"));
        assert_eq!(cli.max_attempts, 5);
        assert_eq!(cli.model, "other");
        assert_eq!(cli.collage_path(), PathBuf::from("x/y.jpg"));
        assert_eq!(cli.feedback_path(), PathBuf::from("x/y.txt"));
    }

    // Tests required arguments are enforced
    // Verified by making the title optional
    #[test]
    fn test_cli_requires_inputs() {
        assert!(Cli::try_parse_from(["collagist", "photos.zip", "--logo", "l.png"]).is_err());
        assert!(Cli::try_parse_from(["collagist", "--logo", "l.png", "--title", "t"]).is_err());
    }

    // Tests quiet wins over verbose and disables progress
    // Verified by checking verbose first
    #[test]
    fn test_cli_verbosity() {
        assert_eq!(parse(&["-v"]).verbosity(), Verbosity::Verbose);
        let both = parse(&["-q", "-v"]);
        assert_eq!(both.verbosity(), Verbosity::Quiet);
        assert!(!both.should_show_progress());
        assert!(!parse(&["--no-skip"]).skip_existing());
    }

    // Tests event details come from the flags, with today as the default date
    // Verified by ignoring the color flag
    #[test]
    fn test_cli_event_details() {
        let details = parse(&["-d", "2024-03-05", "-c", "#c01", "-n", "5"])
            .event_details()
            .unwrap();
        assert_eq!(details.formatted_date(), "March 5, 2024");
        assert_eq!(details.header_color, HeaderColor::new(0xcc, 0x00, 0x11));
        assert_eq!(details.photo_count, 5);

        let today = parse(&[]).event_details().unwrap();
        assert_eq!(today.date, chrono::Local::now().date_naive());

        let error = parse(&["-d", "yesterday"]).event_details().unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Validation);
    }

    // Tests a blank API key is rejected before any file is read
    // Verified by sending requests with an empty key
    #[test]
    fn test_blank_api_key_rejected() {
        let cli = parse(&["--api-key", "   ", "--no-skip"]);
        let error = CollageProcessor::new(cli).process().unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Validation);
        assert!(error.to_string().contains("api_key"));
    }

    // Tests a full run writes the collage and its feedback
    // Verified by writing only the image
    #[test]
    fn test_process_writes_outputs() {
        let dir = TempDir::new().unwrap();
        let cli = Cli::try_parse_from(fixture(dir.path(), 4)).unwrap();
        let model = ScriptedModel::new().with_score("Impact Score: 8/10. Balanced layout.");

        CollageProcessor::new(cli).process_with_model(&model).unwrap();

        let collage = std::fs::read(dir.path().join("out/collage.jpg")).unwrap();
        let decoded = image::load_from_memory(&collage).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (2400, 3000));

        let feedback = std::fs::read_to_string(dir.path().join("out/collage.txt")).unwrap();
        assert_eq!(feedback, "Impact Score: 8/10. Balanced layout.");
        assert_eq!(model.selection_calls(), 0);
    }

    // Tests existing output is left alone unless overwriting is requested
    // Verified by always regenerating
    #[test]
    fn test_process_skips_existing() {
        let dir = TempDir::new().unwrap();
        let args = fixture(dir.path(), 4);
        std::fs::create_dir_all(dir.path().join("out")).unwrap();
        std::fs::write(dir.path().join("out/collage.jpg"), b"old").unwrap();

        let model = ScriptedModel::new();
        CollageProcessor::new(Cli::try_parse_from(&args).unwrap())
            .process_with_model(&model)
            .unwrap();
        assert_eq!(model.total_calls(), 0);
        assert_eq!(std::fs::read(dir.path().join("out/collage.jpg")).unwrap(), b"old");
    }

    // Tests validation failures surface before any model call
    // Verified by calling the model before counting photos
    #[test]
    fn test_process_too_few_photos() {
        let dir = TempDir::new().unwrap();
        let mut args = fixture(dir.path(), 3);
        args.push("--no-skip".to_string());

        let model = ScriptedModel::new();
        let error = CollageProcessor::new(Cli::try_parse_from(&args).unwrap())
            .process_with_model(&model)
            .unwrap_err();

        assert_eq!(error.kind(), ErrorKind::Validation);
        assert_eq!(model.total_calls(), 0);
        assert!(!dir.path().join("out/collage.jpg").exists());
    }

    // Tests a missing archive is a file system error naming the path
    // Verified by reporting an unknown path
    #[test]
    fn test_process_missing_archive() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.zip").display().to_string();
        let cli = parse(&["--no-skip", "-d", "2024-03-05"]);
        let cli = Cli {
            archive: PathBuf::from(&missing),
            ..cli
        };

        let error = CollageProcessor::new(cli)
            .process_with_model(&ScriptedModel::new())
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::FileSystem);
        assert!(error.to_string().contains("nope.zip"));
    }

    // Tests outputs land in freshly created directories
    // Verified by writing without creating parents
    #[test]
    fn test_write_outputs_creates_directories() {
        let dir = TempDir::new().unwrap();
        let best = ScoredCandidate {
            attempt: 2,
            artifact: CollageArtifact {
                image_data: vec![0xFF, 0xD8, 0xFF, 0xD9],
                source_names: vec!["a.jpg".to_string()],
            },
            score: 9.5,
            feedback: "Impact Score: 9.5/10. Great.".to_string(),
        };
        let collage = dir.path().join("a/b/c.jpg");
        let feedback = dir.path().join("a/b/c.txt");

        write_outputs(&best, &collage, &feedback).unwrap();
        assert_eq!(std::fs::read(&collage).unwrap(), best.artifact.image_data);
        assert_eq!(std::fs::read_to_string(&feedback).unwrap(), best.feedback);
    }
}
