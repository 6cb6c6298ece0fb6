//! Tests for attempt progress tracking

#[cfg(test)]
mod tests {
    use collagist::io::progress::ProgressManager;

    // Tests the best score tracks the maximum across attempts
    // Verified by keeping the latest score
    #[test]
    fn test_best_score_tracking() {
        let mut pm = ProgressManager::new();
        assert!(pm.best_score().is_none());

        pm.start_attempt(1, 3);
        pm.complete_attempt(1, 8.0);
        pm.start_attempt(2, 3);
        pm.complete_attempt(2, 6.5);
        assert_eq!(pm.best_score(), Some(8.0));

        pm.complete_attempt(3, 9.4);
        assert_eq!(pm.best_score(), Some(9.4));
        pm.finish("done");
    }

    // Tests initialization resets the best score
    // Verified by carrying scores across runs
    #[test]
    fn test_initialize_resets() {
        let mut pm = ProgressManager::default();
        pm.initialize(3);
        pm.complete_attempt(1, 5.0);
        pm.initialize(2);
        assert!(pm.best_score().is_none());
        pm.abandon("failed");
    }
}
