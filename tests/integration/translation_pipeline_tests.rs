/*!
 * Multi-language translation pipeline tests with mock backends
 */

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use subgen::backends::{BackendKind, TranslationBackend};
use subgen::errors::ConfigError;
use subgen::translation::{
    CueTranslator, LanguageOutcome, MultiLanguageTranslator, TranslationJobState,
};

use crate::common::mock_backends::{FailingBackend, PrefixBackend};
use crate::common::{init_test_logging, sample_track};

fn prefix_factory() -> impl Fn() -> Result<CueTranslator, ConfigError> + Clone + Send + Sync + 'static {
    || {
        let chain: Vec<Box<dyn TranslationBackend>> = vec![Box::new(PrefixBackend::new("t:"))];
        Ok(CueTranslator::with_chain(chain))
    }
}

#[tokio::test]
async fn test_translateAll_withTwoLanguages_shouldReturnResultsInRequestOrder() {
    init_test_logging();
    let orchestrator = MultiLanguageTranslator::new(BackendKind::GoogleFree, None, 2);
    let source = sample_track();
    let languages = vec!["Spanish".to_string(), "German".to_string()];

    let results = orchestrator
        .translate_all_with(&source, &languages, prefix_factory(), |_, _| {})
        .await;

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].language, "Spanish");
    assert_eq!(results[0].code, "es");
    assert_eq!(results[1].language, "German");
    assert_eq!(results[1].code, "de");
    assert!(results.iter().all(|r| r.is_success()));
}

#[tokio::test]
async fn test_translateAll_shouldPreserveStructurePerLanguage() {
    let orchestrator = MultiLanguageTranslator::new(BackendKind::GoogleFree, None, 2);
    let source = sample_track();
    let languages = vec!["Spanish".to_string()];

    let results = orchestrator
        .translate_all_with(&source, &languages, prefix_factory(), |_, _| {})
        .await;

    let LanguageOutcome::Succeeded { track, srt, vtt } = &results[0].outcome else {
        panic!("expected a successful translation");
    };

    assert_eq!(track.len(), source.len());
    for (original, translated) in source.cues.iter().zip(&track.cues) {
        assert_eq!(translated.id, original.id);
        assert_eq!(translated.start_ms, original.start_ms);
        assert_eq!(translated.end_ms, original.end_ms);
    }
    // Speaker tags survive, the payload is rewritten
    assert_eq!(track.cues[0].text, "[Speaker_1] t:Hola");
    assert!(srt.contains("[Speaker_1] t:Hola"));
    assert!(vtt.starts_with("WEBVTT\n\n"));
}

#[tokio::test]
async fn test_translateAll_withOneFailingLanguage_shouldNotAbortSiblings() {
    let orchestrator = MultiLanguageTranslator::new(BackendKind::GoogleFree, None, 2);
    let source = sample_track();
    let languages = vec!["Spanish".to_string(), "German".to_string()];

    // The backend only serves Spanish; German attempts all fail
    let factory = || {
        let chain: Vec<Box<dyn TranslationBackend>> =
            vec![Box::new(PrefixBackend::for_targets("es:", &["es"]))];
        Ok(CueTranslator::with_chain(chain))
    };

    let results = orchestrator
        .translate_all_with(&source, &languages, factory, |_, _| {})
        .await;

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].state(), TranslationJobState::Succeeded);
    assert_eq!(results[1].state(), TranslationJobState::Failed);

    // The failed sibling never corrupts the successful one
    let LanguageOutcome::Succeeded { track, .. } = &results[0].outcome else {
        panic!("expected Spanish to succeed");
    };
    assert_eq!(track.cues[0].text, "[Speaker_1] es:Hola");
}

#[tokio::test]
async fn test_translateAll_withUnchangedOutput_shouldFailThatLanguage() {
    let orchestrator = MultiLanguageTranslator::new(BackendKind::GoogleFree, None, 2);
    let source = sample_track();
    let languages = vec!["German".to_string()];

    // Every attempt fails, so every cue keeps its original text
    let factory = || {
        let chain: Vec<Box<dyn TranslationBackend>> = vec![Box::new(FailingBackend::new())];
        Ok(CueTranslator::with_chain(chain))
    };

    let results = orchestrator
        .translate_all_with(&source, &languages, factory, |_, _| {})
        .await;

    assert_eq!(results.len(), 1);
    assert!(!results[0].is_success());
}

#[tokio::test]
async fn test_translateAll_withMissingAzureCredential_shouldFailBeforeAnyJob() {
    let orchestrator = MultiLanguageTranslator::new(BackendKind::Azure, None, 2);
    let source = sample_track();
    let languages = vec!["Spanish".to_string()];

    let result = orchestrator
        .translate_all(&source, &languages, |_, _| {})
        .await;

    assert!(matches!(result, Err(ConfigError::MissingCredential(_))));
}

#[tokio::test]
async fn test_translateAll_shouldReportProgressForEveryLanguage() {
    let orchestrator = MultiLanguageTranslator::new(BackendKind::GoogleFree, None, 1);
    let source = sample_track();
    let languages = vec![
        "Spanish".to_string(),
        "German".to_string(),
        "French".to_string(),
    ];

    let ticks = Arc::new(AtomicUsize::new(0));
    let counter = ticks.clone();

    let results = orchestrator
        .translate_all_with(&source, &languages, prefix_factory(), move |done, total| {
            counter.fetch_add(1, Ordering::SeqCst);
            assert!(done <= total);
        })
        .await;

    assert_eq!(results.len(), 3);
    assert_eq!(ticks.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_translateAll_withNoLanguages_shouldReturnEmpty() {
    let orchestrator = MultiLanguageTranslator::new(BackendKind::GoogleFree, None, 2);
    let source = sample_track();

    let results = orchestrator
        .translate_all_with(&source, &[], prefix_factory(), |_, _| {})
        .await;

    assert!(results.is_empty());
}
