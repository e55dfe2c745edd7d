/*!
 * In-memory session store for generation results.
 *
 * Sessions hold the transcription and emitted tracks for one processed
 * upload so later translation requests can refer back to them by an opaque
 * id. The store is dependency-injected state, not a global, and entries
 * expire after a TTL instead of accumulating for the process lifetime.
 */

use chrono::{DateTime, Duration, Utc};
use log::debug;
use parking_lot::Mutex;
use std::collections::HashMap;
use uuid::Uuid;

use crate::transcription::Transcription;
use crate::translation::{LanguageOutcome, LanguageResult};

/// Translated artifacts for one target language
#[derive(Debug, Clone)]
pub struct TranslatedArtifacts {
    /// SRT rendering
    pub srt: String,
    /// WebVTT rendering
    pub vtt: String,
}

/// Everything produced for one processed upload
#[derive(Debug, Clone)]
pub struct GenerationSession {
    /// Original upload filename
    pub filename: String,

    /// Raw transcription result
    pub transcription: Transcription,

    /// Emitted SRT track
    pub srt: String,

    /// Emitted WebVTT track
    pub vtt: String,

    /// Translated tracks keyed by requested language
    pub translations: HashMap<String, TranslatedArtifacts>,
}

impl GenerationSession {
    /// Create a session for freshly generated tracks
    pub fn new(filename: String, transcription: Transcription, srt: String, vtt: String) -> Self {
        Self {
            filename,
            transcription,
            srt,
            vtt,
            translations: HashMap::new(),
        }
    }
}

struct StoredSession {
    session: GenerationSession,
    created_at: DateTime<Utc>,
}

/// TTL-bounded in-memory session store keyed by opaque ids
pub struct SessionStore {
    ttl: Duration,
    inner: Mutex<HashMap<String, StoredSession>>,
}

impl SessionStore {
    /// Create a store with the given entry lifetime
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            inner: Mutex::new(HashMap::new()),
        }
    }

    /// Create a store with a one-hour entry lifetime
    pub fn with_default_ttl() -> Self {
        Self::new(Duration::hours(1))
    }

    /// Store a session and return its opaque id
    pub fn insert(&self, session: GenerationSession) -> String {
        let id = Uuid::new_v4().to_string();
        let mut inner = self.inner.lock();
        Self::purge_expired_locked(&mut inner, self.ttl);
        debug!("Storing session {} for {}", &id[..8], session.filename);
        inner.insert(
            id.clone(),
            StoredSession {
                session,
                created_at: Utc::now(),
            },
        );
        id
    }

    /// Fetch a session by id, if present and not expired
    pub fn get(&self, id: &str) -> Option<GenerationSession> {
        let mut inner = self.inner.lock();
        Self::purge_expired_locked(&mut inner, self.ttl);
        inner.get(id).map(|stored| stored.session.clone())
    }

    /// Attach the successful results of a translation run to a session.
    ///
    /// Returns false when the session does not exist (or has expired).
    pub fn attach_translations(&self, id: &str, results: &[LanguageResult]) -> bool {
        let mut inner = self.inner.lock();
        Self::purge_expired_locked(&mut inner, self.ttl);

        let Some(stored) = inner.get_mut(id) else {
            return false;
        };

        for result in results {
            if let LanguageOutcome::Succeeded { srt, vtt, .. } = &result.outcome {
                stored.session.translations.insert(
                    result.language.clone(),
                    TranslatedArtifacts {
                        srt: srt.clone(),
                        vtt: vtt.clone(),
                    },
                );
            }
        }
        true
    }

    /// Drop every expired entry
    pub fn purge_expired(&self) {
        let mut inner = self.inner.lock();
        Self::purge_expired_locked(&mut inner, self.ttl);
    }

    /// Number of live sessions
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Whether the store holds no sessions
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    fn purge_expired_locked(inner: &mut HashMap<String, StoredSession>, ttl: Duration) {
        let now = Utc::now();
        inner.retain(|_, stored| now - stored.created_at < ttl);
    }
}
