/*!
 * English-target enhancement.
 *
 * When the target language is English, cues are translated with
 * conversation context instead of line by line: multi-cue conversation
 * segments are batched into a single request and unpacked afterwards, and
 * lone cues carry a rolling window of recently translated lines. A cleanup
 * pass then repairs the usual machine-translation artifacts.
 *
 * The cleanup tables are pattern lists, not a grammar model. They live
 * behind `PolishPolicy` so they can be tuned or swapped without touching
 * the translation core.
 */

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::backends::TranslationBackend;
use crate::subtitle_processor::{SubtitleCue, attach_speaker_tag, split_speaker_tag};

use super::core::attempt_chain;
use super::segments::group_conversation_segments;

/// Target code for this path
const ENGLISH_CODE: &str = "en";

/// Separator used when batching a conversation segment into one request
const BATCH_SEPARATOR: &str = " | ";

/// Split candidates tried in order when unpacking a batched translation
const SPLIT_SEPARATORS: [&str; 4] = [" | ", ". ", "; ", "\n"];

/// How many previously translated lines feed the rolling context window
const CONTEXT_WINDOW: usize = 5;

/// Instruction wrapped around a batched conversation segment
const BATCH_INSTRUCTION: &str =
    "Translate this conversation into natural English, keeping each part separated by | :";

/// Substrings that backends sometimes echo back from the instruction
const LEAKAGE_MARKERS: [&str; 4] = [
    BATCH_INSTRUCTION,
    "Translate this conversation into natural English",
    "keeping each part separated by | :",
    "keeping each part separated by |",
];

/// Words that stand alone without terminal punctuation
const ACKNOWLEDGEMENTS: [&str; 12] = [
    "ok", "okay", "yes", "no", "yeah", "hey", "hi", "hello", "bye", "thanks", "wow", "hmm",
];

/// Phrase-level repairs applied verbatim, lowercase side first
const PHRASE_FIXES: [(&str, &str); 6] = [
    ("very very", "really"),
    ("really really", "really"),
    ("more better", "better"),
    ("more worse", "worse"),
    ("most best", "best"),
    ("can not", "cannot"),
];

// @const: indefinite article before the listed vowel-sound words
static ARTICLE_FIX_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b([Aa]) (hour|honest|honor|heir|apple|orange|umbrella|idea|egg|elephant)\b")
        .unwrap()
});

// @const: lowercase first-person pronoun, standalone or in contractions
static PRONOUN_I_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bi\b").unwrap());

/// Remove instruction echoes a backend may have translated along with the
/// payload.
pub fn strip_instruction_leakage(text: &str) -> String {
    let mut result = text.to_string();
    for marker in LEAKAGE_MARKERS {
        result = result.replace(marker, "");
    }
    result.trim().to_string()
}

/// Cleanup policy applied to every translated English line
pub trait PolishPolicy: Send + Sync {
    /// Repair artifacts in a translated line
    fn polish(&self, text: &str) -> String;
}

/// Default cleanup policy: fixed grammar tables, capitalization, and
/// terminal punctuation
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishPolish;

impl PolishPolicy for EnglishPolish {
    fn polish(&self, text: &str) -> String {
        let mut result = strip_instruction_leakage(text);

        // Phrase repairs run before capitalization so sentence-initial
        // matches still hit their lowercase forms.
        for (from, to) in PHRASE_FIXES {
            result = result.replace(from, to);
        }

        result = ARTICLE_FIX_REGEX
            .replace_all(&result, |caps: &regex::Captures| {
                let article = if &caps[1] == "A" { "An" } else { "an" };
                format!("{} {}", article, &caps[2])
            })
            .to_string();

        result = PRONOUN_I_REGEX.replace_all(&result, "I").to_string();

        let mut chars = result.chars();
        if let Some(first) = chars.next() {
            result = first.to_uppercase().collect::<String>() + chars.as_str();
        }

        if !result.is_empty() {
            let has_terminal = result.ends_with('.')
                || result.ends_with('!')
                || result.ends_with('?')
                || result.ends_with('…');
            let bare = result.to_lowercase();
            let is_acknowledgement = ACKNOWLEDGEMENTS.contains(&bare.as_str());
            if !has_terminal && !is_acknowledgement {
                result.push('.');
            }
        }

        result
    }
}

/// Context-aware translator for English targets
pub struct EnglishEnhancer<'a> {
    /// Ordered backend attempt chain
    chain: &'a [Box<dyn TranslationBackend>],
    /// Cleanup policy
    polish: &'a dyn PolishPolicy,
    /// Conversation segment gap threshold
    max_gap_ms: u64,
}

impl<'a> EnglishEnhancer<'a> {
    /// Create an enhancer over a backend chain and cleanup policy
    pub fn new(
        chain: &'a [Box<dyn TranslationBackend>],
        polish: &'a dyn PolishPolicy,
        max_gap_ms: u64,
    ) -> Self {
        Self {
            chain,
            polish,
            max_gap_ms,
        }
    }

    /// Translate a cue sequence into English with conversation context.
    ///
    /// The output has the same length and per-position id/start/end as the
    /// input; only text differs. Cues with nothing translatable (empty
    /// text, or a speaker tag with an empty remainder) pass through
    /// unchanged.
    pub async fn translate_cues(&self, cues: &[SubtitleCue]) -> Vec<SubtitleCue> {
        let mut translated: Vec<Option<String>> = vec![None; cues.len()];
        let mut history: Vec<String> = Vec::new();

        for segment in group_conversation_segments(cues, self.max_gap_ms) {
            // Tag-stripped payloads; tag-only and empty cues don't take
            // part in translation at all.
            let remainders: Vec<(usize, String)> = segment
                .filter_map(|i| {
                    let remainder = payload_text(&cues[i]);
                    if remainder.trim().is_empty() {
                        None
                    } else {
                        Some((i, remainder))
                    }
                })
                .collect();

            if remainders.len() >= 2 {
                self.translate_batch(&remainders, &mut translated, &mut history)
                    .await;
            } else if let Some((i, remainder)) = remainders.into_iter().next() {
                let raw = self.translate_single(&remainder, &history).await;
                let polished = self.polish.polish(&raw);
                history.push(polished.clone());
                translated[i] = Some(polished);
            }
        }

        cues.iter()
            .enumerate()
            .map(|(i, cue)| match &translated[i] {
                Some(text) => match split_speaker_tag(&cue.text) {
                    Some((speaker, _)) => cue.with_text(attach_speaker_tag(speaker, text)),
                    None => cue.with_text(text.clone()),
                },
                None => cue.clone(),
            })
            .collect()
    }

    /// Translate a multi-cue conversation segment as one unit, falling back
    /// to per-cue translation when the batch cannot be split back apart.
    async fn translate_batch(
        &self,
        remainders: &[(usize, String)],
        translated: &mut [Option<String>],
        history: &mut Vec<String>,
    ) {
        let texts: Vec<&str> = remainders.iter().map(|(_, r)| r.as_str()).collect();
        let joined = texts.join(BATCH_SEPARATOR);
        let prompt = format!("{} {}", BATCH_INSTRUCTION, joined);

        let mut pieces = None;
        if let Some(result) = attempt_chain(self.chain, &prompt, ENGLISH_CODE).await {
            let cleaned = strip_instruction_leakage(&result);
            pieces = split_back(&cleaned, texts.len());
        }

        match pieces {
            Some(pieces) => {
                for ((i, _), piece) in remainders.iter().zip(pieces) {
                    let polished = self.polish.polish(&piece);
                    history.push(polished.clone());
                    translated[*i] = Some(polished);
                }
            }
            None => {
                debug!(
                    "Batched segment of {} cues did not split back cleanly, translating individually",
                    remainders.len()
                );
                for (i, remainder) in remainders {
                    let raw = self.translate_single(remainder, history).await;
                    let polished = self.polish.polish(&raw);
                    history.push(polished.clone());
                    translated[*i] = Some(polished);
                }
            }
        }
    }

    /// Translate one line with a rolling window of recent translations as
    /// context, degrading to a context-free translation when the windowed
    /// result cannot be split back apart.
    async fn translate_single(&self, text: &str, history: &[String]) -> String {
        if !history.is_empty() {
            let start = history.len().saturating_sub(CONTEXT_WINDOW);
            let window = &history[start..];
            let joined = window.join(BATCH_SEPARATOR);
            let prompt = format!(
                "{} {}{}{}",
                BATCH_INSTRUCTION, joined, BATCH_SEPARATOR, text
            );

            if let Some(result) = attempt_chain(self.chain, &prompt, ENGLISH_CODE).await {
                let cleaned = strip_instruction_leakage(&result);
                if let Some(pieces) = split_back(&cleaned, window.len() + 1) {
                    if let Some(last) = pieces.into_iter().next_back() {
                        return last;
                    }
                }
            }
        }

        attempt_chain(self.chain, text, ENGLISH_CODE)
            .await
            .unwrap_or_else(|| text.to_string())
    }
}

/// The translatable payload of a cue: its text with any speaker tag removed
fn payload_text(cue: &SubtitleCue) -> String {
    match split_speaker_tag(&cue.text) {
        Some((_, remainder)) => remainder.to_string(),
        None => cue.text.clone(),
    }
}

/// Split a batched translation back into per-cue pieces.
///
/// Tries the fixed separator list in order and accepts the first split that
/// yields exactly the expected count.
fn split_back(text: &str, expected: usize) -> Option<Vec<String>> {
    for separator in SPLIT_SEPARATORS {
        let parts: Vec<&str> = text.split(separator).collect();
        if parts.len() == expected {
            return Some(parts.into_iter().map(|p| p.trim().to_string()).collect());
        }
    }
    None
}
