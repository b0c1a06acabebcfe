//! Turning a seconds-based speech transcript into frame-based caption groups.
//!
//! Two packing modes exist: [`GroupingMode::Groups`] keeps words separate inside each caption
//! group (for styles that animate word by word), while [`GroupingMode::Phrases`] joins words into
//! one text entry per caption (for styles that show a whole phrase at once).

use crate::{
    foundation::{
        core::{FrameIndex, Fps},
        error::CaptionResult,
    },
    timing::model::{CaptionGroup, CaptionTrack, Word},
};

/// Transcript as produced by a word-level speech-to-text pass. Times are in seconds.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct Transcript {
    #[serde(default)]
    pub segments: Vec<TranscriptSegment>,
}

#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct TranscriptSegment {
    #[serde(default)]
    pub words: Vec<TimedWord>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TimedWord {
    pub word: String,
    pub start: f64,
    pub end: f64,
}

impl Transcript {
    pub fn words(&self) -> impl Iterator<Item = &TimedWord> {
        self.segments.iter().flat_map(|s| s.words.iter())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupingMode {
    Groups,
    Phrases,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GroupingRules {
    pub mode: GroupingMode,
    pub max_words: usize,
    pub max_start_gap_secs: f64,
    pub max_chars: usize,
}

fn ends_sentence(word: &str) -> bool {
    word.trim().ends_with('.')
}

/// Pack consecutive words into groups.
///
/// A word joins the open group only if it starts within `max_start_gap_secs` of the previous
/// word's start, the group has room for another word, the summed character count stays within
/// `max_chars`, and the previous word does not end a sentence.
pub fn group_words(words: &[TimedWord], rules: &GroupingRules) -> Vec<Vec<TimedWord>> {
    let mut out = Vec::new();
    let mut open: Vec<TimedWord> = Vec::new();
    let mut chars = 0usize;

    for word in words {
        let len = word.word.chars().count();
        let fits = match open.last() {
            None => true,
            Some(prev) => {
                word.start - prev.start <= rules.max_start_gap_secs
                    && open.len() < rules.max_words
                    && chars + len <= rules.max_chars
                    && !ends_sentence(&prev.word)
            }
        };

        if fits {
            chars += len;
            open.push(word.clone());
        } else {
            out.push(std::mem::take(&mut open));
            open.push(word.clone());
            chars = len;
        }
    }

    if !open.is_empty() {
        out.push(open);
    }
    out
}

/// Merge consecutive words into single phrase entries.
///
/// The gap is measured from the phrase's first word, and the limit on characters applies to
/// the space-joined text.
pub fn merge_phrases(words: &[TimedWord], rules: &GroupingRules) -> Vec<TimedWord> {
    let mut iter = words.iter();
    let Some(first) = iter.next() else {
        return Vec::new();
    };

    let mut out = Vec::new();
    let mut current = first.clone();
    let mut merged = 1usize;

    for next in iter {
        let joined_len = current.word.chars().count() + 1 + next.word.chars().count();
        if next.start - current.start <= rules.max_start_gap_secs
            && joined_len <= rules.max_chars
            && merged < rules.max_words
            && !ends_sentence(&current.word)
        {
            current.end = next.end;
            current.word.push(' ');
            current.word.push_str(&next.word);
            merged += 1;
        } else {
            out.push(std::mem::replace(&mut current, next.clone()));
            merged = 1;
        }
    }

    out.push(current);
    out
}

fn to_frames(word: &TimedWord, fps: Fps) -> CaptionResult<Word> {
    let start = fps.secs_to_frames_floor(word.start);
    let end = fps.secs_to_frames_floor(word.end).max(start);
    Word::new(word.word.trim(), FrameIndex(start), FrameIndex(end))
}

/// Build the wire-ready caption track for `transcript` at `fps`.
#[tracing::instrument(skip(transcript), fields(words = transcript.words().count()))]
pub fn build_track(
    transcript: &Transcript,
    rules: &GroupingRules,
    fps: Fps,
) -> CaptionResult<CaptionTrack> {
    let words: Vec<TimedWord> = transcript.words().cloned().collect();

    match rules.mode {
        GroupingMode::Phrases => {
            let phrases = merge_phrases(&words, rules)
                .iter()
                .map(|w| to_frames(w, fps))
                .collect::<CaptionResult<Vec<_>>>()?;
            Ok(CaptionTrack::Words(phrases))
        }
        GroupingMode::Groups => {
            let mut groups = Vec::new();
            for packed in group_words(&words, rules) {
                let frames = packed
                    .iter()
                    .map(|w| to_frames(w, fps))
                    .collect::<CaptionResult<Vec<_>>>()?;
                groups.push(CaptionGroup::new(frames)?);
            }
            Ok(CaptionTrack::Groups(groups))
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timing/grouping.rs"]
mod tests;
