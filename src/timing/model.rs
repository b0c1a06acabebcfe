use crate::foundation::{
    core::FrameIndex,
    error::{CaptionError, CaptionResult},
};

/// One transcript token, active over the inclusive frame range `[start, end]`.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "WordRepr")]
pub struct Word {
    pub word: String,
    pub start: FrameIndex,
    pub end: FrameIndex,
    /// Ordinal position in the full transcript.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,
}

#[derive(serde::Deserialize)]
struct WordRepr {
    word: String,
    start: i64,
    end: i64,
    #[serde(default)]
    index: Option<u32>,
}

impl TryFrom<WordRepr> for Word {
    type Error = CaptionError;

    fn try_from(r: WordRepr) -> Result<Self, Self::Error> {
        let w = Word::new(r.word, FrameIndex(r.start), FrameIndex(r.end))?;
        Ok(match r.index {
            Some(i) => w.with_index(i),
            None => w,
        })
    }
}

impl Word {
    pub fn new(word: impl Into<String>, start: FrameIndex, end: FrameIndex) -> CaptionResult<Self> {
        let word = word.into();
        if start.0 < 0 {
            return Err(CaptionError::validation(format!(
                "word '{word}' starts at negative frame {}",
                start.0
            )));
        }
        if start.0 > end.0 {
            return Err(CaptionError::validation(format!(
                "word '{word}' has start {} after end {}",
                start.0, end.0
            )));
        }
        Ok(Self {
            word,
            start,
            end,
            index: None,
        })
    }

    pub fn with_index(mut self, index: u32) -> Self {
        self.index = Some(index);
        self
    }

    /// Inclusive on both ends.
    pub fn is_active(&self, frame: FrameIndex) -> bool {
        frame.0 >= self.start.0 && frame.0 <= self.end.0
    }

    pub fn len_frames(&self) -> i64 {
        self.end.0 - self.start.0
    }
}

/// Words shown together as one on-screen caption line. Never empty.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "Vec<Word>", into = "Vec<Word>")]
pub struct CaptionGroup {
    words: Vec<Word>,
}

impl TryFrom<Vec<Word>> for CaptionGroup {
    type Error = CaptionError;

    fn try_from(words: Vec<Word>) -> Result<Self, Self::Error> {
        Self::new(words)
    }
}

impl From<CaptionGroup> for Vec<Word> {
    fn from(g: CaptionGroup) -> Self {
        g.words
    }
}

impl CaptionGroup {
    pub fn new(words: Vec<Word>) -> CaptionResult<Self> {
        if words.is_empty() {
            return Err(CaptionError::validation("caption group must contain at least one word"));
        }
        Ok(Self { words })
    }

    pub fn single(word: Word) -> Self {
        Self { words: vec![word] }
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn start(&self) -> FrameIndex {
        self.words[0].start
    }

    pub fn end(&self) -> FrameIndex {
        self.words[self.words.len() - 1].end
    }

    /// `[first.start, last.end]`, inclusive.
    pub fn contains(&self, frame: FrameIndex) -> bool {
        frame.0 >= self.start().0 && frame.0 <= self.end().0
    }
}

/// First group in sequence order whose window contains `frame`.
///
/// Overlapping groups resolve to the earliest one; this is a stable tie-break, not an error.
pub fn active_group(groups: &[CaptionGroup], frame: FrameIndex) -> Option<&CaptionGroup> {
    active_group_position(groups, frame).map(|i| &groups[i])
}

pub fn active_group_position(groups: &[CaptionGroup], frame: FrameIndex) -> Option<usize> {
    groups.iter().position(|g| g.contains(frame))
}

/// Wire form of `data_subtitles`: grouped words, or a flat list where each entry is its own
/// caption (the phrase mode used by the glowing style).
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum CaptionTrack {
    Groups(Vec<CaptionGroup>),
    Words(Vec<Word>),
}

impl CaptionTrack {
    /// Normalize into ordered groups, numbering words that lack an explicit `index` by their
    /// position in the flattened transcript.
    pub fn into_groups(self) -> Vec<CaptionGroup> {
        let mut groups = match self {
            Self::Groups(groups) => groups,
            Self::Words(words) => words.into_iter().map(CaptionGroup::single).collect(),
        };
        assign_ordinals(&mut groups);
        groups
    }

    pub fn word_count(&self) -> usize {
        match self {
            Self::Groups(groups) => groups.iter().map(|g| g.words.len()).sum(),
            Self::Words(words) => words.len(),
        }
    }
}

pub fn assign_ordinals(groups: &mut [CaptionGroup]) {
    let mut ordinal = 0u32;
    for group in groups.iter_mut() {
        for word in &mut group.words {
            if word.index.is_none() {
                word.index = Some(ordinal);
            }
            ordinal = ordinal.saturating_add(1);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timing/model.rs"]
mod tests;
