//! The dictionary: words bucketed by length, plus the corpus-wide
//! per-letter frequency table used by the LCV value-ordering heuristic.
//! This is a boundary adapter (loading and normalizing word data), not
//! part of the search itself.

use std::fs;
use std::path::Path;

use lazy_static::lazy_static;

use crate::error::SolveError;
use crate::types::glyph_of;

lazy_static! {
    /// Small built-in list used when a dictionary file can't be read.
    static ref BUILTIN_WORDS: Vec<&'static str> =
        vec!["LASER", "SAILS", "SHEET", "STEER", "HEEL", "HIKE", "KEEL", "KNOT"];
}

/// A single dictionary entry, pre-converted to 0-25 glyph indices for fast
/// comparison during AC-3 and search.
#[derive(Debug, Clone)]
pub struct Word {
    pub text: String,
    pub glyphs: Box<[u8]>,
}

/// The dictionary, bucketed by word length, with a precomputed per-letter
/// frequency table. Read-only after construction; safe to share across
/// solver instances (see "Shared-resource policy").
#[derive(Debug, Clone)]
pub struct WordList {
    /// `words[length]` holds every accepted word of that length.
    /// Index 0 and 1 are always empty (the shortest valid slot is length 2).
    words: Vec<Vec<Word>>,
    /// Occurrences of each letter (`A`=0..=`Z`=25) across the whole
    /// dictionary, computed once at construction.
    pub letter_frequency: [u32; 26],
}

impl WordList {
    /// Build a word list from an iterator of candidate strings, silently
    /// dropping (and logging) any entry that isn't pure uppercase `A`-`Z`
    /// or is empty, per "the dictionary must contain only uppercase A-Z
    /// words; non-conforming entries are rejected by the external loader."
    #[must_use]
    pub fn from_words<I, S>(words: I) -> WordList
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut buckets: Vec<Vec<Word>> = Vec::new();
        let mut letter_frequency = [0u32; 26];

        for raw in words {
            let raw = raw.as_ref();
            match to_glyphs(raw) {
                Some(glyphs) => {
                    let len = glyphs.len();
                    if buckets.len() <= len {
                        buckets.resize_with(len + 1, Vec::new);
                    }
                    for &g in &glyphs {
                        letter_frequency[g as usize] += 1;
                    }
                    buckets[len].push(Word {
                        text: raw.to_string(),
                        glyphs: glyphs.into_boxed_slice(),
                    });
                }
                None => {
                    log::warn!("rejected dictionary entry {raw:?}: not pure uppercase A-Z");
                }
            }
        }

        WordList {
            words: buckets,
            letter_frequency,
        }
    }

    /// Diagnose every rejected entry without constructing a `WordList`; the
    /// `load-dictionary` CLI command uses this to report
    /// `InvalidDictionary` problems to the user.
    #[must_use]
    pub fn diagnose<I, S>(words: I) -> Vec<SolveError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        words
            .into_iter()
            .filter_map(|raw| {
                let raw = raw.as_ref();
                if to_glyphs(raw).is_some() {
                    None
                } else {
                    Some(SolveError::InvalidDictionary(format!(
                        "{raw:?} is not pure uppercase A-Z"
                    )))
                }
            })
            .collect()
    }

    /// Load from a file path, one word per line; blank lines and lines
    /// starting with `#` are treated as comments. Falls back to the small
    /// built-in list on I/O failure.
    #[must_use]
    pub fn load_from_path(path: impl AsRef<Path>) -> WordList {
        match fs::read_to_string(path.as_ref()) {
            Ok(contents) => WordList::load_from_str(&contents),
            Err(err) => {
                log::warn!(
                    "failed to read dictionary file {:?}: {err}; falling back to the built-in word list",
                    path.as_ref()
                );
                WordList::built_in()
            }
        }
    }

    /// Load from in-memory text, one word per line.
    #[must_use]
    pub fn load_from_str(contents: &str) -> WordList {
        let lines = contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'));
        WordList::from_words(lines)
    }

    /// The small built-in fallback list named in the external interface.
    #[must_use]
    pub fn built_in() -> WordList {
        WordList::from_words(BUILTIN_WORDS.iter().copied())
    }

    /// All accepted words of the given length (empty slice if none).
    #[must_use]
    pub fn words_of_length(&self, length: usize) -> &[Word] {
        self.words.get(length).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn word(&self, length: usize, id: usize) -> &Word {
        &self.words[length][id]
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(Vec::is_empty)
    }
}

fn to_glyphs(word: &str) -> Option<Vec<u8>> {
    if word.is_empty() {
        return None;
    }
    word.chars().map(glyph_of).collect()
}
