//! Viseme mapping for lip-sync animation.
//!
//! A viseme is a visual mouth shape that corresponds to a class of speech
//! sounds. This module transliterates text straight to visemes with a
//! grapheme lookup: two-letter spellings first, then single letters. It is a
//! coarse approximation (silent letters and loanwords mis-map), which is
//! acceptable for visual sync.

mod shape;

pub use shape::{MouthShape, TonguePosition};

use serde::Serialize;

/// Canonical mouth articulations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Viseme {
    /// Closed, relaxed mouth (silence, whitespace, punctuation).
    Rest,
    /// "a" as in "cat" (jaw wide open)
    Ah,
    /// "ay" / "ai" as in "day"
    Ay,
    /// "e" as in "bed"
    Eh,
    /// "ee" / "ea" as in "see" (wide smile)
    Ee,
    /// "i" as in "sit"
    Ih,
    /// "o" as in "hot" (rounded, open)
    Oh,
    /// "oo" as in "too" (rounded, small)
    Oo,
    /// "ou" / "ow" as in "out"
    Ou,
    /// "u" as in "cup"
    Uh,
    /// m, b, p (lips pressed)
    Mbp,
    /// f, v (lower lip tucked under teeth)
    Fv,
    /// "th" (tongue between teeth)
    Th,
    /// t, d, n (tongue on the ridge)
    Tdn,
    /// l (tongue tip raised)
    L,
    /// s, z (teeth together)
    Sz,
    /// "sh" / "ch", j (lips pushed forward)
    ShCh,
    /// k, g, c, q, x (back of tongue raised)
    Kg,
    /// r (tongue curled)
    R,
    /// w (tight rounding)
    W,
    /// y as a consonant
    Y,
    /// h (open breath)
    H,
}

impl Viseme {
    /// Every viseme tag, in declaration order.
    pub const ALL: [Viseme; 22] = [
        Viseme::Rest,
        Viseme::Ah,
        Viseme::Ay,
        Viseme::Eh,
        Viseme::Ee,
        Viseme::Ih,
        Viseme::Oh,
        Viseme::Oo,
        Viseme::Ou,
        Viseme::Uh,
        Viseme::Mbp,
        Viseme::Fv,
        Viseme::Th,
        Viseme::Tdn,
        Viseme::L,
        Viseme::Sz,
        Viseme::ShCh,
        Viseme::Kg,
        Viseme::R,
        Viseme::W,
        Viseme::Y,
        Viseme::H,
    ];
}

/// Two-letter spellings that collapse to a single mouth shape.
fn digraph_to_viseme(first: char, second: char) -> Option<Viseme> {
    match (first, second) {
        ('t', 'h') => Some(Viseme::Th),
        ('s', 'h') | ('c', 'h') => Some(Viseme::ShCh),
        ('e', 'e') | ('e', 'a') => Some(Viseme::Ee),
        ('o', 'o') => Some(Viseme::Oo),
        ('o', 'u') | ('o', 'w') => Some(Viseme::Ou),
        ('a', 'y') | ('a', 'i') => Some(Viseme::Ay),
        ('p', 'h') => Some(Viseme::Fv),
        ('w', 'h') => Some(Viseme::W),
        ('c', 'k') | ('n', 'g') => Some(Viseme::Kg),
        _ => None,
    }
}

fn char_to_viseme(c: char) -> Viseme {
    match c {
        'a' => Viseme::Ah,
        'e' => Viseme::Eh,
        'i' => Viseme::Ih,
        'o' => Viseme::Oh,
        'u' => Viseme::Uh,
        'm' | 'b' | 'p' => Viseme::Mbp,
        'f' | 'v' => Viseme::Fv,
        't' | 'd' | 'n' => Viseme::Tdn,
        'l' => Viseme::L,
        's' | 'z' => Viseme::Sz,
        'j' => Viseme::ShCh,
        'c' | 'k' | 'g' | 'q' | 'x' => Viseme::Kg,
        'r' => Viseme::R,
        'w' => Viseme::W,
        'y' => Viseme::Y,
        'h' => Viseme::H,
        _ => Viseme::Rest,
    }
}

/// Convert text to an ordered viseme sequence.
///
/// Always returns at least one element; empty text yields `[Rest]`.
pub fn text_to_visemes(text: &str) -> Vec<Viseme> {
    let chars: Vec<char> = text.chars().map(|c| c.to_ascii_lowercase()).collect();
    let mut result = Vec::with_capacity(chars.len().max(1));

    let mut i = 0;
    while i < chars.len() {
        if let Some(&next) = chars.get(i + 1)
            && let Some(viseme) = digraph_to_viseme(chars[i], next)
        {
            result.push(viseme);
            i += 2;
            continue;
        }
        result.push(char_to_viseme(chars[i]));
        i += 1;
    }

    if result.is_empty() {
        result.push(Viseme::Rest);
    }
    result
}

/// Pick the viseme for a progress fraction through a sequence.
///
/// Index is `clamp(floor(progress * len), 0, len - 1)`; returns `Rest` for an
/// empty slice.
pub fn viseme_at(sequence: &[Viseme], progress: f64) -> Viseme {
    match sequence_index(sequence.len(), progress) {
        Some(idx) => sequence[idx],
        None => Viseme::Rest,
    }
}

/// Proportional index into a sequence of `len` items, or `None` if `len == 0`.
pub(crate) fn sequence_index(len: usize, progress: f64) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let progress = if progress.is_finite() {
        progress.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let raw = (progress * len as f64).floor() as usize;
    Some(raw.min(len - 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_is_single_rest() {
        assert_eq!(text_to_visemes(""), vec![Viseme::Rest]);
    }

    #[test]
    fn whitespace_and_punctuation_map_to_rest() {
        assert_eq!(
            text_to_visemes(" ,!"),
            vec![Viseme::Rest, Viseme::Rest, Viseme::Rest]
        );
    }

    #[test]
    fn digraphs_consume_two_characters() {
        assert_eq!(text_to_visemes("the"), vec![Viseme::Th, Viseme::Eh]);
        assert_eq!(text_to_visemes("she"), vec![Viseme::ShCh, Viseme::Eh]);
        assert_eq!(text_to_visemes("see"), vec![Viseme::Sz, Viseme::Ee]);
        assert_eq!(text_to_visemes("too"), vec![Viseme::Tdn, Viseme::Oo]);
        assert_eq!(text_to_visemes("out"), vec![Viseme::Ou, Viseme::Tdn]);
        assert_eq!(text_to_visemes("day"), vec![Viseme::Tdn, Viseme::Ay]);
    }

    #[test]
    fn mapping_is_case_insensitive() {
        assert_eq!(text_to_visemes("THE Cat"), text_to_visemes("the cat"));
    }

    #[test]
    fn non_ascii_maps_to_rest() {
        assert_eq!(text_to_visemes("é"), vec![Viseme::Rest]);
    }

    #[test]
    fn bilabials_share_a_viseme() {
        for v in text_to_visemes("bmp") {
            assert_eq!(v, Viseme::Mbp);
        }
    }

    #[test]
    fn mapping_is_deterministic_and_total() {
        let samples = [
            "",
            "hi",
            "the cat sat on the mat",
            "Hello, world!",
            "   ",
            "queue 42 \u{1F600}",
            "shoe chess thoughtful",
        ];
        for text in samples {
            let first = text_to_visemes(text);
            let second = text_to_visemes(text);
            assert_eq!(first, second, "non-deterministic for {text:?}");
            assert!(!first.is_empty(), "empty sequence for {text:?}");
            for v in &first {
                assert!(Viseme::ALL.contains(v));
            }
        }
    }

    #[test]
    fn viseme_at_boundaries() {
        let seq = text_to_visemes("hello");
        assert_eq!(viseme_at(&seq, 0.0), seq[0]);
        assert_eq!(viseme_at(&seq, 1.0), seq[seq.len() - 1]);
        assert_eq!(viseme_at(&seq, 42.0), seq[seq.len() - 1]);
        assert_eq!(viseme_at(&seq, -1.0), seq[0]);
        assert_eq!(viseme_at(&seq, f64::NAN), seq[0]);
        assert_eq!(viseme_at(&[], 0.5), Viseme::Rest);
    }

    #[test]
    fn sequence_index_is_proportional() {
        assert_eq!(sequence_index(2, 0.5), Some(1));
        assert_eq!(sequence_index(3, 0.533), Some(1));
        assert_eq!(sequence_index(3, 0.999), Some(2));
        assert_eq!(sequence_index(1, 1.0), Some(0));
        assert_eq!(sequence_index(0, 0.5), None);
    }
}
