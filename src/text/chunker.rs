// Sentence chunker — splits raw text into groups of consecutive sentences.
//
// Sentence boundaries are punctuation-driven: a sentence ends at `.`, `!` or
// `?` (plus any trailing closing quotes or brackets) when the next word
// starts a new sentence. Periods after common abbreviations and single-letter
// initials don't count, so "Mr. Smith" and "J. R. R. Tolkien" stay intact.
//
// Chunks keep the original sentence text verbatim. Only the whitespace
// between sentences is normalized to a single space.

use super::{Chunk, ChunkId};

/// Sentences per chunk when the caller doesn't choose.
pub const DEFAULT_MAX_SENTENCES: usize = 5;

/// Lowercased abbreviations whose trailing period never ends a sentence.
const ABBREVIATIONS: &[&str] = &[
    "mr", "mrs", "ms", "dr", "prof", "sr", "jr", "st", "mt", "vs", "etc", "inc", "ltd", "corp",
    "dept", "approx", "fig", "gov", "sen", "rep", "gen", "col", "lt", "sgt", "capt", "cmdr",
    "adm", "jan", "feb", "apr", "jun", "jul", "aug", "sep", "sept", "oct", "nov", "dec",
];

/// Split text into trimmed sentence slices, in original order.
///
/// Text with no sentence terminators comes back as a single sentence.
/// Empty or whitespace-only text yields no sentences.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < chars.len() {
        let (pos, c) = chars[i];
        if !is_terminator(c) {
            i += 1;
            continue;
        }

        // Swallow runs like "?!" or ".\")" so they stay with this sentence
        let mut j = i + 1;
        while j < chars.len() && (is_terminator(chars[j].1) || is_closer(chars[j].1)) {
            j += 1;
        }
        let end = chars.get(j).map(|&(p, _)| p).unwrap_or(text.len());

        let at_boundary = match chars.get(j) {
            None => true,
            Some(&(_, next)) if next.is_whitespace() => {
                let mut k = j;
                while k < chars.len() && chars[k].1.is_whitespace() {
                    k += 1;
                }
                chars.get(k).map_or(true, |&(_, c)| starts_sentence(c))
            }
            Some(_) => false,
        };

        if at_boundary && !(c == '.' && ends_with_abbreviation(&text[start..pos])) {
            let sentence = text[start..end].trim();
            if !sentence.is_empty() {
                sentences.push(sentence);
            }
            start = end;
        }
        i = j;
    }

    let tail = text[start..].trim();
    if !tail.is_empty() {
        sentences.push(tail);
    }
    sentences
}

/// Split text into chunks of at most `max_sentences` sentences each.
///
/// Chunk ids are assigned in order starting at 0. A `max_sentences` of 0
/// is treated as 1.
pub fn chunk_text(text: &str, max_sentences: usize) -> Vec<Chunk> {
    let size = max_sentences.max(1);
    split_sentences(text)
        .chunks(size)
        .enumerate()
        .map(|(i, group)| Chunk {
            id: ChunkId(i),
            text: group.join(" "),
        })
        .collect()
}

fn is_terminator(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

fn is_closer(c: char) -> bool {
    matches!(c, '"' | '\'' | ')' | ']' | '}' | '”' | '’' | '»')
}

fn starts_sentence(c: char) -> bool {
    c.is_uppercase() || c.is_numeric() || matches!(c, '"' | '\'' | '(' | '[' | '“' | '‘' | '«')
}

/// Whether the text right before a period is an abbreviation or an initial.
fn ends_with_abbreviation(before_period: &str) -> bool {
    let word = before_period
        .rsplit(char::is_whitespace)
        .next()
        .unwrap_or("")
        .trim_start_matches(|c: char| !c.is_alphanumeric());

    if word.is_empty() {
        return false;
    }
    // "U.S", "e.g", "a.m"
    if word.contains('.') {
        return true;
    }
    let mut letters = word.chars();
    if let (Some(first), None) = (letters.next(), letters.next()) {
        if first.is_alphabetic() {
            return true;
        }
    }
    ABBREVIATIONS.contains(&word.to_lowercase().as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_basic() {
        let sentences = split_sentences("A cat sat. A dog ran. The sun rose.");
        assert_eq!(sentences, vec!["A cat sat.", "A dog ran.", "The sun rose."]);
    }

    #[test]
    fn test_split_keeps_abbreviations_together() {
        let sentences = split_sentences("Mr. Smith went to Washington. He met Dr. Jones there.");
        assert_eq!(
            sentences,
            vec!["Mr. Smith went to Washington.", "He met Dr. Jones there."]
        );
    }

    #[test]
    fn test_split_keeps_initials_and_dotted_acronyms() {
        let sentences = split_sentences("The U.S. Treasury said so. J. Baker agreed.");
        assert_eq!(
            sentences,
            vec!["The U.S. Treasury said so.", "J. Baker agreed."]
        );
    }

    #[test]
    fn test_split_question_and_exclamation_with_quotes() {
        let sentences = split_sentences("\"Is it over?\" she asked. \"Yes!\" He left.");
        // "she" is lowercase, so the question mark does not end the sentence
        assert_eq!(
            sentences,
            vec!["\"Is it over?\" she asked.", "\"Yes!\"", "He left."]
        );
    }

    #[test]
    fn test_split_decimal_numbers_are_not_boundaries() {
        let sentences = split_sentences("Prices rose 2.5 pct in March. Analysts were surprised.");
        assert_eq!(
            sentences,
            vec!["Prices rose 2.5 pct in March.", "Analysts were surprised."]
        );
    }

    #[test]
    fn test_split_no_terminator_is_one_sentence() {
        assert_eq!(split_sentences("no punctuation here"), vec!["no punctuation here"]);
    }

    #[test]
    fn test_split_empty_and_whitespace() {
        assert!(split_sentences("").is_empty());
        assert!(split_sentences("   \n\t ").is_empty());
    }

    #[test]
    fn test_chunk_groups_sentences() {
        let chunks = chunk_text("A cat sat. A dog ran. The sun rose.", 2);
        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["A cat sat. A dog ran.", "The sun rose."]);
        assert_eq!(chunks[0].id, ChunkId(0));
        assert_eq!(chunks[1].id, ChunkId(1));
    }

    #[test]
    fn test_chunk_zero_max_sentences_treated_as_one() {
        let chunks = chunk_text("One. Two.", 0);
        assert_eq!(chunks.len(), 2);
    }

    #[test]
    fn test_chunk_normalizes_whitespace_between_sentences() {
        let chunks = chunk_text("First one.\n\n  Second one.", 5);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "First one. Second one.");
    }
}
