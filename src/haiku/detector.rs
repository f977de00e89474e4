//! Haiku detection.
//!
//! The pipeline only depends on the `HaikuDetector` trait. `SyllableHaikuFinder`
//! is the heuristic used by the server binary: it estimates syllables per word
//! from vowel groups and reports the post when its words split exactly into
//! 5/7/5 at word boundaries.

use crate::haiku::types::DetectorError;

/// Syllables per line.
const PATTERN: [u32; 3] = [5, 7, 5];

/// Finds haiku line groups in a piece of text.
pub trait HaikuDetector: Send + Sync {
    /// All matches in `text`, in order. Empty when nothing matches.
    fn find_haikus(&self, text: &str) -> Result<Vec<[String; 3]>, DetectorError>;
}

/// Vowel-group syllable counting detector.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyllableHaikuFinder;

enum Token {
    Word(u32),
    Skip,
    Uncountable,
}

impl HaikuDetector for SyllableHaikuFinder {
    fn find_haikus(&self, text: &str) -> Result<Vec<[String; 3]>, DetectorError> {
        let mut words = Vec::new();
        for token in text.split_whitespace() {
            if is_ignored(token) {
                continue;
            }
            match classify(token) {
                Token::Word(syllables) => words.push((token, syllables)),
                Token::Skip => {}
                // Numbers read aloud have no reliable count
                Token::Uncountable => return Ok(Vec::new()),
            }
        }

        Ok(split_lines(&words).into_iter().collect())
    }
}

fn is_ignored(token: &str) -> bool {
    token.starts_with('@')
        || token.starts_with("http://")
        || token.starts_with("https://")
        || token.starts_with("www.")
}

fn classify(token: &str) -> Token {
    if token.chars().any(|c| c.is_ascii_digit()) {
        return Token::Uncountable;
    }
    let letters: String = token
        .chars()
        .filter(|c| c.is_alphabetic())
        .flat_map(char::to_lowercase)
        .collect();
    if letters.is_empty() {
        Token::Skip
    } else {
        Token::Word(count_syllables(&letters))
    }
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y')
}

/// Estimate syllables of a lowercase word.
pub fn count_syllables(word: &str) -> u32 {
    let chars: Vec<char> = word.chars().collect();
    let mut count = 0u32;
    let mut prev_vowel = false;
    for &c in &chars {
        let vowel = is_vowel(c);
        if vowel && !prev_vowel {
            count += 1;
        }
        prev_vowel = vowel;
    }

    // Silent trailing "e", except consonant + "le" (ta-ble)
    let n = chars.len();
    if count > 1 && n >= 2 && chars[n - 1] == 'e' {
        let consonant_le = n >= 3 && chars[n - 2] == 'l' && !is_vowel(chars[n - 3]);
        if !consonant_le {
            count -= 1;
        }
    }

    count.max(1)
}

fn split_lines(words: &[(&str, u32)]) -> Option<[String; 3]> {
    let mut lines: [Vec<&str>; 3] = Default::default();
    let mut line = 0;
    let mut syllables = 0;

    for &(word, count) in words {
        if line == PATTERN.len() {
            return None;
        }
        syllables += count;
        lines[line].push(word);
        if syllables == PATTERN[line] {
            line += 1;
            syllables = 0;
        } else if syllables > PATTERN[line] {
            return None;
        }
    }

    if line != PATTERN.len() {
        return None;
    }
    let [first, second, third] = lines;
    Some([first.join(" "), second.join(" "), third.join(" ")])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_syllables() {
        assert_eq!(count_syllables("pond"), 1);
        assert_eq!(count_syllables("silent"), 2);
        assert_eq!(count_syllables("silence"), 2);
        assert_eq!(count_syllables("again"), 2);
        assert_eq!(count_syllables("the"), 1);
        assert_eq!(count_syllables("table"), 2);
        assert_eq!(count_syllables("whale"), 1);
    }

    #[test]
    fn test_finds_classic_haiku() {
        let text = "An old silent pond / A frog jumps into the pond— / Splash! Silence again.";
        let matches = SyllableHaikuFinder.find_haikus(text).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(
            matches[0],
            [
                "An old silent pond".to_string(),
                "A frog jumps into the pond—".to_string(),
                "Splash! Silence again.".to_string(),
            ]
        );
    }

    #[test]
    fn test_ignores_mentions_and_links() {
        let text = "@basho An old silent pond A frog jumps into the pond Splash! Silence again. https://t.co/x";
        let matches = SyllableHaikuFinder.find_haikus(text).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0][0], "An old silent pond");
    }

    #[test]
    fn test_no_match() {
        assert!(SyllableHaikuFinder.find_haikus("hello world").unwrap().is_empty());
        assert!(SyllableHaikuFinder.find_haikus("").unwrap().is_empty());
        // Trailing words beyond the third line
        let text = "An old silent pond A frog jumps into the pond Splash! Silence again. Ribbit";
        assert!(SyllableHaikuFinder.find_haikus(text).unwrap().is_empty());
    }

    #[test]
    fn test_numbers_are_uncountable() {
        let text = "An old silent pond A frog jumps into the 2 ponds Splash! Silence again.";
        assert!(SyllableHaikuFinder.find_haikus(text).unwrap().is_empty());
    }
}
