use crate::error::RagError;

/// Fixed-size, overlapping character windows over normalized page text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunker {
    size: usize,
    overlap: usize,
}

impl Chunker {
    /// Fails when the step `size - overlap` would not be positive.
    pub fn new(size: usize, overlap: usize) -> Result<Self, RagError> {
        if size == 0 {
            return Err(RagError::Configuration(
                "chunk size must be positive".to_string(),
            ));
        }
        if overlap >= size {
            return Err(RagError::Configuration(format!(
                "chunk overlap ({overlap}) must be smaller than chunk size ({size})"
            )));
        }
        Ok(Self { size, overlap })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// Lazily windows `text`. Each call starts a fresh pass.
    pub fn windows<'a>(&self, text: &'a str) -> Windows<'a> {
        Windows {
            text,
            size: self.size,
            overlap: self.overlap,
            next_start: if text.is_empty() { None } else { Some(0) },
        }
    }
}

/// Iterator returned by [`Chunker::windows`]. Offsets are byte positions on
/// char boundaries; sizes are counted in chars.
#[derive(Debug, Clone)]
pub struct Windows<'a> {
    text: &'a str,
    size: usize,
    overlap: usize,
    next_start: Option<usize>,
}

impl<'a> Windows<'a> {
    /// Byte offset `overlap` chars before `end`, clamped to 0.
    fn step_back(&self, end: usize) -> usize {
        if self.overlap == 0 {
            return end;
        }
        self.text[..end]
            .char_indices()
            .rev()
            .nth(self.overlap - 1)
            .map_or(0, |(i, _)| i)
    }
}

impl<'a> Iterator for Windows<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.next_start?;
        let end = self.text[start..]
            .char_indices()
            .nth(self.size)
            .map_or(self.text.len(), |(i, _)| start + i);

        self.next_start = if end == self.text.len() {
            None
        } else {
            Some(self.step_back(end))
        };

        Some(&self.text[start..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expected_count(len: usize, size: usize, overlap: usize) -> usize {
        if len == 0 {
            0
        } else if len <= size {
            1
        } else {
            (len - overlap).div_ceil(size - overlap)
        }
    }

    #[test]
    fn test_rejects_overlap_not_smaller_than_size() {
        assert!(matches!(
            Chunker::new(10, 10),
            Err(RagError::Configuration(_))
        ));
        assert!(Chunker::new(10, 11).is_err());
        assert!(Chunker::new(0, 0).is_err());
    }

    #[test]
    fn test_accessors() {
        let chunker = Chunker::new(1200, 200).unwrap();
        assert_eq!(chunker.size(), 1200);
        assert_eq!(chunker.overlap(), 200);
    }

    #[test]
    fn test_empty_text_has_no_windows() {
        let chunker = Chunker::new(10, 2).unwrap();
        assert_eq!(chunker.windows("").count(), 0);
    }

    #[test]
    fn test_short_text_single_window() {
        let chunker = Chunker::new(10, 2).unwrap();
        let windows: Vec<&str> = chunker.windows("abcdef").collect();
        assert_eq!(windows, vec!["abcdef"]);

        let exact: Vec<&str> = chunker.windows("abcdefghij").collect();
        assert_eq!(exact, vec!["abcdefghij"]);
    }

    #[test]
    fn test_overlapping_windows() {
        let chunker = Chunker::new(4, 1).unwrap();
        let windows: Vec<&str> = chunker.windows("abcdefghij").collect();
        assert_eq!(windows, vec!["abcd", "defg", "ghij"]);
    }

    #[test]
    fn test_zero_overlap() {
        let chunker = Chunker::new(3, 0).unwrap();
        let windows: Vec<&str> = chunker.windows("abcdefg").collect();
        assert_eq!(windows, vec!["abc", "def", "g"]);
    }

    #[test]
    fn test_windows_cover_text_contiguously() {
        let text: String = ('a'..='z').cycle().take(1000).collect();
        for (size, overlap) in [(7, 0), (7, 3), (50, 10), (120, 119), (1200, 200)] {
            let chunker = Chunker::new(size, overlap).unwrap();
            let windows: Vec<&str> = chunker.windows(&text).collect();
            assert_eq!(
                windows.len(),
                expected_count(text.len(), size, overlap),
                "size={size} overlap={overlap}"
            );

            // Each window begins `overlap` chars before the previous end.
            let mut covered = 0;
            let mut prev_end = 0;
            for (i, w) in windows.iter().enumerate() {
                assert!(w.len() <= size);
                let start = if i == 0 { 0 } else { prev_end - overlap };
                assert_eq!(*w, &text[start..start + w.len()]);
                assert!(start <= covered, "gap before window {i}");
                prev_end = start + w.len();
                covered = prev_end;
            }
            assert_eq!(covered, text.len());
        }
    }

    #[test]
    fn test_multibyte_chars_are_not_split() {
        let text = "é".repeat(25);
        let chunker = Chunker::new(10, 3).unwrap();
        let windows: Vec<&str> = chunker.windows(&text).collect();
        assert_eq!(windows.len(), expected_count(25, 10, 3));
        assert!(windows.iter().all(|w| w.chars().count() <= 10));
        assert_eq!(windows[1].chars().count(), 10);
        assert!(windows.last().unwrap().ends_with('é'));
    }

    #[test]
    fn test_restartable() {
        let chunker = Chunker::new(5, 2).unwrap();
        let text = "the quick brown fox";
        let first: Vec<&str> = chunker.windows(text).collect();
        let second: Vec<&str> = chunker.windows(text).collect();
        assert_eq!(first, second);

        let mut iter = chunker.windows(text);
        iter.next();
        let cloned: Vec<&str> = iter.clone().collect();
        assert_eq!(cloned, iter.collect::<Vec<_>>());
    }
}
