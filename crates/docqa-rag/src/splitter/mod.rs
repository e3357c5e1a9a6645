//! Text splitting for chunk creation.

mod chunk;
mod metadata;

use text_splitter::{ChunkConfig, TextSplitter};

pub use self::chunk::{OwnedSplitChunk, SplitChunk};
pub use self::metadata::SplitMetadata;

/// Text splitter producing fixed-size overlapping chunks.
#[derive(Clone)]
pub struct Splitter {
    max_characters: u32,
    overlap: u32,
    trim: bool,
}

impl Splitter {
    /// Creates a new text splitter.
    pub fn new(max_characters: u32, overlap: u32, trim: bool) -> Self {
        Self {
            max_characters,
            overlap,
            trim,
        }
    }

    /// Splits text into chunks with byte offset tracking.
    pub fn split<'a>(&self, text: &'a str) -> Vec<SplitChunk<'a>> {
        let chunk_config = ChunkConfig::new(self.max_characters as usize)
            .with_overlap(self.overlap as usize)
            .expect("overlap must be less than max_characters")
            .with_trim(self.trim);
        let splitter = TextSplitter::new(chunk_config);

        splitter
            .chunk_indices(text)
            .enumerate()
            .map(|(chunk_index, (byte_offset, chunk_text))| {
                let end_offset = byte_offset + chunk_text.len();

                SplitChunk {
                    text: chunk_text,
                    metadata: SplitMetadata::new(
                        chunk_index as u32,
                        byte_offset as u32,
                        end_offset as u32,
                    ),
                }
            })
            .collect()
    }

    /// Splits text and returns owned chunks.
    pub fn split_owned(&self, text: &str) -> Vec<OwnedSplitChunk> {
        self.split(text)
            .into_iter()
            .map(|c| c.into_owned())
            .collect()
    }

    /// Splits text with page awareness.
    ///
    /// Page breaks should be indicated by form feed characters (`\x0c`),
    /// which is what PDF extraction emits between pages.
    pub fn split_with_pages<'a>(&self, text: &'a str) -> Vec<SplitChunk<'a>> {
        let page_breaks: Vec<u32> = text
            .char_indices()
            .filter(|(_, c)| *c == '\x0c')
            .map(|(i, _)| i as u32)
            .collect();

        self.split(text)
            .into_iter()
            .map(|mut chunk| {
                let page = page_breaks
                    .iter()
                    .take_while(|&&pos| pos < chunk.metadata.start_offset)
                    .count() as u32
                    + 1;
                chunk.metadata.page = Some(page);
                chunk
            })
            .collect()
    }

    /// Splits text with page awareness and returns owned chunks.
    pub fn split_with_pages_owned(&self, text: &str) -> Vec<OwnedSplitChunk> {
        self.split_with_pages(text)
            .into_iter()
            .map(|c| c.into_owned())
            .collect()
    }
}

impl Default for Splitter {
    fn default() -> Self {
        Self::new(1000, 100, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_a_single_chunk() {
        let splitter = Splitter::default();
        let chunks = splitter.split("The sky is blue.");

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "The sky is blue.");
        assert_eq!(chunks[0].metadata.chunk_index, 0);
        assert_eq!(chunks[0].metadata.start_offset, 0);
    }

    #[test]
    fn long_text_is_split_with_overlap() {
        let splitter = Splitter::new(40, 10, true);
        let sentence = "one two three four five six seven eight nine ten ";
        let text = sentence.repeat(5);

        let chunks = splitter.split(&text);
        assert!(chunks.len() > 1);

        for chunk in &chunks {
            assert!(chunk.text.len() <= 40);
        }

        // Consecutive chunks must not leave gaps in the source.
        for pair in chunks.windows(2) {
            assert!(pair[1].metadata.start_offset <= pair[0].metadata.end_offset);
        }
    }

    #[test]
    fn offsets_point_into_source() {
        let splitter = Splitter::new(30, 5, false);
        let text = "alpha beta gamma delta epsilon zeta eta theta iota kappa";

        for chunk in splitter.split(text) {
            let start = chunk.metadata.start_offset as usize;
            let end = chunk.metadata.end_offset as usize;
            assert_eq!(&text[start..end], chunk.text);
        }
    }

    #[test]
    fn page_breaks_assign_page_numbers() {
        let splitter = Splitter::new(20, 0, true);
        let text = "first page here\x0csecond page here";

        let chunks = splitter.split_with_pages(text);
        assert!(chunks.len() >= 2);
        assert_eq!(chunks.first().unwrap().metadata.page, Some(1));
        assert_eq!(chunks.last().unwrap().metadata.page, Some(2));
    }

    #[test]
    fn empty_text_yields_no_chunks() {
        let splitter = Splitter::default();
        assert!(splitter.split("").is_empty());
    }
}
