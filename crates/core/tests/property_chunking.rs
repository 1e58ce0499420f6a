use cvmatch_core::{cosine, ChunkConfig, Chunker, DeterministicEmbedder, DeterministicEmbedderConfig};
use proptest::prelude::*;

proptest! {
    #[test]
    fn chunks_reconstruct_the_input(text in ".{0,2000}", max_len in 1usize..900) {
        let chunker = Chunker::new(ChunkConfig { max_len });
        let chunks = chunker.chunk_text(&text);
        let rebuilt: String = chunks.iter().map(|c| c.text.as_str()).collect();
        prop_assert_eq!(rebuilt, text);
    }

    #[test]
    fn chunk_count_is_ceiling_of_length(text in ".{1,2000}", max_len in 1usize..900) {
        let chunker = Chunker::new(ChunkConfig { max_len });
        let chunks = chunker.chunk_text(&text);
        let chars = text.chars().count();
        prop_assert_eq!(chunks.len(), chars.div_ceil(max_len));
    }

    #[test]
    fn chunk_ranges_tile_without_overlap(text in ".{1,2000}", max_len in 1usize..900) {
        let chunker = Chunker::new(ChunkConfig { max_len });
        let chunks = chunker.chunk_text(&text);
        let mut cursor = 0usize;
        for chunk in &chunks {
            prop_assert_eq!(chunk.start, cursor);
            prop_assert!(chunk.end > chunk.start);
            prop_assert_eq!(chunk.end - chunk.start, chunk.text.chars().count());
            cursor = chunk.end;
        }
        prop_assert_eq!(cursor, text.chars().count());
    }

    #[test]
    fn deterministic_embedding_repeats(text in ".{0,400}", dims in 1usize..600) {
        let embedder = DeterministicEmbedder::new(DeterministicEmbedderConfig { dimensions: dims });
        let first = embedder.embed_text(&text);
        let second = embedder.embed_text(&text);
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.len(), dims);
        prop_assert!(first.iter().all(|v| (-1.0..=1.0).contains(v)));
    }

    #[test]
    fn cosine_stays_bounded(text_a in ".{1,200}", text_b in ".{1,200}") {
        let embedder = DeterministicEmbedder::new(DeterministicEmbedderConfig { dimensions: 64 });
        let a = embedder.embed_text(&text_a);
        let b = embedder.embed_text(&text_b);
        let score = cosine(&a, &b).unwrap();
        prop_assert!((-1.001..=1.001).contains(&score));
    }
}
