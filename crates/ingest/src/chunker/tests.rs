use docqa_core::DocumentCategory;

use super::*;

fn sample_text(chars: usize) -> String {
    // Deterministic filler with varied content so overlap checks are
    // meaningful.
    let mut s = String::with_capacity(chars);
    let words = ["alpha", "beta", "gamma", "delta", "epsilon"];
    let mut i = 0;
    while s.chars().count() < chars {
        s.push_str(words[i % words.len()]);
        s.push(' ');
        i += 1;
    }
    s.chars().take(chars).collect()
}

#[test]
fn strategy_table_matches_categories() {
    let legal = ChunkStrategy::for_category(DocumentCategory::Legal);
    assert_eq!((legal.chunk_size, legal.overlap), (800, 150));
    let medical = ChunkStrategy::for_category(DocumentCategory::Medical);
    assert_eq!((medical.chunk_size, medical.overlap), (600, 100));
    let technical = ChunkStrategy::for_category(DocumentCategory::Technical);
    assert_eq!((technical.chunk_size, technical.overlap), (1200, 250));
    let financial = ChunkStrategy::for_category(DocumentCategory::Financial);
    assert_eq!((financial.chunk_size, financial.overlap), (900, 180));
    let default = ChunkStrategy::for_category(DocumentCategory::Default);
    assert_eq!((default.chunk_size, default.overlap), (1000, 200));
}

#[test]
fn overlap_always_below_chunk_size() {
    for category in DocumentCategory::ALL {
        let s = ChunkStrategy::for_category(category);
        assert!(
            s.overlap < s.chunk_size,
            "strategy for {category} violates overlap < chunk_size"
        );
    }
}

#[test]
fn chunk_lengths_and_overlap_are_exact_for_every_category() {
    let text = sample_text(5000);
    for category in DocumentCategory::ALL {
        let strategy = ChunkStrategy::for_category(category);
        let chunks = chunk_text(&text, &strategy);
        assert!(chunks.len() > 1, "expected multiple chunks for {category}");

        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.index, i);
            assert!(chunk.char_len() <= strategy.chunk_size);
            assert_eq!(chunk.content.chars().count(), chunk.char_len());
            if i + 1 < chunks.len() {
                assert_eq!(chunk.char_len(), strategy.chunk_size);
            }
        }

        // Consecutive chunks share exactly `overlap` chars.
        for pair in chunks.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            assert_eq!(prev.char_end - next.char_start, strategy.overlap);
            let prev_tail: String = prev
                .content
                .chars()
                .skip(prev.char_len() - strategy.overlap)
                .collect();
            let next_head: String = next.content.chars().take(strategy.overlap).collect();
            assert_eq!(prev_tail, next_head);
        }
    }
}

#[test]
fn short_text_yields_single_chunk() {
    let strategy = ChunkStrategy::for_category(DocumentCategory::Default);
    let chunks = chunk_text("The warranty period is 12 months.", &strategy);
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].content, "The warranty period is 12 months.");
    assert_eq!(chunks[0].overlap, 0);
}

#[test]
fn empty_text_yields_no_chunks() {
    let strategy = ChunkStrategy::for_category(DocumentCategory::Default);
    assert!(chunk_text("", &strategy).is_empty());
}

#[test]
fn chunking_is_deterministic() {
    let text = sample_text(3000);
    let strategy = ChunkStrategy::for_category(DocumentCategory::Legal);
    assert_eq!(chunk_text(&text, &strategy), chunk_text(&text, &strategy));
}

#[test]
fn multibyte_text_splits_on_char_boundaries() {
    let text: String = "héllo wörld ü ".repeat(200);
    let strategy = ChunkStrategy::for_category(DocumentCategory::Medical);
    let chunks = chunk_text(&text, &strategy);
    let rebuilt: String = chunks
        .iter()
        .enumerate()
        .map(|(i, c)| {
            if i == 0 {
                c.content.clone()
            } else {
                c.content.chars().skip(c.overlap).collect()
            }
        })
        .collect();
    assert_eq!(rebuilt, text);
}

#[test]
fn category_from_filename_keywords() {
    assert_eq!(infer_category("insurance_policy.pdf", ""), DocumentCategory::Legal);
    assert_eq!(infer_category("patient_notes.txt", ""), DocumentCategory::Medical);
    assert_eq!(infer_category("user_manual.md", ""), DocumentCategory::Technical);
    assert_eq!(infer_category("premium_schedule.pdf", ""), DocumentCategory::Financial);
    assert_eq!(infer_category("minutes.txt", "nothing special"), DocumentCategory::Default);
}

#[test]
fn category_from_content_keywords() {
    assert_eq!(
        infer_category("doc.pdf", "This agreement sets out the liability of..."),
        DocumentCategory::Legal
    );
    assert_eq!(
        infer_category("doc.pdf", "Post-surgery treatment plan for the patient"),
        DocumentCategory::Medical
    );
}

#[test]
fn legal_wins_over_later_categories() {
    // "policy" (legal) and "coverage" (financial) both present; lists are
    // checked in order.
    assert_eq!(
        infer_category("doc.pdf", "policy coverage details"),
        DocumentCategory::Legal
    );
}
