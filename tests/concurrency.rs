//! Many threads encoding, decoding and clearing caches at once.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::thread;
use stylemark::{AttributeSet, Color, Font, LineStyle, StyledText, Stylemark};

const THREADS: usize = 8;
const ITERATIONS: usize = 1000;

fn sample_texts() -> Vec<StyledText> {
    let fonts = [
        Font::new("Helvetica", "Helvetica-Bold", 13.0).bold(true),
        Font::new("Times", "Times-Roman", 11.0),
        Font::new("Courier", "Courier-BoldOblique", 9.5).bold(true).italic(true),
    ];

    (0..12)
        .map(|i| {
            let mut text = StyledText::new(format!(
                "Sample {} with styled words.\nSecond paragraph {}\n\nLast",
                i, i
            ));
            text.apply(
                0..6,
                AttributeSet::new().with_font(fonts[i % fonts.len()].clone()),
            )
            .unwrap();
            text.apply(
                7..9,
                AttributeSet::new()
                    .with_foreground_color(Color::from_rgba8((i * 20) as u8, 0, 0, 1.0))
                    .with_underline(LineStyle::SINGLE),
            )
            .unwrap();
            text
        })
        .collect()
}

#[test]
fn interleaved_encode_decode_clear() {
    let codec = Arc::new(Stylemark::new());
    let texts = Arc::new(sample_texts());
    let markups: Arc<Vec<String>> = Arc::new(texts.iter().map(|t| codec.encode(t)).collect());
    let plain: Arc<Vec<String>> = Arc::new(texts.iter().map(|t| t.as_str().to_string()).collect());

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let codec = Arc::clone(&codec);
            let texts = Arc::clone(&texts);
            let markups = Arc::clone(&markups);
            let plain = Arc::clone(&plain);
            thread::spawn(move || {
                let mut rng = StdRng::seed_from_u64(t as u64);
                for _ in 0..ITERATIONS {
                    let i = rng.gen_range(0..texts.len());
                    match rng.gen_range(0..10) {
                        0 => codec.clear_caches(),
                        1..=3 => assert_eq!(codec.encode(&texts[i]), markups[i]),
                        _ => {
                            let decoded = codec.decode(&markups[i], &AttributeSet::new());
                            assert_eq!(decoded.as_str(), plain[i]);
                            assert_eq!(decoded, texts[i]);
                        }
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn batch_decode_while_clearing() {
    let codec = Arc::new(Stylemark::new());
    let texts = sample_texts();
    let markups: Vec<String> = codec.encode_all(&texts);

    let clearer = {
        let codec = Arc::clone(&codec);
        thread::spawn(move || {
            for _ in 0..200 {
                codec.clear_caches();
                thread::yield_now();
            }
        })
    };

    for _ in 0..20 {
        assert_eq!(codec.decode_all(&markups, &AttributeSet::new()), texts);
    }
    clearer.join().unwrap();
}

#[test]
fn reports_match_regardless_of_cache_state() {
    let codec = Stylemark::new();
    let markup = "<p style='color: rgba(9, 9, 9, 1.000000); bogus: 1; color: ???'>x &zz; y</p>";

    let cold = codec.decode_with_report(markup, &AttributeSet::new());
    let warm = codec.decode_with_report(markup, &AttributeSet::new());
    codec.clear_caches();
    let cleared = codec.decode_with_report(markup, &AttributeSet::new());

    assert_eq!(cold, warm);
    assert_eq!(cold, cleared);
    assert_eq!(cold.1.unknown_properties, 1);
    assert_eq!(cold.1.dropped_declarations, 1);
    assert_eq!(cold.1.unknown_entities, 1);
}
