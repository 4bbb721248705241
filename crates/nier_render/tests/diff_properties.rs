use nier_render::diff::{SequenceMatcher, Tag};
use nier_render::{ByteDiffMode, DiffOptions, bit_diff_index, byte_hunk_diff, changed_bits};
use proptest::prelude::*;

/// Small alphabet so matches, repeats and popular tokens all show up.
fn tokens() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(0u8..4, 0..300)
}

proptest! {
    #[test]
    fn opcodes_tile_both_sequences(a in tokens(), b in tokens(), autojunk in any::<bool>()) {
        let codes = SequenceMatcher::new(&a, &b, autojunk).opcodes();
        let (mut i, mut j) = (0, 0);
        for code in &codes {
            prop_assert_eq!(code.a_start, i);
            prop_assert_eq!(code.b_start, j);
            match code.tag {
                Tag::Equal => prop_assert_eq!(&a[code.a_start..code.a_end], &b[code.b_start..code.b_end]),
                Tag::Delete => prop_assert_eq!(code.b_start, code.b_end),
                Tag::Insert => prop_assert_eq!(code.a_start, code.a_end),
                Tag::Replace => prop_assert!(code.a_start < code.a_end && code.b_start < code.b_end),
            }
            i = code.a_end;
            j = code.b_end;
        }
        prop_assert_eq!(i, a.len());
        prop_assert_eq!(j, b.len());
    }

    #[test]
    fn hunks_appear_only_when_inputs_differ(
        a in prop::collection::vec(any::<u8>(), 0..200),
        flips in prop::collection::vec((any::<prop::sample::Index>(), 1u8..=255), 0..4),
        positional in any::<bool>(),
    ) {
        let mut b = a.clone();
        if !b.is_empty() {
            for (at, delta) in &flips {
                let at = at.index(b.len());
                b[at] ^= delta;
            }
        }
        let options = DiffOptions {
            byte_mode: if positional { ByteDiffMode::Positional } else { ByteDiffMode::Aligned },
            ..DiffOptions::default()
        };
        let lines = byte_hunk_diff(&a, &b, "blob", &options);
        prop_assert_eq!(lines.is_empty(), a == b);
        for line in lines.iter().filter(|l| l.starts_with("@@")) {
            prop_assert!(line.ends_with(" @@ blob"));
        }
    }

    #[test]
    fn one_bit_flips_are_found(byte in any::<u8>(), bit in 0u32..8) {
        prop_assert_eq!(bit_diff_index(byte, byte ^ (1 << bit)).expect("one bit"), bit);
    }

    #[test]
    fn changed_bits_counts_every_flip(pairs in prop::collection::vec((any::<u8>(), any::<u8>()), 0..32)) {
        let (a, b): (Vec<u8>, Vec<u8>) = pairs.into_iter().unzip();
        let expected: u32 = a.iter().zip(&b).map(|(x, y)| (x ^ y).count_ones()).sum();
        let bits = changed_bits(&a, &b).expect("same length");
        prop_assert_eq!(bits.len() as u32, expected);
        prop_assert!(bits.windows(2).all(|w| w[0] < w[1]));
    }
}
