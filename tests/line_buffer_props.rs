use proptest::prelude::*;
use termlink::LineBuffer;

/// Feed `data` split at `cuts` and collect every flushed block.
fn feed(data: &[u8], cuts: &[usize]) -> (Vec<String>, Vec<u8>) {
    let mut buffer = LineBuffer::new();
    let mut blocks = Vec::new();
    let mut start = 0;

    let mut points: Vec<usize> = cuts.iter().map(|cut| cut % (data.len() + 1)).collect();
    points.sort_unstable();
    points.push(data.len());

    for end in points {
        if end < start {
            continue;
        }
        if let Some(block) = buffer.push(&data[start..end]) {
            blocks.push(block);
        }
        start = end;
    }
    (blocks, buffer.pending().to_vec())
}

/// Flushed output as individual lines.
fn lines(blocks: &[String]) -> Vec<String> {
    blocks
        .iter()
        .flat_map(|block| block.split('\n'))
        .map(str::to_string)
        .collect()
}

fn device_text() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(
        prop_oneof![
            4 => prop::sample::select(b"abcXYZ019 >".to_vec()),
            1 => Just(b'\r'),
            1 => Just(b'\n'),
        ],
        0..200,
    )
}

/// Property tests for line reassembly
#[cfg(test)]
mod line_buffer_props {
    use super::*;

    proptest! {
        #[test]
        fn never_emits_carriage_returns(data in device_text(), cuts in prop::collection::vec(any::<usize>(), 0..8)) {
            let (blocks, pending) = feed(&data, &cuts);
            for block in &blocks {
                prop_assert!(!block.contains('\r'));
            }
            prop_assert!(!pending.contains(&b'\r'));
        }

        #[test]
        fn lines_do_not_depend_on_chunking(
            data in device_text(),
            cuts in prop::collection::vec(any::<usize>(), 0..8),
        ) {
            let (whole, whole_pending) = feed(&data, &[]);
            let (split, split_pending) = feed(&data, &cuts);

            // A leading line feed is held back until more text arrives, so
            // only compare the retained tail and the non-empty lines.
            let non_empty = |blocks: &[String]| -> Vec<String> {
                lines(blocks).into_iter().filter(|line| !line.is_empty()).collect()
            };
            prop_assert_eq!(non_empty(&whole[..]), non_empty(&split[..]));
            prop_assert_eq!(
                String::from_utf8_lossy(&whole_pending).trim_start_matches('\n').to_string(),
                String::from_utf8_lossy(&split_pending).trim_start_matches('\n').to_string()
            );
        }

        #[test]
        fn everything_is_accounted_for(data in device_text(), cuts in prop::collection::vec(any::<usize>(), 0..8)) {
            let (blocks, pending) = feed(&data, &cuts);
            let stripped: Vec<u8> = data.iter().copied().filter(|b| *b != b'\r').collect();

            let emitted: usize = blocks.iter().map(|block| block.len() + 1).sum();
            prop_assert_eq!(emitted + pending.len(), stripped.len());
        }
    }

    #[test]
    fn documented_three_chunk_example() {
        let (blocks, pending) = feed(b"ABC\r\nDEF\n", &[2, 7]);
        assert_eq!(blocks, vec!["ABC".to_string(), "DEF".to_string()]);
        assert!(pending.is_empty());
    }
}
