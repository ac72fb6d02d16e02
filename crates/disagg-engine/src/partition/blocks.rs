//! Greedy weight-bounded blocking.

/// Split `items` into consecutive blocks of roughly equal weight so that
/// about `hint` blocks come out.
///
/// Items are taken in order; a block is closed before the item that would
/// push its weight past `ceil(total / hint)`. A block always holds at least
/// one item, so an overweight item gets a block of its own.
pub fn split_in_blocks<T>(items: Vec<T>, hint: usize, weight: impl Fn(&T) -> f64) -> Vec<Vec<T>> {
    if items.is_empty() {
        return Vec::new();
    }
    let hint = hint.max(1);
    let weights: Vec<f64> = items.iter().map(|it| weight(it).max(0.0)).collect();
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        let per_block = items.len().div_ceil(hint);
        let mut blocks = Vec::new();
        let mut iter = items.into_iter().peekable();
        while iter.peek().is_some() {
            blocks.push(iter.by_ref().take(per_block).collect());
        }
        return blocks;
    }
    let max_weight = (total / hint as f64).ceil();

    let mut blocks = Vec::new();
    let mut block = Vec::new();
    let mut block_weight = 0.0;
    for (item, w) in items.into_iter().zip(weights) {
        if !block.is_empty() && block_weight + w > max_weight {
            blocks.push(std::mem::take(&mut block));
            block_weight = 0.0;
        }
        block.push(item);
        block_weight += w;
    }
    if !block.is_empty() {
        blocks.push(block);
    }
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_weights_fill_hint_blocks() {
        let blocks = split_in_blocks((0..10).collect(), 5, |_| 1.0);
        assert_eq!(blocks.len(), 5);
        assert!(blocks.iter().all(|b| b.len() == 2));
        let flat: Vec<i32> = blocks.into_iter().flatten().collect();
        assert_eq!(flat, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn heavy_item_gets_its_own_block() {
        let blocks = split_in_blocks(vec![1.0, 10.0, 1.0, 1.0], 4, |w| *w);
        assert_eq!(blocks[1], vec![10.0]);
    }

    #[test]
    fn zero_weights_split_by_count() {
        let blocks = split_in_blocks(vec![0; 7], 3, |_| 0.0);
        assert_eq!(blocks.iter().map(Vec::len).collect::<Vec<_>>(), vec![3, 3, 1]);
    }

    #[test]
    fn empty_input_gives_no_blocks() {
        assert!(split_in_blocks(Vec::<u8>::new(), 3, |_| 1.0).is_empty());
    }
}
