//! Identifier carousel feeding the falling-text animation.
//!
//! Recent block hashes live in a bounded FIFO; mempool transaction hashes live
//! in an insertion-ordered store with removal by hash. A single round-robin
//! cursor walks the blocks first, then the mempool, then wraps.

use std::collections::{BTreeMap, HashMap, VecDeque};

use rand::Rng;

use crate::{
    constants::animation::TEXT_SIZE,
    error::{Error, Result},
    falling_text::Text,
    types::Hash256,
};

/// Renders a hash as its 40-character Z85 text.
pub fn z85(hash: &Hash256) -> Result<Text> {
    let encoded = zmq::z85_encode(hash.as_bytes()).map_err(|_| Error::Encoding)?;
    let bytes = encoded.as_bytes();
    if bytes.len() != TEXT_SIZE {
        return Err(Error::Encoding);
    }
    let mut out = [0u8; TEXT_SIZE];
    out.copy_from_slice(bytes);
    Ok(out)
}

#[derive(Debug, Clone)]
struct Entry {
    hash: Hash256,
    rendered: Option<Text>,
}

impl Entry {
    fn new(hash: Hash256) -> Self {
        Self {
            hash,
            rendered: None,
        }
    }

    fn render(&mut self) -> Result<Text> {
        if let Some(text) = self.rendered {
            return Ok(text);
        }
        let text = z85(&self.hash)?;
        self.rendered = Some(text);
        Ok(text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cursor {
    /// Next block with sequence number at or above this one.
    Block(u64),
    /// Next mempool entry with sequence number at or above this one.
    Tx(u64),
}

#[derive(Debug)]
pub struct Carousel {
    capacity: usize,
    blocks: VecDeque<(u64, Entry)>,
    next_block_seq: u64,
    txpool: BTreeMap<u64, Entry>,
    tx_index: HashMap<Hash256, u64>,
    next_tx_seq: u64,
    cursor: Cursor,
}

impl Carousel {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            blocks: VecDeque::new(),
            next_block_seq: 0,
            txpool: BTreeMap::new(),
            tx_index: HashMap::new(),
            next_tx_seq: 0,
            cursor: Cursor::Block(0),
        }
    }

    pub fn block_len(&self) -> usize {
        self.blocks.len()
    }

    pub fn txpool_len(&self) -> usize {
        self.txpool.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty() && self.txpool.is_empty()
    }

    pub fn contains_block(&self, hash: &Hash256) -> bool {
        self.blocks.iter().any(|(_, e)| e.hash == *hash)
    }

    pub fn contains_tx(&self, hash: &Hash256) -> bool {
        self.tx_index.contains_key(hash)
    }

    /// Appends a block hash, evicting the oldest once at capacity.
    pub fn push_block(&mut self, hash: Hash256) {
        if self.blocks.len() >= self.capacity {
            self.blocks.pop_front();
        }
        self.blocks.push_back((self.next_block_seq, Entry::new(hash)));
        self.next_block_seq += 1;
    }

    /// Inserts a mempool hash; an existing entry keeps its place and rendering.
    pub fn insert_tx(&mut self, hash: Hash256) {
        if self.tx_index.contains_key(&hash) {
            return;
        }
        let seq = self.next_tx_seq;
        self.next_tx_seq += 1;
        self.tx_index.insert(hash, seq);
        self.txpool.insert(seq, Entry::new(hash));
    }

    pub fn remove_tx(&mut self, hash: &Hash256) -> bool {
        match self.tx_index.remove(hash) {
            Some(seq) => self.txpool.remove(&seq).is_some(),
            None => false,
        }
    }

    pub fn clear_txpool(&mut self) {
        self.txpool.clear();
        self.tx_index.clear();
        if matches!(self.cursor, Cursor::Tx(_)) {
            self.cursor = Cursor::Block(0);
        }
    }

    /// Places the cursor on a random entry of the combined sets.
    pub fn randomize_cursor<R: Rng>(&mut self, rng: &mut R) {
        let total = self.blocks.len() + self.txpool.len();
        if total == 0 {
            self.cursor = Cursor::Block(0);
            return;
        }
        let pick = rng.gen_range(0..total);
        self.cursor = if pick < self.blocks.len() {
            Cursor::Block(self.blocks[pick].0)
        } else {
            let seq = self
                .txpool
                .keys()
                .nth(pick - self.blocks.len())
                .copied()
                .unwrap_or(0);
            Cursor::Tx(seq)
        };
    }

    /// Next identifier in round-robin order, or `None` when both sets are empty.
    pub fn next_identifier(&mut self) -> Result<Option<Text>> {
        // blocks -> txpool -> wrap to blocks covers every entry
        for _ in 0..3 {
            match self.cursor {
                Cursor::Block(from) => {
                    let start = self.blocks.partition_point(|(seq, _)| *seq < from);
                    match self.blocks.get_mut(start) {
                        Some((seq, entry)) => {
                            self.cursor = Cursor::Block(*seq + 1);
                            return entry.render().map(Some);
                        }
                        None => self.cursor = Cursor::Tx(0),
                    }
                }
                Cursor::Tx(from) => match self.txpool.range_mut(from..).next() {
                    Some((seq, entry)) => {
                        self.cursor = Cursor::Tx(*seq + 1);
                        return entry.render().map(Some);
                    }
                    None => self.cursor = Cursor::Block(0),
                },
            }
        }
        Ok(None)
    }
}
