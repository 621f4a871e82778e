//! The transposition table is one of the most important data structures in
//! the engine.
//!
//! As the search works through the game tree, it keeps running into board
//! positions it has seen before through a different move order. The
//! transposition table lets it reuse the work: we store the score we found,
//! how deep we searched below the node, whether the score was exact or a
//! bound, and the best move — keyed by the position's Zobrist hash.
//!
//! Two kinds of collision exist. Different positions can share a full
//! 64-bit hash (vanishingly rare), and, because the table is much smaller
//! than 2^64, many hashes share a slot (common). The stored full hash is
//! compared on probe, so the second kind only costs us a miss.

use crate::evaluate::Score;
use crate::zobrist::ZHash;
use board::square::Square;
use std::mem::size_of;

/// A flag that stores whether the entry corresponds to a PV, fail-high or
/// fail-low node. Or, equivalently, whether the score saved in the entry is
/// exact, an upper bound, or a lower bound.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
pub enum NodeType {
    Exact,
    Upper,
    Lower,
}

/// A single TT entry.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TTEntry {
    /// The hash of the board the entry is for, used to test for hash
    /// collisions
    hash: ZHash,

    /// The best move we found in the previous search
    best_move: Option<Square>,

    /// The associated score we found. This could be an upper/lower bound
    /// if the search resulted in a cutoff.
    score: Score,

    /// The depth we searched to from this node
    depth: u8,

    /// A flag to indicate whether the stored value is an upper/lower bound
    node_type: NodeType,

    age: u8,
}

impl TTEntry {
    const NULL: TTEntry = TTEntry {
        hash: ZHash::NULL,
        best_move: None,
        score: Score::MIN,
        depth: 0,
        node_type: NodeType::Exact,
        age: 0,
    };

    /// Create a new TT entry
    pub fn new(
        hash: ZHash,
        best_move: Option<Square>,
        score: Score,
        depth: usize,
        node_type: NodeType,
        age: u8,
    ) -> TTEntry {
        TTEntry {
            hash,
            best_move,
            score,
            depth: depth as u8,
            node_type,
            age,
        }
    }

    pub fn get_hash(&self) -> ZHash {
        self.hash
    }

    pub fn get_move(&self) -> Option<Square> {
        self.best_move
    }

    pub fn get_score(&self) -> Score {
        self.score
    }

    pub fn get_depth(&self) -> usize {
        self.depth as usize
    }

    pub fn get_type(&self) -> NodeType {
        self.node_type
    }

    /// Check whether there's any data stored in the entry
    pub fn is_empty(&self) -> bool {
        self.hash == ZHash::NULL
    }

    /// Check whether the stored score is usable at the given search depth
    /// and window, and return it if so.
    ///
    /// Shallower entries are no good, and a bound is only usable when it
    /// already decides the node: a lower bound at or above beta, an upper
    /// bound at or below alpha.
    pub fn try_score(&self, depth: usize, alpha: Score, beta: Score) -> Option<Score> {
        if self.get_depth() < depth {
            return None;
        }

        match self.node_type {
            NodeType::Exact => Some(self.score),
            NodeType::Upper if self.score <= alpha => Some(alpha),
            NodeType::Lower if self.score >= beta => Some(beta),
            _ => None,
        }
    }
}

impl Default for TTEntry {
    fn default() -> Self {
        TTEntry::NULL
    }
}

/// A transposition table that stores previously searched results
pub struct TTable {
    /// The entries, heap-allocated so the table can be resized on request.
    table: Vec<TTEntry>,

    /// The number of slots.
    size: usize,

    /// The number of non-empty slots.
    occupancy: usize,

    age: u8,
}

impl TTable {
    /// Create a new table with the requested capacity in megabytes
    pub fn with_capacity(mb_size: usize) -> TTable {
        let size = (mb_size << 20) / size_of::<TTEntry>();

        TTable {
            table: vec![TTEntry::NULL; size],
            size,
            occupancy: 0,
            age: 0,
        }
    }

    /// Resize table to the size requested in MiB, clearing it.
    pub fn resize(&mut self, mb_size: usize) {
        self.size = (mb_size << 20) / size_of::<TTEntry>();
        self.table = vec![TTEntry::NULL; self.size];
        self.occupancy = 0;
    }

    /// Insert an entry into the transposition table.
    ///
    /// Replacement policy: an empty slot always takes the entry; an
    /// occupied slot is overwritten when the search went at least as deep
    /// as the stored one, or when the stored entry is from an older search.
    pub fn insert(&mut self, entry: TTEntry) {
        let key = ZKey::from_hash(entry.hash, self.size);
        let slot = self.table[key.0];

        if slot.is_empty() {
            self.table[key.0] = entry;
            self.occupancy += 1;
        } else if slot.age != entry.age || entry.depth >= slot.depth {
            self.table[key.0] = entry;
        }
    }

    /// Check whether the hash appears in the transposition table, and
    /// return the entry if so.
    pub fn probe(&self, hash: ZHash) -> Option<TTEntry> {
        let key = ZKey::from_hash(hash, self.size);

        self.table
            .get(key.0)
            .filter(|entry| !entry.is_empty())
            .filter(|entry| entry.hash == hash)
            .copied()
    }

    /// Return the occupancy as a fractional number (0 - 1)
    pub fn occupancy(&self) -> f32 {
        self.occupancy as f32 / self.size as f32
    }

    pub fn get_age(&self) -> u8 {
        self.age
    }

    /// Age the table at the start of a new top-level search, so stale
    /// entries lose their replacement priority.
    pub fn increment_age(&mut self) {
        self.age = self.age.wrapping_add(1);
    }
}

////////////////////////////////////////////////////////////////////////////////
//
// Zobrist keys
//
////////////////////////////////////////////////////////////////////////////////

/// ZKeys are lookup keys derived from a Zobrist hash, truncated to the
/// table size.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ZKey(pub usize);

impl ZKey {
    pub fn from_hash(hash: ZHash, size: usize) -> Self {
        ZKey((hash.0 as usize) % size)
    }
}
