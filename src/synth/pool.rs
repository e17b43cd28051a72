//! Fixed-capacity voice pool with a lock-free active list.
//!
//! Voices live in a preallocated arena and are threaded into an intrusive
//! singly linked list by index. The event thread allocates and releases;
//! the audio thread only ever walks the list from an atomically loaded head.
//! Storage is never freed or handed to a different allocation — only index
//! ownership recycles through a free stack that the event thread alone
//! touches — so no interleaving can make a link dangle.
//!
//! The pool is constructed pre-split into its two thread-side handles, the
//! way an SPSC ring buffer hands out a producer and a consumer.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use thiserror::Error;

use crate::synth::voice::{VoiceSlot, NIL};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PoolError {
    /// Every slot is already sounding. The caller drops the note-on.
    #[error("voice pool exhausted")]
    Exhausted,
    /// No active voice holds this note.
    #[error("note {0} is not active")]
    NotFound(u8),
}

/// Arena state shared by both handles.
struct Shared {
    slots: Box<[VoiceSlot]>,
    head: AtomicUsize,
    active: AtomicUsize,
}

pub struct VoicePool;

impl VoicePool {
    /// Create a pool of `capacity` slots, split into the event-side
    /// allocator and the audio-side list handle.
    pub fn new(capacity: usize) -> (VoiceAllocator, VoiceList) {
        let slots: Box<[VoiceSlot]> = (0..capacity).map(|_| VoiceSlot::empty()).collect();
        let shared = Arc::new(Shared {
            slots,
            head: AtomicUsize::new(NIL),
            active: AtomicUsize::new(0),
        });

        // Low indices on top of the stack so they are handed out first.
        let free: Vec<usize> = (0..capacity).rev().collect();

        (
            VoiceAllocator {
                shared: Arc::clone(&shared),
                free,
            },
            VoiceList { shared },
        )
    }
}

/// Event-thread handle. Owns the free stack and all allocation and release;
/// nothing here blocks, and nothing here is called from the audio thread.
pub struct VoiceAllocator {
    shared: Arc<Shared>,
    free: Vec<usize>,
}

impl VoiceAllocator {
    /// Claim a slot for `note` at `frequency` and publish it at the front of
    /// the active list.
    ///
    /// The head store is the single publication point: a concurrent reader
    /// sees the list either entirely without or entirely with the new node,
    /// with all of the node's fields initialized.
    pub fn allocate(&mut self, frequency: f32, note: u8) -> Result<usize, PoolError> {
        let index = self.free.pop().ok_or(PoolError::Exhausted)?;
        let slot = &self.shared.slots[index];

        slot.activate(frequency, note);
        // This thread is the only head writer, so a plain load followed by a
        // release store is a complete publish.
        slot.set_next(self.shared.head.load(Ordering::Relaxed));
        self.shared.head.store(index, Ordering::Release);
        self.shared.active.fetch_add(1, Ordering::Relaxed);

        Ok(index)
    }

    /// Unlink the first active voice holding `note` and recycle its slot
    /// index onto the free stack.
    ///
    /// An audio-thread traversal already under way may still visit the
    /// unlinked node this buffer; the next buffer's traversal will not.
    pub fn release(&mut self, note: u8) -> Result<usize, PoolError> {
        let mut prev = NIL;
        let mut cursor = self.shared.head.load(Ordering::Relaxed);

        while cursor != NIL {
            let slot = &self.shared.slots[cursor];
            if slot.note() == note {
                let next = slot.next();
                if prev == NIL {
                    self.shared.head.store(next, Ordering::Release);
                } else {
                    self.shared.slots[prev].set_next(next);
                }
                self.shared.active.fetch_sub(1, Ordering::Relaxed);
                self.free.push(cursor);
                return Ok(cursor);
            }
            prev = cursor;
            cursor = slot.next();
        }

        Err(PoolError::NotFound(note))
    }

    /// Currently sounding voices. May lag the audio thread's view by up to
    /// one buffer period.
    pub fn active_count(&self) -> usize {
        self.shared.active.load(Ordering::Relaxed)
    }

    pub fn capacity(&self) -> usize {
        self.shared.slots.len()
    }
}

/// Audio-thread handle: read-only traversal of the active list.
pub struct VoiceList {
    shared: Arc<Shared>,
}

impl VoiceList {
    /// Capture the list head and voice count once, at the start of a buffer.
    ///
    /// A voice published after the snapshot is picked up by the next buffer;
    /// a voice released after it may still be walked for the remainder of
    /// this one. Both are within the pool's staleness contract.
    pub fn snapshot(&self) -> ListSnapshot<'_> {
        ListSnapshot {
            slots: &self.shared.slots,
            head: self.shared.head.load(Ordering::Acquire),
            active: self.shared.active.load(Ordering::Relaxed),
        }
    }

    pub fn capacity(&self) -> usize {
        self.shared.slots.len()
    }
}

/// One buffer's fixed view of the active list.
#[derive(Clone, Copy)]
pub struct ListSnapshot<'a> {
    slots: &'a [VoiceSlot],
    head: usize,
    active: usize,
}

impl<'a> ListSnapshot<'a> {
    /// Voice count at snapshot time, for mix normalization.
    pub fn active_count(&self) -> usize {
        self.active
    }

    pub fn iter(&self) -> VoiceIter<'a> {
        VoiceIter {
            slots: self.slots,
            cursor: self.head,
            hops: self.slots.len(),
        }
    }
}

/// Walks slot links from a snapshotted head.
///
/// The hop budget equals the pool capacity: a link rewritten mid-walk by a
/// concurrent release-and-reallocate can make the walk revisit nodes, but
/// can never turn one frame into unbounded work.
pub struct VoiceIter<'a> {
    slots: &'a [VoiceSlot],
    cursor: usize,
    hops: usize,
}

impl<'a> Iterator for VoiceIter<'a> {
    type Item = &'a VoiceSlot;

    fn next(&mut self) -> Option<&'a VoiceSlot> {
        if self.cursor == NIL || self.hops == 0 {
            return None;
        }
        self.hops -= 1;

        let slot = self.slots.get(self.cursor)?;
        self.cursor = slot.next();
        Some(slot)
    }
}
