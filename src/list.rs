//! Intrusive doubly-linked list used as the recency/frequency-bucket backbone
//! for every cache in this crate.
//!
//! The list keeps two sentinel ("sigil") nodes — head and tail — so that
//! insert/detach never need to special-case an empty list. The
//! most-recently-used end sits next to `head`; the least-recently-used
//! (eviction victim) end sits next to `tail`.

use core::fmt;
use core::mem;
use core::num::NonZeroUsize;
use core::ptr::{self, NonNull};
use std::boxed::Box;

/// A node in the doubly linked list.
///
/// Contains a value and pointers to the previous and next entries.
/// This structure is not meant to be used directly by users of the `List`.
pub struct Entry<T> {
    /// The value stored in this entry. Uses MaybeUninit to allow for sigil nodes.
    val: mem::MaybeUninit<T>,
    /// Pointer to the previous entry in the list.
    prev: *mut Entry<T>,
    /// Pointer to the next entry in the list.
    next: *mut Entry<T>,
}

impl<T> Entry<T> {
    /// Creates a new entry with the given value.
    fn new(val: T) -> Self {
        Entry {
            val: mem::MaybeUninit::new(val),
            prev: ptr::null_mut(),
            next: ptr::null_mut(),
        }
    }

    /// Creates a new sigil (sentinel) entry without initializing the value.
    fn new_sigil() -> Self {
        Entry {
            val: mem::MaybeUninit::uninit(),
            prev: ptr::null_mut(),
            next: ptr::null_mut(),
        }
    }

    /// # Safety
    ///
    /// Must only be called on a non-sigil node with an initialized value.
    pub unsafe fn get_value(&self) -> &T {
        unsafe { self.val.assume_init_ref() }
    }

    /// # Safety
    ///
    /// Must only be called on a non-sigil node with an initialized value.
    pub unsafe fn get_value_mut(&mut self) -> &mut T {
        unsafe { self.val.assume_init_mut() }
    }
}

/// A doubly linked list implementation with a fixed capacity.
///
/// A capacity of `0` is legal: the list never accepts an element and
/// behaves as permanently full. This lets caches built on top of `List`
/// implement the "capacity zero ⇒ every insert is a no-op" contract
/// without a special case at the cache layer.
pub struct List<T> {
    /// Maximum number of items the list can hold. `0` means permanently full.
    cap: usize,
    /// Current number of items in the list.
    len: usize,
    /// Pointer to the head sentinel node (most-recently-used side).
    head: *mut Entry<T>,
    /// Pointer to the tail sentinel node (least-recently-used side).
    tail: *mut Entry<T>,
}

impl<T> List<T> {
    /// Creates a new list that holds at most `cap` items. `cap == 0` is
    /// legal and produces a list that never accepts an element.
    pub fn new(cap: usize) -> List<T> {
        List::construct(cap)
    }

    /// Creates a new list with the given non-zero capacity.
    pub fn with_nonzero_cap(cap: NonZeroUsize) -> List<T> {
        List::construct(cap.get())
    }

    fn construct(cap: usize) -> List<T> {
        let head = Box::into_raw(Box::new(Entry::new_sigil()));
        let tail = Box::into_raw(Box::new(Entry::new_sigil()));

        let list = List {
            cap,
            len: 0,
            head,
            tail,
        };

        unsafe {
            // SAFETY: head and tail are newly allocated and valid pointers.
            (*list.head).next = list.tail;
            (*list.tail).prev = list.head;
        }

        list
    }

    /// Returns the maximum number of items the list can hold.
    pub fn cap(&self) -> usize {
        self.cap
    }

    /// Returns the current number of items in the list.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the list contains no items.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns true if the list is at (or permanently at, for `cap == 0`) capacity.
    pub fn is_full(&self) -> bool {
        self.len >= self.cap
    }

    /// Removes the most-recently-used item (adjacent to `head`).
    pub fn remove_first(&mut self) -> Option<Box<Entry<T>>> {
        if self.is_empty() {
            return None;
        }
        // SAFETY: head/tail are valid, and the list is non-empty so there is
        // at least one real node between them.
        let next = unsafe { (*self.head).next };
        if next != self.tail {
            unsafe {
                self._detach(next);
            }
            self.len -= 1;
            // SAFETY: next was just detached and uniquely owned by the list.
            unsafe { Some(Box::from_raw(next)) }
        } else {
            None
        }
    }

    /// Removes the least-recently-used item (adjacent to `tail`) — the
    /// eviction victim for recency lists and FIFO tie-break victim for
    /// frequency buckets.
    pub fn remove_last(&mut self) -> Option<Box<Entry<T>>> {
        if self.is_empty() {
            return None;
        }
        // SAFETY: head/tail are valid, and the list is non-empty.
        let prev = unsafe { (*self.tail).prev };
        if prev != self.head {
            unsafe {
                self._detach(prev);
            }
            self.len -= 1;
            // SAFETY: prev was just detached and uniquely owned by the list.
            unsafe { Some(Box::from_raw(prev)) }
        } else {
            None
        }
    }

    /// Detaches an arbitrary node from the list and returns it.
    ///
    /// # Safety
    ///
    /// `node` must be a valid, non-sentinel pointer currently part of this list.
    pub unsafe fn remove(&mut self, node: *mut Entry<T>) -> Option<Box<Entry<T>>> {
        if self.is_empty() || node.is_null() || node == self.head || node == self.tail {
            return None;
        }

        unsafe {
            // SAFETY: caller guarantees node is a live member of this list.
            self._detach(node);
            self.len -= 1;
            Some(Box::from_raw(node))
        }
    }

    /// # Safety
    ///
    /// `node` must be a valid node whose `prev`/`next` point at live entries.
    unsafe fn _detach(&mut self, node: *mut Entry<T>) {
        unsafe {
            // SAFETY: caller guarantees node's neighbors are valid entries.
            (*(*node).prev).next = (*node).next;
            (*(*node).next).prev = (*node).prev;
        }
    }

    /// Attaches a node immediately after `head` (the MRU position).
    ///
    /// Does not update `len` — callers either pair this with an explicit
    /// increment (`add`) or use it purely to reposition a node already
    /// counted (`move_to_front`).
    ///
    /// # Safety
    ///
    /// `node` must not already be linked into any list.
    pub unsafe fn attach(&mut self, node: *mut Entry<T>) {
        unsafe {
            // SAFETY: head is valid; caller guarantees node is unlinked.
            (*node).next = (*self.head).next;
            (*node).prev = self.head;
            (*self.head).next = node;
            (*(*node).next).prev = node;
        }
    }

    /// Attaches a node immediately before `tail` (the LRU position).
    ///
    /// # Safety
    ///
    /// `node` must not already be linked into any list.
    pub unsafe fn attach_last(&mut self, node: *mut Entry<T>) {
        unsafe {
            // SAFETY: tail is valid; caller guarantees node is unlinked.
            (*node).next = self.tail;
            (*node).prev = (*self.tail).prev;
            (*self.tail).prev = node;
            (*(*node).prev).next = node;
        }
    }

    /// Attaches a node detached from a *different* list and counts it
    /// towards this list's length. Used when moving entries between
    /// frequency buckets.
    ///
    /// # Safety
    ///
    /// `node` must not already be linked into any list.
    pub unsafe fn attach_from_other_list(&mut self, node: *mut Entry<T>) {
        unsafe { self.attach(node) };
        self.len += 1;
    }

    /// Tail-side counterpart of [`attach_from_other_list`](Self::attach_from_other_list).
    ///
    /// # Safety
    ///
    /// `node` must not already be linked into any list.
    #[allow(dead_code)]
    pub unsafe fn attach_last_from_other_list(&mut self, node: *mut Entry<T>) {
        unsafe { self.attach_last(node) };
        self.len += 1;
    }

    /// Moves a node already in this list to the MRU position. No-op if the
    /// node is already there.
    ///
    /// # Safety
    ///
    /// `node` must be a valid, non-sentinel pointer currently part of this list.
    pub unsafe fn move_to_front(&mut self, node: *mut Entry<T>) {
        if node.is_null() || node == self.head || node == self.tail {
            return;
        }

        unsafe {
            if (*self.head).next == node {
                return;
            }

            self._detach(node);
            self.attach(node);
        }
    }

    /// Inserts `v` at the MRU position. Returns `None` if the list is at
    /// (or permanently, for `cap == 0`, at) capacity.
    pub fn add(&mut self, v: T) -> Option<*mut Entry<T>> {
        if self.is_full() {
            return None;
        }
        // SAFETY: Box::into_raw always yields a non-null pointer.
        let node = unsafe { NonNull::new_unchecked(Box::into_raw(Box::new(Entry::new(v)))) };
        // SAFETY: node was just allocated and is linked into no list.
        unsafe { self.attach(node.as_ptr()) };
        self.len += 1;
        Some(node.as_ptr())
    }

    /// Inserts `v` at the MRU position, bypassing the capacity check. Used
    /// for transient over-capacity states during eviction bookkeeping.
    pub fn add_unchecked(&mut self, v: T) -> *mut Entry<T> {
        // SAFETY: Box::into_raw always yields a non-null pointer.
        let node = unsafe { NonNull::new_unchecked(Box::into_raw(Box::new(Entry::new(v)))) };
        // SAFETY: node was just allocated and is linked into no list.
        unsafe { self.attach(node.as_ptr()) };
        self.len += 1;
        node.as_ptr()
    }

    /// Replaces the value stored at `node`, optionally returning the old one.
    ///
    /// # Safety
    ///
    /// `node` must be a valid, non-sentinel pointer currently part of this list.
    pub unsafe fn update(
        &mut self,
        node: *mut Entry<T>,
        v: T,
        capturing: bool,
    ) -> (Option<T>, bool) {
        if node.is_null() {
            return (None, false);
        }
        // SAFETY: caller guarantees node is a live, initialized entry.
        let old_val =
            unsafe { mem::replace(&mut (*node).val, mem::MaybeUninit::new(v)).assume_init() };

        if capturing {
            (Some(old_val), true)
        } else {
            (None, true)
        }
    }

    /// # Safety
    ///
    /// `node` must be a valid pointer obtained from this list (or null/sentinel,
    /// in which case `None` is returned).
    #[allow(dead_code)]
    pub unsafe fn get_value(&self, node: *mut Entry<T>) -> Option<&T> {
        if node.is_null() || node == self.head || node == self.tail {
            None
        } else {
            // SAFETY: node is a live, non-sentinel entry per the check above.
            Some(unsafe { (*node).get_value() })
        }
    }

    /// # Safety
    ///
    /// `node` must be a valid pointer obtained from this list (or null/sentinel,
    /// in which case `None` is returned).
    #[allow(dead_code)]
    pub unsafe fn get_value_mut(&mut self, node: *mut Entry<T>) -> Option<&mut T> {
        if node.is_null() || node == self.head || node == self.tail {
            None
        } else {
            // SAFETY: node is a live, non-sentinel entry per the check above.
            Some(unsafe { (*node).get_value_mut() })
        }
    }

    /// Removes all entries, leaving the list empty.
    pub fn clear(&mut self) {
        while self.remove_first().is_some() {}
    }
}

impl<T> Drop for List<T> {
    fn drop(&mut self) {
        self.clear();

        // SAFETY: head/tail are valid pointers allocated in `construct` and
        // never freed elsewhere.
        unsafe {
            if !self.head.is_null() {
                drop(Box::from_raw(self.head));
                self.head = ptr::null_mut();
            }
            if !self.tail.is_null() {
                drop(Box::from_raw(self.tail));
                self.tail = ptr::null_mut();
            }
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for List<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("List")
            .field("capacity", &self.cap)
            .field("length", &self.len)
            .finish()
    }
}
