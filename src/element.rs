//! Queue element: an owned text payload plus its ring link.

use std::alloc::{self, Layout};
use std::fmt;
use std::ptr::{self, NonNull};

use sentinel_ring::{container_of, container_of_mut, RingLink};

use crate::error::QueueError;

/// A single queue entry.
///
/// Elements are created by [`Queue::insert_head`]/[`Queue::insert_tail`],
/// which copy the caller's text, and handed back by
/// [`Queue::remove_head`]/[`Queue::remove_tail`]. A removed element is no
/// longer linked into any ring; dropping it releases the payload.
///
/// [`Queue::insert_head`]: crate::Queue::insert_head
/// [`Queue::insert_tail`]: crate::Queue::insert_tail
/// [`Queue::remove_head`]: crate::Queue::remove_head
/// [`Queue::remove_tail`]: crate::Queue::remove_tail
#[repr(C)]
pub struct Element {
    pub(crate) link: RingLink,
    value: String,
}

impl Element {
    /// Allocates an unlinked element holding a private copy of `text`.
    ///
    /// Both the payload and the node allocation are fallible; on failure
    /// nothing is leaked.
    pub(crate) fn try_new(text: &str) -> Result<NonNull<RingLink>, QueueError> {
        let mut value = String::new();
        value.try_reserve_exact(text.len())?;
        value.push_str(text);

        // Same layout `Box` uses, so `reclaim` can rebuild the box.
        let layout = Layout::new::<Element>();
        let element = unsafe { alloc::alloc(layout) as *mut Element };
        if element.is_null() {
            return Err(QueueError::OutOfMemory);
        }

        unsafe {
            ptr::write(
                element,
                Element {
                    link: RingLink::new(),
                    value,
                },
            );
            Ok(NonNull::new_unchecked(ptr::addr_of_mut!((*element).link)))
        }
    }

    /// The payload.
    #[inline]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Consumes the element, returning its payload.
    #[inline]
    pub fn into_value(self) -> String {
        self.value
    }

    /// Copies the payload into `buf` as a NUL-terminated byte string.
    ///
    /// At most `buf.len() - 1` payload bytes are copied, followed by a NUL.
    /// Returns the number of payload bytes written; a zero-length buffer
    /// receives nothing.
    pub fn copy_to(&self, buf: &mut [u8]) -> usize {
        let Some(room) = buf.len().checked_sub(1) else {
            return 0;
        };
        let bytes = self.value.as_bytes();
        let len = bytes.len().min(room);
        buf[..len].copy_from_slice(&bytes[..len]);
        buf[len] = 0;
        len
    }

    /// Borrows the element embedding `link`.
    ///
    /// # Safety
    ///
    /// `link` must be the link of a live `Element` (not a sentinel), and the
    /// element must outlive `'a`.
    #[inline]
    pub(crate) unsafe fn from_link<'a>(link: NonNull<RingLink>) -> &'a Element {
        &*container_of!(link.as_ptr(), Element, link)
    }

    /// Takes back ownership of the element embedding `link`.
    ///
    /// # Safety
    ///
    /// `link` must be the unlinked link of an element created by
    /// [`Element::try_new`] that has not been reclaimed yet.
    #[inline]
    pub(crate) unsafe fn reclaim(link: NonNull<RingLink>) -> Box<Element> {
        debug_assert!(!link.as_ref().is_linked(), "element is still linked");
        Box::from_raw(container_of_mut!(link.as_ptr(), Element, link))
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("value", &self.value)
            .field("link", &self.link)
            .finish()
    }
}
