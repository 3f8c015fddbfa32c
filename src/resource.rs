use log::debug;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// An opaque reference to binary content held by a [ResourceStore]. Handles are
/// never reused, so a released handle stays released even if new content is
/// stored afterwards.
#[derive(Eq, PartialEq, Hash, Clone, Debug)]
pub struct ResourceHandle(u64);

impl fmt::Display for ResourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "blob:quote-card/{}", self.0)
    }
}

/// Owns the bytes behind every live [ResourceHandle]. Content stays in memory
/// until its handle is explicitly released.
#[derive(Default)]
pub struct ResourceStore {
    live: HashMap<ResourceHandle, Arc<[u8]>>,
    next_id: u64,
    released: usize,
}

impl ResourceStore {
    pub fn new() -> ResourceStore {
        ResourceStore::default()
    }

    fn new_handle(&mut self) -> ResourceHandle {
        let id = self.next_id;
        self.next_id += 1;
        ResourceHandle(id)
    }

    /// Copy `bytes` into the store and return a handle to them
    pub fn create(&mut self, bytes: &[u8]) -> ResourceHandle {
        let handle = self.new_handle();
        self.live.insert(handle.clone(), Arc::from(bytes));
        debug!("created {handle} ({} bytes)", bytes.len());
        handle
    }

    pub fn get(&self, handle: &ResourceHandle) -> Option<&[u8]> {
        self.live.get(handle).map(|bytes| bytes.as_ref())
    }

    pub fn is_live(&self, handle: &ResourceHandle) -> bool {
        self.live.contains_key(handle)
    }

    /// Release the content behind `handle`. Releasing a handle that is already
    /// gone does nothing; returns whether anything was freed.
    pub fn release(&mut self, handle: &ResourceHandle) -> bool {
        match self.live.remove(handle) {
            Some(_) => {
                self.released += 1;
                debug!("released {handle}");
                true
            }
            None => false,
        }
    }

    /// Number of handles currently holding content
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Number of releases that actually freed content over the store's lifetime
    pub fn release_count(&self) -> usize {
        self.released
    }
}
