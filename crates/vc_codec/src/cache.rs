//! The per-type codec cache.
//!
//! Codecs of composite types are built behind a forwarding stub so that a
//! type may refer to itself. The stub is installed before the dispatch
//! function runs and is what recursive lookups receive. Invoking it waits
//! on the entry's [`Gate`], then forwards to whatever codec was finally
//! installed. Lookups never block.

use alloc::format;
use alloc::sync::Arc;
use std::sync::{Condvar, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::thread::{self, ThreadId};

use vc_reflect::info::TypeInfo;
use vc_utils::TypeIdMap;

use crate::CodecError;

// -----------------------------------------------------------------------------
// Codec

/// A codec the cache can hold.
pub(crate) trait Codec: Clone {
    /// A codec that waits for `gate`, then forwards to the final codec of `info`.
    fn stub(info: &'static TypeInfo, gate: Arc<Gate>) -> Self;

    /// A codec that always fails with `err`.
    fn failing(err: CodecError) -> Self;
}

// -----------------------------------------------------------------------------
// Gate

/// A one-shot completion signal.
pub(crate) struct Gate {
    builder: ThreadId,
    done: Mutex<bool>,
    cond: Condvar,
}

impl Gate {
    fn new() -> Self {
        Self {
            builder: thread::current().id(),
            done: Mutex::new(false),
            cond: Condvar::new(),
        }
    }

    /// Blocks until the gate is open.
    ///
    /// On the building thread the gate can never open while waiting, so an
    /// internal error is returned instead.
    pub(crate) fn wait(&self, info: &'static TypeInfo) -> Result<(), CodecError> {
        let mut done = self.done.lock().unwrap_or_else(PoisonError::into_inner);
        if *done {
            return Ok(());
        }
        if thread::current().id() == self.builder {
            log::warn!("codec of `{}` invoked during its own construction", info.type_path());
            return Err(CodecError::internal(format!(
                "codec of `{}` invoked during its own construction",
                info.type_path()
            )));
        }
        while !*done {
            done = self.cond.wait(done).unwrap_or_else(PoisonError::into_inner);
        }
        Ok(())
    }

    fn open(&self) {
        *self.done.lock().unwrap_or_else(PoisonError::into_inner) = true;
        self.cond.notify_all();
    }
}

// -----------------------------------------------------------------------------
// Slot

enum Slot<C> {
    Pending(C),
    Ready(C),
    Failed(C, CodecError),
}

impl<C: Codec> Slot<C> {
    fn from_result(info: &'static TypeInfo, result: Result<C, CodecError>) -> Self {
        match result {
            Ok(codec) => Self::Ready(codec),
            Err(err) => {
                log::warn!("no codec for `{}`: {err}", info.type_path());
                Self::Failed(C::failing(err.clone()), err)
            }
        }
    }

    #[inline]
    fn codec(&self) -> &C {
        match self {
            Self::Pending(codec) | Self::Ready(codec) | Self::Failed(codec, _) => codec,
        }
    }
}

// -----------------------------------------------------------------------------
// CodecCache

/// Memoized codecs keyed by type identity.
pub(crate) struct CodecCache<C> {
    slots: RwLock<TypeIdMap<Slot<C>>>,
}

impl<C: Codec> CodecCache<C> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: RwLock::new(TypeIdMap::new()),
        }
    }

    #[inline]
    fn read(&self) -> RwLockReadGuard<'_, TypeIdMap<Slot<C>>> {
        self.slots.read().unwrap_or_else(PoisonError::into_inner)
    }

    #[inline]
    fn write(&self) -> RwLockWriteGuard<'_, TypeIdMap<Slot<C>>> {
        self.slots.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the cached codec of `info`, building it with `build` on a miss.
    ///
    /// While a composite codec is being built, this returns its stub.
    pub(crate) fn get_or_build(
        &self,
        info: &'static TypeInfo,
        build: impl FnOnce() -> Result<C, CodecError>,
    ) -> C {
        let type_id = info.type_id();
        if let Some(slot) = self.read().get(&type_id) {
            return slot.codec().clone();
        }

        if !info.kind().is_composite() {
            log::trace!("building codec of `{}`", info.type_path());
            let slot = Slot::from_result(info, build());
            return self.write().get_or_insert(type_id, || slot).codec().clone();
        }

        let gate = {
            let mut slots = self.write();
            if let Some(slot) = slots.get(&type_id) {
                return slot.codec().clone();
            }
            let gate = Arc::new(Gate::new());
            slots.insert(type_id, Slot::Pending(C::stub(info, gate.clone())));
            gate
        };

        log::debug!("building codec of `{}`", info.type_path());
        let mut finish = Finish {
            cache: self,
            info,
            gate,
            slot: None,
        };
        let slot = Slot::from_result(info, build());
        let codec = slot.codec().clone();
        finish.slot = Some(slot);
        codec
    }

    /// Number of cached entries, including pending ones.
    pub(crate) fn len(&self) -> usize {
        self.read().len()
    }

    /// The error cached for `info`, if building its codec failed.
    pub(crate) fn failure(&self, info: &TypeInfo) -> Option<CodecError> {
        match self.read().get(&info.type_id()) {
            Some(Slot::Failed(_, err)) => Some(err.clone()),
            _ => None,
        }
    }

    #[cfg(test)]
    pub(crate) fn is_pending(&self, info: &TypeInfo) -> bool {
        matches!(self.read().get(&info.type_id()), Some(Slot::Pending(..)))
    }
}

/// Finalizes a pending entry and opens its gate, also when the build panics.
struct Finish<'a, C: Codec> {
    cache: &'a CodecCache<C>,
    info: &'static TypeInfo,
    gate: Arc<Gate>,
    slot: Option<Slot<C>>,
}

impl<C: Codec> Drop for Finish<'_, C> {
    fn drop(&mut self) {
        let slot = self.slot.take().unwrap_or_else(|| {
            let err = CodecError::internal(format!(
                "building the codec of `{}` panicked",
                self.info.type_path()
            ));
            log::warn!("{err}");
            Slot::Failed(C::failing(err.clone()), err)
        });
        self.cache.write().insert(self.info.type_id(), slot);
        self.gate.open();
    }
}
