use alloc::sync::Arc;

use vc_reflect::Reflect;
use vc_reflect::info::TypeInfo;
use vc_reflect::registry::TypeRegistry;

use crate::cache::{Codec, CodecCache, Gate};
use crate::codec::{EncodeDispatch, encoder};
use crate::contract::{contract_encoder, indirect_contract_encoder};
use crate::{CodecError, EncodeCx, Encoder, Renderer};

impl Codec for Encoder {
    fn stub(info: &'static TypeInfo, gate: Arc<Gate>) -> Self {
        encoder(move |cx, sink, value| {
            gate.wait(info)?;
            let real = cx.marshaller().find_encoder(info);
            cx.encode(&real, sink, value)
        })
    }

    fn failing(err: CodecError) -> Self {
        encoder(move |_, _, _| Err(err.clone()))
    }
}

/// The encode half of the codec engine.
///
/// A `Marshaller` owns a cache of encoders keyed by type. On a miss it
/// builds the encoder from, in order, the custom-type contracts registered
/// in its [`TypeRegistry`], the same contracts of the type wrapped by a
/// pointer or optional, and finally its dispatch function. The result,
/// failures included, is cached for the lifetime of the marshaller.
///
/// A marshaller can be shared between threads. Each type is built at most
/// once per marshaller.
///
/// # Examples
///
/// ```
/// use vc_codec::{JsonRenderer, Marshaller, text};
///
/// let marshaller = Marshaller::new(text::encode_dispatch);
/// let mut out = JsonRenderer::new(Vec::new());
/// marshaller.marshal(&mut out, &vec![Some(1_u8), None]).unwrap();
///
/// assert_eq!(out.into_inner(), b"[1,null]");
/// ```
pub struct Marshaller {
    cache: CodecCache<Encoder>,
    dispatch: EncodeDispatch,
    registry: TypeRegistry,
}

impl Marshaller {
    /// Creates a marshaller with an empty registry.
    pub fn new(
        dispatch: impl Fn(&Marshaller, &'static TypeInfo) -> Result<Encoder, CodecError>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        Self {
            cache: CodecCache::new(),
            dispatch: Arc::new(dispatch),
            registry: TypeRegistry::empty(),
        }
    }

    /// Replaces the registry consulted for custom-type contracts.
    ///
    /// Types already cached keep their encoders.
    #[must_use]
    pub fn with_registry(mut self, registry: TypeRegistry) -> Self {
        self.registry = registry;
        self
    }

    #[inline]
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Returns the encoder of `info`, building it on first use.
    ///
    /// A type that cannot be encoded yields an encoder that always fails.
    /// While the encoder of a composite type is being built, a forwarding
    /// stub is returned instead.
    pub fn find_encoder(&self, info: &'static TypeInfo) -> Encoder {
        self.cache.get_or_build(info, || self.build(info))
    }

    fn build(&self, info: &'static TypeInfo) -> Result<Encoder, CodecError> {
        if let Some(encoder) = contract_encoder(&self.registry, info) {
            return Ok(encoder);
        }
        if let Some(encoder) = indirect_contract_encoder(&self.registry, info) {
            return Ok(encoder);
        }
        (self.dispatch)(self, info)
    }

    /// Encodes `value` into `sink`.
    ///
    /// The first error aborts the call and is passed to [`Renderer::report`].
    pub fn marshal(&self, sink: &mut dyn Renderer, value: &dyn Reflect) -> Result<(), CodecError> {
        let encoder = self.find_encoder(value.reflect_type_info());
        let mut cx = EncodeCx::new(self);
        cx.encode(&encoder, sink, value).inspect_err(|err| sink.report(err))
    }

    /// Number of types in the cache.
    #[inline]
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    /// The error a cached failing encoder of `info` reports.
    ///
    /// `None` if the encoder was built, is still being built, or was never
    /// requested.
    pub fn cached_failure(&self, info: &TypeInfo) -> Option<CodecError> {
        self.cache.failure(info)
    }

    #[cfg(test)]
    pub(crate) fn is_pending(&self, info: &TypeInfo) -> bool {
        self.cache.is_pending(info)
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::{String, ToString};
    use alloc::sync::Arc;
    use alloc::vec::Vec;
    use core::sync::atomic::{AtomicUsize, Ordering};
    use std::panic::{self, AssertUnwindSafe};
    use std::sync::{Barrier, Mutex, mpsc};
    use std::thread;

    use vc_reflect::derive::Reflect;
    use vc_reflect::info::{TypeInfo, Typed};

    use crate::codec::encoder;
    use crate::{CodecError, EncodeCx, Encoder, ErrorClass, JsonRenderer, Marshaller, text};

    #[derive(Reflect, Default)]
    struct Node {
        pub value: i32,
        pub next: Option<Box<Node>>,
    }

    #[derive(Reflect, Default)]
    struct Point {
        pub x: i32,
        pub y: i32,
    }

    fn render(marshaller: &Marshaller, value: &dyn vc_reflect::Reflect) -> Result<String, CodecError> {
        let mut out = JsonRenderer::new(Vec::new());
        marshaller.marshal(&mut out, value)?;
        Ok(String::from_utf8(out.into_inner()).unwrap())
    }

    /// Text dispatch that counts builds of `T`.
    fn counting<T: Typed>(
        count: Arc<AtomicUsize>,
    ) -> impl Fn(&Marshaller, &'static TypeInfo) -> Result<Encoder, CodecError> + Send + Sync {
        move |m, info| {
            if info.is::<T>() {
                count.fetch_add(1, Ordering::SeqCst);
            }
            text::encode_dispatch(m, info)
        }
    }

    #[test]
    fn self_referential_type_terminates() {
        let marshaller = Marshaller::new(text::encode_dispatch);
        let list = Node {
            value: 1,
            next: Some(Box::new(Node {
                value: 2,
                next: None,
            })),
        };

        assert_eq!(
            render(&marshaller, &list).unwrap(),
            r#"{"value":1,"next":{"value":2,"next":null}}"#
        );
        assert!(!marshaller.is_pending(Node::type_info()));
    }

    #[test]
    fn concurrent_lookups_build_once() {
        const THREADS: usize = 8;

        let count = Arc::new(AtomicUsize::new(0));
        let marshaller = Arc::new(Marshaller::new(counting::<Point>(count.clone())));
        let barrier = Arc::new(Barrier::new(THREADS));

        let handles: Vec<_> = (0..THREADS)
            .map(|i| {
                let marshaller = marshaller.clone();
                let barrier = barrier.clone();
                thread::spawn(move || {
                    barrier.wait();
                    let encoder = marshaller.find_encoder(Point::type_info());
                    let point = Point { x: i as i32, y: 0 };
                    let mut out = JsonRenderer::new(Vec::new());
                    let mut cx = EncodeCx::new(&marshaller);
                    cx.encode(&encoder, &mut out, &point).unwrap();
                    String::from_utf8(out.into_inner()).unwrap()
                })
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            assert_eq!(handle.join().unwrap(), format!(r#"{{"x":{i},"y":0}}"#));
        }
        assert_eq!(count.load(Ordering::SeqCst), 1);

        let a = marshaller.find_encoder(Point::type_info());
        let b = marshaller.find_encoder(Point::type_info());
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn stub_waits_for_build_on_other_threads() {
        let (found_tx, found_rx) = mpsc::channel::<Encoder>();
        let (release_tx, release_rx) = mpsc::channel::<()>();
        let release_rx = Mutex::new(release_rx);

        let marshaller = Arc::new(Marshaller::new(move |m: &Marshaller, info: &'static TypeInfo| {
            if info.is::<Point>() {
                // Hand out the stub, then hold the build open.
                let _ = found_tx.send(m.find_encoder(info));
                let _ = release_rx.lock().unwrap().recv();
            }
            text::encode_dispatch(m, info)
        }));

        let builder = {
            let marshaller = marshaller.clone();
            thread::spawn(move || {
                let _ = marshaller.find_encoder(Point::type_info());
            })
        };

        let stub = found_rx.recv().unwrap();
        assert!(marshaller.is_pending(Point::type_info()));

        let user = {
            let marshaller = marshaller.clone();
            thread::spawn(move || {
                let mut out = JsonRenderer::new(Vec::new());
                let mut cx = EncodeCx::new(&marshaller);
                cx.encode(&stub, &mut out, &Point { x: 3, y: 4 }).unwrap();
                String::from_utf8(out.into_inner()).unwrap()
            })
        };

        release_tx.send(()).unwrap();
        builder.join().unwrap();
        assert_eq!(user.join().unwrap(), r#"{"x":3,"y":4}"#);
    }

    #[test]
    fn stub_invoked_by_its_builder_fails() {
        let marshaller = Marshaller::new(|m: &Marshaller, info: &'static TypeInfo| {
            if info.is::<Point>() {
                let stub = m.find_encoder(info);
                let mut out = JsonRenderer::new(Vec::new());
                let mut cx = EncodeCx::new(m);
                let err = cx.encode(&stub, &mut out, &Point::default()).unwrap_err();
                assert_eq!(err.class(), ErrorClass::Internal);
                return Err(err);
            }
            text::encode_dispatch(m, info)
        });

        let err = render(&marshaller, &Point::default()).unwrap_err();
        assert_eq!(err.class(), ErrorClass::Internal);
        assert!(err.message().contains("during its own construction"));
    }

    #[test]
    fn panicking_dispatch_leaves_a_sentinel() {
        let marshaller = Marshaller::new(|m: &Marshaller, info: &'static TypeInfo| {
            if info.is::<Point>() {
                panic!("dispatch exploded");
            }
            text::encode_dispatch(m, info)
        });

        let caught = panic::catch_unwind(AssertUnwindSafe(|| {
            marshaller.find_encoder(Point::type_info())
        }));
        assert!(caught.is_err());
        assert!(!marshaller.is_pending(Point::type_info()));

        let err = render(&marshaller, &Point::default()).unwrap_err();
        assert_eq!(err.class(), ErrorClass::Internal);
        assert!(err.to_string().contains("panicked"));
    }

    #[test]
    fn failures_are_cached() {
        let count = Arc::new(AtomicUsize::new(0));
        let calls = count.clone();
        let marshaller = Marshaller::new(move |_: &Marshaller, _: &'static TypeInfo| {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(CodecError::type_error("refused"))
        });

        for info in [<()>::type_info(), Point::type_info()] {
            let a = marshaller.find_encoder(info);
            let b = marshaller.find_encoder(info);
            assert!(Arc::ptr_eq(&a, &b));
        }
        assert_eq!(count.load(Ordering::SeqCst), 2);
        assert_eq!(marshaller.cached_len(), 2);
        let cached = marshaller.cached_failure(Point::type_info()).unwrap();
        assert_eq!(cached.message(), "refused");
        assert!(marshaller.cached_failure(<bool>::type_info()).is_none());

        let err = render(&marshaller, &()).unwrap_err();
        assert_eq!(err.to_string(), "type error: refused");
        let err = render(&marshaller, &Point::default()).unwrap_err();
        assert_eq!(err.class(), ErrorClass::Type);
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn custom_encoder_function() {
        let marshaller = Marshaller::new(|m: &Marshaller, info: &'static TypeInfo| {
            if info.is::<bool>() {
                return Ok(encoder(|_, sink, value| {
                    let yes = value.downcast_ref::<bool>() == Some(&true);
                    sink.write(if yes { b"\"yes\"" } else { b"\"no\"" })
                }));
            }
            text::encode_dispatch(m, info)
        });

        let flags: Vec<bool> = vec![true, false];
        assert_eq!(render(&marshaller, &flags).unwrap(), r#"["yes","no"]"#);
    }
}
