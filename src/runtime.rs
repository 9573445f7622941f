//! Runtime abstraction layer for async operations
//!
//! Fire-and-forget refreshes are handed to whichever spawner is installed.
//! Tokio is used when the `tokio-runtime` feature is on; otherwise futures
//! run to completion inline on the calling thread. Browser builds spawn on
//! the page's event loop directly (see `web`).

use crate::prelude::{Future, Pin};

/// A trait for spawning async tasks (object-safe version)
pub trait AsyncSpawner: Send + Sync + 'static {
    /// Spawn a future and return a handle to it
    fn spawn_boxed(
        &self,
        future: Pin<Box<dyn Future<Output = ()> + Send + 'static>>,
    ) -> Box<dyn AsyncHandle>;
}

/// Handle to a spawned async task
pub trait AsyncHandle: Send + Sync {
    /// Check if the task is finished
    fn is_finished(&self) -> bool;

    /// Cancel the task
    fn cancel(&self);
}

/// Convenience function for spawning with type safety
pub fn spawn<F>(future: F) -> Box<dyn AsyncHandle>
where
    F: Future<Output = ()> + Send + 'static,
{
    runtime().spawn_boxed(Box::pin(future))
}

/// Default spawner implementations
pub mod spawners {
    use super::*;

    #[cfg(feature = "tokio-runtime")]
    pub mod tokio_impl {
        use super::*;
        use ::tokio::task::JoinHandle;

        /// Tokio-based async spawner. Outside a Tokio runtime the future is
        /// run inline instead.
        pub struct TokioSpawner;

        impl AsyncSpawner for TokioSpawner {
            fn spawn_boxed(
                &self,
                future: Pin<Box<dyn Future<Output = ()> + Send + 'static>>,
            ) -> Box<dyn AsyncHandle> {
                match ::tokio::runtime::Handle::try_current() {
                    Ok(runtime) => Box::new(TokioHandle(runtime.spawn(future))),
                    Err(_) => {
                        log::debug!("no tokio runtime on this thread; running inline");
                        InlineSpawner.spawn_boxed(future)
                    }
                }
            }
        }

        struct TokioHandle(JoinHandle<()>);

        impl AsyncHandle for TokioHandle {
            fn is_finished(&self) -> bool {
                self.0.is_finished()
            }

            fn cancel(&self) {
                self.0.abort();
            }
        }
    }

    /// Runs each future to completion before returning
    pub struct InlineSpawner;

    impl AsyncSpawner for InlineSpawner {
        fn spawn_boxed(
            &self,
            future: Pin<Box<dyn Future<Output = ()> + Send + 'static>>,
        ) -> Box<dyn AsyncHandle> {
            futures::executor::block_on(future);
            Box::new(CompletedHandle)
        }
    }

    struct CompletedHandle;

    impl AsyncHandle for CompletedHandle {
        fn is_finished(&self) -> bool {
            true
        }

        fn cancel(&self) {}
    }
}

/// Global runtime instance
static RUNTIME: std::sync::OnceLock<Box<dyn AsyncSpawner>> = std::sync::OnceLock::new();

/// Get the global runtime spawner
pub fn runtime() -> &'static dyn AsyncSpawner {
    RUNTIME
        .get_or_init(|| {
            #[cfg(feature = "tokio-runtime")]
            {
                Box::new(spawners::tokio_impl::TokioSpawner)
            }

            #[cfg(not(feature = "tokio-runtime"))]
            {
                Box::new(spawners::InlineSpawner)
            }
        })
        .as_ref()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_spawner_completes_immediately() {
        use std::sync::atomic::{AtomicBool, Ordering};
        use std::sync::Arc;

        let ran = Arc::new(AtomicBool::new(false));
        let flag = ran.clone();
        let handle = spawners::InlineSpawner.spawn_boxed(Box::pin(async move {
            flag.store(true, Ordering::SeqCst);
        }));
        assert!(handle.is_finished());
        assert!(ran.load(Ordering::SeqCst));
    }

    #[cfg(feature = "tokio-runtime")]
    #[::tokio::test]
    async fn test_tokio_spawner() {
        let handle = spawn(async {
            ::tokio::time::sleep(::tokio::time::Duration::from_millis(10)).await;
        });

        // Should not be finished immediately
        assert!(!handle.is_finished());

        // Wait a bit and check again
        ::tokio::time::sleep(::tokio::time::Duration::from_millis(50)).await;
        assert!(handle.is_finished());
    }

    #[cfg(feature = "tokio-runtime")]
    #[test]
    fn test_tokio_spawner_without_runtime_runs_inline() {
        use std::sync::atomic::{AtomicBool, Ordering};
        use std::sync::Arc;

        let ran = Arc::new(AtomicBool::new(false));
        let flag = ran.clone();
        let finished = std::thread::spawn(move || {
            let handle = spawners::tokio_impl::TokioSpawner.spawn_boxed(Box::pin(async move {
                flag.store(true, Ordering::SeqCst);
            }));
            handle.is_finished()
        })
        .join()
        .unwrap();

        assert!(finished);
        assert!(ran.load(Ordering::SeqCst));
    }
}
