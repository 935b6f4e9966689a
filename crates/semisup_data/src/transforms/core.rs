use anyhow::{Context, Result};
use rand::rngs::StdRng;
use std::marker::PhantomData;

/// Defines the core `Transform` trait for composable image pipelines.
///
/// A `Transform<I, O>` is a pure operation over `(input, rng)`: all of its
/// randomness comes from the generator the caller passes in, so a pipeline's
/// behaviour is owned entirely by whoever owns the generator. Deterministic
/// stages simply ignore the parameter. Stages chain via `.then(...)` into a
/// single statically-dispatched pipeline.
///
/// Note: `then()` works only when:
/// 1. **Types align**: `self: Transform<I, O>`, `next: Transform<O, M>`
/// 2. **Owned**: `Self: Sized` (no trait objects, must be concrete)
/// 3. **Thread-safe**: intermediate and output types must be `Send`
pub trait Transform<I, O>: Send + Sync {
    /// Applies the transformation to the input, drawing any randomness from `rng`.
    fn apply(&self, input: I, rng: &mut StdRng) -> Result<O>;

    #[inline]
    fn then<T, M>(self, next: T) -> Chain<Self, T, O>
    where
        Self: Sized,
        T: Transform<O, M>,
        O: Send,
        M: Send,
    {
        Chain {
            first: self,
            second: next,
            _marker: PhantomData,
        }
    }
}

/// A chain of two transforms (`A` -> `B`)
/// - `PhantomData<M>` enforces intermediate type alignment.
#[derive(Debug)]
pub struct Chain<A, B, M> {
    first: A,
    second: B,
    _marker: PhantomData<fn() -> M>,
}

impl<A, B, M> Chain<A, B, M> {
    /// Creates a new transform chain. Use [`Transform::then`] for better
    /// ergonomics; `Chain::new` is useful when spelling pipeline types out.
    pub fn new(first: A, second: B) -> Self {
        Self {
            first,
            second,
            _marker: PhantomData,
        }
    }
}

impl<I, M, O, A, B> Transform<I, O> for Chain<A, B, M>
where
    A: Transform<I, M>,
    B: Transform<M, O>,
    M: Send,
{
    fn apply(&self, input: I, rng: &mut StdRng) -> Result<O> {
        self.first
            .apply(input, rng)
            .and_then(|mid| self.second.apply(mid, rng))
            .with_context(|| {
                format!(
                    "Transform chain failed: {} → {} → {}",
                    std::any::type_name::<A>(),
                    std::any::type_name::<B>(),
                    std::any::type_name::<O>()
                )
            })
    }
}
