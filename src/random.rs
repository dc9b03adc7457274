//! Source of the per-token mask byte.

/// Supplies the random byte that masks each transaction id.
///
/// Implementations must be safe to call through a shared reference, since a
/// single client may generate ids from several threads. Any `Fn() -> u8`
/// closure works, which makes fixed bytes easy to inject in tests.
pub trait ByteSource {
   fn next_byte(&self) -> u8;
}

/// Uniform bytes from the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl ByteSource for ThreadRandom {
   fn next_byte(&self) -> u8 {
      rand::random()
   }
}

impl<F: Fn() -> u8> ByteSource for F {
   fn next_byte(&self) -> u8 {
      self()
   }
}
