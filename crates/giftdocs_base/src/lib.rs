/* 📖 # Why have giftdocs_base as a separate crate?
giftdocs_base holds the error type, tracing bootstrap and the platform abstraction
layer. The engine and the CLI both build on it without depending on each other.
*/

pub mod error;
pub mod pal;
pub mod tracing;

pub use error::{ErrorKind, GiftDocsError, GiftDocsResult, ResultExt};
pub use pal::http;
pub use pal::{FilePath, MockPal, Pal, PalHandle, RealPal};
