/* 📖 # What is the Platform Abstraction Layer?

Everything that touches the outside world goes through the `Pal` trait: reading
the config file and running the HTTP server. RealPal does it for real, MockPal
keeps files in memory and dispatches requests directly to the registered service,
so API tests never open a socket.
*/

mod file_path;
pub mod http;
pub mod mock;
pub mod real_pal;
mod traits;

pub use file_path::FilePath;
pub use mock::MockPal;
pub use real_pal::RealPal;
pub use traits::{Pal, PalHandle, ReadSeek};
