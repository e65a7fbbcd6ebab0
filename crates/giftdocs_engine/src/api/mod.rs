/* 📖 # Why an API module in giftdocs_engine?

The api module exposes the simulator, the page sessions and the rendered
documentation over HTTP. It implements the HttpService trait from
giftdocs_base, so the same service runs behind RealPal in the binary and
behind MockPal in tests.
*/

mod service;

pub use service::{ApiService, SiteInfo};
