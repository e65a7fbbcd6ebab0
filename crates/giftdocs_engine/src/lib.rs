/* 📖 # How is the engine laid out?

Bottom up: `literal` reads and writes payload literals, `extract` finds them in
a code sample, `gate` decides success or denial, `table` and `mock_data` pick
the canned rows and `simulate` ties those together. `page`, `executor`,
`editor` and `session` model an open endpoint page. `api` and `site` put it all
on HTTP.
*/

pub mod api;
pub mod config;
pub mod crypto;
pub mod editor;
pub mod endpoint;
pub mod executor;
pub mod extract;
pub mod gate;
pub mod literal;
pub mod mock_data;
pub mod overview;
pub mod page;
pub mod present;
pub mod representation;
pub mod response;
pub mod samples;
pub mod session;
pub mod simulate;
pub mod site;
pub mod table;

pub use api::{ApiService, SiteInfo};
pub use config::{CONFIG_FILE, Config, load_config, load_config_or_default, parse_config};
pub use endpoint::{EndpointDefinition, EndpointId, catalog, search_catalog};
pub use executor::Executor;
pub use representation::Representation;
pub use samples::{CodeSampleSet, default_sample};
pub use session::{PageSnapshot, SessionRegistry};
pub use simulate::{ExecutionResult, ResultStatus, SimulationError, simulate};
