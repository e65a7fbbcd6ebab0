/* 📖 # Why is the CLI minimal and hardcoded?

There are three commands and none takes flags, so the arguments are matched by
hand instead of pulling in an argument parser:

- `giftdocs [serve]` loads `giftdocs.toml` from the current directory (defaults
  if it is missing) and serves the site until killed
- `giftdocs simulate <endpoint> <representation> [file]` runs one sample and
  prints the response, using the default sample when no file is given
- `giftdocs encrypt [file]` prints the `{"data": ...}` envelope of a JSON
  payload, or of the default order

Exit codes: 0 on success, 1 on any error.
*/

use std::env;
use std::process;
use std::thread;

use giftdocs_base::tracing::init_tracing;
use giftdocs_base::{FilePath, GiftDocsResult, PalHandle, RealPal, err};
use giftdocs_engine::{
    ApiService, CONFIG_FILE, CodeSampleSet, EndpointId, Representation, load_config_or_default,
    mock_data, simulate,
};
use tracing::info;

const USAGE: &str = "Usage:
  giftdocs [serve]
  giftdocs simulate <endpoint> <representation> [file]
  giftdocs encrypt [file]";

fn main() {
    if let Err(e) = init_tracing() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    let current_dir = env::current_dir().unwrap_or_else(|e| {
        eprintln!("Error: Failed to get current directory: {}", e);
        process::exit(1);
    });
    let pal = PalHandle::new(RealPal::new(current_dir));

    let args: Vec<String> = env::args().skip(1).collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    let result = match args.as_slice() {
        [] | ["serve"] => serve(&pal),
        ["simulate", endpoint, representation] => run_simulate(&pal, endpoint, representation, None),
        ["simulate", endpoint, representation, file] => {
            run_simulate(&pal, endpoint, representation, Some(*file))
        }
        ["encrypt"] => encrypt(&pal, None),
        ["encrypt", file] => encrypt(&pal, Some(*file)),
        _ => {
            eprintln!("{}", USAGE);
            process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn serve(pal: &PalHandle) -> GiftDocsResult<()> {
    let config = load_config_or_default(pal, &FilePath::from(CONFIG_FILE))?;
    config.validate()?;
    let service = ApiService::from_config(&config);
    let handle = pal.start_http_server(Box::new(service), config.http_server_config())?;
    info!(port = handle.port(), "Serving {}", config.title);
    println!("Serving {} at http://{}:{}/", config.title, config.server.host, handle.port());
    loop {
        thread::park();
    }
}

fn run_simulate(
    pal: &PalHandle,
    endpoint: &str,
    representation: &str,
    file: Option<&str>,
) -> GiftDocsResult<()> {
    let endpoint =
        EndpointId::parse(endpoint).ok_or_else(|| err!("Unknown endpoint '{}'", endpoint))?;
    let representation = Representation::parse(representation)
        .ok_or_else(|| err!("Unknown representation '{}'", representation))?;
    let text = match file {
        Some(file) => pal.read_file_to_string(&FilePath::from(file))?,
        None => {
            let config = load_config_or_default(pal, &FilePath::from(CONFIG_FILE))?;
            CodeSampleSet::defaults(endpoint, &config.api_base_url)
                .get(representation)
                .to_string()
        }
    };

    let result = simulate(endpoint, &text, representation);
    println!("{}", result.text());
    if result.is_success() {
        Ok(())
    } else {
        Err(err!("Simulated call to {} failed", endpoint))
    }
}

fn encrypt(pal: &PalHandle, file: Option<&str>) -> GiftDocsResult<()> {
    let payload = match file {
        Some(file) => {
            let content = pal.read_file_to_string(&FilePath::from(file))?;
            serde_json::from_str::<serde_json::Value>(&content)
                .map_err(|e| err!("{} is not valid JSON: {}", file, e))?
        }
        None => mock_data::order_payload(),
    };
    let envelope = giftdocs_engine::crypto::envelope(&payload);
    println!("{}", giftdocs_engine::present::pretty(&envelope));
    Ok(())
}
