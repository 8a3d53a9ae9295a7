//! Reads a JSON request with four base64 images on stdin and writes the
//! analysis (or a structured error) as JSON on stdout. Exits 1 on failure.
use hair_density::bridge::{self, BridgeResponse};
use hair_density::{Error, HairAnalyzer};
use std::io::{self, Read};

fn main() {
    env_logger::init();

    let response = match read_stdin() {
        Ok(input) => {
            let analyzer = HairAnalyzer::default();
            let sink = analyzer.config().heatmap.fs_sink();
            bridge::handle(&input, &analyzer, &sink)
        }
        Err(err) => BridgeResponse::failure(&err),
    };

    match serde_json::to_string(&response) {
        Ok(json) => println!("{json}"),
        Err(err) => {
            let fallback = serde_json::json!({
                "success": false,
                "error": err.to_string(),
                "traceback": "",
            });
            println!("{fallback}");
            std::process::exit(1);
        }
    }
    if !response.success {
        std::process::exit(1);
    }
}

fn read_stdin() -> Result<String, Error> {
    let mut input = String::new();
    io::stdin().read_to_string(&mut input)?;
    Ok(input)
}
