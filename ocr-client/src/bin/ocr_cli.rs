use std::path::PathBuf;

use ocr_client::client::OcrClient;
use ocr_client::config::default_client_config;

fn main() {
    let path = match std::env::args().nth(1) {
        Some(arg) => PathBuf::from(arg),
        None => {
            eprintln!("usage: ocr_cli <document.pdf>");
            std::process::exit(2);
        }
    };

    let config = default_client_config();
    println!("endpoint: {}", config.endpoint);

    let client = OcrClient::new(config).expect("failed to build OCR client");
    match client.process_pdf(&path) {
        Ok(pages) => {
            println!("pages: {}", pages.len());
            for page in pages {
                println!("--- Page {} ---", page.page_number);
                println!("{}", page.text);
            }
        }
        Err(err) => {
            eprintln!("{}", err.user_message());
            std::process::exit(1);
        }
    }
}
