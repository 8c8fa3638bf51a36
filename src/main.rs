//! Cat Breeds Entry Point
//!
//! Opens the app data directory, refreshes the catalog through the list
//! screen's holder and prints the resulting (optionally searched) list.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;

use cat_breeds_app::view_state::{BreedListState, Phase};
use cat_breeds_app::AppContext;

const READY_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Parser, Debug)]
#[command(name = "cat-breeds", about = "Refresh and search the cat breed catalog")]
struct Args {
    /// Directory holding the database, config, images and logs
    #[arg(long, env = "CAT_BREEDS_DATA_DIR", default_value = ".")]
    data_dir: PathBuf,

    /// Print the matching breeds as JSON
    #[arg(long)]
    json: bool,

    /// Search text, matched against name, origin and temperament
    search: Vec<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let data_dir = args.data_dir;

    if let Err(e) = rolling_logger::init_logger(cat_breeds_lib::log_dir(&data_dir), "CatBreeds") {
        eprintln!("Logging disabled: {}", e);
    }

    let ctx = match AppContext::open(&data_dir).await {
        Ok(ctx) => ctx,
        Err(e) => {
            let _ = rolling_logger::error(&format!("Failed to open {}: {}", data_dir.display(), e));
            eprintln!("Failed to open {}: {}", data_dir.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let _ = rolling_logger::info(&format!("Opened data directory {}", data_dir.display()));

    let list = ctx.breed_list();
    let mut rx = list.subscribe();
    let search_text = args.search.join(" ");
    list.set_search_text(search_text.clone());

    let ready = tokio::time::timeout(
        READY_TIMEOUT,
        rx.wait_for(|s| s.phase == Phase::Ready && s.search_text == search_text),
    )
    .await;
    let state: BreedListState = match ready {
        Ok(Ok(state)) => state.clone(),
        _ => {
            let _ = rolling_logger::error("Breed list did not become ready");
            eprintln!("Breed list did not become ready");
            return ExitCode::FAILURE;
        }
    };

    if let Some(message) = &state.error_message {
        eprintln!("{}", message);
        list.error_shown();
    }

    if args.json {
        match serde_json::to_string_pretty(&state.filtered_breeds) {
            Ok(out) => println!("{}", out),
            Err(e) => {
                eprintln!("Failed to encode breeds: {}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        for breed in &state.filtered_breeds {
            let star = if breed.is_favorite { "*" } else { " " };
            println!("{} {:<28} {:<16} {}", star, breed.name, breed.origin, breed.temperament.join(", "));
        }
        println!("{} of {} breeds", state.filtered_breeds.len(), state.breeds.len());
    }

    ExitCode::SUCCESS
}
