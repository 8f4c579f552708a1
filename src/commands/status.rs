use std::path::PathBuf;

use crate::services::csv_store;
use crate::utils::get_data_dir;

pub fn run(data_dir: Option<PathBuf>) {
    let data_dir = data_dir.unwrap_or_else(get_data_dir);

    println!("📊 Stored Data Status\n");

    let infos = match csv_store::scan_data_dir(&data_dir) {
        Ok(infos) => infos,
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            std::process::exit(1);
        }
    };

    if infos.is_empty() {
        println!("⚠️  No data found in {}. Run 'pull' first.", data_dir.display());
        return;
    }

    for info in &infos {
        match (&info.first_date, &info.last_date) {
            (Some(first), Some(last)) => {
                println!(
                    "🔹 {}  {:>6} rows  ({} → {})",
                    info.symbol, info.rows, first, last
                );
            }
            _ => println!("🔹 {}  (no rows)", info.symbol),
        }
    }

    println!(
        "\n💡 {} symbol(s) stored in {}",
        infos.len(),
        data_dir.display()
    );
}
