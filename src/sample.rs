//! Purpose: Write a random phone catalogue for trying out queries.
//! Exports: `generate`, `DEFAULT_ROWS`.
//! Role: `csvsift generate` backend; output is a regular comma-delimited file with a header.
//! Invariants: Columns are `name,brand,price,rating`; price is an integer in 100..=1500 and
//! rating is one decimal place in 3.0..=5.0.
//! Invariants: The same seed always yields the same file.

use std::path::Path;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::info;

use csvsift::core::error::{Error, ErrorKind};

pub(crate) const DEFAULT_ROWS: usize = 10;

const HEADER: [&str; 4] = ["name", "brand", "price", "rating"];

const BRANDS: [&str; 3] = ["Apple", "Samsung", "Xiaomi"];

const MODELS: [&str; 10] = [
    "iPhone 15 Pro",
    "Galaxy S23 Ultra",
    "Redmi Note 12",
    "Poco X5 Pro",
    "Pixel 7 Pro",
    "OnePlus 11T",
    "Honor Magic Vs",
    "Motorola Edge Plus",
    "Nokia G22",
    "Huawei Mate 50 Pro",
];

pub(crate) fn generate(path: &Path, rows: usize, seed: Option<u64>) -> Result<(), Error> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let write_error = |err: csv::Error| {
        Error::new(ErrorKind::Io)
            .with_message("failed to write sample file")
            .with_path(path)
            .with_source(err)
    };

    let mut writer = csv::Writer::from_path(path).map_err(write_error)?;
    writer.write_record(HEADER).map_err(write_error)?;
    for _ in 0..rows {
        let name = MODELS.choose(&mut rng).copied().unwrap_or(MODELS[0]);
        let brand = BRANDS.choose(&mut rng).copied().unwrap_or(BRANDS[0]);
        let price = rng.gen_range(100..=1500u32).to_string();
        let rating = format!("{:.1}", f64::from(rng.gen_range(30..=50u32)) / 10.0);
        writer
            .write_record([name, brand, price.as_str(), rating.as_str()])
            .map_err(write_error)?;
    }
    writer.flush().map_err(|err| {
        Error::new(ErrorKind::Io)
            .with_message("failed to flush sample file")
            .with_path(path)
            .with_source(err)
    })?;

    info!(path = %path.display(), rows, "sample file written");
    Ok(())
}
