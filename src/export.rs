use chrono::NaiveDate;

use crate::models::Rating;

pub const CSV_HEADER: &str = "Beer Name,Brewery,Style,Rating";

/// Render ratings as CSV in the order given. Text columns are always quoted.
pub fn ratings_to_csv(ratings: &[Rating]) -> String {
    let mut csv = String::from(CSV_HEADER);

    for rating in ratings {
        csv.push('\n');
        csv.push_str(&format!(
            "{},{},{},{}",
            quote(&rating.beer_name),
            quote(&rating.brewery),
            quote(&rating.style),
            rating.rating
        ));
    }

    csv
}

pub fn export_filename(date: NaiveDate) -> String {
    format!("beer-ratings-{}.csv", date.format("%Y-%m-%d"))
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}
