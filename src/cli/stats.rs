use anyhow::Result;
use std::path::Path;

use crate::store::Store;

/// Display store statistics in the terminal.
pub fn stats(data_dir: &Path) -> Result<()> {
    let store = Store::open(data_dir)?;
    let response = store.stats()?;

    println!("Ohara Statistics");
    println!("{}", "=".repeat(40));
    println!("  Data directory:      {}", store.data_dir().display());
    println!("  Total touchpoints:   {}", response.total_touchpoints);
    println!("  Reports:             {}", response.report_count);
    println!(
        "  Vocabulary:          {} categories, {} tags",
        response.category_count, response.tag_count
    );
    println!();

    println!("By Category:");
    for (category, count) in &response.by_category {
        println!("  {:<44} {}", category, count);
    }
    println!();

    println!("By Tag:");
    for (tag, count) in &response.by_tag {
        println!("  {:<44} {}", tag, count);
    }
    println!();

    if let Some(ref oldest) = response.oldest {
        println!("Oldest touchpoint:     {oldest}");
    }
    if let Some(ref newest) = response.newest {
        println!("Newest touchpoint:     {newest}");
    }

    Ok(())
}
