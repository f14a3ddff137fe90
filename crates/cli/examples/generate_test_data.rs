use serde_json::json;
use std::fs::File;
use std::io::{BufWriter, Write};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let output_file = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "/tmp/descwatch_sample.jsonl".to_string());
    let count: i64 = std::env::args()
        .nth(2)
        .map(|n| n.parse())
        .transpose()?
        .unwrap_or(1000);

    let mut writer = BufWriter::new(File::create(&output_file)?);

    println!("🔧 Generating sample export: {} ({} records)\n", output_file, count);

    let products = ["bottle", "mug", "lamp", "backpack", "kettle", "notebook", "headset"];
    let adjectives = ["insulated", "compact", "sturdy", "lightweight", "refurbished", "handmade"];

    let mut nulls = 0;
    let mut shorts = 0;
    let mut longs = 0;

    for id in 1..=count {
        let product = products[id as usize % products.len()];
        let adjective = adjectives[id as usize % adjectives.len()];
        let title = format!("{} {}", adjective, product);

        // Inject the problems the monitor looks for at fixed rates
        let description = match id % 20 {
            0 | 7 => {
                nulls += 1;
                serde_json::Value::Null
            }
            3 => {
                nulls += 1;
                json!("")
            }
            5 | 11 => {
                shorts += 1;
                json!(product)
            }
            13 => {
                longs += 1;
                json!(format!("This {} {} ships with extras. ", adjective, product).repeat(12))
            }
            _ => json!(format!(
                "A {} {} built for daily use, with a two-year warranty.",
                adjective, product
            )),
        };

        writeln!(
            writer,
            "{}",
            json!({"id": id, "title": title, "description": description})
        )?;
    }

    writer.flush()?;

    println!("✓ Generated {} records", count);
    println!("  - NULL (missing or empty): {}", nulls);
    println!("  - SHORT: {}", shorts);
    println!("  - LONG: {}", longs);
    println!("\nScore it with:");
    println!("  descwatch score {}", output_file);

    Ok(())
}
