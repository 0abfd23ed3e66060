use sstree::SsTree;
use std::{
    error::Error,
    io::{BufRead, Write},
};

// Every n-th point is deleted again after the build
const DELETE_EVERY: usize = 5;

fn main() -> Result<(), Box<dyn Error>> {
    #[cfg(feature = "tracing")]
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let mut args = std::env::args().skip(1);
    let input = args.next().unwrap_or_else(|| "demo/data/points.csv".to_string());
    let output = args.next().unwrap_or_else(|| "demo/data/tree.csv".to_string());

    // Read the 2-D dataset
    let mut data = Vec::new();
    let file = std::fs::File::open(&input)?;
    for line in std::io::BufReader::new(file).lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let coordinates = line
            .split(',')
            .map(|x| x.trim().parse::<f64>())
            .collect::<Result<Vec<_>, _>>()?;
        data.push(coordinates);
    }
    let Some((seed, rest)) = data.split_first() else {
        return Err(format!("{input} holds no points").into());
    };

    // Build the tree, then delete some of the points again
    let mut tree = SsTree::<2>::try_new(seed)?;
    for point in rest {
        tree.insert_slice(point)?;
    }
    let mut num_deletions = 0;
    for point in data.iter().step_by(DELETE_EVERY) {
        if tree.delete_slice(point)? {
            num_deletions += 1;
        }
    }

    println!("Insertions: {}", data.len());
    println!("Deletions: {num_deletions}");
    println!("Points: {}", tree.len());
    println!("Tree height: {}", tree.height());

    let mut file = std::fs::File::create(&output)?;
    for row in tree.nodes_to_string_rows() {
        file.write_all(row.as_bytes())?;
    }
    println!("Nodes written to {output}");
    Ok(())
}
